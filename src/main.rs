use std::fs;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use impress_presentation::cli::{Cli, Command};
use impress_presentation::core::Clock;
use impress_presentation::{LoggingBackend, Presentation, PresentationConfig, PresentationDocument};

/// Upper bound on frames spent settling a single command
const MAX_SETTLE_FRAMES: u32 = 10_000;

fn load_config(cli: &Cli) -> Result<PresentationConfig> {
    match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            PresentationConfig::from_json(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(PresentationConfig::default()),
    }
}

fn run_command(presentation: &mut Presentation, command: Command) -> Result<()> {
    match command {
        Command::Next => presentation.next().map(drop)?,
        Command::Prev => presentation.prev().map(drop)?,
        Command::GoTo(id) => presentation.go_to(id).map(drop)?,
        Command::Resize(width) => presentation.resize(width),
        Command::Edit => presentation.set_editing(!presentation.is_editing()),
        Command::ZoomIn => presentation.zoom_in().map(drop)?,
        Command::ZoomOut => presentation.zoom_out().map(drop)?,
        Command::Remove(id) => {
            presentation.remove_step(id);
        }
    }
    Ok(())
}

fn settle(presentation: &mut Presentation, clock: &mut Clock, frame_interval: Duration) {
    let mut frames = 0;
    while presentation.is_transitioning() && frames < MAX_SETTLE_FRAMES {
        clock.wait_for_frame(frame_interval);
        presentation.tick(clock.tick());
        frames += 1;
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let commands = cli.commands().map_err(|err| anyhow!(err))?;

    let raw = fs::read_to_string(&cli.document)
        .with_context(|| format!("Failed to read document {}", cli.document.display()))?;
    let document = PresentationDocument::from_json(&raw)
        .with_context(|| format!("Failed to parse document {}", cli.document.display()))?;
    let config = document.config(&load_config(&cli)?);

    let mut presentation = Presentation::new(config)?.with_backend(LoggingBackend::default());
    document.populate(&mut presentation)?;
    presentation.attach(cli.width);
    info!("loaded {} steps, route {:?}", presentation.step_count(), presentation.route());

    let mut clock = if cli.realtime {
        Clock::realtime()
    } else {
        Clock::fixed_rate(cli.fps)
    };
    let frame_interval = Duration::from_secs_f32(1.0 / cli.fps.max(1.0));

    for command in commands {
        run_command(&mut presentation, command)
            .with_context(|| format!("Command {command:?} failed"))?;
        clock.reset();
        settle(&mut presentation, &mut clock, frame_interval);
    }

    let summary = serde_json::json!({
        "navigation": presentation.navigation_state(),
        "viewport": presentation.viewport(),
        "camera": presentation.camera(),
        "frames": clock.frames(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = &cli.save {
        let saved = PresentationDocument::from_presentation(&presentation).to_json()?;
        fs::write(path, saved).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
