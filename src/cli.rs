// cli.rs - Command-line interface configuration
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::types::StepId;

#[derive(Parser, Debug, Clone)]
#[command(name = "impress")]
#[command(about = "Headless 3D presentation player", long_about = None)]
pub struct Cli {
    /// Presentation document (JSON)
    pub document: PathBuf,

    /// Presentation config overrides (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma separated commands: next, prev, goto:<id>, resize:<width>, edit, zoomin, zoomout, remove:<id>
    #[arg(long, default_value = "")]
    pub script: String,

    /// Container width; configured defaults are used when omitted
    #[arg(long)]
    pub width: Option<f32>,

    /// Animation frames per second
    #[arg(long, default_value = "60")]
    pub fps: f32,

    /// Pace frames against the wall clock instead of simulating them
    #[arg(long = "realtime", default_value = "false")]
    pub realtime: bool,

    /// Write the edited presentation back out
    #[arg(long)]
    pub save: Option<PathBuf>,
}

impl Cli {
    pub fn commands(&self) -> Result<Vec<Command>, String> {
        self.script
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Command::from_str)
            .collect()
    }
}

/// One scripted interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Next,
    Prev,
    GoTo(StepId),
    Resize(f32),
    Edit,
    ZoomIn,
    ZoomOut,
    Remove(StepId),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (raw, None),
        };
        let step = |arg: Option<&str>| {
            arg.and_then(|a| a.parse::<u32>().ok())
                .map(StepId)
                .ok_or_else(|| format!("'{raw}' needs a step id"))
        };

        match name {
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "goto" => step(arg).map(Command::GoTo),
            "remove" => step(arg).map(Command::Remove),
            "resize" => arg
                .and_then(|a| a.parse::<f32>().ok())
                .map(Command::Resize)
                .ok_or_else(|| format!("'{raw}' needs a width")),
            "edit" => Ok(Command::Edit),
            "zoomin" => Ok(Command::ZoomIn),
            "zoomout" => Ok(Command::ZoomOut),
            _ => Err(format!("unknown command '{raw}'")),
        }
    }
}
