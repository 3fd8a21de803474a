use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use impress_presentation::{
    compute_camera_transform, compute_step_transform, Presentation, PresentationConfig, StepDescriptor,
    StepId, StepInput, ViewportState,
};
use proptest::prelude::*;

const FRAME_MS: f32 = 16.0;

fn presentation_with(count: usize) -> Presentation {
    let mut presentation = Presentation::new(PresentationConfig::default()).unwrap();
    for i in 0..count {
        presentation
            .create_step(StepInput::at(i as f32 * 700.0, (i % 2) as f32 * 300.0, 0.0))
            .unwrap();
    }
    presentation.attach(Some(800.0));
    presentation
}

#[derive(Debug, Clone)]
enum Op {
    Create { in_path: bool },
    RemoveStep(usize),
    AddToRoute { step: usize, after: Option<usize> },
    RemoveFromRoute(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|in_path| Op::Create { in_path }),
        (0usize..12).prop_map(Op::RemoveStep),
        (0usize..12, proptest::option::of(0usize..12))
            .prop_map(|(step, after)| Op::AddToRoute { step, after }),
        (0usize..12).prop_map(Op::RemoveFromRoute),
    ]
}

proptest! {
    // ========================================================================
    // Transform Math
    // ========================================================================

    #[test]
    fn test_camera_cancels_step_transform(
        x in -2000.0f32..2000.0, y in -2000.0f32..2000.0, z in -2000.0f32..2000.0,
        rx in -360.0f32..360.0, ry in -360.0f32..360.0, rz in -360.0f32..360.0,
        scale in 0.25f32..4.0,
        perspective in 100.0f32..2000.0,
    ) {
        let step = StepDescriptor::new(
            StepId(0),
            StepInput::at(x, y, z).rotated(rx, ry, rz).scaled(scale),
        ).unwrap();
        let viewport = ViewportState { width: perspective, height: perspective * 9.0 / 16.0, perspective };

        let combined = compute_camera_transform(&step, &viewport).to_matrix()
            * compute_step_transform(&step).to_matrix();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -perspective));

        prop_assert!(combined.abs_diff_eq(expected, 0.05), "{:?}", combined);
    }

    #[test]
    fn test_non_finite_geometry_never_stored(field in 0usize..6, bad in prop_oneof![Just(f32::NAN), Just(f32::INFINITY), Just(f32::NEG_INFINITY)]) {
        let mut values = [0.0f32; 6];
        values[field] = bad;
        let mut presentation = presentation_with(2);
        let input = StepInput::at(values[0], values[1], values[2]).rotated(values[3], values[4], values[5]);

        prop_assert!(presentation.create_step(input).is_err());
        prop_assert_eq!(presentation.step_count(), 2);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn test_next_undoes_prev(count in 1usize..8, start in 0usize..8) {
        let mut presentation = presentation_with(count);
        let origin = StepId((start % count) as u32);
        presentation.go_to(origin).unwrap();
        presentation.settle(FRAME_MS);

        presentation.prev().unwrap();
        presentation.settle(FRAME_MS);
        presentation.next().unwrap();
        presentation.settle(FRAME_MS);

        prop_assert_eq!(presentation.active_step(), Some(origin));
    }

    #[test]
    fn test_route_is_permutation_of_included_steps(ops in proptest::collection::vec(op(), 1..40)) {
        let mut presentation = presentation_with(3);
        for op in ops {
            let pick = |presentation: &Presentation, index: usize| {
                let ids: Vec<StepId> = presentation.steps().map(|s| s.id).collect();
                ids.get(index % ids.len().max(1)).copied().unwrap_or(StepId(index as u32))
            };
            match op {
                Op::Create { in_path } => {
                    let mut input = StepInput::default();
                    input.include_in_path = in_path;
                    presentation.create_step(input).unwrap();
                }
                Op::RemoveStep(index) => {
                    let id = pick(&presentation, index);
                    presentation.remove_step(id);
                }
                Op::AddToRoute { step, after } => {
                    let id = pick(&presentation, step);
                    let anchor = after.map(|a| pick(&presentation, a));
                    let _ = presentation.add_to_route(id, anchor);
                }
                Op::RemoveFromRoute(index) => {
                    let id = pick(&presentation, index);
                    presentation.remove_from_route(id);
                }
            }

            let route = presentation.route().to_vec();
            let unique: BTreeSet<StepId> = route.iter().copied().collect();
            let included: BTreeSet<StepId> = presentation
                .steps()
                .filter(|s| s.include_in_path)
                .map(|s| s.id)
                .collect();

            prop_assert_eq!(unique.len(), route.len());
            prop_assert_eq!(&unique, &included);
            match presentation.active_step() {
                Some(active) => {
                    prop_assert!(unique.contains(&active));
                }
                None => {
                    prop_assert!(route.is_empty());
                }
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    #[test]
    fn test_interrupt_never_jumps(elapsed in 1.0f32..599.0, target in 1u32..4, detour in 0u32..4) {
        let mut presentation = presentation_with(4);
        presentation.go_to(StepId(target)).unwrap();
        presentation.tick(elapsed);
        let last_frame = presentation.camera();

        presentation.go_to(StepId(detour)).unwrap();
        prop_assert_eq!(presentation.camera(), last_frame);

        presentation.tick(0.0);
        prop_assert_eq!(presentation.camera(), last_frame);
    }
}
