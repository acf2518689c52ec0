//! Property tests for the geometric and bookkeeping invariants.

use proptest::prelude::*;

use umbra_core::block::{BlockId, Mirror};
use umbra_core::geom::{Collider, LayerMask, Shape, Vec2};
use umbra_core::grid::{CellCoord, GridMap};
use umbra_core::light::{
    ExposureTracker, IntensityCurve, LightColor, LightId, LightKind, LightSource, Spotlight,
};
use umbra_core::world::TargetId;

proptest! {
    #[test]
    fn cell_center_maps_back_to_its_cell(
        cell_size in 0.5f32..3.0,
        x in -50i32..50,
        y in -50i32..50,
    ) {
        let grid = GridMap::new(cell_size, CellCoord::new(0, 0));
        let cell = CellCoord::new(x, y);
        prop_assert_eq!(grid.world_to_cell(grid.cell_center(cell)), cell);
    }

    #[test]
    fn rotation_preserves_vector_length(
        x in -100.0f32..100.0,
        y in -100.0f32..100.0,
        radians in -10.0f32..10.0,
    ) {
        let v = Vec2::new(x, y);
        let rotated = v.rotated(radians);
        prop_assert!((rotated.length() - v.length()).abs() < 1e-2);
    }

    #[test]
    fn damage_never_exceeds_the_base_rate(
        distance in 0.0f32..8.0,
        base in 0.1f32..10.0,
        dt in 0.001f32..0.5,
        ease in proptest::bool::ANY,
    ) {
        let mut light = LightSource::new(
            LightId(1),
            Vec2::ZERO,
            LightColor::Yellow,
            LightKind::Spotlight(Spotlight::default()),
        );
        light.range = 8.0;
        light.base_damage = base;
        light.curve = if ease {
            IntensityCurve::EaseInOut
        } else {
            IntensityCurve::Linear
        };

        let damage = light.damage_at(distance, dt);
        prop_assert!(damage >= 0.0);
        prop_assert!(damage <= base * dt + 1e-6);
    }

    #[test]
    fn four_quarter_turns_are_the_identity(
        x in -1.0f32..1.0,
        y in -1.0f32..1.0,
    ) {
        prop_assume!(Vec2::new(x, y).normalized().is_some());
        let mut mirror = Mirror::new(Vec2::new(x, y));
        let start = mirror.beam_dir;
        for _ in 0..4 {
            mirror.rotate();
        }
        prop_assert!((mirror.beam_dir - start).length() < 1e-5);
    }

    #[test]
    fn reconcile_reports_departures_exactly(
        first in proptest::collection::hash_set(0u32..20, 0..10),
        second in proptest::collection::hash_set(0u32..20, 0..10),
    ) {
        let to_targets = |ids: &std::collections::HashSet<u32>| {
            ids.iter()
                .map(|&i| TargetId::Block(BlockId(i)))
                .collect::<hashbrown::HashSet<_>>()
        };
        let prev = to_targets(&first);
        let current = to_targets(&second);

        let mut tracker = ExposureTracker::default();
        tracker.reconcile(prev.clone());
        let exited = tracker.reconcile(current.clone());

        for t in &exited {
            prop_assert!(prev.contains(t));
            prop_assert!(!current.contains(t));
        }
        let expected: hashbrown::HashSet<_> = prev.difference(&current).copied().collect();
        prop_assert_eq!(exited.len(), expected.len());
    }

    #[test]
    fn spotlight_hits_stay_inside_the_range(
        bx in -10.0f32..10.0,
        by in -10.0f32..10.0,
        range in 1.0f32..12.0,
    ) {
        let mut light = LightSource::new(
            LightId(1),
            Vec2::ZERO,
            LightColor::Yellow,
            LightKind::Spotlight(Spotlight::new(Vec2::RIGHT, 90.0, 24)),
        );
        light.range = range;
        let scene = [Collider {
            id: TargetId::Block(BlockId(1)),
            shape: Shape::Box {
                center: Vec2::new(bx, by),
                half: Vec2::new(0.5, 0.5),
            },
            layer: LayerMask::BLOCKS,
        }];
        let exposures = light.cast(&scene);
        if let Some(dist) = exposures.distance(TargetId::Block(BlockId(1))) {
            prop_assert!(dist >= 0.0);
            prop_assert!(dist <= range);
        }
    }
}
