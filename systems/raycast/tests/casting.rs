use std::f64::consts::TAU;

use force_field_core::{GridMap, MaterialId, Pose, Position};
use force_field_system_raycast::{cast_ray, Raycaster, ViewConfig, DEFAULT_MAX_STEPS};

fn cleared_arena(size: u32) -> GridMap {
    GridMap::bordered(size)
}

#[test]
fn ray_from_centre_hits_east_border() {
    let map = cleared_arena(20);

    let hit = cast_ray(&map, Position::new(10.0, 10.0), 0.0, 50.0, DEFAULT_MAX_STEPS);

    assert!(hit.material.get() > 0, "expected a wall material");
    assert!(hit.distance > 0.0);
    assert!((hit.distance - 9.0).abs() < 1e-9);
}

#[test]
fn rays_inside_a_solid_border_always_terminate_in_range() {
    let map = cleared_arena(16)
        .with_wall(5, 5, MaterialId::new(2))
        .with_wall(9, 11, MaterialId::new(3));
    let max_depth = 100.0;
    let origins = [
        Position::new(1.5, 1.5),
        Position::new(8.0, 8.0),
        Position::new(14.99, 3.01),
        Position::new(7.25, 12.75),
    ];

    for origin in origins {
        for step in 0..720 {
            let angle = TAU * f64::from(step) / 720.0;
            let hit = cast_ray(&map, origin, angle, max_depth, DEFAULT_MAX_STEPS);

            assert!(hit.steps <= DEFAULT_MAX_STEPS);
            assert!(hit.is_hit(), "ray from {origin:?} at {angle} escaped");
            assert!(hit.distance.is_finite());
            assert!(hit.distance >= 0.0 && hit.distance <= max_depth);
        }
    }
}

#[test]
fn centre_column_is_unaffected_by_fisheye_correction() {
    let map = cleared_arena(20).with_wall(15, 7, MaterialId::new(5));
    let mut raycaster = Raycaster::new(ViewConfig {
        columns: 9,
        ..ViewConfig::default()
    });

    raycaster.cast(&map, Pose::new(Position::new(6.5, 7.5), 0.0), false);

    let centre = raycaster.columns()[4];
    assert_eq!(centre.corrected_distance, centre.raw_distance);
    assert_eq!(centre.material.get(), 5);
}

#[test]
fn flat_wall_projects_to_a_constant_height() {
    let map = cleared_arena(30);
    let mut raycaster = Raycaster::new(ViewConfig {
        columns: 31,
        ..ViewConfig::default()
    });

    raycaster.cast(&map, Pose::new(Position::new(15.5, 15.5), 0.0), false);

    let heights: Vec<f64> = raycaster
        .columns()
        .iter()
        .map(|column| column.wall_height)
        .collect();
    let first = heights[0];
    for height in &heights {
        assert!(
            (height - first).abs() < 1e-6,
            "fisheye correction should flatten the east wall: {heights:?}"
        );
    }
    for column in raycaster.columns() {
        assert!(column.corrected_distance <= column.raw_distance + 1e-12);
    }
}

#[test]
fn z_buffer_tracks_raw_distance_per_column() {
    let map = cleared_arena(20);
    let config = ViewConfig {
        columns: 12,
        ..ViewConfig::default()
    };
    let mut raycaster = Raycaster::new(config);

    raycaster.cast(&map, Pose::new(Position::new(4.5, 9.5), 1.0), false);

    assert_eq!(raycaster.z_buffer().len(), 12);
    for (column, slice) in raycaster.columns().iter().enumerate() {
        assert_eq!(raycaster.z_buffer().depth(column), Some(slice.raw_distance));
    }
}

#[test]
fn recasting_replaces_the_previous_frame() {
    let map = cleared_arena(20);
    let mut raycaster = Raycaster::new(ViewConfig {
        columns: 8,
        ..ViewConfig::default()
    });

    raycaster.cast(&map, Pose::new(Position::new(4.5, 9.5), 0.0), false);
    raycaster.cast(&map, Pose::new(Position::new(4.5, 9.5), 3.0), true);

    assert_eq!(raycaster.columns().len(), 8);
    assert_eq!(raycaster.z_buffer().len(), 8);
}
