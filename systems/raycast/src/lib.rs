#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid raycaster that turns the tile map into per-column wall slices.
//!
//! Rays are traversed with integer-step DDA: the ray tracks the distance to
//! the next vertical and horizontal grid line and always steps across the
//! nearer one, testing each newly entered tile against the map. The
//! [`Raycaster`] casts one ray per screen column, applies fisheye correction,
//! projects wall heights and records the nearest wall per column in a
//! [`ZBuffer`] for sprite occlusion.

use std::f64::consts::FRAC_PI_3;

use force_field_core::{GridMap, MaterialId, Pose, Position};
use serde::{Deserialize, Serialize};

/// Default safety bound on the number of DDA steps per ray.
pub const DEFAULT_MAX_STEPS: u32 = 1000;

/// Delta distance substituted for an axis the ray never crosses.
pub const NO_CROSSING: f64 = 1e30;

/// Distance floor used when projecting wall heights.
pub const MIN_PROJECTION_DISTANCE: f64 = 0.01;

/// Distance at which walls reach the darkest shade.
const SHADE_FALLOFF: f64 = 50.0;

/// Darkest shade applied to distant walls.
const MIN_SHADE: f64 = 0.2;

/// Grid line crossed by a ray when it entered the wall tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// The ray crossed a vertical grid line (x boundary).
    Vertical,
    /// The ray crossed a horizontal grid line (y boundary).
    Horizontal,
}

/// Result of casting a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance travelled along the ray, capped at the maximum depth.
    pub distance: f64,
    /// Material of the wall struck, or [`MaterialId::EMPTY`] when nothing was hit.
    pub material: MaterialId,
    /// Grid line crossed on the final step.
    pub side: WallSide,
    /// Number of DDA steps taken.
    pub steps: u32,
}

impl RayHit {
    /// Reports whether the ray struck a wall within range.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.material.is_solid()
    }

    const fn miss(max_depth: f64, side: WallSide, steps: u32) -> Self {
        Self {
            distance: max_depth,
            material: MaterialId::EMPTY,
            side,
            steps,
        }
    }
}

/// Per-axis DDA state.
struct AxisWalk {
    cell: i64,
    step: i64,
    side_distance: f64,
    delta_distance: f64,
}

impl AxisWalk {
    fn new(origin: f64, direction: f64) -> Self {
        let cell = origin.floor() as i64;
        let delta_distance = if direction == 0.0 {
            NO_CROSSING
        } else {
            direction.abs().recip()
        };

        if direction < 0.0 {
            Self {
                cell,
                step: -1,
                side_distance: (origin - cell as f64) * delta_distance,
                delta_distance,
            }
        } else {
            Self {
                cell,
                step: 1,
                side_distance: (cell as f64 + 1.0 - origin) * delta_distance,
                delta_distance,
            }
        }
    }

    fn advance(&mut self) -> f64 {
        let distance = self.side_distance;
        self.side_distance += self.delta_distance;
        self.cell += self.step;
        distance
    }
}

/// Casts a ray from `origin` along `angle` until it strikes a wall.
///
/// Traversal stops at the first solid tile, once the travelled distance
/// exceeds `max_depth`, or after `max_steps` steps. Tiles outside the grid
/// are solid, so a ray leaving the map reports the fallback material.
#[must_use]
pub fn cast_ray(
    map: &GridMap,
    origin: Position,
    angle: f64,
    max_depth: f64,
    max_steps: u32,
) -> RayHit {
    if !origin.x().is_finite() || !origin.y().is_finite() {
        return RayHit {
            distance: 0.0,
            material: MaterialId::FALLBACK,
            side: WallSide::Vertical,
            steps: 0,
        };
    }

    let mut x = AxisWalk::new(origin.x(), angle.cos());
    let mut y = AxisWalk::new(origin.y(), angle.sin());
    let mut side = WallSide::Vertical;
    let mut steps = 0;

    while steps < max_steps {
        steps += 1;
        let distance = if x.side_distance < y.side_distance {
            side = WallSide::Vertical;
            x.advance()
        } else {
            side = WallSide::Horizontal;
            y.advance()
        };

        if distance > max_depth {
            return RayHit::miss(max_depth, side, steps);
        }

        let material = map.tile(x.cell, y.cell);
        if material.is_solid() {
            return RayHit {
                distance,
                material,
                side,
                steps,
            };
        }
    }

    RayHit::miss(max_depth, side, steps)
}

/// Removes the fisheye distortion from a radial distance.
#[must_use]
pub fn fisheye_corrected(raw_distance: f64, ray_angle: f64, view_angle: f64) -> f64 {
    raw_distance * (ray_angle - view_angle).cos()
}

/// On-screen height of a wall slice, clamped to the viewport.
#[must_use]
pub fn projected_wall_height(screen_height: f64, corrected_distance: f64) -> f64 {
    (screen_height / corrected_distance.max(MIN_PROJECTION_DISTANCE)).min(screen_height)
}

/// Brightness of a wall slice in `[0.2, 1.0]`; farther walls are darker.
#[must_use]
pub fn distance_shade(raw_distance: f64) -> f64 {
    (1.0 - raw_distance / SHADE_FALLOFF).clamp(MIN_SHADE, 1.0)
}

/// Camera and projection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of rays cast per frame, one per screen column.
    pub columns: usize,
    /// Width of the viewport in pixels.
    pub screen_width: f64,
    /// Height of the viewport in pixels.
    pub screen_height: f64,
    /// Horizontal field of view in radians.
    pub fov: f64,
    /// Factor applied to the field of view while zoomed.
    pub zoom_fov_multiplier: f64,
    /// Maximum distance a ray may travel.
    pub max_depth: f64,
    /// Safety bound on DDA steps per ray.
    pub max_steps: u32,
}

impl ViewConfig {
    /// Field of view in effect for the provided zoom state.
    #[must_use]
    pub fn field_of_view(&self, zoomed: bool) -> f64 {
        if zoomed {
            self.fov * self.zoom_fov_multiplier
        } else {
            self.fov
        }
    }

    /// Width of a single column in pixels.
    #[must_use]
    pub fn column_width(&self) -> f64 {
        if self.columns == 0 {
            self.screen_width
        } else {
            self.screen_width / self.columns as f64
        }
    }

    /// Angle of the ray cast for `column`, spread evenly across the field of view.
    ///
    /// The first and last columns sit exactly on the edges of the view.
    #[must_use]
    pub fn column_angle(&self, view_angle: f64, fov: f64, column: usize) -> f64 {
        if self.columns <= 1 {
            return view_angle;
        }
        let fraction = column as f64 / (self.columns - 1) as f64;
        view_angle - fov / 2.0 + fov * fraction
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            columns: 160,
            screen_width: 800.0,
            screen_height: 600.0,
            fov: FRAC_PI_3,
            zoom_fov_multiplier: 0.5,
            max_depth: 100.0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Wall slice produced for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Angle of the ray in radians.
    pub ray_angle: f64,
    /// Radial distance to the wall.
    pub raw_distance: f64,
    /// Distance projected onto the view direction.
    pub corrected_distance: f64,
    /// Material of the wall, or [`MaterialId::EMPTY`] when nothing was hit.
    pub material: MaterialId,
    /// Grid line crossed when the wall was entered.
    pub side: WallSide,
    /// Height of the slice in pixels.
    pub wall_height: f64,
    /// Brightness of the slice.
    pub shade: f64,
}

/// Nearest wall distance for every screen column.
///
/// Entries hold the radial distance before fisheye correction, matching the
/// radial distances used for sprites.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZBuffer {
    depths: Vec<f64>,
}

impl ZBuffer {
    /// Creates a z-buffer from explicit per-column depths.
    #[must_use]
    pub fn from_depths(depths: Vec<f64>) -> Self {
        Self { depths }
    }

    /// Depth stored for `column`, if the column exists.
    #[must_use]
    pub fn depth(&self, column: usize) -> Option<f64> {
        self.depths.get(column).copied()
    }

    /// Reports whether something at `distance` is hidden by the wall in `column`.
    ///
    /// Columns outside the buffer count as occluded.
    #[must_use]
    pub fn occludes(&self, column: usize, distance: f64) -> bool {
        self.depth(column).map_or(true, |depth| distance > depth)
    }

    /// Number of columns tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Reports whether the buffer tracks no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Depths in column order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.depths
    }
}

/// Casts a full frame of rays and retains the results between frames.
#[derive(Debug)]
pub struct Raycaster {
    config: ViewConfig,
    columns: Vec<WallColumn>,
    z_buffer: ZBuffer,
}

impl Raycaster {
    /// Creates a raycaster using the provided view settings.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            columns: Vec::with_capacity(config.columns),
            z_buffer: ZBuffer::from_depths(Vec::with_capacity(config.columns)),
            config,
        }
    }

    /// View settings in use.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Casts one ray per column from the camera pose, replacing the previous frame.
    pub fn cast(&mut self, map: &GridMap, camera: Pose, zoomed: bool) {
        self.columns.clear();
        self.z_buffer.depths.clear();

        let fov = self.config.field_of_view(zoomed);
        let origin = camera.position();
        for column in 0..self.config.columns {
            let ray_angle = self.config.column_angle(camera.angle(), fov, column);
            let hit = cast_ray(
                map,
                origin,
                ray_angle,
                self.config.max_depth,
                self.config.max_steps,
            );
            let corrected = fisheye_corrected(hit.distance, ray_angle, camera.angle());

            self.columns.push(WallColumn {
                ray_angle,
                raw_distance: hit.distance,
                corrected_distance: corrected,
                material: hit.material,
                side: hit.side,
                wall_height: projected_wall_height(self.config.screen_height, corrected),
                shade: distance_shade(hit.distance),
            });
            self.z_buffer.depths.push(hit.distance);
        }
    }

    /// Wall slices from the most recent cast, in column order.
    #[must_use]
    pub fn columns(&self) -> &[WallColumn] {
        &self.columns
    }

    /// Z-buffer from the most recent cast.
    #[must_use]
    pub fn z_buffer(&self) -> &ZBuffer {
        &self.z_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn axis_aligned_rays_hit_the_expected_border() {
        let map = GridMap::bordered(20);
        let origin = Position::new(10.5, 10.5);

        let east = cast_ray(&map, origin, 0.0, 50.0, DEFAULT_MAX_STEPS);
        let west = cast_ray(&map, origin, PI, 50.0, DEFAULT_MAX_STEPS);
        let south = cast_ray(&map, origin, FRAC_PI_2, 50.0, DEFAULT_MAX_STEPS);

        assert!((east.distance - 8.5).abs() < 1e-9);
        assert_eq!(east.side, WallSide::Vertical);
        assert!((west.distance - 9.5).abs() < 1e-9);
        assert!((south.distance - 8.5).abs() < 1e-9);
        assert_eq!(south.side, WallSide::Horizontal);
    }

    #[test]
    fn exact_zero_direction_component_uses_sentinel() {
        let walk = AxisWalk::new(3.25, 0.0);

        assert_eq!(walk.delta_distance, NO_CROSSING);
        assert_eq!(walk.step, 1);
        assert!(walk.side_distance.is_finite());
    }

    #[test]
    fn ray_reports_material_of_struck_tile() {
        let map = GridMap::bordered(20).with_wall(14, 10, MaterialId::new(4));

        let hit = cast_ray(&map, Position::new(10.5, 10.5), 0.0, 50.0, DEFAULT_MAX_STEPS);

        assert_eq!(hit.material.get(), 4);
        assert!((hit.distance - 3.5).abs() < 1e-9);
    }

    #[test]
    fn ray_beyond_max_depth_reports_a_miss() {
        let map = GridMap::bordered(40);

        let hit = cast_ray(&map, Position::new(2.5, 20.5), 0.0, 10.0, DEFAULT_MAX_STEPS);

        assert!(!hit.is_hit());
        assert_eq!(hit.distance, 10.0);
    }

    #[test]
    fn step_budget_bounds_traversal() {
        let map = GridMap::bordered(40);

        let hit = cast_ray(&map, Position::new(2.5, 20.5), 0.3, 100.0, 5);

        assert_eq!(hit.steps, 5);
        assert!(!hit.is_hit());
    }

    #[test]
    fn rays_leaving_the_grid_strike_fallback_material() {
        let map = GridMap::bordered(10);

        let hit = cast_ray(&map, Position::new(-3.5, 4.5), PI, 50.0, DEFAULT_MAX_STEPS);

        assert_eq!(hit.material, MaterialId::FALLBACK);
    }

    #[test]
    fn wall_height_is_clamped_to_viewport() {
        assert_eq!(projected_wall_height(600.0, 0.0), 600.0);
        assert_eq!(projected_wall_height(600.0, 0.5), 600.0);
        assert!((projected_wall_height(600.0, 4.0) - 150.0).abs() < 1e-12);
    }

    #[test]
    fn shade_darkens_with_distance_and_bottoms_out() {
        assert_eq!(distance_shade(0.0), 1.0);
        assert!((distance_shade(25.0) - 0.5).abs() < 1e-12);
        assert_eq!(distance_shade(80.0), 0.2);
    }

    #[test]
    fn column_angles_span_the_field_of_view() {
        let config = ViewConfig {
            columns: 5,
            ..ViewConfig::default()
        };
        let fov = config.field_of_view(false);

        assert!((config.column_angle(1.0, fov, 0) - (1.0 - fov / 2.0)).abs() < 1e-12);
        assert!((config.column_angle(1.0, fov, 2) - 1.0).abs() < 1e-12);
        assert!((config.column_angle(1.0, fov, 4) - (1.0 + fov / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn zoom_narrows_the_field_of_view() {
        let config = ViewConfig::default();

        assert!((config.field_of_view(true) - FRAC_PI_3 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn z_buffer_treats_missing_columns_as_occluded() {
        let buffer = ZBuffer::from_depths(vec![3.0, 8.0]);

        assert!(buffer.occludes(0, 4.0));
        assert!(!buffer.occludes(1, 4.0));
        assert!(buffer.occludes(2, 0.1));
    }
}
