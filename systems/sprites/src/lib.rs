#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Billboard projection of bots, projectiles and pickups into the 3D view.
//!
//! Each candidate is culled by distance, by its angle relative to the view
//! direction and by a sampled line-of-sight check. Survivors are sized from
//! their distance, mapped onto screen columns and clipped against the
//! raycaster's [`ZBuffer`] one column at a time, so a sprite partially hidden
//! behind a corner keeps only its exposed columns. The output is ordered far
//! to near so nearer billboards overdraw farther ones.

use std::ops::Range;

use force_field_core::{
    grid::LINE_OF_SIGHT_SAMPLES, signed_angle, BotId, BotSnapshot, BotState, BotView, EnemyType,
    GridMap, PickupId, PickupKind, PickupSnapshot, Pose, Position, ProjectileId, ProjectileOwner,
    ProjectileSnapshot,
};
use force_field_system_raycast::{ViewConfig, ZBuffer, MIN_PROJECTION_DISTANCE};

/// Billboard scale of a projectile sprite.
const PROJECTILE_SCALE: f64 = 0.2;

/// What a sprite depicts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteKind {
    /// A bot, alive or decaying.
    Bot {
        /// Identifier of the bot.
        id: BotId,
        /// Archetype of the bot.
        enemy: EnemyType,
        /// Behavioural state used to pick the animation frame.
        state: BotState,
    },
    /// A projectile in flight.
    Projectile {
        /// Identifier of the projectile.
        id: ProjectileId,
        /// Entity that launched it.
        owner: ProjectileOwner,
    },
    /// A pickup waiting to be collected.
    Pickup {
        /// Identifier of the pickup.
        id: PickupId,
        /// Type of pickup.
        kind: PickupKind,
    },
}

/// World-space entity that may be drawn as a billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSource {
    /// What the sprite depicts.
    pub kind: SpriteKind,
    /// Location of the entity.
    pub position: Position,
    /// Billboard scale relative to a full-height sprite.
    pub scale: f64,
}

impl SpriteSource {
    /// Builds a sprite for a bot; removed bots have no visual representation.
    #[must_use]
    pub fn bot(snapshot: &BotSnapshot) -> Option<Self> {
        if snapshot.state == BotState::Removed {
            return None;
        }
        Some(Self {
            kind: SpriteKind::Bot {
                id: snapshot.id,
                enemy: snapshot.enemy,
                state: snapshot.state,
            },
            position: snapshot.position,
            scale: snapshot.enemy.stats().scale,
        })
    }

    /// Builds a sprite for a projectile.
    #[must_use]
    pub fn projectile(snapshot: &ProjectileSnapshot) -> Self {
        Self {
            kind: SpriteKind::Projectile {
                id: snapshot.id,
                owner: snapshot.owner,
            },
            position: snapshot.position,
            scale: PROJECTILE_SCALE,
        }
    }

    /// Builds a sprite for a pickup.
    #[must_use]
    pub fn pickup(snapshot: &PickupSnapshot) -> Self {
        Self {
            kind: SpriteKind::Pickup {
                id: snapshot.id,
                kind: snapshot.kind,
            },
            position: snapshot.position,
            scale: snapshot.kind.scale(),
        }
    }
}

/// Gathers sprite sources for every drawable entity.
pub fn collect_sources(
    bots: &BotView,
    projectiles: &[ProjectileSnapshot],
    pickups: &[PickupSnapshot],
    out: &mut Vec<SpriteSource>,
) {
    out.extend(bots.iter().filter_map(SpriteSource::bot));
    out.extend(projectiles.iter().map(SpriteSource::projectile));
    out.extend(pickups.iter().map(SpriteSource::pickup));
}

/// Screen placement of a visible sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteProjection {
    /// What the sprite depicts.
    pub kind: SpriteKind,
    /// Radial distance from the camera.
    pub distance: f64,
    /// Angle from the view direction in `(−π, π]`.
    pub relative_angle: f64,
    /// Apparent height of the billboard in pixels.
    pub size: f64,
    /// Left edge of the billboard measured in columns; may be negative.
    pub left: f64,
    /// Width of the billboard measured in columns.
    pub width: f64,
    /// Columns covered by the billboard, clipped to the screen.
    pub columns: Range<usize>,
    /// Maximal runs of columns not hidden by a nearer wall.
    pub visible_runs: Vec<Range<usize>>,
}

impl SpriteProjection {
    /// Number of columns that will actually be drawn.
    #[must_use]
    pub fn visible_columns(&self) -> usize {
        self.visible_runs.iter().map(ExactSizeIterator::len).sum()
    }

    /// Reports whether `column` is drawn.
    #[must_use]
    pub fn is_drawn_at(&self, column: usize) -> bool {
        self.visible_runs.iter().any(|run| run.contains(&column))
    }
}

/// Culling parameters of the sprite projector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectorConfig {
    /// Extra angle beyond half the field of view within which sprites are kept.
    pub fov_margin: f64,
    /// Sprites closer than this distance are skipped.
    pub near_plane: f64,
    /// Samples used by the line-of-sight check.
    pub line_of_sight_samples: u32,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            fov_margin: 0.5,
            near_plane: 0.1,
            line_of_sight_samples: LINE_OF_SIGHT_SAMPLES,
        }
    }
}

/// Projects sprite sources onto the screen, reusing its output buffer across frames.
#[derive(Debug, Default)]
pub struct SpriteProjector {
    config: ProjectorConfig,
    projections: Vec<SpriteProjection>,
}

impl SpriteProjector {
    /// Creates a projector using the provided culling parameters.
    #[must_use]
    pub fn new(config: ProjectorConfig) -> Self {
        Self {
            config,
            projections: Vec::new(),
        }
    }

    /// Projects `sources` for the camera pose, replacing the previous frame.
    ///
    /// Sprites without a single unoccluded column are dropped. The result is
    /// sorted far to near.
    pub fn project(
        &mut self,
        map: &GridMap,
        view: &ViewConfig,
        camera: Pose,
        zoomed: bool,
        z_buffer: &ZBuffer,
        sources: &[SpriteSource],
    ) -> &[SpriteProjection] {
        self.projections.clear();

        let half_fov = view.field_of_view(zoomed) / 2.0;
        let eye = camera.position();
        for source in sources {
            let distance = eye.distance_to(source.position);
            if distance > view.max_depth || distance < self.config.near_plane {
                continue;
            }

            let relative_angle = signed_angle(eye.heading_to(source.position) - camera.angle());
            if relative_angle.abs() >= half_fov + self.config.fov_margin {
                continue;
            }

            if !map.has_line_of_sight(eye, source.position, self.config.line_of_sight_samples) {
                continue;
            }

            if let Some(projection) =
                place_on_screen(view, half_fov, z_buffer, source, distance, relative_angle)
            {
                self.projections.push(projection);
            }
        }

        self.projections
            .sort_by(|a, b| b.distance.total_cmp(&a.distance));
        &self.projections
    }

    /// Projections from the most recent call to [`SpriteProjector::project`].
    #[must_use]
    pub fn projections(&self) -> &[SpriteProjection] {
        &self.projections
    }
}

fn place_on_screen(
    view: &ViewConfig,
    half_fov: f64,
    z_buffer: &ZBuffer,
    source: &SpriteSource,
    distance: f64,
    relative_angle: f64,
) -> Option<SpriteProjection> {
    let column_count = view.columns as f64;
    let centre = column_count / 2.0;
    let size = view.screen_height / distance.max(MIN_PROJECTION_DISTANCE) * source.scale;
    let width = size / view.column_width();
    let left = centre + (relative_angle / half_fov) * centre - width / 2.0;

    let first = left.floor().clamp(0.0, column_count) as usize;
    let end = (left + width).ceil().clamp(0.0, column_count) as usize;
    let columns = first..end.max(first);

    let mut visible_runs: Vec<Range<usize>> = Vec::new();
    for column in columns.clone() {
        if z_buffer.occludes(column, distance) {
            continue;
        }
        match visible_runs.last_mut() {
            Some(run) if run.end == column => run.end = column + 1,
            _ => visible_runs.push(column..column + 1),
        }
    }

    if visible_runs.is_empty() {
        return None;
    }

    Some(SpriteProjection {
        kind: source.kind,
        distance,
        relative_angle,
        size,
        left,
        width,
        columns,
        visible_runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(columns: usize) -> ViewConfig {
        ViewConfig {
            columns,
            screen_width: columns as f64 * 4.0,
            screen_height: 240.0,
            ..ViewConfig::default()
        }
    }

    fn pickup_at(id: u32, x: f64, y: f64) -> SpriteSource {
        SpriteSource {
            kind: SpriteKind::Pickup {
                id: PickupId::new(id),
                kind: PickupKind::HealthPack,
            },
            position: Position::new(x, y),
            scale: 0.5,
        }
    }

    #[test]
    fn sprite_straight_ahead_is_centred() {
        let map = GridMap::bordered(30);
        let view = view(60);
        let z_buffer = ZBuffer::from_depths(vec![100.0; 60]);
        let mut projector = SpriteProjector::default();

        let projections = projector.project(
            &map,
            &view,
            Pose::new(Position::new(5.5, 15.5), 0.0),
            false,
            &z_buffer,
            &[pickup_at(1, 15.5, 15.5)],
        );

        assert_eq!(projections.len(), 1);
        let projection = &projections[0];
        assert!((projection.distance - 10.0).abs() < 1e-12);
        assert!((projection.size - 12.0).abs() < 1e-12);
        assert!((projection.width - 3.0).abs() < 1e-12);
        assert!((projection.left - 28.5).abs() < 1e-12);
        assert_eq!(projection.columns, 28..32);
        assert_eq!(projection.visible_columns(), 4);
    }

    #[test]
    fn sprites_behind_the_camera_are_culled() {
        let map = GridMap::bordered(30);
        let z_buffer = ZBuffer::from_depths(vec![100.0; 60]);
        let mut projector = SpriteProjector::default();

        let projections = projector.project(
            &map,
            &view(60),
            Pose::new(Position::new(15.5, 15.5), 0.0),
            false,
            &z_buffer,
            &[pickup_at(1, 10.5, 15.5), pickup_at(2, 15.5, 5.5)],
        );

        assert!(projections.is_empty());
    }

    #[test]
    fn sprites_beyond_max_depth_are_culled() {
        let map = GridMap::bordered(40);
        let view = ViewConfig {
            max_depth: 8.0,
            ..view(60)
        };
        let z_buffer = ZBuffer::from_depths(vec![100.0; 60]);
        let mut projector = SpriteProjector::default();

        let projections = projector.project(
            &map,
            &view,
            Pose::new(Position::new(2.5, 20.5), 0.0),
            false,
            &z_buffer,
            &[pickup_at(1, 12.5, 20.5)],
        );

        assert!(projections.is_empty());
    }

    #[test]
    fn sprite_straddling_a_corner_keeps_only_exposed_columns() {
        let map = GridMap::bordered(30);
        let mut depths = vec![100.0; 60];
        for depth in depths.iter_mut().take(30) {
            *depth = 4.0;
        }
        let z_buffer = ZBuffer::from_depths(depths);
        let mut projector = SpriteProjector::default();

        let projections = projector.project(
            &map,
            &view(60),
            Pose::new(Position::new(5.5, 15.5), 0.0),
            false,
            &z_buffer,
            &[pickup_at(1, 15.5, 15.5)],
        );

        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].visible_runs, vec![30..32]);
        assert!(!projections[0].is_drawn_at(29));
    }

    #[test]
    fn projections_are_ordered_far_to_near() {
        let map = GridMap::bordered(40);
        let z_buffer = ZBuffer::from_depths(vec![100.0; 60]);
        let mut projector = SpriteProjector::default();
        let near = SpriteSource {
            kind: SpriteKind::Projectile {
                id: ProjectileId::new(3),
                owner: ProjectileOwner::Player,
            },
            position: Position::new(6.5, 20.5),
            scale: PROJECTILE_SCALE,
        };

        let projections = projector.project(
            &map,
            &view(60),
            Pose::new(Position::new(2.5, 20.5), 0.0),
            false,
            &z_buffer,
            &[near, pickup_at(1, 20.5, 20.5), pickup_at(2, 12.5, 20.7)],
        );

        let distances: Vec<f64> = projections.iter().map(|p| p.distance).collect();
        assert_eq!(distances.len(), 3);
        assert!(distances.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn removed_bots_have_no_sprite() {
        let snapshot = BotSnapshot {
            id: BotId::new(1),
            enemy: EnemyType::Ghost,
            position: Position::new(3.0, 3.0),
            angle: 0.0,
            health: 0,
            max_health: 18,
            damage: 3,
            speed: 0.012,
            attack_cooldown: 0,
            state: BotState::Removed,
            walk_phase: 0.0,
            shoot_animation: 0.0,
        };

        assert!(SpriteSource::bot(&snapshot).is_none());
        let alive = BotSnapshot {
            state: BotState::Pursuing,
            ..snapshot
        };
        assert_eq!(SpriteSource::bot(&alive).map(|source| source.scale), Some(0.9));
    }
}
