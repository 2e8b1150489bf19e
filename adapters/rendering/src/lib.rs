#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Force Field adapters.
//!
//! Adapters never read the world directly. They receive a [`Frame`] composed
//! from the raycaster's wall columns, the sprite projector's output and a
//! [`Hud`] snapshot, and present it however their medium allows.

use std::ops::Range;

use anyhow::Result as AnyResult;
use force_field_core::{
    BotState, DecayPhase, EnemyType, MaterialId, PickupKind, ProjectileOwner, ShieldState,
    WeaponKind, WeaponState,
};
use force_field_system_raycast::{ViewConfig, WallColumn, WallSide, MIN_PROJECTION_DISTANCE};
use force_field_system_sprites::{SpriteKind, SpriteProjection};
use glam::Vec2;

/// Brightness kept on walls struck on a horizontal side.
const HORIZONTAL_SIDE_SHADE: f32 = 0.75;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color darkened by multiplying every channel by `factor`.
    #[must_use]
    pub fn shaded(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    /// Returns the color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Perceived brightness in the range 0.0..=1.0.
    #[must_use]
    pub fn luminance(self) -> f32 {
        (0.299 * self.red + 0.587 * self.green + 0.114 * self.blue) * self.alpha
    }
}

/// Mapping from wall materials to colors.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialPalette {
    colors: Vec<Color>,
}

impl MaterialPalette {
    /// Creates a palette; material `n` uses `colors[n - 1]`, wrapping around.
    pub fn new(colors: Vec<Color>) -> Result<Self, RenderingError> {
        if colors.is_empty() {
            return Err(RenderingError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Color of the provided wall material; empty tiles map to transparent black.
    #[must_use]
    pub fn color(&self, material: MaterialId) -> Color {
        if !material.is_solid() {
            return Color::new(0.0, 0.0, 0.0, 0.0);
        }
        let index = (usize::from(material.get()) - 1) % self.colors.len();
        self.colors[index]
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::from_rgb_u8(0x80, 0x80, 0x80),
                Color::from_rgb_u8(0x8b, 0x45, 0x13),
                Color::from_rgb_u8(0x46, 0x82, 0xb4),
                Color::from_rgb_u8(0x55, 0x6b, 0x2f),
                Color::from_rgb_u8(0xb2, 0x22, 0x22),
                Color::from_rgb_u8(0xda, 0xa5, 0x20),
            ],
        }
    }
}

/// Wall slice drawn in one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    /// Screen column index.
    pub column: usize,
    /// Top edge of the slice in pixels.
    pub top: f32,
    /// Height of the slice in pixels.
    pub height: f32,
    /// Shaded wall color; transparent when the ray hit nothing.
    pub color: Color,
    /// Radial distance to the wall.
    pub depth: f64,
}

/// Billboard drawn column by column.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteBlit {
    /// What the sprite depicts.
    pub kind: SpriteKind,
    /// Top-left corner of the billboard in pixels.
    pub anchor: Vec2,
    /// Width and height of the billboard in pixels.
    pub size: Vec2,
    /// Screen columns the billboard covers.
    pub columns: Range<usize>,
    /// Runs of columns left uncovered by nearer walls.
    pub visible_runs: Vec<Range<usize>>,
    /// Flat tint used by adapters without sprite art.
    pub tint: Color,
    /// Distance from the camera.
    pub distance: f64,
}

/// Player status shown over the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// One-based level number.
    pub level: u32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Weapon currently held.
    pub weapon: WeaponKind,
    /// Rounds in the clip.
    pub clip: u32,
    /// Rounds in reserve.
    pub reserve: u32,
    /// Readiness of the weapon.
    pub weapon_state: WeaponState,
    /// Shield state.
    pub shield: ShieldState,
    /// Bots killed so far.
    pub kills: u32,
    /// Score accumulated so far.
    pub score: u32,
}

/// Everything an adapter needs to present one rendered view.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Size of the viewport in pixels.
    pub viewport: Vec2,
    /// Width of one screen column in pixels.
    pub column_width: f32,
    /// One wall slice per column, left to right.
    pub walls: Vec<WallSlice>,
    /// Sprites ordered far to near.
    pub sprites: Vec<SpriteBlit>,
    /// Status overlay.
    pub hud: Hud,
}

impl Frame {
    /// Number of screen columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.walls.len()
    }

    /// Nearest sprite drawn at `column`, if any.
    #[must_use]
    pub fn sprite_at(&self, column: usize) -> Option<&SpriteBlit> {
        self.sprites.iter().rev().find(|sprite| {
            sprite
                .visible_runs
                .iter()
                .any(|run| run.contains(&column))
        })
    }
}

/// Composes frames from raycaster and sprite projector output.
#[derive(Clone, Debug, Default)]
pub struct FrameBuilder {
    palette: MaterialPalette,
    view: ViewConfig,
}

impl FrameBuilder {
    /// Creates a builder for the provided palette and view settings.
    #[must_use]
    pub fn new(palette: MaterialPalette, view: ViewConfig) -> Self {
        Self { palette, view }
    }

    /// View settings frames are composed for.
    #[must_use]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Builds a frame from one cast and one projection pass.
    #[must_use]
    pub fn build(&self, walls: &[WallColumn], sprites: &[SpriteProjection], hud: Hud) -> Frame {
        let screen_height = self.view.screen_height as f32;
        let column_width = self.view.column_width() as f32;

        let walls = walls
            .iter()
            .enumerate()
            .map(|(column, wall)| {
                let height = wall.wall_height as f32;
                let side = match wall.side {
                    WallSide::Vertical => 1.0,
                    WallSide::Horizontal => HORIZONTAL_SIDE_SHADE,
                };
                WallSlice {
                    column,
                    top: (screen_height - height) / 2.0,
                    height,
                    color: self
                        .palette
                        .color(wall.material)
                        .shaded(wall.shade as f32 * side),
                    depth: wall.raw_distance,
                }
            })
            .collect();

        let sprites = sprites
            .iter()
            .map(|projection| {
                let floor = self.view.screen_height / projection.distance.max(MIN_PROJECTION_DISTANCE);
                let bottom = ((self.view.screen_height + floor.min(self.view.screen_height)) / 2.0) as f32;
                let height = projection.size as f32;
                SpriteBlit {
                    kind: projection.kind,
                    anchor: Vec2::new(projection.left as f32 * column_width, bottom - height),
                    size: Vec2::new(projection.width as f32 * column_width, height),
                    columns: projection.columns.clone(),
                    visible_runs: projection.visible_runs.clone(),
                    tint: sprite_tint(projection.kind),
                    distance: projection.distance,
                }
            })
            .collect();

        Frame {
            viewport: Vec2::new(self.view.screen_width as f32, screen_height),
            column_width,
            walls,
            sprites,
            hud,
        }
    }
}

/// Flat tint of a sprite for adapters without sprite art.
#[must_use]
pub fn sprite_tint(kind: SpriteKind) -> Color {
    match kind {
        SpriteKind::Bot { enemy, state, .. } => {
            let base = enemy_tint(enemy);
            match state {
                BotState::Pursuing | BotState::Attacking => base,
                BotState::Dead {
                    phase: DecayPhase::Settling,
                    ..
                } => base.shaded(0.6),
                BotState::Dead {
                    phase: DecayPhase::Disintegrating,
                    ..
                } => base.shaded(0.6).with_alpha(0.5),
                BotState::Removed => base.with_alpha(0.0),
            }
        }
        SpriteKind::Projectile { owner, .. } => match owner {
            ProjectileOwner::Player => Color::from_rgb_u8(0x40, 0xe0, 0xff),
            ProjectileOwner::Bot(_) => Color::from_rgb_u8(0xff, 0x60, 0x20),
        },
        SpriteKind::Pickup { kind, .. } => match kind {
            PickupKind::HealthPack => Color::from_rgb_u8(0xf0, 0xf0, 0xf0),
            PickupKind::AmmoBox => Color::from_rgb_u8(0xc0, 0xa0, 0x30),
        },
    }
}

fn enemy_tint(enemy: EnemyType) -> Color {
    match enemy {
        EnemyType::Zombie => Color::from_rgb_u8(0x6b, 0x8e, 0x23),
        EnemyType::Ghost => Color::from_rgb_u8(0xdc, 0xdc, 0xff),
        EnemyType::Boss => Color::from_rgb_u8(0x8b, 0x00, 0x00),
        EnemyType::Demon => Color::from_rgb_u8(0xff, 0x45, 0x00),
        EnemyType::Dinosaur => Color::from_rgb_u8(0x22, 0x8b, 0x22),
        EnemyType::Raider => Color::from_rgb_u8(0xa0, 0x52, 0x2d),
        EnemyType::Ninja => Color::from_rgb_u8(0x30, 0x30, 0x30),
        EnemyType::Sniper => Color::from_rgb_u8(0x70, 0x80, 0x90),
        EnemyType::BabyZombie => Color::from_rgb_u8(0x9a, 0xcd, 0x32),
        EnemyType::MutantBaby => Color::from_rgb_u8(0x93, 0x70, 0xdb),
    }
}

/// Presentation target capable of showing composed frames.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;

    /// Flushes any buffered output once the session ends.
    fn finish(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderingError {
    /// A palette needs at least one color to map materials onto.
    #[error("material palette must contain at least one color")]
    EmptyPalette,
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_field_core::{BotId, GridMap, MaterialId, Pose, Position};
    use force_field_system_raycast::Raycaster;

    fn hud() -> Hud {
        Hud {
            level: 1,
            health: 100,
            max_health: 100,
            weapon: WeaponKind::Pistol,
            clip: 12,
            reserve: 36,
            weapon_state: WeaponState::Ready,
            shield: ShieldState::Ready { charge: 600 },
            kills: 0,
            score: 0,
        }
    }

    #[test]
    fn palette_rejects_empty_color_lists() {
        assert_eq!(
            MaterialPalette::new(Vec::new()),
            Err(RenderingError::EmptyPalette)
        );
    }

    #[test]
    fn palette_wraps_material_ids() {
        let red = Color::from_rgb_u8(255, 0, 0);
        let blue = Color::from_rgb_u8(0, 0, 255);
        let palette = MaterialPalette::new(vec![red, blue]).expect("non-empty palette");

        assert_eq!(palette.color(MaterialId::new(1)), red);
        assert_eq!(palette.color(MaterialId::new(2)), blue);
        assert_eq!(palette.color(MaterialId::new(3)), red);
        assert_eq!(palette.color(MaterialId::EMPTY).alpha, 0.0);
    }

    #[test]
    fn wall_slices_are_centred_on_the_horizon() {
        let view = ViewConfig {
            columns: 16,
            ..ViewConfig::default()
        };
        let mut raycaster = Raycaster::new(view.clone());
        raycaster.cast(&GridMap::bordered(12), Pose::new(Position::new(6.0, 6.0), 0.0), false);
        let builder = FrameBuilder::new(MaterialPalette::default(), view);

        let frame = builder.build(raycaster.columns(), &[], hud());

        assert_eq!(frame.columns(), 16);
        for slice in &frame.walls {
            let centre = slice.top + slice.height / 2.0;
            assert!((centre - 300.0).abs() < 1e-3);
            assert!(slice.color.luminance() > 0.0);
        }
    }

    #[test]
    fn nearest_visible_sprite_wins_a_column() {
        let builder = FrameBuilder::default();
        let bot = |id, distance| SpriteProjection {
            kind: SpriteKind::Bot {
                id: BotId::new(id),
                enemy: EnemyType::Zombie,
                state: BotState::Pursuing,
            },
            distance,
            relative_angle: 0.0,
            size: 600.0 / distance,
            left: 70.0,
            width: 20.0,
            columns: 70..90,
            visible_runs: vec![70..90],
        };

        let frame = builder.build(&[], &[bot(1, 8.0), bot(2, 4.0)], hud());

        assert_eq!(
            frame.sprite_at(75).map(|sprite| sprite.kind),
            Some(bot(2, 4.0).kind)
        );
        assert!(frame.sprite_at(95).is_none());
        assert_eq!(frame.sprites[1].anchor.x, 70.0 * 5.0);
    }

    #[test]
    fn decaying_bots_fade() {
        let kind = |state| SpriteKind::Bot {
            id: BotId::new(0),
            enemy: EnemyType::Ghost,
            state,
        };

        let alive = sprite_tint(kind(BotState::Pursuing));
        let settling = sprite_tint(kind(BotState::Dead {
            phase: DecayPhase::Settling,
            elapsed: 1,
        }));
        let dissolving = sprite_tint(kind(BotState::Dead {
            phase: DecayPhase::Disintegrating,
            elapsed: 90,
        }));

        assert!(settling.luminance() < alive.luminance());
        assert!(dissolving.luminance() < settling.luminance());
    }
}
