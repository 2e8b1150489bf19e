use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use force_field_core::{BotState, PickupKind, ProjectileOwner, ShieldState, WeaponState};
use force_field_rendering::{Frame, Hud, RenderingBackend};
use force_field_system_sprites::SpriteKind;

/// Wall glyphs from dark to bright.
const WALL_RAMP: [char; 4] = ['.', ':', '|', '#'];

/// Text renderer that prints each frame as a block of characters followed by a status line.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    out: W,
    width: usize,
    rows: usize,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W, width: usize, rows: usize) -> Self {
        Self { out, width, rows }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        for line in rasterize(frame, self.width, self.rows) {
            writeln!(self.out, "{line}").context("failed to write frame row")?;
        }
        writeln!(self.out, "{}", status_line(&frame.hud)).context("failed to write status line")?;
        Ok(())
    }

    fn finish(&mut self) -> AnyResult<()> {
        self.out.flush().context("failed to flush frame output")
    }
}

/// Samples the frame onto a `width` by `rows` character grid.
pub(crate) fn rasterize(frame: &Frame, width: usize, rows: usize) -> Vec<String> {
    let columns = frame.columns();
    if columns == 0 || width == 0 || rows == 0 {
        return Vec::new();
    }

    (0..rows)
        .map(|row| {
            let y = (row as f32 + 0.5) * frame.viewport.y / rows as f32;
            (0..width)
                .map(|text_column| glyph(frame, text_column * columns / width, y))
                .collect()
        })
        .collect()
}

fn glyph(frame: &Frame, column: usize, y: f32) -> char {
    if let Some(sprite) = frame.sprite_at(column) {
        if (sprite.anchor.y..sprite.anchor.y + sprite.size.y).contains(&y) {
            return sprite_glyph(sprite.kind);
        }
    }

    match frame.walls.get(column) {
        Some(wall) if wall.color.alpha > 0.0 && (wall.top..wall.top + wall.height).contains(&y) => {
            let level = (wall.color.luminance() * WALL_RAMP.len() as f32) as usize;
            WALL_RAMP[level.min(WALL_RAMP.len() - 1)]
        }
        _ => ' ',
    }
}

fn sprite_glyph(kind: SpriteKind) -> char {
    match kind {
        SpriteKind::Bot { state, .. } if state.is_dead() => '%',
        SpriteKind::Bot { enemy, state, .. } => {
            let letter = enemy.name().chars().next().unwrap_or('?');
            if state == BotState::Attacking {
                letter.to_ascii_lowercase()
            } else {
                letter.to_ascii_uppercase()
            }
        }
        SpriteKind::Projectile {
            owner: ProjectileOwner::Player,
            ..
        } => '*',
        SpriteKind::Projectile { .. } => 'o',
        SpriteKind::Pickup {
            kind: PickupKind::HealthPack,
            ..
        } => '+',
        SpriteKind::Pickup {
            kind: PickupKind::AmmoBox,
            ..
        } => '$',
    }
}

/// One-line summary of the player's status.
pub(crate) fn status_line(hud: &Hud) -> String {
    let weapon = match hud.weapon_state {
        WeaponState::Ready => "ready".to_owned(),
        WeaponState::Reloading { remaining } => format!("reloading {remaining}"),
        WeaponState::Overheated { remaining } => format!("overheated {remaining}"),
    };
    let shield = match hud.shield {
        ShieldState::Ready { charge } => format!("ready {charge}"),
        ShieldState::Active { charge } => format!("up {charge}"),
        ShieldState::Cooldown { remaining } => format!("cooldown {remaining}"),
    };
    format!(
        "L{} HP {}/{} | {} {}/{} {} | shield {} | kills {} score {}",
        hud.level,
        hud.health,
        hud.max_health,
        hud.weapon.name(),
        hud.clip,
        hud.reserve,
        weapon,
        shield,
        hud.kills,
        hud.score,
    )
}
