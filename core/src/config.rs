//! Tunable balance values grouped by concern.
//!
//! Every structure deserializes with defaults for missing keys, so a partial
//! TOML document only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::{grid::LINE_OF_SIGHT_SAMPLES, WeaponTable};

/// Complete balance configuration consumed by the world and its systems.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Player movement and health.
    pub player: PlayerTuning,
    /// Bot stats, movement and attack behaviour.
    pub bots: BotTuning,
    /// Timing of the two-phase bot decay.
    pub decay: DecayTuning,
    /// Projectile lifetime and contact radius.
    pub projectiles: ProjectileTuning,
    /// Hitscan resolution and weapon spread.
    pub combat: CombatTuning,
    /// Shield charge and cooldowns.
    pub shield: ShieldTuning,
    /// Pickup collection radius and effects.
    pub pickups: PickupTuning,
    /// Weapon catalogue.
    pub weapons: WeaponTable,
}

/// Player movement and health values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Starting and maximum health.
    pub max_health: u32,
    /// Distance covered by a full movement intent in one tick.
    pub move_speed: f64,
    /// Radius within which a live bot blocks player movement.
    pub collision_radius: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 0.19,
            collision_radius: 0.5,
        }
    }
}

/// Base bot stats and behaviour constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Movement speed before the archetype multiplier, in tiles per tick.
    pub base_speed: f64,
    /// Health before archetype, level and difficulty scaling.
    pub base_health: u32,
    /// Damage stat before archetype, level and difficulty scaling.
    pub base_damage: u32,
    /// Health added for every level past the first.
    pub health_per_level: u32,
    /// Damage added for every level past the first.
    pub damage_per_level: u32,
    /// Distance below which a standard bot may attack.
    pub attack_range: f64,
    /// Ticks between attacks of a standard bot.
    pub attack_cooldown_ticks: u32,
    /// Projectile speed of a standard bot, in tiles per tick.
    pub projectile_speed: f64,
    /// Flat projectile damage added to the bot's damage stat.
    pub projectile_damage: u32,
    /// Radius within which another live bot blocks movement.
    pub collision_radius: f64,
    /// Walk animation phase advance per tick of actual movement, in radians.
    pub walk_phase_step: f64,
    /// Shoot animation intensity shed per tick.
    pub shoot_animation_decay: f64,
    /// Number of samples used by the attack line-of-sight check.
    pub line_of_sight_samples: u32,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.02,
            base_health: 30,
            base_damage: 2,
            health_per_level: 3,
            damage_per_level: 2,
            attack_range: 5.0,
            attack_cooldown_ticks: 60,
            projectile_speed: 0.08,
            projectile_damage: 5,
            collision_radius: 0.5,
            walk_phase_step: 0.3,
            shoot_animation_decay: 0.1,
            line_of_sight_samples: LINE_OF_SIGHT_SAMPLES,
        }
    }
}

/// Durations of the bot decay phases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayTuning {
    /// Ticks the corpse settles before disintegrating.
    pub settle_ticks: u32,
    /// Ticks the corpse takes to disintegrate.
    pub disintegrate_ticks: u32,
}

impl DecayTuning {
    /// Total ticks between death and removal.
    #[must_use]
    pub const fn total_ticks(&self) -> u32 {
        self.settle_ticks.saturating_add(self.disintegrate_ticks)
    }
}

impl Default for DecayTuning {
    fn default() -> Self {
        Self {
            settle_ticks: 60,
            disintegrate_ticks: 100,
        }
    }
}

/// Projectile lifetime and contact settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Ticks a projectile may fly before it expires.
    pub max_travel_steps: u32,
    /// Distance below which a projectile touches an entity.
    pub contact_radius: f64,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            max_travel_steps: 600,
            contact_radius: 0.5,
        }
    }
}

/// Hitscan resolution and aim spread settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Angular offset in radians below which a bot is hit.
    pub hit_cone: f64,
    /// Angular offset in radians below which a hit counts as a headshot.
    pub headshot_cone: f64,
    /// Damage multiplier applied to headshots.
    pub headshot_multiplier: u32,
    /// Maximum aim deviation in radians for single-ray weapons.
    pub spread: f64,
    /// Maximum aim deviation in radians while zoomed.
    pub zoomed_spread: f64,
    /// Score awarded per kill before the difficulty multiplier.
    pub kill_score: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            hit_cone: 0.15,
            headshot_cone: 0.05,
            headshot_multiplier: 3,
            spread: 0.025,
            zoomed_spread: 0.005,
            kill_score: 100,
        }
    }
}

/// Shield energy and cooldown durations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    /// Ticks of protection held by a full charge.
    pub max_charge: u32,
    /// Charge regained per tick while the shield is idle.
    pub recharge_per_tick: u32,
    /// Cooldown after the shield is released voluntarily.
    pub released_cooldown_ticks: u32,
    /// Cooldown after the shield drains completely.
    pub depleted_cooldown_ticks: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            max_charge: 600,
            recharge_per_tick: 2,
            released_cooldown_ticks: 600,
            depleted_cooldown_ticks: 900,
        }
    }
}

/// Pickup collection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Distance below which the player collects a pickup.
    pub collect_radius: f64,
    /// Health restored by a health pack.
    pub health_restore: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            collect_radius: 0.7,
            health_restore: 25,
        }
    }
}
