//! Enemy archetypes, difficulty presets and the stat formulas derived from them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BotTuning;

/// Archetype of an enemy bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    /// Baseline shambling enemy.
    Zombie,
    /// Fragile, slow, hits hard.
    Ghost,
    /// Large slow enemy with a deep health pool.
    Boss,
    /// Fast and fragile.
    Demon,
    /// Tough and steady.
    Dinosaur,
    /// Armed raider with slightly raised stats.
    Raider,
    /// Very fast, fragile enemy.
    Ninja,
    /// Long range marksman.
    Sniper,
    /// Small, quick and weak.
    BabyZombie,
    /// Small mutated variant of the baby zombie.
    MutantBaby,
}

/// Multipliers applied to the base bot stats for one enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Multiplier applied to base health.
    pub health_mult: f64,
    /// Multiplier applied to base movement speed.
    pub speed_mult: f64,
    /// Multiplier applied to base damage.
    pub damage_mult: f64,
    /// Billboard scale relative to a full-height sprite.
    pub scale: f64,
}

impl EnemyStats {
    const fn new(health_mult: f64, speed_mult: f64, damage_mult: f64, scale: f64) -> Self {
        Self {
            health_mult,
            speed_mult,
            damage_mult,
            scale,
        }
    }
}

/// Ranged attack pattern used by an enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    /// Distance below which the bot may open fire.
    pub range: f64,
    /// Speed of the launched projectile in tiles per tick.
    pub projectile_speed: f64,
    /// Ticks the bot waits between attacks.
    pub cooldown_ticks: u32,
    /// Flat damage added on top of the bot's own damage stat.
    pub bonus_damage: u32,
}

const SNIPER_RANGE: f64 = 40.0;
const SNIPER_PROJECTILE_SPEED: f64 = 0.4;
const SNIPER_COOLDOWN_TICKS: u32 = 180;

impl EnemyType {
    /// Every archetype in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Zombie,
        Self::Ghost,
        Self::Boss,
        Self::Demon,
        Self::Dinosaur,
        Self::Raider,
        Self::Ninja,
        Self::Sniper,
        Self::BabyZombie,
        Self::MutantBaby,
    ];

    /// Multiplier table entry for the archetype.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Zombie => EnemyStats::new(1.0, 0.8, 1.0, 1.0),
            Self::Ghost => EnemyStats::new(0.6, 0.6, 1.5, 0.9),
            Self::Boss => EnemyStats::new(5.0, 0.5, 2.0, 1.4),
            Self::Demon => EnemyStats::new(0.5, 1.2, 1.5, 0.8),
            Self::Dinosaur => EnemyStats::new(2.0, 0.9, 1.0, 1.0),
            Self::Raider => EnemyStats::new(1.1, 1.0, 1.2, 1.0),
            Self::Ninja => EnemyStats::new(0.5, 1.5, 1.2, 0.9),
            Self::Sniper => EnemyStats::new(0.5, 0.9, 3.0, 0.8),
            Self::BabyZombie => EnemyStats::new(0.4, 1.3, 0.5, 0.5),
            Self::MutantBaby => EnemyStats::new(0.6, 1.1, 0.7, 0.6),
        }
    }

    /// Attack pattern of the archetype given the shared bot tuning.
    #[must_use]
    pub fn attack_profile(self, tuning: &BotTuning) -> AttackProfile {
        match self {
            Self::Sniper => AttackProfile {
                range: SNIPER_RANGE,
                projectile_speed: SNIPER_PROJECTILE_SPEED,
                cooldown_ticks: SNIPER_COOLDOWN_TICKS,
                bonus_damage: 0,
            },
            _ => AttackProfile {
                range: tuning.attack_range,
                projectile_speed: tuning.projectile_speed,
                cooldown_ticks: tuning.attack_cooldown_ticks,
                bonus_damage: tuning.projectile_damage,
            },
        }
    }

    /// Stable snake-case name of the archetype.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zombie => "zombie",
            Self::Ghost => "ghost",
            Self::Boss => "boss",
            Self::Demon => "demon",
            Self::Dinosaur => "dinosaur",
            Self::Raider => "raider",
            Self::Ninja => "ninja",
            Self::Sniper => "sniper",
            Self::BabyZombie => "baby_zombie",
            Self::MutantBaby => "mutant_baby",
        }
    }
}

impl fmt::Display for EnemyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown enemy name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown enemy type `{0}`")]
pub struct UnknownEnemyType(pub String);

impl FromStr for EnemyType {
    type Err = UnknownEnemyType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|enemy| enemy.name() == value)
            .ok_or_else(|| UnknownEnemyType(value.to_owned()))
    }
}

/// Global difficulty preset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Weaker, less dangerous bots.
    Easy,
    /// Baseline balance.
    #[default]
    Normal,
    /// Tougher bots and a larger score reward.
    Hard,
    /// Punishing bots and the largest score reward.
    Nightmare,
}

/// Scaling factors associated with a difficulty preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyModifiers {
    /// Multiplier applied to bot damage.
    pub damage_mult: f64,
    /// Multiplier applied to bot health.
    pub health_mult: f64,
    /// Multiplier applied to score awards.
    pub score_mult: f64,
}

impl Difficulty {
    /// Scaling factors for the preset.
    #[must_use]
    pub const fn modifiers(self) -> DifficultyModifiers {
        let (damage_mult, health_mult, score_mult) = match self {
            Self::Easy => (0.5, 0.7, 0.5),
            Self::Normal => (1.0, 1.0, 1.0),
            Self::Hard => (1.5, 1.5, 2.0),
            Self::Nightmare => (2.5, 2.0, 4.0),
        };
        DifficultyModifiers {
            damage_mult,
            health_mult,
            score_mult,
        }
    }
}

/// Concrete stats of a bot once archetype, level and difficulty are applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotStats {
    /// Starting and maximum health.
    pub health: u32,
    /// Damage stat added to every projectile the bot fires.
    pub damage: u32,
    /// Movement speed in tiles per tick.
    pub speed: f64,
}

impl BotStats {
    /// Derives the stats for an enemy of the given archetype on a level.
    ///
    /// Levels start at one; each level past the first adds flat health and
    /// damage before the difficulty multiplier is applied. Fractions are
    /// truncated at each stage.
    #[must_use]
    pub fn derive(enemy: EnemyType, level: u32, difficulty: Difficulty, tuning: &BotTuning) -> Self {
        let stats = enemy.stats();
        let modifiers = difficulty.modifiers();
        let extra_levels = f64::from(level.saturating_sub(1));

        let base_health = (f64::from(tuning.base_health) * stats.health_mult).trunc()
            + extra_levels * f64::from(tuning.health_per_level);
        let base_damage = (f64::from(tuning.base_damage) * stats.damage_mult).trunc()
            + extra_levels * f64::from(tuning.damage_per_level);

        Self {
            health: ((base_health * modifiers.health_mult) as u32).max(1),
            damage: (base_damage * modifiers.damage_mult) as u32,
            speed: tuning.base_speed * stats.speed_mult,
        }
    }
}
