//! Weapon catalogue consumed by the combat and world crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Weapons carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Reliable sidearm.
    Pistol,
    /// Long range automatic rifle.
    Rifle,
    /// Short range spread weapon.
    Shotgun,
    /// High rate of fire, large clip.
    Minigun,
    /// Heat-limited energy weapon firing slow projectiles.
    Plasma,
}

impl WeaponKind {
    /// Every weapon in slot order.
    pub const ALL: [Self; 5] = [
        Self::Pistol,
        Self::Rifle,
        Self::Shotgun,
        Self::Minigun,
        Self::Plasma,
    ];

    /// Zero-based slot index of the weapon.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Pistol => 0,
            Self::Rifle => 1,
            Self::Shotgun => 2,
            Self::Minigun => 3,
            Self::Plasma => 4,
        }
    }

    /// Stable lowercase name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pistol => "pistol",
            Self::Rifle => "rifle",
            Self::Shotgun => "shotgun",
            Self::Minigun => "minigun",
            Self::Plasma => "plasma",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a weapon delivers damage once fired.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Instant ray resolved against bots on the firing tick.
    Hitscan {
        /// Number of rays fired per shot.
        pellets: u32,
        /// Maximum angular deviation of each pellet when more than one is fired.
        pellet_spread: f64,
    },
    /// Physical projectile handed to the projectile simulator.
    Projectile {
        /// Speed in tiles per tick.
        speed: f64,
    },
}

/// Heat model for weapons that overheat instead of running dry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatSpec {
    /// Heat added by each shot.
    pub per_shot: f64,
    /// Heat level at which the weapon overheats.
    pub max: f64,
    /// Heat shed per tick while the weapon is ready.
    pub cooling_rate: f64,
    /// Ticks the weapon stays locked after overheating.
    pub overheat_penalty: u32,
}

/// Static description of a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Damage dealt per hit.
    pub damage: u32,
    /// Maximum effective distance in tiles.
    pub range: f64,
    /// Ticks that must pass between two shots.
    pub cooldown_ticks: u32,
    /// Rounds held by a full clip.
    pub clip_size: u32,
    /// Ticks required to complete a reload.
    pub reload_ticks: u32,
    /// Total rounds issued when the weapon is handed out.
    pub starting_ammo: u32,
    /// Delivery mechanism of the weapon.
    pub delivery: Delivery,
    /// Optional heat model.
    #[serde(default)]
    pub heat: Option<HeatSpec>,
}

const SINGLE_SHOT: Delivery = Delivery::Hitscan {
    pellets: 1,
    pellet_spread: 0.0,
};

impl WeaponSpec {
    /// Default pistol balance.
    #[must_use]
    pub const fn pistol() -> Self {
        Self {
            damage: 25,
            range: 15.0,
            cooldown_ticks: 10,
            clip_size: 12,
            reload_ticks: 60,
            starting_ammo: 48,
            delivery: SINGLE_SHOT,
            heat: None,
        }
    }

    /// Default rifle balance.
    #[must_use]
    pub const fn rifle() -> Self {
        Self {
            damage: 40,
            range: 25.0,
            cooldown_ticks: 8,
            clip_size: 15,
            reload_ticks: 120,
            starting_ammo: 90,
            delivery: SINGLE_SHOT,
            heat: None,
        }
    }

    /// Default shotgun balance.
    #[must_use]
    pub const fn shotgun() -> Self {
        Self {
            damage: 20,
            range: 12.0,
            cooldown_ticks: 30,
            clip_size: 2,
            reload_ticks: 80,
            starting_ammo: 24,
            delivery: Delivery::Hitscan {
                pellets: 8,
                pellet_spread: 0.15,
            },
            heat: None,
        }
    }

    /// Default minigun balance.
    #[must_use]
    pub const fn minigun() -> Self {
        Self {
            damage: 12,
            range: 20.0,
            cooldown_ticks: 3,
            clip_size: 100,
            reload_ticks: 150,
            starting_ammo: 200,
            delivery: SINGLE_SHOT,
            heat: None,
        }
    }

    /// Default plasma balance.
    #[must_use]
    pub const fn plasma() -> Self {
        Self {
            damage: 100,
            range: 30.0,
            cooldown_ticks: 8,
            clip_size: 999,
            reload_ticks: 90,
            starting_ammo: 100,
            delivery: Delivery::Projectile { speed: 0.5 },
            heat: Some(HeatSpec {
                per_shot: 0.25,
                max: 1.0,
                cooling_rate: 0.01,
                overheat_penalty: 180,
            }),
        }
    }
}

/// Lookup table of weapon descriptions keyed by [`WeaponKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    /// Pistol description.
    pub pistol: WeaponSpec,
    /// Rifle description.
    pub rifle: WeaponSpec,
    /// Shotgun description.
    pub shotgun: WeaponSpec,
    /// Minigun description.
    pub minigun: WeaponSpec,
    /// Plasma description.
    pub plasma: WeaponSpec,
}

impl WeaponTable {
    /// Retrieves the description of the provided weapon.
    #[must_use]
    pub const fn get(&self, kind: WeaponKind) -> &WeaponSpec {
        match kind {
            WeaponKind::Pistol => &self.pistol,
            WeaponKind::Rifle => &self.rifle,
            WeaponKind::Shotgun => &self.shotgun,
            WeaponKind::Minigun => &self.minigun,
            WeaponKind::Plasma => &self.plasma,
        }
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            pistol: WeaponSpec::pistol(),
            rifle: WeaponSpec::rifle(),
            shotgun: WeaponSpec::shotgun(),
            minigun: WeaponSpec::minigun(),
            plasma: WeaponSpec::plasma(),
        }
    }
}

/// Per-weapon readiness state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponState {
    /// The weapon may fire once the trigger cooldown allows it.
    Ready,
    /// A reload is in progress.
    Reloading {
        /// Ticks until the reload completes.
        remaining: u32,
    },
    /// The weapon overheated and is locked.
    Overheated {
        /// Ticks until the weapon cools down.
        remaining: u32,
    },
}

/// Reason a fire request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireBlock {
    /// The trigger cooldown from the previous shot is still running.
    Cooldown,
    /// The current weapon is reloading.
    Reloading,
    /// The current weapon is overheated.
    Overheated,
    /// Neither the clip nor the reserve holds any rounds.
    OutOfAmmo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_declaration_order() {
        for (index, kind) in WeaponKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.slot(), index);
        }
    }

    #[test]
    fn weapon_table_survives_binary_round_trip() {
        let mut table = WeaponTable::default();
        table.rifle.damage = 55;

        let encoded = bincode::serialize(&table).expect("serialize weapon table");
        let decoded: WeaponTable = bincode::deserialize(&encoded).expect("deserialize table");

        assert_eq!(decoded, table);
        assert_eq!(decoded.get(WeaponKind::Rifle).damage, 55);
    }
}
