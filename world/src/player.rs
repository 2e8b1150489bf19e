use force_field_core::{
    PlayerSnapshot, PlayerTuning, Pose, ShieldState, ShieldTuning, WeaponTable,
};
use force_field_system_combat::Arsenal;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) pose: Pose,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) alive: bool,
    pub(crate) shield: ShieldState,
    pub(crate) zoomed: bool,
    pub(crate) moving: bool,
    pub(crate) arsenal: Arsenal,
}

impl Player {
    pub(crate) fn spawn(
        pose: Pose,
        tuning: &PlayerTuning,
        shield: &ShieldTuning,
        weapons: &WeaponTable,
    ) -> Self {
        Self {
            pose,
            health: tuning.max_health,
            max_health: tuning.max_health,
            alive: true,
            shield: ShieldState::Ready {
                charge: shield.max_charge,
            },
            zoomed: false,
            moving: false,
            arsenal: Arsenal::new(weapons),
        }
    }

    /// Reports whether movement requests are honoured.
    pub(crate) const fn can_move(&self) -> bool {
        self.alive && !self.zoomed && !self.shield.is_active()
    }

    /// Applies damage unless the shield absorbs it; returns the damage taken.
    pub(crate) fn take_damage(&mut self, amount: u32) -> Option<u32> {
        if !self.alive || self.shield.is_active() {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
        }
        Some(amount)
    }

    pub(crate) fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Raises or lowers the shield; returns the new state when it changed.
    pub(crate) fn set_shield(&mut self, active: bool, tuning: &ShieldTuning) -> Option<ShieldState> {
        let next = match (self.shield, active) {
            (ShieldState::Ready { charge }, true) if charge > 0 && self.alive => {
                ShieldState::Active { charge }
            }
            (ShieldState::Active { .. }, false) => ShieldState::Cooldown {
                remaining: tuning.released_cooldown_ticks,
            },
            _ => return None,
        };
        self.shield = next;
        Some(next)
    }

    /// Drains, recharges or cools the shield by one tick.
    ///
    /// Returns the new state when it moved to a different variant.
    pub(crate) fn tick_shield(&mut self, tuning: &ShieldTuning) -> Option<ShieldState> {
        let (next, changed) = match self.shield {
            ShieldState::Ready { charge } => (
                ShieldState::Ready {
                    charge: charge.saturating_add(tuning.recharge_per_tick).min(tuning.max_charge),
                },
                false,
            ),
            ShieldState::Active { charge } if charge <= 1 => (
                ShieldState::Cooldown {
                    remaining: tuning.depleted_cooldown_ticks,
                },
                true,
            ),
            ShieldState::Active { charge } => (ShieldState::Active { charge: charge - 1 }, false),
            ShieldState::Cooldown { remaining } if remaining <= 1 => {
                (ShieldState::Ready { charge: 0 }, true)
            }
            ShieldState::Cooldown { remaining } => (
                ShieldState::Cooldown {
                    remaining: remaining - 1,
                },
                false,
            ),
        };
        self.shield = next;
        changed.then_some(next)
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        let slot = self.arsenal.current_slot();
        PlayerSnapshot {
            pose: self.pose,
            health: self.health,
            max_health: self.max_health,
            alive: self.alive,
            shield: self.shield,
            zoomed: self.zoomed,
            moving: self.moving,
            weapon: self.arsenal.current(),
            clip: slot.clip(),
            reserve: slot.reserve(),
            heat: slot.heat(),
            weapon_state: slot.state(),
        }
    }
}
