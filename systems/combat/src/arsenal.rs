//! Per-weapon ammunition, reload and heat state machines.

use force_field_core::{FireBlock, WeaponKind, WeaponSpec, WeaponState, WeaponTable};
use tracing::debug;

/// Ammunition and readiness of one carried weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSlot {
    kind: WeaponKind,
    clip: u32,
    reserve: u32,
    heat: f64,
    state: WeaponState,
}

impl WeaponSlot {
    fn issue(kind: WeaponKind, spec: &WeaponSpec) -> Self {
        let clip = spec.clip_size.min(spec.starting_ammo);
        Self {
            kind,
            clip,
            reserve: spec.starting_ammo - clip,
            heat: 0.0,
            state: WeaponState::Ready,
        }
    }

    /// Weapon held in the slot.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Rounds left in the clip.
    #[must_use]
    pub const fn clip(&self) -> u32 {
        self.clip
    }

    /// Rounds held in reserve.
    #[must_use]
    pub const fn reserve(&self) -> u32 {
        self.reserve
    }

    /// Current heat; always zero for weapons without a heat model.
    #[must_use]
    pub const fn heat(&self) -> f64 {
        self.heat
    }

    /// Readiness of the weapon.
    #[must_use]
    pub const fn state(&self) -> WeaponState {
        self.state
    }

    fn start_reload(&mut self, spec: &WeaponSpec) -> bool {
        let can_reload = self.state == WeaponState::Ready
            && self.clip < spec.clip_size
            && self.reserve > 0;
        if can_reload {
            self.state = WeaponState::Reloading {
                remaining: spec.reload_ticks.max(1),
            };
        }
        can_reload
    }

    fn finish_reload(&mut self, spec: &WeaponSpec) {
        let moved = spec.clip_size.saturating_sub(self.clip).min(self.reserve);
        self.clip += moved;
        self.reserve -= moved;
        self.state = WeaponState::Ready;
    }

    fn advance(&mut self, spec: &WeaponSpec) -> Option<ArsenalNotice> {
        match self.state {
            WeaponState::Reloading { remaining } if remaining <= 1 => {
                self.finish_reload(spec);
                debug!(weapon = %self.kind, clip = self.clip, "reload finished");
                Some(ArsenalNotice::Reloaded(self.kind))
            }
            WeaponState::Reloading { remaining } => {
                self.state = WeaponState::Reloading {
                    remaining: remaining - 1,
                };
                None
            }
            WeaponState::Overheated { remaining } if remaining <= 1 => {
                self.state = WeaponState::Ready;
                self.heat = 0.0;
                debug!(weapon = %self.kind, "weapon cooled");
                Some(ArsenalNotice::Cooled(self.kind))
            }
            WeaponState::Overheated { remaining } => {
                self.state = WeaponState::Overheated {
                    remaining: remaining - 1,
                };
                None
            }
            WeaponState::Ready => {
                if let Some(heat) = spec.heat {
                    self.heat = (self.heat - heat.cooling_rate).max(0.0);
                }
                None
            }
        }
    }
}

/// Result of pulling the trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireOutcome {
    /// A round was fired.
    Fired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Description of the weapon at the time of firing.
        spec: WeaponSpec,
        /// Whether the shot emptied the clip and started a reload.
        reload_started: bool,
        /// Whether the shot overheated the weapon.
        overheated: bool,
    },
    /// The clip was empty; a reload started instead of a shot.
    ReloadStarted {
        /// Weapon being reloaded.
        weapon: WeaponKind,
    },
    /// The weapon refused to fire.
    Blocked {
        /// Weapon that refused.
        weapon: WeaponKind,
        /// Reason for the refusal.
        reason: FireBlock,
    },
}

/// Transition reported while advancing the arsenal by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArsenalNotice {
    /// A reload completed.
    Reloaded(WeaponKind),
    /// An overheated weapon became usable again.
    Cooled(WeaponKind),
}

/// Every weapon carried by the player plus the shared trigger cooldown.
#[derive(Clone, Debug, PartialEq)]
pub struct Arsenal {
    current: WeaponKind,
    slots: [WeaponSlot; 5],
    trigger_cooldown: u32,
}

impl Arsenal {
    /// Issues every weapon with its starting ammunition and selects the pistol.
    #[must_use]
    pub fn new(table: &WeaponTable) -> Self {
        Self {
            current: WeaponKind::Pistol,
            slots: WeaponKind::ALL.map(|kind| WeaponSlot::issue(kind, table.get(kind))),
            trigger_cooldown: 0,
        }
    }

    /// Weapon currently held.
    #[must_use]
    pub const fn current(&self) -> WeaponKind {
        self.current
    }

    /// Slot of the provided weapon.
    #[must_use]
    pub const fn slot(&self, kind: WeaponKind) -> &WeaponSlot {
        &self.slots[kind.slot()]
    }

    /// Slot of the weapon currently held.
    #[must_use]
    pub const fn current_slot(&self) -> &WeaponSlot {
        self.slot(self.current)
    }

    /// Ticks until the trigger may be pulled again.
    #[must_use]
    pub const fn trigger_cooldown(&self) -> u32 {
        self.trigger_cooldown
    }

    /// Attempts to fire the current weapon.
    pub fn fire(&mut self, table: &WeaponTable) -> FireOutcome {
        let weapon = self.current;
        let spec = *table.get(weapon);
        let blocked = |reason| FireOutcome::Blocked { weapon, reason };

        let slot = &mut self.slots[weapon.slot()];
        match slot.state {
            WeaponState::Reloading { .. } => return blocked(FireBlock::Reloading),
            WeaponState::Overheated { .. } => return blocked(FireBlock::Overheated),
            WeaponState::Ready => {}
        }
        if self.trigger_cooldown > 0 {
            return blocked(FireBlock::Cooldown);
        }
        if slot.clip == 0 {
            return if slot.start_reload(&spec) {
                FireOutcome::ReloadStarted { weapon }
            } else {
                blocked(FireBlock::OutOfAmmo)
            };
        }

        slot.clip -= 1;
        self.trigger_cooldown = spec.cooldown_ticks;

        let overheated = match spec.heat {
            Some(heat) => {
                slot.heat += heat.per_shot;
                let overheated = slot.heat >= heat.max;
                if overheated {
                    slot.state = WeaponState::Overheated {
                        remaining: heat.overheat_penalty.max(1),
                    };
                    debug!(weapon = %weapon, "weapon overheated");
                }
                overheated
            }
            None => false,
        };
        let reload_started = !overheated && slot.clip == 0 && slot.start_reload(&spec);

        FireOutcome::Fired {
            weapon,
            spec,
            reload_started,
            overheated,
        }
    }

    /// Starts reloading the current weapon; returns whether a reload began.
    pub fn reload(&mut self, table: &WeaponTable) -> bool {
        let weapon = self.current;
        self.slots[weapon.slot()].start_reload(table.get(weapon))
    }

    /// Selects another weapon, cancelling any reload of the one put away.
    ///
    /// Returns `false` when the weapon is already held.
    pub fn switch_to(&mut self, weapon: WeaponKind) -> bool {
        if weapon == self.current {
            return false;
        }
        let previous = &mut self.slots[self.current.slot()];
        if matches!(previous.state, WeaponState::Reloading { .. }) {
            previous.state = WeaponState::Ready;
        }
        self.current = weapon;
        true
    }

    /// Adds one clip worth of rounds to the reserve of the current weapon.
    pub fn add_clip(&mut self, table: &WeaponTable) {
        let weapon = self.current;
        let slot = &mut self.slots[weapon.slot()];
        slot.reserve = slot.reserve.saturating_add(table.get(weapon).clip_size);
    }

    /// Advances cooldowns, reloads and heat by one tick.
    pub fn tick(&mut self, table: &WeaponTable, out: &mut Vec<ArsenalNotice>) {
        self.trigger_cooldown = self.trigger_cooldown.saturating_sub(1);
        for slot in &mut self.slots {
            if let Some(notice) = slot.advance(table.get(slot.kind)) {
                out.push(notice);
            }
        }
    }
}
