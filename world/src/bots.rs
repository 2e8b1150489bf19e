use std::f64::consts::TAU;

use force_field_core::{
    BotId, BotSnapshot, BotState, BotStats, BotTuning, DecayPhase, DecayTuning, Difficulty,
    EnemyType, Position,
};
use force_field_system_combat::hit_damage;

/// Result of damage applied to a live bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Wound {
    pub(crate) applied: u32,
    pub(crate) remaining: u32,
    pub(crate) killed: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Bot {
    id: BotId,
    enemy: EnemyType,
    position: Position,
    angle: f64,
    health: u32,
    max_health: u32,
    damage: u32,
    speed: f64,
    attack_cooldown: u32,
    state: BotState,
    walk_phase: f64,
    shoot_animation: f64,
}

impl Bot {
    pub(crate) fn spawn(
        id: BotId,
        enemy: EnemyType,
        position: Position,
        level: u32,
        difficulty: Difficulty,
        tuning: &BotTuning,
    ) -> Self {
        let stats = BotStats::derive(enemy, level, difficulty, tuning);
        Self {
            id,
            enemy,
            position,
            angle: 0.0,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            speed: stats.speed,
            attack_cooldown: 0,
            state: BotState::Pursuing,
            walk_phase: 0.0,
            shoot_animation: 0.0,
        }
    }

    pub(crate) const fn id(&self) -> BotId {
        self.id
    }

    pub(crate) const fn enemy(&self) -> EnemyType {
        self.enemy
    }

    pub(crate) const fn position(&self) -> Position {
        self.position
    }

    pub(crate) const fn state(&self) -> BotState {
        self.state
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub(crate) const fn attack_cooldown(&self) -> u32 {
        self.attack_cooldown
    }

    /// Faces `heading` and commits the resolved position of a step.
    pub(crate) fn step(&mut self, heading: f64, to: Position, walk_phase_step: f64) {
        self.angle = heading;
        self.state = BotState::Pursuing;
        if to != self.position {
            self.position = to;
            self.walk_phase = (self.walk_phase + walk_phase_step) % TAU;
        }
    }

    pub(crate) fn attack(&mut self, heading: f64, cooldown_ticks: u32) {
        self.angle = heading;
        self.state = BotState::Attacking;
        self.attack_cooldown = cooldown_ticks;
        self.shoot_animation = 1.0;
    }

    /// Applies damage, multiplied on a headshot. Dead bots ignore it.
    pub(crate) fn take_damage(
        &mut self,
        amount: u32,
        headshot: bool,
        headshot_multiplier: u32,
    ) -> Option<Wound> {
        if !self.is_active() {
            return None;
        }
        let applied = hit_damage(amount, headshot, headshot_multiplier);
        self.health = self.health.saturating_sub(applied);
        let killed = self.health == 0;
        if killed {
            self.state = BotState::Dead {
                phase: DecayPhase::Settling,
                elapsed: 0,
            };
            self.shoot_animation = 0.0;
        }
        Some(Wound {
            applied,
            remaining: self.health,
            killed,
        })
    }

    /// Advances cooldowns, animation and decay by one tick.
    ///
    /// Returns `true` on the tick the bot reaches [`BotState::Removed`].
    pub(crate) fn tick(&mut self, tuning: &BotTuning, decay: &DecayTuning) -> bool {
        match self.state {
            BotState::Pursuing | BotState::Attacking => {
                self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
                self.shoot_animation = (self.shoot_animation - tuning.shoot_animation_decay).max(0.0);
                false
            }
            BotState::Dead { elapsed, .. } => {
                let elapsed = elapsed.saturating_add(1);
                if elapsed >= decay.total_ticks() {
                    self.state = BotState::Removed;
                    return true;
                }
                let phase = if elapsed < decay.settle_ticks {
                    DecayPhase::Settling
                } else {
                    DecayPhase::Disintegrating
                };
                self.state = BotState::Dead { phase, elapsed };
                false
            }
            BotState::Removed => false,
        }
    }

    pub(crate) fn snapshot(&self) -> BotSnapshot {
        BotSnapshot {
            id: self.id,
            enemy: self.enemy,
            position: self.position,
            angle: self.angle,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            speed: self.speed,
            attack_cooldown: self.attack_cooldown,
            state: self.state,
            walk_phase: self.walk_phase,
            shoot_animation: self.shoot_animation,
        }
    }
}
