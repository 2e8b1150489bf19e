#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursue-or-attack decisions for live bots.
//!
//! A bot attacks when the player is inside its attack range, its cooldown has
//! run out and a sampled line of sight to the player is clear. Otherwise it
//! advances toward the player. Dead and removed bots are skipped; their decay
//! is owned by the world.

use force_field_core::{
    BotSnapshot, BotTuning, BotView, Command, Event, GridMap, PlayerSnapshot, Position,
    ProjectileLaunch,
};

/// Action chosen for a single bot on one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    /// Fire a projectile at the player.
    Attack(ProjectileLaunch),
    /// Step toward the player.
    Advance {
        /// Heading toward the player in radians.
        heading: f64,
        /// Distance to cover this tick.
        distance: f64,
    },
}

impl Decision {
    fn into_command(self, bot: &BotSnapshot) -> Command {
        match self {
            Self::Attack(launch) => Command::BotAttack { bot: bot.id, launch },
            Self::Advance { heading, distance } => Command::MoveBot {
                bot: bot.id,
                heading,
                distance,
            },
        }
    }
}

/// Chooses the action of `bot` against a player standing at `player`.
///
/// Returns `None` for bots that are dead or removed.
#[must_use]
pub fn decide(
    map: &GridMap,
    player: Position,
    bot: &BotSnapshot,
    tuning: &BotTuning,
) -> Option<Decision> {
    if !bot.state.is_active() {
        return None;
    }

    let profile = bot.enemy.attack_profile(tuning);
    let heading = bot.position.heading_to(player);
    let in_range = bot.position.distance_to(player) < profile.range;

    if in_range
        && bot.attack_cooldown == 0
        && map.has_line_of_sight(bot.position, player, tuning.line_of_sight_samples)
    {
        return Some(Decision::Attack(ProjectileLaunch {
            origin: bot.position,
            heading,
            speed: profile.projectile_speed,
            damage: profile.bonus_damage.saturating_add(bot.damage),
        }));
    }

    Some(Decision::Advance {
        heading,
        distance: bot.speed,
    })
}

/// Pure system that reacts to world events and emits bot commands.
#[derive(Clone, Debug, Default)]
pub struct BotAi {
    tuning: BotTuning,
}

impl BotAi {
    /// Creates the system from bot tuning values.
    #[must_use]
    pub fn new(tuning: BotTuning) -> Self {
        Self { tuning }
    }

    /// Consumes world events and immutable views to emit bot commands.
    ///
    /// Bots act once per `TimeAdvanced` batch and stand still once the player
    /// has died.
    pub fn handle(
        &mut self,
        events: &[Event],
        map: &GridMap,
        player: &PlayerSnapshot,
        bots: &BotView,
        out: &mut Vec<Command>,
    ) {
        if !player.alive
            || !events
                .iter()
                .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let target = player.pose.position();
        out.extend(bots.active().filter_map(|bot| {
            decide(map, target, bot, &self.tuning).map(|decision| decision.into_command(bot))
        }));
    }
}
