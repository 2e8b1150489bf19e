#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile flight and contact resolution.
//!
//! [`Flight`] is the map-only simulator: it moves a point and dies on walls.
//! [`Projectiles`] drives every projectile in flight once per tick and turns
//! wall strikes, exhausted travel budgets and entity contact into commands.

mod flight;

pub use flight::{Flight, FlightStatus};

use force_field_core::{
    BotView, Command, Event, ExpiryCause, GridMap, PlayerSnapshot, Position, ProjectileOwner,
    ProjectileSnapshot, ProjectileTuning,
};

/// Pure system that advances projectiles and resolves their contact.
#[derive(Clone, Debug)]
pub struct Projectiles {
    max_travel_steps: u32,
    contact_radius: f64,
}

impl Projectiles {
    /// Creates the system from projectile tuning values.
    #[must_use]
    pub fn new(tuning: &ProjectileTuning) -> Self {
        Self {
            max_travel_steps: tuning.max_travel_steps,
            contact_radius: tuning.contact_radius,
        }
    }

    /// Consumes world events and snapshots to emit projectile commands.
    ///
    /// Nothing happens unless the batch contains `TimeAdvanced`.
    pub fn handle(
        &mut self,
        events: &[Event],
        map: &GridMap,
        projectiles: &[ProjectileSnapshot],
        player: &PlayerSnapshot,
        bots: &BotView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for projectile in projectiles {
            if projectile.travelled >= self.max_travel_steps {
                out.push(Command::ExpireProjectile {
                    projectile: projectile.id,
                    cause: ExpiryCause::Exhausted,
                });
                continue;
            }

            let mut flight = Flight::new(projectile.position, projectile.heading, projectile.speed);
            match flight.update(map) {
                FlightStatus::Moved(to) => out.push(Command::AdvanceProjectile {
                    projectile: projectile.id,
                    to,
                }),
                FlightStatus::HitWall | FlightStatus::Inert => {
                    out.push(Command::ExpireProjectile {
                        projectile: projectile.id,
                        cause: ExpiryCause::Wall,
                    });
                    continue;
                }
            }

            if let Some(contact) = self.contact(projectile, flight.position(), player, bots) {
                out.push(contact.damage);
                out.push(Command::ExpireProjectile {
                    projectile: projectile.id,
                    cause: contact.cause,
                });
            }
        }
    }

    fn contact(
        &self,
        projectile: &ProjectileSnapshot,
        at: Position,
        player: &PlayerSnapshot,
        bots: &BotView,
    ) -> Option<Contact> {
        match projectile.owner {
            ProjectileOwner::Player => bots
                .active()
                .filter(|bot| bot.position.is_within(at, self.contact_radius))
                .min_by(|left, right| {
                    at.distance_squared_to(left.position)
                        .total_cmp(&at.distance_squared_to(right.position))
                })
                .map(|bot| Contact {
                    damage: Command::DamageBot {
                        bot: bot.id,
                        amount: projectile.damage,
                        headshot: false,
                    },
                    cause: ExpiryCause::Bot(bot.id),
                }),
            ProjectileOwner::Bot(_) => (player.alive
                && player.pose.position().is_within(at, self.contact_radius))
            .then_some(Contact {
                damage: Command::DamagePlayer {
                    amount: projectile.damage,
                },
                cause: ExpiryCause::Player,
            }),
        }
    }
}

impl Default for Projectiles {
    fn default() -> Self {
        Self::new(&ProjectileTuning::default())
    }
}

#[derive(Debug)]
struct Contact {
    damage: Command,
    cause: ExpiryCause,
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_field_core::{
        BotId, BotSnapshot, BotState, EnemyType, Pose, ProjectileId, ShieldState, WeaponKind,
        WeaponState,
    };

    fn player_at(x: f64, y: f64) -> PlayerSnapshot {
        PlayerSnapshot {
            pose: Pose::new(Position::new(x, y), 0.0),
            health: 100,
            max_health: 100,
            alive: true,
            shield: ShieldState::Ready { charge: 600 },
            zoomed: false,
            moving: false,
            weapon: WeaponKind::Pistol,
            clip: 12,
            reserve: 36,
            heat: 0.0,
            weapon_state: WeaponState::Ready,
        }
    }

    fn bot_at(id: u32, x: f64, y: f64, state: BotState) -> BotSnapshot {
        BotSnapshot {
            id: BotId::new(id),
            enemy: EnemyType::Zombie,
            position: Position::new(x, y),
            angle: 0.0,
            health: 30,
            max_health: 30,
            damage: 2,
            speed: 0.02,
            attack_cooldown: 0,
            state,
            walk_phase: 0.0,
            shoot_animation: 0.0,
        }
    }

    fn shot(owner: ProjectileOwner, x: f64, y: f64, travelled: u32) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(1),
            owner,
            position: Position::new(x, y),
            heading: 0.0,
            speed: 0.5,
            damage: 100,
            travelled,
        }
    }

    fn run(projectile: ProjectileSnapshot, player: &PlayerSnapshot, bots: &BotView) -> Vec<Command> {
        let mut system = Projectiles::default();
        let mut out = Vec::new();
        system.handle(
            &[Event::TimeAdvanced { tick: 1 }],
            &GridMap::bordered(20),
            &[projectile],
            player,
            bots,
            &mut out,
        );
        out
    }

    #[test]
    fn idle_without_time_advancing() {
        let mut system = Projectiles::default();
        let mut out = Vec::new();
        system.handle(
            &[],
            &GridMap::bordered(20),
            &[shot(ProjectileOwner::Player, 5.0, 5.0, 0)],
            &player_at(2.5, 2.5),
            &BotView::default(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn player_projectile_hits_the_nearest_live_bot() {
        let bots = BotView::from_snapshots(vec![
            bot_at(1, 5.8, 5.0, BotState::Pursuing),
            bot_at(2, 5.5, 5.1, BotState::Pursuing),
            bot_at(3, 5.5, 5.0, BotState::Removed),
        ]);

        let out = run(shot(ProjectileOwner::Player, 5.0, 5.0, 0), &player_at(2.5, 2.5), &bots);

        assert_eq!(
            out[1..],
            [
                Command::DamageBot {
                    bot: BotId::new(2),
                    amount: 100,
                    headshot: false,
                },
                Command::ExpireProjectile {
                    projectile: ProjectileId::new(1),
                    cause: ExpiryCause::Bot(BotId::new(2)),
                },
            ]
        );
    }

    #[test]
    fn bot_projectile_ignores_bots_and_hits_the_player() {
        let bots = BotView::from_snapshots(vec![bot_at(7, 5.5, 5.0, BotState::Pursuing)]);
        let owner = ProjectileOwner::Bot(BotId::new(7));

        let out = run(shot(owner, 5.0, 5.0, 0), &player_at(5.7, 5.0), &bots);

        assert_eq!(
            out[1..],
            [
                Command::DamagePlayer { amount: 100 },
                Command::ExpireProjectile {
                    projectile: ProjectileId::new(1),
                    cause: ExpiryCause::Player,
                },
            ]
        );
    }

    #[test]
    fn exhausted_projectiles_expire_before_moving() {
        let out = run(
            shot(ProjectileOwner::Player, 5.0, 5.0, 600),
            &player_at(2.5, 2.5),
            &BotView::default(),
        );

        assert_eq!(
            out,
            vec![Command::ExpireProjectile {
                projectile: ProjectileId::new(1),
                cause: ExpiryCause::Exhausted,
            }]
        );
    }
}
