#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Force Field.
//!
//! The world owns the level grid, the player, bots, projectiles and pickups.
//! Every mutation arrives as a [`Command`] through [`apply`], which reports
//! what happened as [`Event`] values. Systems observe the world through the
//! read-only [`query`] module and respond with further commands.

mod bots;
mod player;
mod spawn;

use force_field_core::{
    BotId, BotState, Command, Delivery, Difficulty, Event, ExpiryCause, GridMap, LevelLayout,
    PickupId, PickupKind, Pose, Position, ProjectileId, ProjectileLaunch, ProjectileOwner,
    ProjectileSnapshot, WorldConfig, WELCOME_BANNER,
};
use force_field_system_collision::try_move;
use force_field_system_combat::{
    aim_spread, ray_count, resolve_hitscan, ArsenalNotice, FireOutcome, HitTarget,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{bots::Bot, player::Player};

const IDLE_ARENA_SIZE: u32 = 8;
const IDLE_ARENA_SEED: u64 = 0x5eed_f0ce_f1e1_d000;

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    owner: ProjectileOwner,
    position: Position,
    heading: f64,
    speed: f64,
    damage: u32,
    travelled: u32,
}

impl Projectile {
    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            damage: self.damage,
            travelled: self.travelled,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pickup {
    id: PickupId,
    kind: PickupKind,
    position: Position,
}

/// Represents the authoritative Force Field world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    grid: GridMap,
    level: u32,
    difficulty: Difficulty,
    player: Player,
    bots: Vec<Bot>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    next_projectile: u32,
    rng: ChaCha8Rng,
    tick_index: u64,
    kills: u32,
    score: u32,
}

impl World {
    /// Creates an empty walled arena using the provided balance values.
    ///
    /// The arena holds no bots; a level is loaded with [`Command::LoadLevel`].
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let grid = GridMap::bordered(IDLE_ARENA_SIZE);
        let centre = f64::from(IDLE_ARENA_SIZE) / 2.0;
        let player = Player::spawn(
            Pose::new(Position::new(centre, centre), 0.0),
            &config.player,
            &config.shield,
            &config.weapons,
        );
        Self {
            banner: WELCOME_BANNER,
            grid,
            level: 0,
            difficulty: Difficulty::default(),
            player,
            bots: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            next_projectile: 0,
            rng: ChaCha8Rng::seed_from_u64(IDLE_ARENA_SEED),
            tick_index: 0,
            kills: 0,
            score: 0,
            config,
        }
    }

    fn load_level(&mut self, layout: LevelLayout, out_events: &mut Vec<Event>) {
        let LevelLayout {
            grid,
            player,
            clusters,
            pickups,
            number,
            difficulty,
            seed,
        } = layout;

        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.bots = spawn::populate(
            &grid,
            &clusters,
            number,
            difficulty,
            &self.config.bots,
            &mut self.rng,
        );
        self.grid = grid;
        self.level = number;
        self.difficulty = difficulty;
        self.player = Player::spawn(
            player,
            &self.config.player,
            &self.config.shield,
            &self.config.weapons,
        );
        self.projectiles.clear();
        self.next_projectile = 0;
        self.pickups = pickups
            .into_iter()
            .zip(0..)
            .map(|(spawn, id)| Pickup {
                id: PickupId::new(id),
                kind: spawn.kind,
                position: spawn.position,
            })
            .collect();

        let bots = u32::try_from(self.bots.len()).unwrap_or(u32::MAX);
        info!(
            level = number,
            bots,
            ?difficulty,
            grid = self.grid.size(),
            "level loaded"
        );
        out_events.push(Event::LevelLoaded { level: number, bots });
    }

    fn bot_mut(&mut self, id: BotId) -> Option<&mut Bot> {
        self.bots.iter_mut().find(|bot| bot.id() == id)
    }

    fn active_bot_positions(&self, except: Option<BotId>) -> Vec<Position> {
        self.bots
            .iter()
            .filter(|bot| bot.is_active() && Some(bot.id()) != except)
            .map(Bot::position)
            .collect()
    }

    fn spawn_projectile(&mut self, owner: ProjectileOwner, launch: ProjectileLaunch) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            owner,
            position: launch.origin,
            heading: launch.heading,
            speed: launch.speed,
            damage: launch.damage,
            travelled: 0,
        });
        id
    }

    fn advance_clock(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let mut notices = Vec::new();
        self.player.arsenal.tick(&self.config.weapons, &mut notices);
        out_events.extend(notices.into_iter().map(|notice| match notice {
            ArsenalNotice::Reloaded(weapon) => Event::WeaponReloaded { weapon },
            ArsenalNotice::Cooled(weapon) => Event::WeaponCooled { weapon },
        }));

        if let Some(state) = self.player.tick_shield(&self.config.shield) {
            out_events.push(Event::ShieldChanged { state });
        }

        for bot in &mut self.bots {
            if bot.tick(&self.config.bots, &self.config.decay) {
                debug!(bot = bot.id().get(), "bot removed");
                out_events.push(Event::BotRemoved { bot: bot.id() });
            }
        }
        self.bots.retain(|bot| bot.state() != BotState::Removed);

        self.collect_pickups(out_events);
    }

    fn collect_pickups(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.alive {
            return;
        }
        let at = self.player.pose.position();
        let radius = self.config.pickups.collect_radius;
        let (collected, remaining): (Vec<Pickup>, Vec<Pickup>) = std::mem::take(&mut self.pickups)
            .into_iter()
            .partition(|pickup| pickup.position.is_within(at, radius));
        self.pickups = remaining;

        for pickup in collected {
            match pickup.kind {
                PickupKind::HealthPack => self.player.heal(self.config.pickups.health_restore),
                PickupKind::AmmoBox => self.player.arsenal.add_clip(&self.config.weapons),
            }
            out_events.push(Event::PickupCollected {
                pickup: pickup.id,
                kind: pickup.kind,
            });
        }
    }

    fn fire_weapon(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.alive {
            return;
        }
        let (weapon, spec, reload_started, overheated) =
            match self.player.arsenal.fire(&self.config.weapons) {
                FireOutcome::Blocked { weapon, reason } => {
                    out_events.push(Event::WeaponBlocked { weapon, reason });
                    return;
                }
                FireOutcome::ReloadStarted { weapon } => {
                    out_events.push(Event::WeaponReloadStarted { weapon });
                    return;
                }
                FireOutcome::Fired {
                    weapon,
                    spec,
                    reload_started,
                    overheated,
                } => (weapon, spec, reload_started, overheated),
            };
        out_events.push(Event::WeaponFired { weapon });

        let pose = self.player.pose;
        let spread = aim_spread(&spec, self.player.zoomed, &self.config.combat);
        match spec.delivery {
            Delivery::Hitscan { .. } => {
                let mut struck = false;
                for _ in 0..ray_count(&spec) {
                    let aim = pose.angle() + self.deviation(spread);
                    let targets: Vec<HitTarget> = self
                        .bots
                        .iter()
                        .filter(|bot| bot.is_active())
                        .map(|bot| HitTarget {
                            bot: bot.id(),
                            position: bot.position(),
                        })
                        .collect();
                    let Some(hit) = resolve_hitscan(
                        &self.grid,
                        pose.position(),
                        aim,
                        spec.range,
                        &targets,
                        &self.config.combat,
                    ) else {
                        continue;
                    };
                    struck = true;
                    out_events.push(Event::ShotHit {
                        bot: hit.bot,
                        distance: hit.distance,
                        headshot: hit.headshot,
                    });
                    self.damage_bot(hit.bot, spec.damage, hit.headshot, out_events);
                }
                if !struck {
                    out_events.push(Event::ShotMissed { weapon });
                }
            }
            Delivery::Projectile { speed } => {
                let launch = ProjectileLaunch {
                    origin: pose.position(),
                    heading: pose.angle() + self.deviation(spread),
                    speed,
                    damage: spec.damage,
                };
                let projectile = self.spawn_projectile(ProjectileOwner::Player, launch);
                out_events.push(Event::ProjectileSpawned {
                    projectile,
                    owner: ProjectileOwner::Player,
                });
            }
        }

        if overheated {
            out_events.push(Event::WeaponOverheated { weapon });
        }
        if reload_started {
            out_events.push(Event::WeaponReloadStarted { weapon });
        }
    }

    fn deviation(&mut self, spread: f64) -> f64 {
        if spread > 0.0 {
            self.rng.gen_range(-spread..=spread)
        } else {
            0.0
        }
    }

    fn damage_bot(&mut self, id: BotId, amount: u32, headshot: bool, out_events: &mut Vec<Event>) {
        let multiplier = self.config.combat.headshot_multiplier;
        let Some(wound) = self
            .bot_mut(id)
            .and_then(|bot| bot.take_damage(amount, headshot, multiplier))
        else {
            return;
        };
        out_events.push(Event::BotDamaged {
            bot: id,
            amount: wound.applied,
            remaining: wound.remaining,
            headshot,
        });
        if wound.killed {
            let score_mult = self.difficulty.modifiers().score_mult;
            let score = (f64::from(self.config.combat.kill_score) * score_mult) as u32;
            self.kills = self.kills.saturating_add(1);
            self.score = self.score.saturating_add(score);
            debug!(bot = id.get(), headshot, score, "bot killed");
            out_events.push(Event::BotKilled {
                bot: id,
                headshot,
                score,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { layout } => world.load_level(*layout, out_events),
        Command::Tick => world.advance_clock(out_events),
        Command::MovePlayer { dx, dy } => {
            if !world.player.can_move() {
                world.player.moving = false;
                return;
            }
            let from = world.player.pose.position();
            let obstacles = world.active_bot_positions(None);
            let outcome = try_move(
                &world.grid,
                from,
                dx,
                dy,
                &obstacles,
                world.config.player.collision_radius,
            );
            world.player.moving = outcome.displaced();
            if outcome.displaced() {
                world.player.pose = world.player.pose.with_position(outcome.position);
                out_events.push(Event::PlayerMoved {
                    from,
                    to: outcome.position,
                });
            }
        }
        Command::RotatePlayer { delta } => {
            if world.player.alive {
                world.player.pose = world.player.pose.rotated(delta);
            }
        }
        Command::SetShield { active } => {
            if let Some(state) = world.player.set_shield(active, &world.config.shield) {
                out_events.push(Event::ShieldChanged { state });
            }
        }
        Command::SetZoom { zoomed } => {
            if world.player.alive {
                world.player.zoomed = zoomed;
            }
        }
        Command::FireWeapon => world.fire_weapon(out_events),
        Command::ReloadWeapon => {
            if world.player.alive && world.player.arsenal.reload(&world.config.weapons) {
                out_events.push(Event::WeaponReloadStarted {
                    weapon: world.player.arsenal.current(),
                });
            }
        }
        Command::SwitchWeapon { weapon } => {
            let from = world.player.arsenal.current();
            if world.player.alive && world.player.arsenal.switch_to(weapon) {
                debug!(%from, to = %weapon, "weapon switched");
                out_events.push(Event::WeaponSwitched { from, to: weapon });
            }
        }
        Command::MoveBot {
            bot,
            heading,
            distance,
        } => {
            let mut obstacles = world.active_bot_positions(Some(bot));
            if world.player.alive {
                obstacles.push(world.player.pose.position());
            }
            let radius = world.config.bots.collision_radius;
            let walk_phase_step = world.config.bots.walk_phase_step;
            let grid = &world.grid;
            let Some(mover) = world
                .bots
                .iter_mut()
                .find(|candidate| candidate.id() == bot && candidate.is_active())
            else {
                return;
            };
            let from = mover.position();
            let outcome = try_move(
                grid,
                from,
                heading.cos() * distance,
                heading.sin() * distance,
                &obstacles,
                radius,
            );
            mover.step(heading, outcome.position, walk_phase_step);
            if outcome.displaced() {
                out_events.push(Event::BotMoved {
                    bot,
                    from,
                    to: outcome.position,
                });
            }
        }
        Command::BotAttack { bot, launch } => {
            let tuning = &world.config.bots;
            let Some(attacker) = world
                .bots
                .iter_mut()
                .find(|candidate| candidate.id() == bot && candidate.is_active())
            else {
                return;
            };
            if attacker.attack_cooldown() > 0 {
                return;
            }
            let cooldown = attacker.enemy().attack_profile(tuning).cooldown_ticks;
            attacker.attack(launch.heading, cooldown);
            let owner = ProjectileOwner::Bot(bot);
            let projectile = world.spawn_projectile(owner, launch);
            out_events.push(Event::BotAttacked { bot, projectile });
            out_events.push(Event::ProjectileSpawned { projectile, owner });
        }
        Command::AdvanceProjectile { projectile, to } => {
            if let Some(flying) = world
                .projectiles
                .iter_mut()
                .find(|candidate| candidate.id == projectile)
            {
                flying.position = to;
                flying.travelled = flying.travelled.saturating_add(1);
                out_events.push(Event::ProjectileMoved { projectile, to });
            }
        }
        Command::ExpireProjectile { projectile, cause } => {
            if let Some(index) = world
                .projectiles
                .iter()
                .position(|candidate| candidate.id == projectile)
            {
                let _ = world.projectiles.remove(index);
                if matches!(cause, ExpiryCause::Exhausted) {
                    debug!(projectile = projectile.get(), "projectile exhausted");
                }
                out_events.push(Event::ProjectileExpired { projectile, cause });
            }
        }
        Command::DamagePlayer { amount } => {
            let Some(amount) = world.player.take_damage(amount) else {
                return;
            };
            out_events.push(Event::PlayerDamaged {
                amount,
                remaining: world.player.health,
            });
            if !world.player.alive {
                info!(tick = world.tick_index, score = world.score, "player killed");
                out_events.push(Event::PlayerKilled);
            }
        }
        Command::DamageBot {
            bot,
            amount,
            headshot,
        } => world.damage_bot(bot, amount, headshot, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use force_field_core::{
        BotView, GridMap, PickupSnapshot, PlayerSnapshot, ProjectileSnapshot, WorldConfig,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Balance values the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of every bot that has not been removed.
    #[must_use]
    pub fn bot_view(world: &World) -> BotView {
        BotView::from_snapshots(world.bots.iter().map(|bot| bot.snapshot()).collect())
    }

    /// Captures every projectile in flight, in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.projectiles.iter().map(|projectile| projectile.snapshot()).collect()
    }

    /// Captures every pickup still waiting to be collected.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world
            .pickups
            .iter()
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                kind: pickup.kind,
                position: pickup.position,
            })
            .collect()
    }

    /// Index of the most recently completed tick.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of the loaded level; zero before any level is loaded.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Reports whether a level is loaded and every bot has been removed.
    #[must_use]
    pub fn level_cleared(world: &World) -> bool {
        world.level > 0 && world.bots.is_empty()
    }

    /// Number of bots killed since the world was created.
    #[must_use]
    pub fn kills(world: &World) -> u32 {
        world.kills
    }

    /// Score accumulated since the world was created.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }
}
