use std::f64::consts::FRAC_PI_2;

use anyhow::{Context, Result as AnyResult};
use force_field_core::{
    grid::LINE_OF_SIGHT_SAMPLES, signed_angle, Command, Event, LevelLayout, WeaponState,
    WorldConfig,
};
use force_field_rendering::{Frame, FrameBuilder, Hud, MaterialPalette, RenderingBackend};
use force_field_system_bot_ai::BotAi;
use force_field_system_projectiles::Projectiles;
use force_field_system_raycast::{Raycaster, ViewConfig};
use force_field_system_sprites::{collect_sources, ProjectorConfig, SpriteProjector, SpriteSource};
use force_field_world::{self as world, query, World};
use tracing::{debug, info};

/// Fixed-tick driver wiring the world to its systems and the renderer.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    bot_ai: BotAi,
    projectiles: Projectiles,
    raycaster: Raycaster,
    projector: SpriteProjector,
    frames: FrameBuilder,
    sources: Vec<SpriteSource>,
}

/// Reason a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every bot was killed and has finished decaying.
    Cleared,
    /// The player died.
    PlayerKilled,
    /// The tick budget ran out first.
    OutOfTicks,
}

/// Final tallies of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) outcome: Outcome,
    pub(crate) ticks: u64,
    pub(crate) kills: u32,
    pub(crate) score: u32,
    pub(crate) health: u32,
}

impl Session {
    pub(crate) fn new(config: WorldConfig, view: ViewConfig) -> Self {
        Self {
            bot_ai: BotAi::new(config.bots.clone()),
            projectiles: Projectiles::new(&config.projectiles),
            world: World::new(config),
            raycaster: Raycaster::new(view.clone()),
            projector: SpriteProjector::new(ProjectorConfig::default()),
            frames: FrameBuilder::new(MaterialPalette::default(), view),
            sources: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn load(&mut self, layout: LevelLayout) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::LoadLevel {
                layout: Box::new(layout),
            },
            &mut events,
        );
        events
    }

    /// Runs one tick: input, clock, bot decisions, then projectile flight.
    pub(crate) fn step(&mut self, input: Vec<Command>) -> Vec<Event> {
        let mut log = Vec::new();
        for command in input {
            world::apply(&mut self.world, command, &mut log);
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);
        log.extend(events.iter().cloned());

        let mut commands = Vec::new();
        self.bot_ai.handle(
            &events,
            query::grid(&self.world),
            &query::player(&self.world),
            &query::bot_view(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut log);
        }

        self.projectiles.handle(
            &events,
            query::grid(&self.world),
            &query::projectiles(&self.world),
            &query::player(&self.world),
            &query::bot_view(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut log);
        }
        log
    }

    /// Casts the view from the player's eye and composes a frame.
    pub(crate) fn render(&mut self) -> Frame {
        let player = query::player(&self.world);
        let grid = query::grid(&self.world);
        self.raycaster.cast(grid, player.pose, player.zoomed);

        self.sources.clear();
        collect_sources(
            &query::bot_view(&self.world),
            &query::projectiles(&self.world),
            &query::pickups(&self.world),
            &mut self.sources,
        );
        let projections = self.projector.project(
            grid,
            self.raycaster.config(),
            player.pose,
            player.zoomed,
            self.raycaster.z_buffer(),
            &self.sources,
        );

        let hud = Hud {
            level: query::level(&self.world),
            health: player.health,
            max_health: player.max_health,
            weapon: player.weapon,
            clip: player.clip,
            reserve: player.reserve,
            weapon_state: player.weapon_state,
            shield: player.shield,
            kills: query::kills(&self.world),
            score: query::score(&self.world),
        };
        self.frames.build(self.raycaster.columns(), projections, hud)
    }

    /// Drives the loaded level until it is cleared, the player dies or `ticks` elapse.
    ///
    /// A frame is presented every `frame_every` ticks; zero disables rendering.
    pub(crate) fn run<B: RenderingBackend>(
        &mut self,
        pilot: &mut Autopilot,
        ticks: u64,
        frame_every: u64,
        backend: &mut B,
    ) -> AnyResult<Summary> {
        let mut elapsed = 0;
        let outcome = loop {
            if query::level_cleared(&self.world) {
                break Outcome::Cleared;
            }
            if !query::player(&self.world).alive {
                break Outcome::PlayerKilled;
            }
            if elapsed == ticks {
                break Outcome::OutOfTicks;
            }

            let input = pilot.commands(&self.world);
            let events = self.step(input);
            elapsed += 1;
            for event in &events {
                match event {
                    Event::PlayerDamaged { amount, remaining } => {
                        debug!(amount, remaining, "player hit");
                    }
                    Event::PickupCollected { kind, .. } => debug!(?kind, "pickup collected"),
                    _ => {}
                }
            }

            if frame_every > 0 && elapsed % frame_every == 0 {
                let frame = self.render();
                backend
                    .present(&frame)
                    .with_context(|| format!("failed to present frame at tick {elapsed}"))?;
            }
        };

        let summary = Summary {
            outcome,
            ticks: elapsed,
            kills: query::kills(&self.world),
            score: query::score(&self.world),
            health: query::player(&self.world).health,
        };
        info!(
            outcome = ?summary.outcome,
            ticks = summary.ticks,
            kills = summary.kills,
            score = summary.score,
            "session finished"
        );
        Ok(summary)
    }
}

/// Scripted player input: turns toward the nearest visible bot and fires,
/// otherwise walks forward and turns away from walls.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    turn_rate: f64,
    aim_tolerance: f64,
    walking: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            turn_rate: 0.1,
            aim_tolerance: 0.04,
            walking: false,
        }
    }
}

impl Autopilot {
    pub(crate) fn commands(&mut self, world: &World) -> Vec<Command> {
        let player = query::player(world);
        if !player.alive {
            return Vec::new();
        }

        let grid = query::grid(world);
        let eye = player.pose.position();
        let bots = query::bot_view(world);
        let target = bots
            .active()
            .filter(|bot| grid.has_line_of_sight(eye, bot.position, LINE_OF_SIGHT_SAMPLES))
            .min_by(|a, b| {
                eye.distance_squared_to(a.position)
                    .total_cmp(&eye.distance_squared_to(b.position))
            });

        if let Some(bot) = target {
            self.walking = false;
            let offset = signed_angle(eye.heading_to(bot.position) - player.pose.angle());
            let turn = offset.clamp(-self.turn_rate, self.turn_rate);
            let mut commands = Vec::new();
            if turn != 0.0 {
                commands.push(Command::RotatePlayer { delta: turn });
            }
            if (offset - turn).abs() < self.aim_tolerance && player.weapon_state == WeaponState::Ready
            {
                commands.push(Command::FireWeapon);
            }
            return commands;
        }

        let stuck = self.walking && !player.moving;
        let speed = query::config(world).player.move_speed;
        let angle = player.pose.angle();
        let ahead = eye.advanced(angle, speed * 3.0);
        if stuck || grid.is_wall(ahead.x(), ahead.y()) {
            self.walking = false;
            return vec![Command::RotatePlayer { delta: FRAC_PI_2 }];
        }

        self.walking = true;
        vec![Command::MovePlayer {
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
        }]
    }
}
