use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use force_field_core::{
    Command, Difficulty, EnemySelection, EnemyType, Event, Footprint, GridMap, LevelLayout,
    MaterialId, Pose, Position, SpawnCluster, WeaponKind, WorldConfig,
};
use force_field_system_bot_ai::BotAi;
use force_field_system_projectiles::Projectiles;
use force_field_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_fingerprints() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.events.len() > 100, "replay should produce a busy log");
}

fn arena() -> GridMap {
    (6..10)
        .fold(GridMap::bordered(24), |grid, row| {
            grid.with_wall(12, row, MaterialId::new(3))
        })
        .with_footprints(vec![Footprint::new("depot", 16, 20, 16, 20)])
        .unwrap_or_else(|error| panic!("footprint should fit: {error}"))
}

fn load_command(seed: u64) -> Command {
    Command::LoadLevel {
        layout: Box::new(LevelLayout {
            grid: arena(),
            player: Pose::new(Position::new(4.5, 12.5), 0.0),
            clusters: vec![
                SpawnCluster {
                    anchor: Position::new(10.0, 12.0),
                    count: 3,
                    enemy: EnemySelection::Fixed(EnemyType::Raider),
                },
                SpawnCluster {
                    anchor: Position::new(18.0, 6.0),
                    count: 4,
                    enemy: EnemySelection::Random,
                },
            ],
            pickups: Vec::new(),
            number: 2,
            difficulty: Difficulty::Hard,
            seed,
        }),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![load_command(0x00f0_ce00)];
    for tick in 0..240 {
        match tick % 40 {
            0 => commands.push(Command::FireWeapon),
            5 => commands.push(Command::RotatePlayer { delta: 0.05 }),
            10 => commands.push(Command::MovePlayer { dx: 0.19, dy: 0.0 }),
            20 if tick == 100 => commands.push(Command::SwitchWeapon {
                weapon: WeaponKind::Shotgun,
            }),
            25 => commands.push(Command::MovePlayer { dx: 0.0, dy: -0.19 }),
            _ => {}
        }
        commands.push(Command::Tick);
    }
    commands
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let config = WorldConfig::default();
    let mut world = World::new(config.clone());
    let mut bot_ai = BotAi::new(config.bots.clone());
    let mut projectiles = Projectiles::new(&config.projectiles);
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));

        let mut commands = Vec::new();
        bot_ai.handle(
            &events,
            query::grid(&world),
            &query::player(&world),
            &query::bot_view(&world),
            &mut commands,
        );
        apply_all(&mut world, commands, &mut log);

        let mut commands = Vec::new();
        projectiles.handle(
            &events,
            query::grid(&world),
            &query::projectiles(&world),
            &query::player(&world),
            &query::bot_view(&world),
            &mut commands,
        );
        apply_all(&mut world, commands, &mut log);
    }

    let player = query::player(&world);
    ReplayOutcome {
        bots: query::bot_view(&world)
            .iter()
            .map(|bot| {
                (
                    bot.id.get(),
                    bot.position.x().to_bits(),
                    bot.position.y().to_bits(),
                    bot.health,
                )
            })
            .collect(),
        player: (
            player.pose.position().x().to_bits(),
            player.pose.position().y().to_bits(),
            player.health,
        ),
        events: log,
    }
}

fn apply_all(world: &mut World, commands: Vec<Command>, log: &mut Vec<EventRecord>) {
    for command in commands {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    bots: Vec<(u32, u64, u64, u32)>,
    player: (u64, u64, u32),
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Tick(u64),
    PlayerMoved(u64, u64),
    PlayerDamaged(u32, u32),
    BotMoved(u32, u64, u64),
    BotAttacked(u32, u32),
    BotKilled(u32),
    ProjectileExpired(u32),
    Other(String),
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::TimeAdvanced { tick } => Self::Tick(*tick),
            Event::PlayerMoved { to, .. } => Self::PlayerMoved(to.x().to_bits(), to.y().to_bits()),
            Event::PlayerDamaged { amount, remaining } => Self::PlayerDamaged(*amount, *remaining),
            Event::BotMoved { bot, to, .. } => {
                Self::BotMoved(bot.get(), to.x().to_bits(), to.y().to_bits())
            }
            Event::BotAttacked { bot, projectile } => Self::BotAttacked(bot.get(), projectile.get()),
            Event::BotKilled { bot, .. } => Self::BotKilled(bot.get()),
            Event::ProjectileExpired { projectile, .. } => Self::ProjectileExpired(projectile.get()),
            other => Self::Other(format!("{other:?}")),
        }
    }
}
