use force_field_core::{
    BotId, Command, Difficulty, EnemySelection, EnemyType, Event, GridMap, LevelLayout, Pose,
    Position, SpawnCluster, WorldConfig,
};
use force_field_system_bot_ai::BotAi;
use force_field_system_projectiles::Projectiles;
use force_field_world::{self as world, query, World};

struct Harness {
    world: World,
    bot_ai: BotAi,
    projectiles: Projectiles,
}

impl Harness {
    fn with_zombie_at(anchor: Position) -> Self {
        let config = WorldConfig::default();
        let mut harness = Self {
            world: World::new(config.clone()),
            bot_ai: BotAi::new(config.bots.clone()),
            projectiles: Projectiles::new(&config.projectiles),
        };
        let _ = harness.apply(Command::LoadLevel {
            layout: Box::new(LevelLayout {
                grid: GridMap::bordered(20),
                player: Pose::new(Position::new(4.5, 10.5), 0.0),
                clusters: vec![SpawnCluster {
                    anchor,
                    count: 1,
                    enemy: EnemySelection::Fixed(EnemyType::Zombie),
                }],
                pickups: Vec::new(),
                number: 1,
                difficulty: Difficulty::Normal,
                seed: 17,
            }),
        });
        harness
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn tick(&mut self) -> Vec<Event> {
        let events = self.apply(Command::Tick);
        let mut log = events.clone();

        let mut commands = Vec::new();
        self.bot_ai.handle(
            &events,
            query::grid(&self.world),
            &query::player(&self.world),
            &query::bot_view(&self.world),
            &mut commands,
        );
        for command in commands {
            log.extend(self.apply(command));
        }

        let mut commands = Vec::new();
        self.projectiles.handle(
            &events,
            query::grid(&self.world),
            &query::projectiles(&self.world),
            &query::player(&self.world),
            &query::bot_view(&self.world),
            &mut commands,
        );
        for command in commands {
            log.extend(self.apply(command));
        }
        log
    }
}

#[test]
fn bot_projectile_crosses_the_room_and_wounds_the_player() {
    let mut harness = Harness::with_zombie_at(Position::new(6.5, 10.5));

    let log: Vec<Event> = (0..50).flat_map(|_| harness.tick()).collect();

    let attacks = log
        .iter()
        .filter(|event| matches!(event, Event::BotAttacked { .. }))
        .count();
    let wounds: Vec<&Event> = log
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .collect();
    assert_eq!(attacks, 1);
    assert_eq!(
        wounds,
        vec![&Event::PlayerDamaged {
            amount: 7,
            remaining: 93
        }]
    );
    assert!(query::projectiles(&harness.world).is_empty());
}

#[test]
fn bot_out_of_range_closes_in_without_firing() {
    let mut harness = Harness::with_zombie_at(Position::new(14.0, 10.5));
    let start = query::bot_view(&harness.world)
        .get(BotId::new(0))
        .map(|bot| bot.position)
        .expect("bot was spawned");

    let log: Vec<Event> = (0..20).flat_map(|_| harness.tick()).collect();

    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::BotAttacked { .. })));
    let bot = query::bot_view(&harness.world)
        .get(BotId::new(0))
        .copied()
        .expect("bot is still present");
    assert!(bot.position.x() < start.x());
    assert!(bot.walk_phase > 0.0);
}

#[test]
fn headshot_kill_decays_and_clears_the_level() {
    let mut harness = Harness::with_zombie_at(Position::new(8.5, 10.5));

    let events = harness.apply(Command::FireWeapon);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::BotKilled { bot, headshot: true, score: 100 } if *bot == BotId::new(0)
    )));
    let decay = query::config(&harness.world).decay.total_ticks();
    for _ in 0..decay {
        let _ = harness.tick();
    }
    assert!(query::level_cleared(&harness.world));
    assert_eq!(query::player(&harness.world).health, 100);
}
