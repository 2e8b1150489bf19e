use std::f64::consts::TAU;

use force_field_core::{
    BotId, BotTuning, Difficulty, EnemySelection, EnemyType, GridMap, Position, SpawnCluster,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::bots::Bot;

/// Random placement attempts made after the ring slot is rejected.
const SPAWN_RETRIES: u32 = 15;
/// Half-width of the square searched around the anchor on retries.
const SPAWN_RETRY_RADIUS: f64 = 4.0;
/// Margin in tiles kept clear between spawns and the map edge.
const SPAWN_EDGE_MARGIN: f64 = 2.0;
const RING_RADIUS: f64 = 1.5;
const RING_STAGGER: f64 = 0.5;

/// Places every cluster member and returns the bots in id order.
///
/// Members that cannot be placed anywhere are skipped, so the result may
/// hold fewer bots than the clusters request.
pub(crate) fn populate(
    grid: &GridMap,
    clusters: &[SpawnCluster],
    level: u32,
    difficulty: Difficulty,
    tuning: &BotTuning,
    rng: &mut ChaCha8Rng,
) -> Vec<Bot> {
    let mut bots = Vec::new();
    let mut next_id = 0;

    for cluster in clusters {
        let enemy = match cluster.enemy {
            EnemySelection::Fixed(enemy) => enemy,
            EnemySelection::Random => EnemyType::ALL[rng.gen_range(0..EnemyType::ALL.len())],
        };

        for member in 0..cluster.count {
            let Some(position) = place_member(grid, cluster, member, rng) else {
                continue;
            };
            bots.push(Bot::spawn(
                BotId::new(next_id),
                enemy,
                position,
                level,
                difficulty,
                tuning,
            ));
            next_id += 1;
        }
    }

    bots
}

fn place_member(
    grid: &GridMap,
    cluster: &SpawnCluster,
    member: u32,
    rng: &mut ChaCha8Rng,
) -> Option<Position> {
    let slot = ring_slot(cluster.anchor, member, cluster.count);
    if is_valid_spawn(grid, slot) {
        return Some(slot);
    }

    for _ in 0..SPAWN_RETRIES {
        let candidate = cluster.anchor.offset(
            rng.gen_range(-SPAWN_RETRY_RADIUS..=SPAWN_RETRY_RADIUS),
            rng.gen_range(-SPAWN_RETRY_RADIUS..=SPAWN_RETRY_RADIUS),
        );
        if is_valid_spawn(grid, candidate) {
            return Some(candidate);
        }
    }

    is_valid_spawn(grid, cluster.anchor).then_some(cluster.anchor)
}

fn ring_slot(anchor: Position, member: u32, count: u32) -> Position {
    let angle = f64::from(member) * TAU / f64::from(count.max(1));
    let radius = RING_RADIUS + f64::from(member % 2) * RING_STAGGER;
    anchor.advanced(angle, radius)
}

fn is_valid_spawn(grid: &GridMap, position: Position) -> bool {
    let interior = SPAWN_EDGE_MARGIN..f64::from(grid.size()) - SPAWN_EDGE_MARGIN;
    interior.contains(&position.x())
        && interior.contains(&position.y())
        && !grid.is_wall(position.x(), position.y())
        && !grid.is_inside_building(position.x(), position.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_field_core::{Footprint, MaterialId};
    use rand::SeedableRng;

    fn cluster(x: f64, y: f64, count: u32, enemy: EnemySelection) -> SpawnCluster {
        SpawnCluster {
            anchor: Position::new(x, y),
            count,
            enemy,
        }
    }

    #[test]
    fn open_ring_places_every_member_around_the_anchor() {
        let grid = GridMap::bordered(30);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let bots = populate(
            &grid,
            &[cluster(15.0, 15.0, 4, EnemySelection::Fixed(EnemyType::Demon))],
            1,
            Difficulty::Normal,
            &BotTuning::default(),
            &mut rng,
        );

        assert_eq!(bots.len(), 4);
        let first = bots[0].position();
        assert!((first.x() - 16.5).abs() < 1e-9 && (first.y() - 15.0).abs() < 1e-9);
        let second = bots[1].position();
        assert!((second.x() - 15.0).abs() < 1e-9 && (second.y() - 17.0).abs() < 1e-9);
        assert!(bots.iter().all(|bot| bot.enemy() == EnemyType::Demon));
        let ids: Vec<u32> = bots.iter().map(|bot| bot.id().get()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn random_selection_is_shared_by_the_whole_cluster() {
        let grid = GridMap::bordered(40);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        let bots = populate(
            &grid,
            &[cluster(20.0, 20.0, 6, EnemySelection::Random)],
            2,
            Difficulty::Hard,
            &BotTuning::default(),
            &mut rng,
        );

        let first = bots[0].enemy();
        assert!(bots.iter().all(|bot| bot.enemy() == first));
    }

    #[test]
    fn blocked_slots_fall_back_to_valid_cells() {
        let grid = (10..=20).fold(GridMap::bordered(30), |grid, column| {
            (10..=20).fold(grid, |grid, row| {
                if (column, row) == (15, 15) {
                    grid
                } else {
                    grid.with_wall(column, row, MaterialId::new(2))
                }
            })
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let bots = populate(
            &grid,
            &[cluster(15.5, 15.5, 3, EnemySelection::Fixed(EnemyType::Zombie))],
            1,
            Difficulty::Normal,
            &BotTuning::default(),
            &mut rng,
        );

        assert_eq!(bots.len(), 3);
        for bot in &bots {
            let at = bot.position();
            assert_eq!((at.x().floor(), at.y().floor()), (15.0, 15.0));
        }
    }

    #[test]
    fn members_never_spawn_inside_buildings_walls_or_the_edge_margin() {
        let grid = GridMap::bordered(30)
            .with_footprints(Footprint::compound_layout(30))
            .expect("layout fits the grid");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let clusters = [
            cluster(3.0, 3.0, 5, EnemySelection::Random),
            cluster(15.0, 15.0, 8, EnemySelection::Random),
            cluster(27.5, 27.5, 5, EnemySelection::Random),
        ];

        let bots = populate(&grid, &clusters, 1, Difficulty::Easy, &BotTuning::default(), &mut rng);

        for bot in &bots {
            let at = bot.position();
            assert!(is_valid_spawn(&grid, at), "invalid spawn at {at:?}");
        }
    }

    #[test]
    fn hopeless_members_are_skipped() {
        let grid = GridMap::bordered(8);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let bots = populate(
            &grid,
            &[cluster(-10.0, -10.0, 2, EnemySelection::Fixed(EnemyType::Ghost))],
            1,
            Difficulty::Normal,
            &BotTuning::default(),
            &mut rng,
        );

        assert!(bots.is_empty());
    }
}
