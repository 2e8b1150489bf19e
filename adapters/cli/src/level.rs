use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use force_field_core::{
    Difficulty, EnemySelection, EnemyType, Footprint, GridError, GridMap, LevelLayout,
    PickupKind, PickupSpawn, Pose, Position, SpawnCluster, UnknownEnemyType,
};
use serde::Deserialize;
use thiserror::Error;

/// Level shipped with the binary and used when no `--level` is given.
pub(crate) const BUILTIN_LEVEL: &str = include_str!("../levels/compound.toml");

/// Seed used when neither the level nor the command line provides one.
const DEFAULT_SEED: u64 = 1;

/// Keyword selecting a random archetype for a whole cluster.
const RANDOM_ENEMY: &str = "random";

/// Level description as written in a TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct LevelFile {
    #[serde(default = "first_level")]
    number: u32,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    seed: Option<u64>,
    rows: Vec<String>,
    player: SpawnPoint,
    #[serde(default)]
    footprints: Vec<Footprint>,
    #[serde(default)]
    clusters: Vec<ClusterEntry>,
    #[serde(default)]
    pickups: Vec<PickupEntry>,
}

const fn first_level() -> u32 {
    1
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
struct SpawnPoint {
    x: f64,
    y: f64,
    #[serde(default)]
    angle: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct ClusterEntry {
    x: f64,
    y: f64,
    count: u32,
    enemy: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
struct PickupEntry {
    kind: PickupKind,
    x: f64,
    y: f64,
}

/// Errors raised while turning a level file into a playable layout.
#[derive(Debug, Error)]
pub(crate) enum LevelError {
    /// The document is not valid TOML or misses required keys.
    #[error("level file is malformed: {0}")]
    Syntax(#[from] toml::de::Error),
    /// A row contains something other than a decimal digit.
    #[error("row {row} column {column} holds `{found}` but only digits 0-9 are allowed")]
    InvalidTile {
        /// Row of the offending character.
        row: usize,
        /// Column of the offending character.
        column: usize,
        /// Character that was found.
        found: char,
    },
    /// The rows or footprints do not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A cluster names an archetype that does not exist.
    #[error(transparent)]
    UnknownEnemy(#[from] UnknownEnemyType),
    /// A spawn or pickup lies outside the grid.
    #[error("{what} at ({x}, {y}) lies outside the {size}x{size} grid")]
    OutOfBounds {
        /// Entity that was placed outside the grid.
        what: &'static str,
        /// Horizontal coordinate of the placement.
        x: f64,
        /// Vertical coordinate of the placement.
        y: f64,
        /// Size of the grid.
        size: u32,
    },
    /// The player would start inside a wall.
    #[error("player spawn ({x}, {y}) is inside a wall")]
    PlayerInWall {
        /// Horizontal coordinate of the spawn.
        x: f64,
        /// Vertical coordinate of the spawn.
        y: f64,
    },
}

impl LevelFile {
    /// Parses a level from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, LevelError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the level stored at `path`.
    pub(crate) fn load(path: &Path) -> AnyResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse level file {}", path.display()))
    }

    /// Parses the level shipped with the binary.
    pub(crate) fn builtin() -> Result<Self, LevelError> {
        Self::parse(BUILTIN_LEVEL)
    }

    /// Validates the level and produces the layout loaded into the world.
    ///
    /// Command line overrides take precedence over the values in the file.
    pub(crate) fn into_layout(
        self,
        difficulty: Option<Difficulty>,
        seed: Option<u64>,
    ) -> Result<LevelLayout, LevelError> {
        let grid = GridMap::from_rows(parse_rows(&self.rows)?)?.with_footprints(self.footprints)?;
        let size = grid.size();

        let spawn = Position::new(self.player.x, self.player.y);
        ensure_inside("player spawn", spawn, size)?;
        if grid.is_wall(spawn.x(), spawn.y()) {
            return Err(LevelError::PlayerInWall {
                x: spawn.x(),
                y: spawn.y(),
            });
        }

        let clusters = self
            .clusters
            .into_iter()
            .map(|entry| {
                let anchor = Position::new(entry.x, entry.y);
                ensure_inside("cluster anchor", anchor, size)?;
                let enemy = if entry.enemy == RANDOM_ENEMY {
                    EnemySelection::Random
                } else {
                    EnemySelection::Fixed(entry.enemy.parse::<EnemyType>()?)
                };
                Ok(SpawnCluster {
                    anchor,
                    count: entry.count,
                    enemy,
                })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        let pickups = self
            .pickups
            .into_iter()
            .map(|entry| {
                let position = Position::new(entry.x, entry.y);
                ensure_inside("pickup", position, size)?;
                Ok(PickupSpawn {
                    kind: entry.kind,
                    position,
                })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        Ok(LevelLayout {
            grid,
            player: Pose::new(spawn, self.player.angle),
            clusters,
            pickups,
            number: self.number.max(1),
            difficulty: difficulty.or(self.difficulty).unwrap_or_default(),
            seed: seed.or(self.seed).unwrap_or(DEFAULT_SEED),
        })
    }
}

fn parse_rows(rows: &[String]) -> Result<Vec<Vec<u8>>, LevelError> {
    rows.iter()
        .enumerate()
        .map(|(row, text)| {
            text.chars()
                .enumerate()
                .map(|(column, found)| {
                    found
                        .to_digit(10)
                        .map(|digit| digit as u8)
                        .ok_or(LevelError::InvalidTile { row, column, found })
                })
                .collect::<Result<Vec<u8>, LevelError>>()
        })
        .collect()
}

fn ensure_inside(what: &'static str, position: Position, size: u32) -> Result<(), LevelError> {
    let limit = f64::from(size);
    let inside = |value: f64| value.is_finite() && (0.0..limit).contains(&value);
    if inside(position.x()) && inside(position.y()) {
        Ok(())
    } else {
        Err(LevelError::OutOfBounds {
            what,
            x: position.x(),
            y: position.y(),
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        rows = [
            "11111111",
            "10000001",
            "10000001",
            "10002001",
            "10000001",
            "10000001",
            "10000001",
            "11111111",
        ]

        [player]
        x = 1.5
        y = 1.5

        [[clusters]]
        x = 5.5
        y = 5.5
        count = 2
        enemy = "ghost"
    "#;

    #[test]
    fn builtin_level_is_playable() {
        let layout = LevelFile::builtin()
            .expect("builtin level parses")
            .into_layout(None, None)
            .expect("builtin level validates");

        assert_eq!(layout.grid.size(), 20);
        assert_eq!(layout.grid.footprints().len(), 2);
        assert_eq!(layout.clusters.len(), 2);
        assert_eq!(layout.clusters[1].enemy, EnemySelection::Random);
        assert_eq!(layout.pickups.len(), 2);
        assert_eq!(layout.seed, 7);
        assert!(layout.grid.is_inside_building(5.5, 5.5));
        assert!(!layout.grid.is_wall(2.5, 17.5));
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let layout = LevelFile::parse(SMALL)
            .and_then(|level| level.into_layout(None, None))
            .expect("small level validates");

        assert_eq!(layout.number, 1);
        assert_eq!(layout.difficulty, Difficulty::Normal);
        assert_eq!(layout.seed, DEFAULT_SEED);
        assert_eq!(
            layout.clusters[0].enemy,
            EnemySelection::Fixed(EnemyType::Ghost)
        );
        assert_eq!(layout.grid.material_at(4.5, 3.5).get(), 2);
    }

    #[test]
    fn command_line_overrides_win() {
        let layout = LevelFile::builtin()
            .and_then(|level| level.into_layout(Some(Difficulty::Nightmare), Some(99)))
            .expect("builtin level validates");

        assert_eq!(layout.difficulty, Difficulty::Nightmare);
        assert_eq!(layout.seed, 99);
    }

    #[test]
    fn unknown_enemy_is_rejected() {
        let text = SMALL.replace("\"ghost\"", "\"dragon\"");

        let error = LevelFile::parse(&text)
            .and_then(|level| level.into_layout(None, None))
            .expect_err("dragons are not an archetype");

        assert!(matches!(error, LevelError::UnknownEnemy(UnknownEnemyType(name)) if name == "dragon"));
    }

    #[test]
    fn non_digit_tiles_are_rejected() {
        let text = SMALL.replace("10002001", "1000x001");

        let error = LevelFile::parse(&text)
            .and_then(|level| level.into_layout(None, None))
            .expect_err("letters are not materials");

        assert!(matches!(
            error,
            LevelError::InvalidTile {
                row: 3,
                column: 4,
                found: 'x'
            }
        ));
    }

    #[test]
    fn open_border_surfaces_grid_error() {
        let text = SMALL.replacen("11111111", "11101111", 1);

        let error = LevelFile::parse(&text)
            .and_then(|level| level.into_layout(None, None))
            .expect_err("border must be closed");

        assert!(matches!(
            error,
            LevelError::Grid(GridError::OpenBorder { column: 3, row: 0 })
        ));
    }

    #[test]
    fn spawns_outside_the_grid_are_rejected() {
        let text = SMALL.replace("x = 5.5", "x = 40.0");

        let error = LevelFile::parse(&text)
            .and_then(|level| level.into_layout(None, None))
            .expect_err("anchor is outside");

        assert!(matches!(
            error,
            LevelError::OutOfBounds {
                what: "cluster anchor",
                size: 8,
                ..
            }
        ));
    }

    #[test]
    fn player_cannot_start_inside_a_wall() {
        let text = SMALL.replace("x = 1.5", "x = 0.5");

        let error = LevelFile::parse(&text)
            .and_then(|level| level.into_layout(None, None))
            .expect_err("spawn is on the border");

        assert!(matches!(error, LevelError::PlayerInWall { .. }));
    }
}
