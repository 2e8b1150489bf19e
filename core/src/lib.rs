#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Force Field engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The immutable [`GridMap`] lives here as well because every component reads
//! it: collision, bot line of sight, projectile flight and the raycaster.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

mod armory;
mod bestiary;
mod config;
pub mod grid;

pub use armory::{
    Delivery, FireBlock, HeatSpec, WeaponKind, WeaponSpec, WeaponState, WeaponTable,
};
pub use bestiary::{
    AttackProfile, BotStats, Difficulty, DifficultyModifiers, EnemyStats, EnemyType,
    UnknownEnemyType,
};
pub use config::{
    BotTuning, CombatTuning, DecayTuning, PickupTuning, PlayerTuning, ProjectileTuning,
    ShieldTuning, WorldConfig,
};
pub use grid::{Footprint, GridError, GridMap, MaterialId};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Force Field.";

/// Normalizes an angle into the `[0, 2π)` range.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angle difference into the `(−π, π]` range.
#[must_use]
pub fn signed_angle(angle: f64) -> f64 {
    let wrapped = normalize_angle(angle);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Continuous position measured in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Position displaced by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Position reached by travelling `distance` along `heading`.
    #[must_use]
    pub fn advanced(self, heading: f64, distance: f64) -> Self {
        self.offset(heading.cos() * distance, heading.sin() * distance)
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared_to(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Heading in radians that points from this position towards `other`.
    #[must_use]
    pub fn heading_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Reports whether `other` lies strictly closer than `radius`.
    #[must_use]
    pub fn is_within(self, other: Self, radius: f64) -> bool {
        self.distance_squared_to(other) < radius * radius
    }
}

/// Position paired with a viewing direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    position: Position,
    angle: f64,
}

impl Pose {
    /// Creates a pose, normalizing the angle into `[0, 2π)`.
    #[must_use]
    pub fn new(position: Position, angle: f64) -> Self {
        Self {
            position,
            angle: normalize_angle(angle),
        }
    }

    /// Location of the pose.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Viewing direction in radians within `[0, 2π)`.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Pose rotated by `delta` radians.
    #[must_use]
    pub fn rotated(self, delta: f64) -> Self {
        Self::new(self.position, self.angle + delta)
    }

    /// Pose moved to a new location while keeping its direction.
    #[must_use]
    pub const fn with_position(self, position: Position) -> Self {
        Self {
            position,
            angle: self.angle,
        }
    }
}

/// Unique identifier assigned to a bot.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BotId(u32);

impl BotId {
    /// Creates a new bot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Entity that launched a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by the player; damages bots.
    Player,
    /// Fired by a bot; damages the player.
    Bot(BotId),
}

impl ProjectileOwner {
    /// Reports whether the projectile belongs to the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Parameters of a projectile about to be launched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Starting position.
    pub origin: Position,
    /// Fixed heading in radians.
    pub heading: f64,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Damage dealt on contact.
    pub damage: u32,
}

/// Reason a projectile left the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpiryCause {
    /// The next step would have entered a wall.
    Wall,
    /// The projectile touched a bot.
    Bot(BotId),
    /// The projectile touched the player.
    Player,
    /// The projectile exceeded its travel budget.
    Exhausted,
}

/// Phase of a dead bot's decay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecayPhase {
    /// The corpse is settling on the floor.
    Settling,
    /// The corpse is dissolving.
    Disintegrating,
}

/// Behavioural state of a bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BotState {
    /// Closing in on the player.
    Pursuing,
    /// Fired at the player on the most recent decision.
    Attacking,
    /// Killed and decaying; no further movement or attacks.
    Dead {
        /// Current decay phase.
        phase: DecayPhase,
        /// Ticks elapsed since death.
        elapsed: u32,
    },
    /// Decay finished; the bot leaves the active set.
    Removed,
}

impl BotState {
    /// Reports whether the bot may still move and attack.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pursuing | Self::Attacking)
    }

    /// Reports whether the bot has been killed.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self, Self::Dead { .. } | Self::Removed)
    }
}

/// State of the player's shield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShieldState {
    /// Off and recharging up to the maximum charge.
    Ready {
        /// Ticks of protection available.
        charge: u32,
    },
    /// Raised; damage is ignored while it drains.
    Active {
        /// Ticks of protection left.
        charge: u32,
    },
    /// Locked after release or depletion.
    Cooldown {
        /// Ticks until the shield becomes ready again.
        remaining: u32,
    },
}

impl ShieldState {
    /// Reports whether the shield currently absorbs damage.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Collectable item placed in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Restores health.
    HealthPack,
    /// Adds a clip of ammunition to the current weapon.
    AmmoBox,
}

impl PickupKind {
    /// Billboard scale of the pickup sprite.
    #[must_use]
    pub const fn scale(self) -> f64 {
        match self {
            Self::HealthPack => 0.4,
            Self::AmmoBox => 0.5,
        }
    }
}

/// How a spawn cluster selects the archetype of its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemySelection {
    /// Every member uses the provided archetype.
    Fixed(EnemyType),
    /// One archetype is drawn at random and shared by the whole cluster.
    Random,
}

/// Group of bots placed around a common anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnCluster {
    /// Centre of the ring the members are placed on.
    pub anchor: Position,
    /// Number of members to place.
    pub count: u32,
    /// Archetype selection for the cluster.
    pub enemy: EnemySelection,
}

/// Pickup placed at a fixed position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSpawn {
    /// Type of pickup.
    pub kind: PickupKind,
    /// Location of the pickup.
    pub position: Position,
}

/// Finished level produced by the map generator.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    /// Wall grid of the level.
    pub grid: GridMap,
    /// Player spawn pose.
    pub player: Pose,
    /// Bot spawn clusters.
    pub clusters: Vec<SpawnCluster>,
    /// Pickups placed in the level.
    pub pickups: Vec<PickupSpawn>,
    /// One-based level number used for stat scaling.
    pub number: u32,
    /// Difficulty preset applied to bot stats and scoring.
    pub difficulty: Difficulty,
    /// Seed for spawn placement and weapon spread.
    pub seed: u64,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current level with the provided layout.
    LoadLevel {
        /// Layout to load.
        layout: Box<LevelLayout>,
    },
    /// Advances the simulation by one fixed tick.
    Tick,
    /// Requests that the player move by the provided displacement.
    MovePlayer {
        /// Displacement along the x axis.
        dx: f64,
        /// Displacement along the y axis.
        dy: f64,
    },
    /// Rotates the player's view.
    RotatePlayer {
        /// Rotation in radians; positive values turn clockwise on screen.
        delta: f64,
    },
    /// Raises or lowers the player's shield.
    SetShield {
        /// Whether the shield should be raised.
        active: bool,
    },
    /// Enters or leaves the zoomed aiming mode.
    SetZoom {
        /// Whether the view should be zoomed.
        zoomed: bool,
    },
    /// Pulls the trigger of the current weapon.
    FireWeapon,
    /// Starts reloading the current weapon.
    ReloadWeapon,
    /// Selects another weapon, cancelling any reload in progress.
    SwitchWeapon {
        /// Weapon to select.
        weapon: WeaponKind,
    },
    /// Requests that a bot advance along a heading.
    MoveBot {
        /// Identifier of the bot attempting to move.
        bot: BotId,
        /// Heading the bot faces and moves along.
        heading: f64,
        /// Distance to travel this tick.
        distance: f64,
    },
    /// Requests that a bot fire a projectile at the player.
    BotAttack {
        /// Identifier of the attacking bot.
        bot: BotId,
        /// Projectile to launch.
        launch: ProjectileLaunch,
    },
    /// Commits the next position of a projectile in flight.
    AdvanceProjectile {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Position reached this tick.
        to: Position,
    },
    /// Removes a projectile from the simulation.
    ExpireProjectile {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Reason the projectile expired.
        cause: ExpiryCause,
    },
    /// Applies damage to the player.
    DamagePlayer {
        /// Damage to apply.
        amount: u32,
    },
    /// Applies damage to a bot.
    DamageBot {
        /// Identifier of the damaged bot.
        bot: BotId,
        /// Damage before the headshot multiplier.
        amount: u32,
        /// Whether the hit counts as a headshot.
        headshot: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new level was loaded.
    LevelLoaded {
        /// One-based level number.
        level: u32,
        /// Number of bots placed in the level.
        bots: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Reports damage absorbed by the player.
    PlayerDamaged {
        /// Damage applied.
        amount: u32,
        /// Health left afterwards.
        remaining: u32,
    },
    /// Announces that the player died.
    PlayerKilled,
    /// Reports a change of the shield state category.
    ShieldChanged {
        /// New shield state.
        state: ShieldState,
    },
    /// Confirms that the current weapon fired.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
    },
    /// Reports that a fire request was refused.
    WeaponBlocked {
        /// Weapon that refused to fire.
        weapon: WeaponKind,
        /// Reason for the refusal.
        reason: FireBlock,
    },
    /// Confirms that a reload started.
    WeaponReloadStarted {
        /// Weapon being reloaded.
        weapon: WeaponKind,
    },
    /// Confirms that a reload completed.
    WeaponReloaded {
        /// Weapon that finished reloading.
        weapon: WeaponKind,
    },
    /// Announces that a weapon overheated.
    WeaponOverheated {
        /// Weapon that overheated.
        weapon: WeaponKind,
    },
    /// Announces that an overheated weapon is usable again.
    WeaponCooled {
        /// Weapon that cooled down.
        weapon: WeaponKind,
    },
    /// Confirms a weapon switch.
    WeaponSwitched {
        /// Weapon previously held.
        from: WeaponKind,
        /// Weapon now held.
        to: WeaponKind,
    },
    /// Reports a hitscan ray striking a bot.
    ShotHit {
        /// Bot that was struck.
        bot: BotId,
        /// Distance from the player to the bot.
        distance: f64,
        /// Whether the hit counts as a headshot.
        headshot: bool,
    },
    /// Reports a hitscan shot that struck no bot.
    ShotMissed {
        /// Weapon that fired.
        weapon: WeaponKind,
    },
    /// Confirms that a bot moved.
    BotMoved {
        /// Identifier of the bot.
        bot: BotId,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Confirms that a bot launched a projectile.
    BotAttacked {
        /// Identifier of the attacking bot.
        bot: BotId,
        /// Identifier of the launched projectile.
        projectile: ProjectileId,
    },
    /// Reports damage absorbed by a bot.
    BotDamaged {
        /// Identifier of the damaged bot.
        bot: BotId,
        /// Damage applied after the headshot multiplier.
        amount: u32,
        /// Health left afterwards.
        remaining: u32,
        /// Whether the hit was a headshot.
        headshot: bool,
    },
    /// Announces that a bot died.
    BotKilled {
        /// Identifier of the killed bot.
        bot: BotId,
        /// Whether the killing blow was a headshot.
        headshot: bool,
        /// Score awarded for the kill.
        score: u32,
    },
    /// Announces that a bot finished decaying and left the active set.
    BotRemoved {
        /// Identifier of the removed bot.
        bot: BotId,
    },
    /// Confirms that a projectile entered the simulation.
    ProjectileSpawned {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Entity that launched it.
        owner: ProjectileOwner,
    },
    /// Confirms that a projectile advanced.
    ProjectileMoved {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Position reached.
        to: Position,
    },
    /// Announces that a projectile left the simulation.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Reason the projectile expired.
        cause: ExpiryCause,
    },
    /// Announces that the player collected a pickup.
    PickupCollected {
        /// Identifier of the pickup.
        pickup: PickupId,
        /// Type of the pickup.
        kind: PickupKind,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position and view direction.
    pub pose: Pose,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Whether the player is alive.
    pub alive: bool,
    /// Shield state.
    pub shield: ShieldState,
    /// Whether the view is zoomed.
    pub zoomed: bool,
    /// Whether the player moved on the most recent movement request.
    pub moving: bool,
    /// Weapon currently held.
    pub weapon: WeaponKind,
    /// Rounds left in the current clip.
    pub clip: u32,
    /// Rounds held in reserve for the current weapon.
    pub reserve: u32,
    /// Heat of the current weapon, zero for weapons without a heat model.
    pub heat: f64,
    /// Readiness of the current weapon.
    pub weapon_state: WeaponState,
}

/// Immutable representation of a single bot used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotSnapshot {
    /// Unique identifier assigned to the bot.
    pub id: BotId,
    /// Archetype of the bot.
    pub enemy: EnemyType,
    /// Current position.
    pub position: Position,
    /// Facing direction in radians.
    pub angle: f64,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Damage stat added to the bot's projectiles.
    pub damage: u32,
    /// Movement speed in tiles per tick.
    pub speed: f64,
    /// Ticks until the bot may attack again.
    pub attack_cooldown: u32,
    /// Behavioural state.
    pub state: BotState,
    /// Walk animation phase in radians.
    pub walk_phase: f64,
    /// Shoot animation intensity in `[0, 1]`.
    pub shoot_animation: f64,
}

/// Read-only view of the bots in the active set.
#[derive(Clone, Debug, Default)]
pub struct BotView {
    snapshots: Vec<BotSnapshot>,
}

impl BotView {
    /// Creates a new bot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BotSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bot snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BotSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over bots that may still move and attack.
    pub fn active(&self) -> impl Iterator<Item = &BotSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.state.is_active())
    }

    /// Looks up a bot by identifier.
    #[must_use]
    pub fn get(&self, id: BotId) -> Option<&BotSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of bots in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no bots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BotSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Entity that launched it.
    pub owner: ProjectileOwner,
    /// Current position.
    pub position: Position,
    /// Fixed heading in radians.
    pub heading: f64,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Damage dealt on contact.
    pub damage: u32,
    /// Ticks the projectile has been in flight.
    pub travelled: u32,
}

/// Immutable representation of a pickup waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// Type of pickup.
    pub kind: PickupKind,
    /// Location of the pickup.
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert!(normalize_angle(-1e-18) < TAU);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn signed_angle_maps_into_open_closed_range() {
        assert!((signed_angle(-PI) - PI).abs() < 1e-12);
        assert!((signed_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((signed_angle(0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pose_rotation_stays_normalized() {
        let pose = Pose::new(Position::new(1.0, 1.0), 0.1).rotated(-0.3);

        assert!(pose.angle() >= 0.0 && pose.angle() < TAU);
        assert!((pose.angle() - (TAU - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn is_within_uses_strict_radius() {
        let origin = Position::new(0.0, 0.0);

        assert!(origin.is_within(Position::new(0.3, 0.3), 0.5));
        assert!(!origin.is_within(Position::new(0.5, 0.0), 0.5));
    }

    #[test]
    fn bot_view_lookup_uses_identifier_order() {
        let snapshot = |id: u32| BotSnapshot {
            id: BotId::new(id),
            enemy: EnemyType::Zombie,
            position: Position::new(f64::from(id), 1.0),
            angle: 0.0,
            health: 30,
            max_health: 30,
            damage: 2,
            speed: 0.016,
            attack_cooldown: 0,
            state: BotState::Pursuing,
            walk_phase: 0.0,
            shoot_animation: 0.0,
        };
        let view = BotView::from_snapshots(vec![snapshot(7), snapshot(2), snapshot(4)]);

        let ids: Vec<u32> = view.iter().map(|bot| bot.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 7]);
        assert_eq!(view.get(BotId::new(4)).map(|bot| bot.position.x()), Some(4.0));
        assert!(view.get(BotId::new(5)).is_none());
    }
}
