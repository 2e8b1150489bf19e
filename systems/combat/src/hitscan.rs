//! Instant ray-versus-bot resolution for hitscan weapons.

use force_field_core::{signed_angle, BotId, CombatTuning, Delivery, GridMap, Position, WeaponSpec};
use force_field_system_raycast::{cast_ray, DEFAULT_MAX_STEPS};

/// Bot that a hitscan ray may strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTarget {
    /// Identifier of the bot.
    pub bot: BotId,
    /// Centre of the bot.
    pub position: Position,
}

/// Bot struck by a hitscan ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitscanHit {
    /// Identifier of the bot struck.
    pub bot: BotId,
    /// Distance from the shooter to the bot.
    pub distance: f64,
    /// Absolute angular offset between the aim and the bot's centre.
    pub offset: f64,
    /// Whether the offset lies within the headshot cone.
    pub headshot: bool,
}

/// Resolves a single ray fired from `origin` along `aim`.
///
/// The nearest target that lies within range, inside the hit cone and in
/// front of the first wall along the aim is struck.
#[must_use]
pub fn resolve_hitscan(
    map: &GridMap,
    origin: Position,
    aim: f64,
    range: f64,
    targets: &[HitTarget],
    tuning: &CombatTuning,
) -> Option<HitscanHit> {
    let wall = cast_ray(map, origin, aim, range, DEFAULT_MAX_STEPS).distance;

    targets
        .iter()
        .filter_map(|target| {
            let distance = origin.distance_to(target.position);
            if distance > range || distance >= wall {
                return None;
            }
            let offset = signed_angle(origin.heading_to(target.position) - aim).abs();
            (offset < tuning.hit_cone).then_some(HitscanHit {
                bot: target.bot,
                distance,
                offset,
                headshot: offset < tuning.headshot_cone,
            })
        })
        .min_by(|left, right| {
            left.distance
                .total_cmp(&right.distance)
                .then(left.bot.cmp(&right.bot))
        })
}

/// Maximum deviation applied to each ray fired by the weapon.
#[must_use]
pub fn aim_spread(spec: &WeaponSpec, zoomed: bool, tuning: &CombatTuning) -> f64 {
    match spec.delivery {
        Delivery::Hitscan {
            pellets,
            pellet_spread,
        } if pellets > 1 => pellet_spread,
        _ if zoomed => tuning.zoomed_spread,
        _ => tuning.spread,
    }
}

/// Number of rays a single trigger pull fires; zero for projectile weapons.
#[must_use]
pub const fn ray_count(spec: &WeaponSpec) -> u32 {
    match spec.delivery {
        Delivery::Hitscan { pellets, .. } => {
            if pellets == 0 {
                1
            } else {
                pellets
            }
        }
        Delivery::Projectile { .. } => 0,
    }
}

/// Damage dealt by a hit after the headshot multiplier.
#[must_use]
pub const fn hit_damage(amount: u32, headshot: bool, multiplier: u32) -> u32 {
    if headshot {
        amount.saturating_mul(multiplier)
    } else {
        amount
    }
}
