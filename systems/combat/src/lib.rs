#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player weapon handling: ammunition and heat bookkeeping plus hitscan
//! resolution against bots.

mod arsenal;
mod hitscan;

pub use arsenal::{Arsenal, ArsenalNotice, FireOutcome, WeaponSlot};
pub use hitscan::{aim_spread, hit_damage, ray_count, resolve_hitscan, HitTarget, HitscanHit};
