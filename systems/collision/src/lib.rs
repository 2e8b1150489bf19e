#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated movement resolution shared by the player and bots.
//!
//! Displacements are resolved one axis at a time: the x component is tested
//! and committed first, then the y component is tested from the updated
//! position. An axis is committed only when its candidate position is neither
//! inside a wall nor closer than the collision radius to another live entity.
//! Blocking one axis therefore still lets the other slide along the obstacle.

use force_field_core::{GridMap, Position};

/// Result of a movement attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Position after the committed axes were applied.
    pub position: Position,
    /// Whether the x displacement was committed.
    pub moved_x: bool,
    /// Whether the y displacement was committed.
    pub moved_y: bool,
}

impl MoveOutcome {
    /// Reports whether either axis was committed.
    #[must_use]
    pub const fn displaced(&self) -> bool {
        self.moved_x || self.moved_y
    }

    /// Reports whether both requested axes were refused.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        !self.displaced()
    }
}

/// Attempts to move an entity by `(dx, dy)`.
///
/// `obstacles` holds the centres of the other live entities the mover must
/// keep `radius` away from; the mover itself must not be included. A zero
/// component is never tested, so an entity already overlapping another can
/// still move along the free axis.
#[must_use]
pub fn try_move(
    map: &GridMap,
    from: Position,
    dx: f64,
    dy: f64,
    obstacles: &[Position],
    radius: f64,
) -> MoveOutcome {
    let mut position = from;

    let moved_x = dx != 0.0 && {
        let candidate = Position::new(position.x() + dx, position.y());
        let free = is_free(map, candidate, obstacles, radius);
        if free {
            position = candidate;
        }
        free
    };

    let moved_y = dy != 0.0 && {
        let candidate = Position::new(position.x(), position.y() + dy);
        let free = is_free(map, candidate, obstacles, radius);
        if free {
            position = candidate;
        }
        free
    };

    MoveOutcome {
        position,
        moved_x,
        moved_y,
    }
}

/// Reports whether an entity could occupy `candidate`.
#[must_use]
pub fn is_free(map: &GridMap, candidate: Position, obstacles: &[Position], radius: f64) -> bool {
    !map.is_wall(candidate.x(), candidate.y())
        && !obstacles
            .iter()
            .any(|obstacle| obstacle.is_within(candidate, radius))
}
