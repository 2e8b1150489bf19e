use force_field_core::{GridMap, Position};

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlightStatus {
    /// The projectile reached the provided position and keeps flying.
    Moved(Position),
    /// The next step would have entered a wall; the projectile died in place.
    HitWall,
    /// The projectile was already dead and did not move.
    Inert,
}

/// Point moving along a fixed heading at a fixed speed.
///
/// A flight only knows about the grid; contact with the player or bots is
/// resolved by the caller against [`Flight::position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    position: Position,
    heading: f64,
    speed: f64,
    alive: bool,
}

impl Flight {
    /// Creates a live flight.
    #[must_use]
    pub const fn new(position: Position, heading: f64, speed: f64) -> Self {
        Self {
            position,
            heading,
            speed,
            alive: true,
        }
    }

    /// Current position; after a wall strike, the last legal position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Reports whether the flight continues.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Advances the flight by one step of `speed` along its heading.
    pub fn update(&mut self, map: &GridMap) -> FlightStatus {
        if !self.alive {
            return FlightStatus::Inert;
        }
        let next = self.position.advanced(self.heading, self.speed);
        if map.is_wall(next.x(), next.y()) {
            self.alive = false;
            return FlightStatus::HitWall;
        }
        self.position = next;
        FlightStatus::Moved(next)
    }
}
