use log::debug;

use super::action::Direction;

/// Single-slot buffer between input events and simulation ticks.
///
/// Holds the direction the snake is currently moving in and at most one
/// requested change. A newer request replaces an older unconsumed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputQueue {
    active: Direction,
    pending: Option<Direction>,
}

impl InputQueue {
    pub fn new(active: Direction) -> Self {
        Self {
            active,
            pending: None,
        }
    }

    /// Stage `direction` for the next tick.
    ///
    /// Reversals are dropped while the snake is longer than one cell.
    /// Returns whether the request was stored.
    pub fn request_direction(&mut self, direction: Direction, snake_len: usize) -> bool {
        if snake_len > 1 && self.active.is_opposite(direction) {
            debug!("ignoring reversal {:?} while moving {:?}", direction, self.active);
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Promote the pending direction, if any, and return the direction to move in
    pub fn consume_pending(&mut self) -> Direction {
        if let Some(direction) = self.pending.take() {
            self.active = direction;
        }
        self.active
    }

    pub fn active(&self) -> Direction {
        self.active
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Forget any pending request and start moving in `active`
    pub fn reset(&mut self, active: Direction) {
        self.active = active;
        self.pending = None;
    }
}
