use serde::Serialize;

use super::state::{Board, Cell};

/// What a candidate head position would run into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Collision {
    /// Outside the grid
    Wall,
    /// On a segment of the snake, tail included
    SelfHit,
    /// On the food cell
    Food,
    /// Empty cell
    Free,
}

impl Collision {
    /// Wall and self hits end the game
    pub fn is_fatal(&self) -> bool {
        matches!(self, Collision::Wall | Collision::SelfHit)
    }
}

pub struct CollisionDetector;

impl CollisionDetector {
    /// Classify `candidate` against the board before the move is committed.
    ///
    /// The tail still counts as occupied: moving into the cell the tail is
    /// about to leave is a self hit.
    pub fn classify(board: &Board, candidate: Cell) -> Collision {
        if !board.is_in_bounds(candidate) {
            Collision::Wall
        } else if board.is_occupied_by_snake(candidate) {
            Collision::SelfHit
        } else if candidate == board.food {
            Collision::Food
        } else {
            Collision::Free
        }
    }
}
