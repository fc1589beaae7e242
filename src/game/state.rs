use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;

use super::action::Direction;

/// A cell on the game grid, addressed by row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move cell by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// The neighbouring cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }
}

/// The snake's body, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `direction`
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (d_row, d_col) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(d_row * i, d_col * i))
            .collect();
        Self { body }
    }

    /// Build a snake from explicit cells, head first
    ///
    /// Returns `None` for an empty body.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Whether any segment, tail included, sits on `cell`
    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Grid geometry plus everything placed on it
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub snake: Snake,
    pub food: Cell,
}

impl Board {
    pub fn new(width: usize, height: usize, snake: Snake, food: Cell) -> Self {
        Self {
            width,
            height,
            snake,
            food,
        }
    }

    /// Check if a cell is within the grid bounds
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.row < self.height as i32
            && cell.col >= 0
            && cell.col < self.width as i32
    }

    /// Check if a cell is occupied by the snake
    pub fn is_occupied_by_snake(&self, cell: Cell) -> bool {
        self.snake.contains(cell)
    }

    /// Draw cells uniformly from the interior until one is clear of the snake
    ///
    /// Loops forever if the snake covers the whole interior; callers keep
    /// the interior area above the snake length.
    pub fn random_free_cell<R: Rng + ?Sized>(
        snake: &Snake,
        rows: Range<i32>,
        cols: Range<i32>,
        rng: &mut R,
    ) -> Cell {
        loop {
            let cell = Cell::new(rng.gen_range(rows.clone()), rng.gen_range(cols.clone()));
            if !snake.contains(cell) {
                return cell;
            }
        }
    }

    /// Replace the food with a fresh cell off the snake
    pub fn respawn_food<R: Rng + ?Sized>(&mut self, rows: Range<i32>, cols: Range<i32>, rng: &mut R) {
        self.food = Self::random_free_cell(&self.snake, rows, cols, rng);
    }
}
