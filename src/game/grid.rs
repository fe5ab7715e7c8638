use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;

/// Random probes before falling back to a full scan of free cells
const RANDOM_PROBES: usize = 64;

/// A cell address on the grid.
///
/// Signed so a prospective head that has just left the board can still be
/// represented and rejected by the collision resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("no free cell left on the grid")]
    NoSpaceAvailable,
}

/// Bounds and boundary policy of the playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    wrap: bool,
}

impl Grid {
    pub fn new(width: usize, height: usize, wrap: bool) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            wrap,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Folds `pos` back onto the board when wrap mode is on, identity otherwise
    pub fn normalize(&self, pos: Position) -> Position {
        if self.wrap {
            self.wrap(pos)
        } else {
            pos
        }
    }

    /// Component-wise modulo, independent of the configured boundary policy
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Picks a uniformly random cell not contained in `excluded`.
    ///
    /// Probes randomly first and scans the whole board when the probes keep
    /// hitting occupied cells, so the call only fails on a full board.
    pub fn random_unoccupied_cell<R: Rng + ?Sized>(
        &self,
        excluded: &HashSet<Position>,
        rng: &mut R,
    ) -> Result<Position, GridError> {
        if excluded.len() < self.cell_count() {
            for _ in 0..RANDOM_PROBES {
                let pos = Position::new(
                    rng.gen_range(0..self.width),
                    rng.gen_range(0..self.height),
                );
                if !excluded.contains(&pos) {
                    return Ok(pos);
                }
            }
        }

        let free: Vec<Position> = self.cells().filter(|pos| !excluded.contains(pos)).collect();
        if free.is_empty() {
            return Err(GridError::NoSpaceAvailable);
        }
        Ok(free[rng.gen_range(0..free.len())])
    }
}
