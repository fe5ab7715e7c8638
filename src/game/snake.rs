use std::collections::{HashMap, HashSet, VecDeque};

use super::action::Direction;
use super::grid::Position;

/// The player's snake, head at the front of `body`
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    /// Segment count per cell; a cell only holds more than one segment while
    /// invincibility lets the head pass through the body.
    occupancy: HashMap<Position, u32>,
    current_direction: Direction,
    pending_direction: Direction,
    pending_growth: u32,
}

impl Snake {
    /// Builds a straight snake of `length` cells trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut snake = Self {
            body: VecDeque::with_capacity(length.max(1)),
            occupancy: HashMap::new(),
            current_direction: direction,
            pending_direction: direction,
            pending_growth: 0,
        };

        let mut segment = head;
        for _ in 0..length.max(1) {
            snake.push_back(segment);
            segment = segment.moved_by(dx, dy);
        }
        snake
    }

    fn push_back(&mut self, pos: Position) {
        self.body.push_back(pos);
        *self.occupancy.entry(pos).or_insert(0) += 1;
    }

    fn vacate(&mut self, pos: Position) {
        if let Some(count) = self.occupancy.get_mut(&pos) {
            *count -= 1;
            if *count == 0 {
                self.occupancy.remove(&pos);
            }
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Distinct cells covered by the body
    pub fn occupied(&self) -> HashSet<Position> {
        self.occupancy.keys().copied().collect()
    }

    pub fn current_direction(&self) -> Direction {
        self.current_direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Records a turn request. A reversal onto the neck is refused and leaves
    /// the pending direction untouched.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.current_direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Applies `direction` through [`Snake::steer`] and returns where the head
    /// would land. The result is not normalized against the grid.
    pub fn propose_move(&mut self, direction: Direction) -> Position {
        self.steer(direction);
        self.head().moved_in_direction(self.pending_direction)
    }

    /// Makes `new_head` the head. Without growth the tail cell is released,
    /// keeping the length unchanged.
    pub fn commit_move(&mut self, new_head: Position, grew: bool) {
        self.body.push_front(new_head);
        *self.occupancy.entry(new_head).or_insert(0) += 1;
        self.current_direction = self.pending_direction;

        if !grew {
            if let Some(tail) = self.body.pop_back() {
                self.vacate(tail);
            }
        }
    }

    pub fn contains_segment(&self, pos: Position, include_head: bool) -> bool {
        let count = self.occupancy.get(&pos).copied().unwrap_or(0);
        if include_head || pos != self.head() {
            count > 0
        } else {
            count > 1
        }
    }

    /// True if two segments share a cell
    pub fn overlaps_itself(&self) -> bool {
        self.occupancy.len() != self.body.len()
    }

    pub fn add_growth(&mut self, segments: u32) {
        self.pending_growth += segments;
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Whether the next committed move keeps the tail regardless of food
    pub fn will_grow(&self) -> bool {
        self.pending_growth > 0
    }

    /// Consumes one owed segment, returning whether there was one
    pub fn take_growth(&mut self) -> bool {
        if self.pending_growth == 0 {
            return false;
        }
        self.pending_growth -= 1;
        true
    }
}
