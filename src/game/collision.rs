use serde::{Deserialize, Serialize};

use super::config::InvincibleTailRule;
use super::food::{Food, FoodManager};
use super::grid::{Grid, Position};
use super::obstacles::Obstacles;
use super::snake::Snake;

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionReason {
    WallCollision,
    ObstacleCollision,
    SelfCollision,
}

/// Verdict for one prospective move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Fatal(CollisionReason),
    Moved { head: Position },
    MovedAndGrew { head: Position, food: Food },
}

impl TickOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TickOutcome::Fatal(_))
    }
}

/// Read-only view of everything a move can run into.
///
/// Resolving never mutates; the engine applies the returned outcome.
pub struct CollisionResolver<'a> {
    pub grid: &'a Grid,
    pub snake: &'a Snake,
    pub obstacles: &'a Obstacles,
    pub foods: &'a FoodManager,
    pub tail_rule: InvincibleTailRule,
}

impl CollisionResolver<'_> {
    /// Judges a head landing on `head`. The position should already be
    /// normalized for wrap mode.
    pub fn resolve(&self, head: Position) -> TickOutcome {
        let invincible = self.foods.is_invincible();

        let head = if invincible && !self.grid.is_in_bounds(head) {
            self.grid.wrap(head)
        } else {
            head
        };

        if !self.grid.is_in_bounds(head) {
            return TickOutcome::Fatal(CollisionReason::WallCollision);
        }

        if self.obstacles.contains(head) {
            return TickOutcome::Fatal(CollisionReason::ObstacleCollision);
        }

        let food = self.foods.food_at(head).copied();
        let grows = food.is_some() || self.snake.will_grow();

        if self.hits_body(head, grows, invincible) {
            return TickOutcome::Fatal(CollisionReason::SelfCollision);
        }

        match food {
            Some(food) => TickOutcome::MovedAndGrew { head, food },
            None => TickOutcome::Moved { head },
        }
    }

    fn hits_body(&self, head: Position, grows: bool, invincible: bool) -> bool {
        let tail = self.snake.tail();

        if invincible {
            return grows
                && head == tail
                && self.snake.len() > 1
                && self.tail_rule == InvincibleTailRule::Collide;
        }

        if !self.snake.contains_segment(head, true) {
            return false;
        }
        // A non-growing move frees the tail cell before the head arrives
        grows || head != tail
    }
}
