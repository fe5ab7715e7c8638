use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::collision::CollisionReason;
use super::config::Difficulty;
use super::effects::ActiveEffect;
use super::food::Food;
use super::grid::Position;

/// Top-level phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Triggers that move a session between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    NewGame,
    Pause,
    Resume,
    FatalCollision,
    Restart,
    ToMenu,
}

impl GamePhase {
    /// Next phase for `event`, or `None` when the pair is not a legal
    /// transition.
    ///
    /// ```text
    /// Menu     --NewGame-------->  Playing
    /// Playing  --Pause---------->  Paused
    /// Paused   --Resume--------->  Playing
    /// Playing  --FatalCollision->  GameOver
    /// GameOver --Restart-------->  Playing
    /// GameOver --ToMenu--------->  Menu
    /// Paused   --ToMenu--------->  Menu
    /// ```
    pub fn transition(self, event: PhaseEvent) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Menu, NewGame) => Some(Playing),
            (Playing, Pause) => Some(Paused),
            (Paused, Resume) => Some(Playing),
            (Playing, FatalCollision) => Some(GameOver),
            (GameOver, Restart) => Some(Playing),
            (GameOver, ToMenu) | (Paused, ToMenu) => Some(Menu),
            _ => None,
        }
    }

    /// Whether ticks advance the simulation in this phase
    pub fn is_simulating(self) -> bool {
        self == GamePhase::Playing
    }
}

/// Read-only copy of the engine after a committed tick, for renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Head first
    pub snake: Vec<Position>,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Position>,
    pub active_effects: Vec<ActiveEffect>,
    pub score: u64,
    pub combo: u32,
    pub level: u32,
    pub best_score: u64,
    pub difficulty: Difficulty,
    pub tick_interval: Duration,
    pub ticks: u64,
    pub last_collision: Option<CollisionReason>,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn food_at(&self, pos: Position) -> Option<&Food> {
        self.foods.iter().find(|food| food.position == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [GamePhase; 4] = [
        GamePhase::Menu,
        GamePhase::Playing,
        GamePhase::Paused,
        GamePhase::GameOver,
    ];
    const ALL_EVENTS: [PhaseEvent; 6] = [
        PhaseEvent::NewGame,
        PhaseEvent::Pause,
        PhaseEvent::Resume,
        PhaseEvent::FatalCollision,
        PhaseEvent::Restart,
        PhaseEvent::ToMenu,
    ];

    #[test]
    fn test_listed_transitions() {
        assert_eq!(GamePhase::Menu.transition(PhaseEvent::NewGame), Some(GamePhase::Playing));
        assert_eq!(GamePhase::Playing.transition(PhaseEvent::Pause), Some(GamePhase::Paused));
        assert_eq!(GamePhase::Paused.transition(PhaseEvent::Resume), Some(GamePhase::Playing));
        assert_eq!(
            GamePhase::Playing.transition(PhaseEvent::FatalCollision),
            Some(GamePhase::GameOver)
        );
        assert_eq!(GamePhase::GameOver.transition(PhaseEvent::Restart), Some(GamePhase::Playing));
        assert_eq!(GamePhase::GameOver.transition(PhaseEvent::ToMenu), Some(GamePhase::Menu));
        assert_eq!(GamePhase::Paused.transition(PhaseEvent::ToMenu), Some(GamePhase::Menu));
    }

    #[test]
    fn test_exactly_seven_transitions_exist() {
        let legal = ALL_PHASES
            .iter()
            .flat_map(|phase| ALL_EVENTS.iter().map(move |event| phase.transition(*event)))
            .filter(Option::is_some)
            .count();
        assert_eq!(legal, 7);
    }

    #[test]
    fn test_rejected_transitions() {
        assert_eq!(GamePhase::Playing.transition(PhaseEvent::ToMenu), None);
        assert_eq!(GamePhase::Menu.transition(PhaseEvent::Pause), None);
        assert_eq!(GamePhase::GameOver.transition(PhaseEvent::Resume), None);
        assert_eq!(GamePhase::Paused.transition(PhaseEvent::FatalCollision), None);
    }

    #[test]
    fn test_only_playing_simulates() {
        for phase in ALL_PHASES {
            assert_eq!(phase.is_simulating(), phase == GamePhase::Playing);
        }
    }
}
