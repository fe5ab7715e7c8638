//! Core game logic for Snake Arcade
//!
//! Everything here is pure simulation with no terminal I/O, so the engine can
//! be driven by the interactive host or stepped directly in tests.

pub mod action;
pub mod collision;
pub mod config;
pub mod effects;
pub mod engine;
pub mod food;
pub mod grid;
pub mod obstacles;
pub mod scoring;
pub mod snake;
pub mod speed;
pub mod state;

// Re-export commonly used types
pub use action::{ControlAction, Direction};
pub use collision::{CollisionReason, TickOutcome};
pub use config::{ConfigError, Difficulty, GameConfig, InvincibleTailRule, SpeedSettings};
pub use effects::{ActiveEffect, EffectKind};
pub use engine::{EngineError, GameEngine, TickReport};
pub use food::{Food, FoodEvent, FoodKind};
pub use grid::{Grid, Position};
pub use scoring::HighScoreEntry;
pub use state::{GamePhase, Snapshot};
