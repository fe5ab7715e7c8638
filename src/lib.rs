//! Snake Arcade - a terminal Snake game with power-ups, obstacles and high scores
//!
//! This library provides:
//! - Core game logic (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Saved settings and high scores (persistence module)
//! - The interactive terminal loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod persistence;
pub mod render;
