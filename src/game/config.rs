use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty profile selected from the menu or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Scale applied to the base tick interval; larger is slower
    pub fn interval_scale(self) -> f64 {
        match self {
            Difficulty::Easy => 1.4,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    pub fn score_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Per-tick chance of a special food appearing while none is on the board
    pub fn special_spawn_chance(self) -> f64 {
        match self {
            Difficulty::Easy => 0.020,
            Difficulty::Medium => 0.015,
            Difficulty::Hard => 0.010,
        }
    }

    pub fn obstacle_density(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// How an invincible snake treats its own retained tail on a growing move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvincibleTailRule {
    /// Pass through the tail like any other segment
    #[default]
    Ignore,
    /// Landing on the tail while growing still ends the round
    Collide,
}

/// Constants of the speed progression curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Interval between ticks for a fresh snake on Medium, in milliseconds
    pub base_interval_ms: u64,
    /// Speed-up contributed by each segment
    pub growth_factor: f64,
    /// Length after which growth stops speeding the game up
    pub length_cap: usize,
    /// Floor for the progression before power-up modifiers
    pub min_interval_ms: u64,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            base_interval_ms: 125,
            growth_factor: 0.02,
            length_cap: 50,
            min_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be between {min} and {max} cells per side, got {width}x{height}")]
    GridSize {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },
    #[error("initial snake length {length} does not fit a grid {width} cells wide")]
    SnakeLength { length: usize, width: usize },
    #[error("invalid speed settings: {0}")]
    Speed(&'static str),
    #[error("combo window must be at least one tick")]
    ComboWindow,
    #[error("special food lifespan must be at least one tick")]
    SpecialLifespan,
}

/// Settings surface of the engine.
///
/// Owned by the caller and handed to the engine explicitly; the engine never
/// reads process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    pub difficulty: Difficulty,
    /// Leaving one edge re-enters on the opposite edge instead of killing
    pub wrap_mode: bool,
    /// Scatter static obstacles at the start of each round
    pub obstacles_enabled: bool,
    /// Name stored with high scores
    pub player_name: String,
    pub invincible_tail_rule: InvincibleTailRule,
    pub speed: SpeedSettings,
    /// Ticks without eating before the combo counter drops back to zero
    pub combo_window_ticks: u32,
    /// Ticks a special food stays on the board before vanishing
    pub special_food_lifespan_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            difficulty: Difficulty::Medium,
            wrap_mode: false,
            obstacles_enabled: false,
            player_name: "Player".to_string(),
            invincible_tail_rule: InvincibleTailRule::Ignore,
            speed: SpeedSettings::default(),
            combo_window_ticks: 20,
            special_food_lifespan_ticks: 80,
        }
    }
}

impl GameConfig {
    pub const MIN_SIDE: usize = 5;
    pub const MAX_SIDE: usize = 200;

    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |side: usize| (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&side);
        if !side_ok(self.grid_width) || !side_ok(self.grid_height) {
            return Err(ConfigError::GridSize {
                width: self.grid_width,
                height: self.grid_height,
                min: Self::MIN_SIDE,
                max: Self::MAX_SIDE,
            });
        }

        // The snake is laid out leftwards from the centre column
        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::SnakeLength {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }

        if self.speed.base_interval_ms == 0 {
            return Err(ConfigError::Speed("base interval must be positive"));
        }
        if self.speed.min_interval_ms == 0 || self.speed.min_interval_ms > self.speed.base_interval_ms {
            return Err(ConfigError::Speed(
                "minimum interval must be positive and not above the base interval",
            ));
        }
        if !self.speed.growth_factor.is_finite() || self.speed.growth_factor < 0.0 {
            return Err(ConfigError::Speed("growth factor must be a non-negative number"));
        }
        if self.combo_window_ticks == 0 {
            return Err(ConfigError::ComboWindow);
        }
        if self.special_food_lifespan_ticks == 0 {
            return Err(ConfigError::SpecialLifespan);
        }

        Ok(())
    }
}
