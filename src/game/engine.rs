use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;

use super::{
    action::{ControlAction, Direction},
    collision::{CollisionReason, CollisionResolver, TickOutcome},
    config::{ConfigError, GameConfig},
    food::{EffectActivation, FoodEvent, FoodManager},
    grid::{Grid, Position},
    obstacles::Obstacles,
    scoring::{HighScoreEntry, ScoreState},
    snake::Snake,
    speed::tick_interval,
    state::{GamePhase, PhaseEvent, Snapshot},
};

/// Cells ahead of a fresh snake kept free of obstacles
const START_LANE_CELLS: usize = 5;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("settings cannot change while a round is running ({0:?})")]
    RoundInProgress(GamePhase),
}

/// What happened during one call to [`GameEngine::tick`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// `None` when the phase does not simulate
    pub outcome: Option<TickOutcome>,
    pub score_delta: u64,
    pub activation: Option<EffectActivation>,
    pub events: Vec<FoodEvent>,
    /// Place on the high-score table earned by the round that just ended
    pub high_score_rank: Option<usize>,
}

impl TickReport {
    pub fn ate_food(&self) -> bool {
        matches!(self.outcome, Some(TickOutcome::MovedAndGrew { .. }))
    }

    pub fn game_over(&self) -> bool {
        self.outcome.is_some_and(|outcome| outcome.is_fatal())
    }
}

/// Owns every piece of game state and advances it one fixed step at a time
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    obstacles: Obstacles,
    food: FoodManager,
    score: ScoreState,
    phase: GamePhase,
    rng: StdRng,
    buffered_direction: Option<Direction>,
    interval: Duration,
    ticks: u64,
    last_collision: Option<CollisionReason>,
    quit_requested: bool,
}

impl GameEngine {
    /// Builds an engine sitting in the menu. Every random decision is drawn
    /// from `seed`, so equal seeds and inputs replay the same game.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;

        let grid = Grid::new(config.grid_width, config.grid_height, config.wrap_mode);
        let mut engine = Self {
            snake: Snake::new(grid.center(), Direction::Right, config.initial_snake_length),
            score: ScoreState::new(config.difficulty, config.combo_window_ticks),
            grid,
            obstacles: Obstacles::none(),
            food: FoodManager::new(),
            phase: GamePhase::Menu,
            rng: StdRng::seed_from_u64(seed),
            buffered_direction: None,
            interval: Duration::ZERO,
            ticks: 0,
            last_collision: None,
            quit_requested: false,
            config,
        };
        engine.reset_round();
        Ok(engine)
    }

    /// Lays out a fresh board: centred snake, obstacles, one standard food
    fn reset_round(&mut self) {
        let config = &self.config;
        self.grid = Grid::new(config.grid_width, config.grid_height, config.wrap_mode);
        self.snake = Snake::new(
            self.grid.center(),
            Direction::Right,
            config.initial_snake_length,
        );
        self.food.reset();
        self.score
            .start_round(config.difficulty, config.combo_window_ticks);

        self.obstacles = if config.obstacles_enabled {
            let mut reserved = self.snake.occupied();
            let mut ahead = self.snake.head();
            for _ in 0..START_LANE_CELLS {
                ahead = ahead.moved_in_direction(Direction::Right);
                reserved.insert(ahead);
            }
            Obstacles::generate(&self.grid, config.difficulty, &reserved, &mut self.rng)
        } else {
            Obstacles::none()
        };

        self.buffered_direction = None;
        self.ticks = 0;
        self.last_collision = None;

        let occupied = self.occupied_cells();
        self.food
            .spawn_standard_food(&self.grid, &occupied, &mut self.rng);
        self.refresh_interval();
    }

    fn occupied_cells(&self) -> HashSet<Position> {
        let mut occupied = self.snake.occupied();
        occupied.extend(self.obstacles.cells());
        occupied
    }

    fn refresh_interval(&mut self) {
        self.interval = tick_interval(
            &self.config.speed,
            self.config.difficulty,
            self.snake.len(),
            self.food.speed_multiplier(),
        );
    }

    /// Buffers a turn for the next tick. Only accepted while playing;
    /// reversals onto the neck are dropped. The latest accepted request wins.
    pub fn submit_direction(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if self.snake.current_direction().is_opposite(direction) {
            debug!("Ignoring reverse turn {:?}", direction);
            return false;
        }
        self.buffered_direction = Some(direction);
        true
    }

    /// Applies a control request, returning the new phase when it caused a
    /// transition.
    pub fn submit_action(&mut self, action: ControlAction) -> Option<GamePhase> {
        let event = match action {
            ControlAction::NewGame => PhaseEvent::NewGame,
            ControlAction::Pause => PhaseEvent::Pause,
            ControlAction::Resume => PhaseEvent::Resume,
            ControlAction::Restart => PhaseEvent::Restart,
            ControlAction::ToMenu => PhaseEvent::ToMenu,
            ControlAction::Quit => {
                self.quit_requested = true;
                return None;
            }
        };
        self.apply_event(event)
    }

    fn apply_event(&mut self, event: PhaseEvent) -> Option<GamePhase> {
        let Some(next) = self.phase.transition(event) else {
            debug!("Ignoring {:?} while {:?}", event, self.phase);
            return None;
        };

        if matches!(event, PhaseEvent::NewGame | PhaseEvent::Restart) {
            self.reset_round();
            info!(
                "Round started: {}x{} {:?}, wrap={}, obstacles={}",
                self.grid.width(),
                self.grid.height(),
                self.config.difficulty,
                self.grid.wraps(),
                self.obstacles.len()
            );
        }

        self.phase = next;
        Some(next)
    }

    /// Runs one fixed simulation step. Outside `Playing` nothing moves and
    /// no timer advances.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.phase.is_simulating() {
            return report;
        }

        let direction = self
            .buffered_direction
            .take()
            .unwrap_or(self.snake.pending_direction());
        let proposed = self.snake.propose_move(direction);
        let proposed = self.grid.normalize(proposed);

        let outcome = CollisionResolver {
            grid: &self.grid,
            snake: &self.snake,
            obstacles: &self.obstacles,
            foods: &self.food,
            tail_rule: self.config.invincible_tail_rule,
        }
        .resolve(proposed);
        report.outcome = Some(outcome);
        self.ticks += 1;

        match outcome {
            TickOutcome::Fatal(reason) => {
                self.end_round(reason, &mut report);
                return report;
            }
            TickOutcome::Moved { head } => {
                let grew = self.snake.take_growth();
                self.snake.commit_move(head, grew);
                self.score.tick();
            }
            TickOutcome::MovedAndGrew { head, food } => {
                self.snake.commit_move(head, true);
                if let Some(eaten) = self.food.take_food_at(head) {
                    let multiplier = self.food.score_multiplier();
                    let activation = self.food.on_consumed(&eaten);
                    report.score_delta = self
                        .score
                        .on_food_consumed(activation.base_points, multiplier);
                    self.snake.add_growth(activation.extra_growth);
                    report.activation = Some(activation);
                    debug!(
                        "Ate {:?} at ({}, {}) for {} points",
                        food.kind, head.x, head.y, report.score_delta
                    );
                }
            }
        }

        report.events = self.food.tick(1);
        for event in &report.events {
            match event {
                FoodEvent::EffectExpired(kind) => info!("{:?} wore off", kind),
                FoodEvent::FoodExpired(food) => debug!("{:?} vanished uneaten", food.kind),
            }
        }

        // Immunity ran out with the body still folded over itself
        if !self.food.is_invincible() && self.snake.overlaps_itself() {
            let outcome = TickOutcome::Fatal(CollisionReason::SelfCollision);
            report.outcome = Some(outcome);
            self.end_round(CollisionReason::SelfCollision, &mut report);
            return report;
        }

        let occupied = self.occupied_cells();
        self.food
            .spawn_standard_food(&self.grid, &occupied, &mut self.rng);
        self.food.spawn_special_food(
            self.config.difficulty,
            self.score.level(),
            self.config.special_food_lifespan_ticks,
            &self.grid,
            &occupied,
            &mut self.rng,
        );

        self.refresh_interval();
        report
    }

    fn end_round(&mut self, reason: CollisionReason, report: &mut TickReport) {
        if let Some(next) = self.phase.transition(PhaseEvent::FatalCollision) {
            self.phase = next;
        }
        self.last_collision = Some(reason);
        self.buffered_direction = None;

        let final_score = self.score.score;
        info!("Game over ({:?}) with {} points", reason, final_score);

        if final_score > 0 && self.score.qualifies(final_score) {
            let rank = self.score.rank_of(final_score);
            let name = self.config.player_name.clone();
            self.score.record_high_score(final_score, &name);
            info!("New high score, rank {}", rank);
            report.high_score_rank = Some(rank);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut obstacles: Vec<Position> = self.obstacles.cells().collect();
        obstacles.sort();

        Snapshot {
            phase: self.phase,
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            snake: self.snake.segments().collect(),
            foods: self.food.foods().to_vec(),
            obstacles,
            active_effects: self.food.active_effects(),
            score: self.score.score,
            combo: self.score.combo,
            level: self.score.level(),
            best_score: self.score.best().max(self.score.score),
            difficulty: self.config.difficulty,
            tick_interval: self.interval,
            ticks: self.ticks,
            last_collision: self.last_collision,
        }
    }

    pub fn export_high_scores(&self) -> Vec<HighScoreEntry> {
        self.score.high_scores().to_vec()
    }

    pub fn import_high_scores(&mut self, entries: Vec<HighScoreEntry>) {
        self.score.set_high_scores(entries);
    }

    pub fn export_settings(&self) -> GameConfig {
        self.config.clone()
    }

    /// Swaps in new settings. Refused while a round is running or paused.
    pub fn import_settings(&mut self, config: GameConfig) -> Result<(), EngineError> {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            return Err(EngineError::RoundInProgress(self.phase));
        }
        config.validate()?;
        self.config = config;
        self.reset_round();
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food_manager(&self) -> &FoodManager {
        &self.food
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }
}
