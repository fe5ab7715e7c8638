use std::collections::HashSet;

use log::{debug, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::Difficulty;
use super::effects::{ActiveEffect, ActiveEffects, EffectKind};
use super::grid::{Grid, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Bonus,
    SpeedUp,
    SpeedDown,
    DoublePoints,
    Invincibility,
    GrowthBoost,
}

/// Static properties of a food kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodProfile {
    pub points: u32,
    /// Level at which the kind may start appearing as a special
    pub unlock_level: u32,
    /// Relative spawn weight among specials, rarity boost included
    pub spawn_weight: f64,
    pub effect: Option<EffectKind>,
    /// Segments granted on top of the usual one
    pub extra_growth: u32,
}

impl FoodKind {
    pub const SPECIALS: [FoodKind; 6] = [
        FoodKind::Bonus,
        FoodKind::SpeedUp,
        FoodKind::SpeedDown,
        FoodKind::DoublePoints,
        FoodKind::Invincibility,
        FoodKind::GrowthBoost,
    ];

    pub fn profile(self) -> FoodProfile {
        let (points, unlock_level, spawn_weight, effect, extra_growth) = match self {
            FoodKind::Normal => (10, 1, 0.0, None, 0),
            FoodKind::Bonus => (25, 1, 0.12 * 1.2, None, 0),
            FoodKind::SpeedUp => (15, 2, 0.06 * 1.2, Some(EffectKind::SpeedUp), 0),
            FoodKind::SpeedDown => (8, 3, 0.04 * 1.2, Some(EffectKind::SpeedDown), 0),
            FoodKind::DoublePoints => (20, 3, 0.04 * 1.5, Some(EffectKind::DoublePoints), 0),
            FoodKind::Invincibility => (35, 5, 0.03 * 1.5, Some(EffectKind::Invincibility), 0),
            FoodKind::GrowthBoost => (30, 4, 0.03 * 1.5, None, 3),
        };
        FoodProfile {
            points,
            unlock_level,
            spawn_weight,
            effect,
            extra_growth,
        }
    }

    pub fn is_special(self) -> bool {
        self != FoodKind::Normal
    }
}

/// A food item placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    pub point_value: u32,
    /// Ticks left before a special item vanishes; `None` for standard food
    pub lifespan: Option<u32>,
}

impl Food {
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Self {
            position,
            kind,
            point_value: kind.profile().points,
            lifespan: None,
        }
    }

    pub fn with_lifespan(mut self, ticks: u32) -> Self {
        self.lifespan = Some(ticks);
        self
    }
}

/// What eating a food item unlocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectActivation {
    pub base_points: u32,
    pub effect: Option<EffectKind>,
    /// True when the effect was already running and only had its timer reset
    pub refreshed: bool,
    pub extra_growth: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoodEvent {
    EffectExpired(EffectKind),
    FoodExpired(Food),
}

/// Placed food plus the power-ups it has granted
#[derive(Debug, Clone, Default)]
pub struct FoodManager {
    foods: Vec<Food>,
    effects: ActiveEffects,
    standard_deferred: bool,
}

impl FoodManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.foods.clear();
        self.effects.clear();
        self.standard_deferred = false;
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn food_at(&self, pos: Position) -> Option<&Food> {
        self.foods.iter().find(|food| food.position == pos)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.foods.iter().map(|food| food.position)
    }

    pub fn has_standard_food(&self) -> bool {
        self.foods.iter().any(|food| !food.kind.is_special())
    }

    pub fn special_food(&self) -> Option<&Food> {
        self.foods.iter().find(|food| food.kind.is_special())
    }

    /// True while a standard spawn is waiting for a free cell
    pub fn standard_deferred(&self) -> bool {
        self.standard_deferred
    }

    /// Puts `food` on the board, replacing any item in the same slot
    /// (standard or special).
    pub fn place(&mut self, food: Food) {
        let special = food.kind.is_special();
        self.foods
            .retain(|existing| existing.kind.is_special() != special && existing.position != food.position);
        if !special {
            self.standard_deferred = false;
        }
        self.foods.push(food);
    }

    fn excluded_cells(&self, occupied: &HashSet<Position>) -> HashSet<Position> {
        let mut excluded = occupied.clone();
        excluded.extend(self.positions());
        excluded
    }

    /// Makes sure one standard food is on the board. A full board defers the
    /// spawn to a later call instead of failing.
    pub fn spawn_standard_food<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: &HashSet<Position>,
        rng: &mut R,
    ) -> Option<Position> {
        if self.has_standard_food() {
            return None;
        }

        match grid.random_unoccupied_cell(&self.excluded_cells(occupied), rng) {
            Ok(pos) => {
                self.place(Food::new(pos, FoodKind::Normal));
                Some(pos)
            }
            Err(err) => {
                if !self.standard_deferred {
                    debug!("Deferring standard food spawn: {}", err);
                }
                self.standard_deferred = true;
                None
            }
        }
    }

    /// Rolls for a special item when none is on the board. Only kinds
    /// unlocked at `level` are eligible.
    pub fn spawn_special_food<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        level: u32,
        lifespan: u32,
        grid: &Grid,
        occupied: &HashSet<Position>,
        rng: &mut R,
    ) -> Option<Food> {
        if self.special_food().is_some() || !rng.gen_bool(difficulty.special_spawn_chance()) {
            return None;
        }

        let kind = Self::pick_special_kind(level, rng)?;
        let pos = match grid.random_unoccupied_cell(&self.excluded_cells(occupied), rng) {
            Ok(pos) => pos,
            Err(err) => {
                debug!("Skipping {:?} spawn: {}", kind, err);
                return None;
            }
        };

        let food = Food::new(pos, kind).with_lifespan(lifespan);
        debug!("Spawned {:?} at ({}, {})", kind, pos.x, pos.y);
        self.place(food);
        Some(food)
    }

    fn pick_special_kind<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Option<FoodKind> {
        let eligible: Vec<FoodKind> = FoodKind::SPECIALS
            .into_iter()
            .filter(|kind| kind.profile().unlock_level <= level)
            .collect();
        let weights = WeightedIndex::new(eligible.iter().map(|kind| kind.profile().spawn_weight)).ok()?;
        Some(eligible[weights.sample(rng)])
    }

    /// Removes and returns the food at `pos`, if any
    pub fn take_food_at(&mut self, pos: Position) -> Option<Food> {
        let index = self.foods.iter().position(|food| food.position == pos)?;
        Some(self.foods.remove(index))
    }

    /// Starts the food's power-up, if it has one, and reports what was earned
    pub fn on_consumed(&mut self, food: &Food) -> EffectActivation {
        let profile = food.kind.profile();
        let refreshed = match profile.effect {
            Some(kind) => {
                let refreshed = self.effects.activate(kind);
                info!(
                    "{} {:?} for {} ticks",
                    if refreshed { "Refreshed" } else { "Activated" },
                    kind,
                    kind.descriptor().duration_ticks
                );
                refreshed
            }
            None => false,
        };

        EffectActivation {
            base_points: food.point_value,
            effect: profile.effect,
            refreshed,
            extra_growth: profile.extra_growth,
        }
    }

    /// Advances effect timers and special-food lifespans by `elapsed` ticks
    pub fn tick(&mut self, elapsed: u32) -> Vec<FoodEvent> {
        let mut events: Vec<FoodEvent> = self
            .effects
            .decay(elapsed)
            .into_iter()
            .map(FoodEvent::EffectExpired)
            .collect();

        let mut kept = Vec::with_capacity(self.foods.len());
        for mut food in self.foods.drain(..) {
            match food.lifespan {
                Some(ticks) if ticks <= elapsed => events.push(FoodEvent::FoodExpired(food)),
                Some(ticks) => {
                    food.lifespan = Some(ticks - elapsed);
                    kept.push(food);
                }
                None => kept.push(food),
            }
        }
        self.foods = kept;

        events
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn active_effects(&self) -> Vec<ActiveEffect> {
        self.effects.snapshot()
    }

    pub fn score_multiplier(&self) -> f64 {
        self.effects.score_multiplier()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.effects.speed_multiplier()
    }

    pub fn is_invincible(&self) -> bool {
        self.effects.collision_immunity()
    }
}
