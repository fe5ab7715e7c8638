use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::Difficulty;

pub const MAX_HIGH_SCORES: usize = 10;
/// Consecutive meals beyond this stop raising the combo bonus
pub const MAX_COMBO_STEPS: u32 = 10;
const COMBO_STEP: f64 = 0.1;
const FOOD_PER_LEVEL: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    pub timestamp: DateTime<Utc>,
}

/// Bonus factor for a meal eaten with `combo` meals already chained
pub fn combo_bonus_factor(combo: u32) -> f64 {
    1.0 + COMBO_STEP * f64::from(combo.min(MAX_COMBO_STEPS))
}

/// Points for one meal after every multiplier is applied
pub fn score_delta(
    base_value: u32,
    combo: u32,
    difficulty_multiplier: f64,
    active_score_multiplier: f64,
) -> u64 {
    let raw = f64::from(base_value)
        * difficulty_multiplier
        * active_score_multiplier
        * combo_bonus_factor(combo);
    raw.round().max(0.0) as u64
}

/// Score, combo chain and the high-score table for a session
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub food_eaten: u32,
    pub difficulty_multiplier: f64,
    ticks_since_food: u32,
    combo_window: u32,
    high_scores: Vec<HighScoreEntry>,
}

impl ScoreState {
    pub fn new(difficulty: Difficulty, combo_window: u32) -> Self {
        Self {
            score: 0,
            combo: 0,
            food_eaten: 0,
            difficulty_multiplier: difficulty.score_multiplier(),
            ticks_since_food: 0,
            combo_window,
            high_scores: Vec::new(),
        }
    }

    /// Clears the running round; the high-score table survives
    pub fn start_round(&mut self, difficulty: Difficulty, combo_window: u32) {
        self.score = 0;
        self.combo = 0;
        self.food_eaten = 0;
        self.ticks_since_food = 0;
        self.difficulty_multiplier = difficulty.score_multiplier();
        self.combo_window = combo_window;
    }

    pub fn level(&self) -> u32 {
        self.food_eaten / FOOD_PER_LEVEL + 1
    }

    /// Scores one meal with the current combo, then extends the chain
    pub fn on_food_consumed(&mut self, base_value: u32, active_score_multiplier: f64) -> u64 {
        let delta = score_delta(
            base_value,
            self.combo,
            self.difficulty_multiplier,
            active_score_multiplier,
        );
        self.score += delta;
        self.food_eaten += 1;
        self.combo += 1;
        self.ticks_since_food = 0;
        delta
    }

    /// Advances the combo window by one tick
    pub fn tick(&mut self) {
        if self.combo == 0 {
            return;
        }
        self.ticks_since_food += 1;
        if self.ticks_since_food > self.combo_window {
            self.combo = 0;
            self.ticks_since_food = 0;
        }
    }

    pub fn high_scores(&self) -> &[HighScoreEntry] {
        &self.high_scores
    }

    /// Replaces the table, re-sorting and trimming whatever was loaded
    pub fn set_high_scores(&mut self, mut entries: Vec<HighScoreEntry>) {
        sort_entries(&mut entries);
        entries.truncate(MAX_HIGH_SCORES);
        self.high_scores = entries;
    }

    pub fn best(&self) -> u64 {
        self.high_scores.first().map_or(0, |entry| entry.score)
    }

    /// Whether `score` would make it onto the table
    pub fn qualifies(&self, score: u64) -> bool {
        self.high_scores.len() < MAX_HIGH_SCORES
            || self.high_scores.last().is_some_and(|lowest| score > lowest.score)
    }

    /// 1-based place a new `score` would take, ties ranking below older entries
    pub fn rank_of(&self, score: u64) -> usize {
        self.high_scores
            .iter()
            .take_while(|entry| entry.score >= score)
            .count()
            + 1
    }

    /// Stamps the entry with the current time and files it
    pub fn record_high_score(&mut self, final_score: u64, name: &str) -> &[HighScoreEntry] {
        self.record_high_score_at(final_score, name, Utc::now())
    }

    pub fn record_high_score_at(
        &mut self,
        final_score: u64,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> &[HighScoreEntry] {
        self.high_scores.push(HighScoreEntry {
            name: name.to_string(),
            score: final_score,
            timestamp,
        });
        sort_entries(&mut self.high_scores);
        self.high_scores.truncate(MAX_HIGH_SCORES);
        &self.high_scores
    }
}

/// Highest first; on equal scores the older entry ranks higher
fn sort_entries(entries: &mut [HighScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_first_meal_scores_base_value() {
        let mut state = ScoreState::new(Difficulty::Medium, 20);
        assert_eq!(state.on_food_consumed(10, 1.0), 10);
        assert_eq!(state.score, 10);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_delta_combines_all_multipliers() {
        // 25 * 1.3 * 2.0 * 1.2 = 78
        assert_eq!(score_delta(25, 2, 1.3, 2.0), 78);
        // 8 * 0.8 = 6.4 rounds down
        assert_eq!(score_delta(8, 0, 0.8, 1.0), 6);
        assert_eq!(combo_bonus_factor(50), combo_bonus_factor(MAX_COMBO_STEPS));
    }

    #[test]
    fn test_combo_builds_within_window() {
        let mut state = ScoreState::new(Difficulty::Medium, 3);
        state.on_food_consumed(10, 1.0);
        state.tick();
        state.tick();
        assert_eq!(state.on_food_consumed(10, 1.0), 11);
        assert_eq!(state.combo, 2);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut state = ScoreState::new(Difficulty::Medium, 3);
        state.on_food_consumed(10, 1.0);
        for _ in 0..3 {
            state.tick();
        }
        assert_eq!(state.combo, 1);
        state.tick();
        assert_eq!(state.combo, 0);
        assert_eq!(state.on_food_consumed(10, 1.0), 10);
    }

    #[test]
    fn test_level_progression() {
        let mut state = ScoreState::new(Difficulty::Easy, 20);
        assert_eq!(state.level(), 1);
        for _ in 0..5 {
            state.on_food_consumed(10, 1.0);
        }
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_high_scores_sorted_and_capped() {
        let mut state = ScoreState::new(Difficulty::Medium, 20);
        for i in 0..12u64 {
            state.record_high_score_at(i * 10, "p", at(i as i64));
        }

        let table = state.high_scores();
        assert_eq!(table.len(), MAX_HIGH_SCORES);
        assert_eq!(table[0].score, 110);
        assert_eq!(table[9].score, 20);
        assert!(table.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_favour_earlier_entries() {
        let mut state = ScoreState::new(Difficulty::Medium, 20);
        state.record_high_score_at(50, "late", at(100));
        state.record_high_score_at(50, "early", at(5));
        state.record_high_score_at(70, "top", at(200));

        let names: Vec<_> = state.high_scores().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["top", "early", "late"]);
        assert_eq!(state.rank_of(50), 4);
        assert_eq!(state.best(), 70);
    }

    #[test]
    fn test_qualification() {
        let mut state = ScoreState::new(Difficulty::Medium, 20);
        assert!(state.qualifies(0));
        for i in 0..MAX_HIGH_SCORES as i64 {
            state.record_high_score_at(100, "p", at(i));
        }
        assert!(!state.qualifies(100));
        assert!(state.qualifies(101));
    }

    #[test]
    fn test_round_reset_keeps_table() {
        let mut state = ScoreState::new(Difficulty::Medium, 20);
        state.on_food_consumed(10, 1.0);
        state.record_high_score_at(10, "p", at(0));
        state.start_round(Difficulty::Hard, 20);

        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.difficulty_multiplier, 1.3);
        assert_eq!(state.high_scores().len(), 1);
    }
}
