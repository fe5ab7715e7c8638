use std::time::Duration;

use super::config::{Difficulty, SpeedSettings};

/// Time between ticks for a snake of `snake_len` segments.
///
/// The length-driven progression is clamped to the configured floor first;
/// active SpeedUp/SpeedDown effects then scale the clamped value.
pub fn tick_interval(
    settings: &SpeedSettings,
    difficulty: Difficulty,
    snake_len: usize,
    effect_speed_multiplier: f64,
) -> Duration {
    let base = settings.base_interval_ms as f64 * difficulty.interval_scale();
    let growth = 1.0 + settings.growth_factor * snake_len.min(settings.length_cap) as f64;
    let progressed = (base / growth).max(settings.min_interval_ms as f64);

    let multiplier = if effect_speed_multiplier > 0.0 {
        effect_speed_multiplier
    } else {
        1.0
    };
    Duration::from_secs_f64(progressed / multiplier / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(duration: Duration) -> f64 {
        duration.as_secs_f64() * 1000.0
    }

    #[test]
    fn test_interval_shrinks_with_length() {
        let settings = SpeedSettings::default();
        let short = tick_interval(&settings, Difficulty::Medium, 3, 1.0);
        let long = tick_interval(&settings, Difficulty::Medium, 20, 1.0);
        assert!(long < short);
        // 125 / 1.06
        assert!((ms(short) - 117.924).abs() < 0.01);
    }

    #[test]
    fn test_length_cap_and_floor() {
        let settings = SpeedSettings {
            growth_factor: 1.0,
            ..SpeedSettings::default()
        };
        let capped = tick_interval(&settings, Difficulty::Hard, 500, 1.0);
        assert!((ms(capped) - 50.0).abs() < 1e-6);

        let settings = SpeedSettings::default();
        let at_cap = tick_interval(&settings, Difficulty::Medium, 50, 1.0);
        let past_cap = tick_interval(&settings, Difficulty::Medium, 80, 1.0);
        assert_eq!(at_cap, past_cap);
    }

    #[test]
    fn test_difficulty_scales_interval() {
        let settings = SpeedSettings::default();
        let easy = tick_interval(&settings, Difficulty::Easy, 3, 1.0);
        let hard = tick_interval(&settings, Difficulty::Hard, 3, 1.0);
        assert!(easy > hard);
    }

    #[test]
    fn test_effects_modulate_clamped_interval() {
        let settings = SpeedSettings::default();
        let normal = tick_interval(&settings, Difficulty::Medium, 3, 1.0);
        let fast = tick_interval(&settings, Difficulty::Medium, 3, 1.5);
        let slow = tick_interval(&settings, Difficulty::Medium, 3, 0.5);

        assert!((ms(fast) * 1.5 - ms(normal)).abs() < 1e-3);
        assert!((ms(slow) * 0.5 - ms(normal)).abs() < 1e-3);
    }
}
