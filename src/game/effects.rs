use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Timed modifiers granted by power-up food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    SpeedUp,
    SpeedDown,
    DoublePoints,
    Invincibility,
}

/// What an effect does while it is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectDescriptor {
    /// Lifetime counted from the tick the item is eaten. That tick already
    /// uses up one, so the effect shapes `duration_ticks - 1` later moves.
    pub duration_ticks: u32,
    /// Game speed factor; above 1.0 shortens the tick interval
    pub speed_multiplier: f64,
    pub score_multiplier: f64,
    pub collision_immunity: bool,
}

impl EffectKind {
    pub fn descriptor(self) -> EffectDescriptor {
        match self {
            EffectKind::SpeedUp => EffectDescriptor {
                duration_ticks: 60,
                speed_multiplier: 1.5,
                score_multiplier: 1.0,
                collision_immunity: false,
            },
            EffectKind::SpeedDown => EffectDescriptor {
                duration_ticks: 40,
                speed_multiplier: 0.5,
                score_multiplier: 1.0,
                collision_immunity: false,
            },
            EffectKind::DoublePoints => EffectDescriptor {
                duration_ticks: 100,
                speed_multiplier: 1.0,
                score_multiplier: 2.0,
                collision_immunity: false,
            },
            EffectKind::Invincibility => EffectDescriptor {
                duration_ticks: 50,
                speed_multiplier: 1.0,
                score_multiplier: 1.0,
                collision_immunity: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_ticks: u32,
}

/// Running power-ups keyed by kind.
///
/// One entry per kind: collecting a kind that is already running restarts its
/// timer, different kinds run side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveEffects {
    remaining: BTreeMap<EffectKind, u32>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `kind`, or resets its timer when already running. Returns true
    /// when the effect was refreshed rather than newly started.
    pub fn activate(&mut self, kind: EffectKind) -> bool {
        self.remaining
            .insert(kind, kind.descriptor().duration_ticks)
            .is_some()
    }

    /// Advances every timer by `elapsed` ticks and returns the kinds that ran out
    pub fn decay(&mut self, elapsed: u32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for (kind, ticks) in self.remaining.iter_mut() {
            *ticks = ticks.saturating_sub(elapsed);
            if *ticks == 0 {
                expired.push(*kind);
            }
        }
        for kind in &expired {
            self.remaining.remove(kind);
        }
        expired
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining.contains_key(&kind)
    }

    pub fn remaining(&self, kind: EffectKind) -> Option<u32> {
        self.remaining.get(&kind).copied()
    }

    pub fn score_multiplier(&self) -> f64 {
        self.remaining
            .keys()
            .map(|kind| kind.descriptor().score_multiplier)
            .product()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.remaining
            .keys()
            .map(|kind| kind.descriptor().speed_multiplier)
            .product()
    }

    pub fn collision_immunity(&self) -> bool {
        self.remaining
            .keys()
            .any(|kind| kind.descriptor().collision_immunity)
    }

    pub fn snapshot(&self) -> Vec<ActiveEffect> {
        self.remaining
            .iter()
            .map(|(kind, remaining_ticks)| ActiveEffect {
                kind: *kind,
                remaining_ticks: *remaining_ticks,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_different_kinds_stack() {
        let mut effects = ActiveEffects::new();
        effects.activate(EffectKind::SpeedUp);
        effects.activate(EffectKind::DoublePoints);

        assert!(effects.is_active(EffectKind::SpeedUp));
        assert!(effects.is_active(EffectKind::DoublePoints));
        assert_eq!(effects.score_multiplier(), 2.0);
        assert_eq!(effects.speed_multiplier(), 1.5);
    }

    #[test]
    fn test_same_kind_refreshes() {
        let mut effects = ActiveEffects::new();
        assert!(!effects.activate(EffectKind::SpeedDown));
        effects.decay(30);
        assert_eq!(effects.remaining(EffectKind::SpeedDown), Some(10));

        assert!(effects.activate(EffectKind::SpeedDown));
        assert_eq!(effects.remaining(EffectKind::SpeedDown), Some(40));
        assert_eq!(effects.snapshot().len(), 1);
    }

    #[test]
    fn test_effects_expire_independently() {
        let mut effects = ActiveEffects::new();
        effects.activate(EffectKind::SpeedDown); // 40 ticks
        effects.activate(EffectKind::Invincibility); // 50 ticks

        assert!(effects.decay(39).is_empty());
        assert_eq!(effects.decay(1), vec![EffectKind::SpeedDown]);
        assert!(effects.collision_immunity());
        assert_eq!(effects.decay(10), vec![EffectKind::Invincibility]);
        assert!(effects.is_empty());
        assert_eq!(effects.speed_multiplier(), 1.0);
    }
}
