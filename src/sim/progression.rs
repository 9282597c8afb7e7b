//! Intro gate
//!
//! Enemies stay locked until the player has dodged a warning or two and
//! picked up some money. Goals are re-rolled every run; once unlocked the
//! gate stays open until the next run.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntroGate {
    pub warnings_dodged: u32,
    pub money_collected: u32,
    pub warning_goal: u32,
    pub money_goal: u32,
    unlocked: bool,
}

impl IntroGate {
    /// Reset counters and roll new goals for a run
    pub fn reroll(&mut self, rng: &mut impl RandomSource, tuning: &Tuning) {
        self.unlocked = false;
        self.warnings_dodged = 0;
        self.money_collected = 0;
        self.warning_goal = roll_goal(rng, tuning.warning_goal_min, tuning.warning_goal_max);
        self.money_goal = roll_goal(rng, tuning.money_goal_min, tuning.money_goal_max);
        log::debug!(
            "Intro goals: {} warnings, {} money",
            self.warning_goal,
            self.money_goal
        );
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// Count a warning that left the screen untouched. Returns `true` if this unlocked enemies.
    pub fn note_warning_dodged(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.warnings_dodged += 1;
        self.check()
    }

    /// Count collected money. Returns `true` if this unlocked enemies.
    pub fn note_money(&mut self, value: u32) -> bool {
        if self.unlocked {
            return false;
        }
        self.money_collected += value;
        self.check()
    }

    /// Overall progress toward unlock in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.unlocked {
            return 1.0;
        }
        let fraction = |have: u32, goal: u32| {
            if goal == 0 {
                1.0
            } else {
                crate::saturate(have as f32 / goal as f32)
            }
        };
        (fraction(self.warnings_dodged, self.warning_goal)
            + fraction(self.money_collected, self.money_goal))
            * 0.5
    }

    fn check(&mut self) -> bool {
        if self.warnings_dodged >= self.warning_goal && self.money_collected >= self.money_goal {
            self.unlocked = true;
            log::info!(
                "Enemies unlocked after {} dodges and {} money",
                self.warnings_dodged,
                self.money_collected
            );
            return true;
        }
        false
    }
}

fn roll_goal(rng: &mut impl RandomSource, min: u32, max: u32) -> u32 {
    let span = max.saturating_sub(min) as usize + 1;
    min + rng.index(span) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{PcgSource, ScriptedSource};

    #[test]
    fn test_goals_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = PcgSource::new(3);
        let mut gate = IntroGate::default();
        for _ in 0..1000 {
            gate.reroll(&mut rng, &tuning);
            assert!((1..=2).contains(&gate.warning_goal));
            assert!((10..=20).contains(&gate.money_goal));
        }
    }

    #[test]
    fn test_unlock_needs_both_goals_and_fires_once() {
        let tuning = Tuning::default();
        // Lowest roll: goals 1 warning, 10 money
        let mut rng = ScriptedSource::constant(0.0);
        let mut gate = IntroGate::default();
        gate.reroll(&mut rng, &tuning);
        assert_eq!((gate.warning_goal, gate.money_goal), (1, 10));

        assert!(!gate.note_money(9));
        assert!(!gate.note_warning_dodged());
        assert!(!gate.unlocked());

        assert!(gate.note_money(5));
        assert!(gate.unlocked());

        // Never fires again, never un-fires
        assert!(!gate.note_money(5));
        assert!(!gate.note_warning_dodged());
        assert!(gate.unlocked());
        assert_eq!(gate.progress(), 1.0);
    }

    #[test]
    fn test_reroll_relocks() {
        let tuning = Tuning::default();
        let mut rng = ScriptedSource::constant(0.0);
        let mut gate = IntroGate::default();
        gate.reroll(&mut rng, &tuning);
        gate.note_warning_dodged();
        gate.note_money(10);
        assert!(gate.unlocked());

        gate.reroll(&mut rng, &tuning);
        assert!(!gate.unlocked());
        assert_eq!(gate.progress(), 0.0);
    }
}
