use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub outcome: MatchOutcome,
    pub pairs: usize,
    pub matched: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: u32,
    pub time_left: u32,
    pub time_budget: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSummary {
    pub total: usize,
    pub learned: usize,
    pub not_learned: usize,
}

impl FlashcardSummary {
    pub fn new(total: usize, learned: usize) -> Self {
        Self {
            total,
            learned,
            not_learned: total.saturating_sub(learned),
        }
    }
}

/// Whole-percent share of correct evaluations; 0 when nothing was evaluated.
pub fn accuracy_percent(correct: u32, incorrect: u32) -> u32 {
    let total = correct + incorrect;
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds_to_nearest() {
        assert_eq!(accuracy_percent(6, 2), 75);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(1, 2), 33);
        assert_eq!(accuracy_percent(1, 7), 13); // 12.5 rounds up
        assert_eq!(accuracy_percent(5, 0), 100);
    }

    #[test]
    fn accuracy_is_zero_without_evaluations() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(0, 4), 0);
    }

    #[test]
    fn flashcard_summary_derives_not_learned() {
        let summary = FlashcardSummary::new(5, 3);
        assert_eq!(summary.not_learned, 2);
    }
}
