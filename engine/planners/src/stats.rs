//! Per-decision statistics recorded by every planner in this crate.

/// What one `choose_action` call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionStats {
    /// Steps consumed by the decision
    pub steps_used: u64,
    /// Planner-specific unit of work: single steps, candidates, generations or
    /// node expansions
    pub iterations: u32,
    /// Score of the answer that was returned, when the planner scores answers
    pub best_score: Option<f64>,
    /// Whether the search stopped because a step reported the budget exhausted
    pub exhausted: bool,
    /// Incumbent score after each candidate (local search) or best fitness of
    /// each fully evaluated generation (evolution). Empty for other planners.
    pub history: Vec<f64>,
}

impl DecisionStats {
    pub(crate) fn starting_at(remaining: u64) -> StatsRecorder {
        StatsRecorder {
            start_remaining: remaining,
            stats: DecisionStats::default(),
        }
    }
}

/// Accumulates stats while a decision runs and fills in `steps_used` at the end.
#[derive(Debug)]
pub(crate) struct StatsRecorder {
    start_remaining: u64,
    pub stats: DecisionStats,
}

impl StatsRecorder {
    pub fn finish(mut self, remaining: u64) -> DecisionStats {
        self.stats.steps_used = self.start_remaining.saturating_sub(remaining);
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_counts_steps() {
        let mut recorder = DecisionStats::starting_at(10);
        recorder.stats.iterations = 3;
        let stats = recorder.finish(4);
        assert_eq!(stats.steps_used, 6);
        assert_eq!(stats.iterations, 3);
        assert!(!stats.exhausted);
    }
}
