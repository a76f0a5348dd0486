use std::ops::Add;

use serde::Serialize;

/// What happened to a single candidate row during a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Sent,
    Failed,
    Skipped,
}

/// Counters for one dispatch run, built from the per-row outcomes.
/// `sent + errors + skipped == total_processed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    sent: usize,
    errors: usize,
    skipped: usize,
    total_processed: usize,
}

impl DispatchStats {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a RowOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |stats, outcome| {
                let mut next = stats;
                match outcome {
                    RowOutcome::Sent => next.sent += 1,
                    RowOutcome::Failed => next.errors += 1,
                    RowOutcome::Skipped => next.skipped += 1,
                }
                next.total_processed += 1;
                next
            })
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn total_processed(&self) -> usize {
        self.total_processed
    }
}

impl Add for DispatchStats {
    type Output = DispatchStats;

    fn add(self, other: DispatchStats) -> DispatchStats {
        DispatchStats {
            sent: self.sent + other.sent,
            errors: self.errors + other.errors,
            skipped: self.skipped + other.skipped,
            total_processed: self.total_processed + other.total_processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_outcome_once() {
        let outcomes = [
            RowOutcome::Sent,
            RowOutcome::Failed,
            RowOutcome::Skipped,
            RowOutcome::Sent,
        ];
        let stats = DispatchStats::from_outcomes(&outcomes);
        assert_eq!(stats.sent(), 2);
        assert_eq!(stats.errors(), 1);
        assert_eq!(stats.skipped(), 1);
        assert_eq!(stats.total_processed(), 4);
    }

    #[test]
    fn combined_stats_keep_the_total_invariant() {
        let a = DispatchStats::from_outcomes(&[RowOutcome::Sent, RowOutcome::Skipped]);
        let b = DispatchStats::from_outcomes(&[RowOutcome::Failed]);
        let total = a + b;
        assert_eq!(
            total.sent() + total.errors() + total.skipped(),
            total.total_processed()
        );
        assert_eq!(total.total_processed(), 3);
    }

    #[test]
    fn empty_run_is_all_zero() {
        assert_eq!(DispatchStats::from_outcomes(&[] as &[RowOutcome]), DispatchStats::default());
    }
}
