//! Progress math shared by the aggregation endpoints. The answer ledger is
//! the single source of truth; stored percentages are only a cache.

use common::ProgressStatus;

/// Whole-percent completion: floor of completed/total, 0 when the project
/// has no released steps.
pub fn percentage(completed_steps: usize, total_steps: usize) -> i32 {
    if total_steps == 0 {
        return 0;
    }
    ((completed_steps * 100) / total_steps) as i32
}

/// Status derived purely from the computed percentage.
pub fn derive_status(pct: i32) -> ProgressStatus {
    match pct {
        100 => ProgressStatus::Completed,
        p if p > 0 => ProgressStatus::InProgress,
        _ => ProgressStatus::NotStarted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_floors() {
        assert_eq!(percentage(0, 4), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn no_released_steps_means_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(derive_status(percentage(0, 0)), ProgressStatus::NotStarted);
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(derive_status(0), ProgressStatus::NotStarted);
        assert_eq!(derive_status(1), ProgressStatus::InProgress);
        assert_eq!(derive_status(99), ProgressStatus::InProgress);
        assert_eq!(derive_status(100), ProgressStatus::Completed);
    }
}
