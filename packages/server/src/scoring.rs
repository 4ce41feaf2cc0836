//! Tiered award policy for multiple-choice answers.
//!
//! First attempt earns full points or nothing. A retry after a wrong answer
//! can recover half the points; a retry after a correct answer never changes
//! the award, so re-submitting cannot farm points.

/// Outcome of a previously recorded answer, if any.
#[derive(Debug, Clone, Copy)]
pub struct PriorAnswer {
    pub was_correct: bool,
    pub points_awarded: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Award {
    pub points_awarded: i32,
    pub is_retry: bool,
    pub was_previously_correct: Option<bool>,
}

/// Points to record for an answer given the question's value, whether the
/// new selection is correct, and the prior ledger row for this
/// (student, question) pair.
pub fn grade(question_points: i32, is_correct: bool, prior: Option<PriorAnswer>) -> Award {
    match prior {
        None => Award {
            points_awarded: if is_correct { question_points } else { 0 },
            is_retry: false,
            was_previously_correct: None,
        },
        Some(prev) if prev.was_correct => Award {
            points_awarded: prev.points_awarded,
            is_retry: true,
            was_previously_correct: Some(true),
        },
        Some(_) => Award {
            points_awarded: if is_correct { question_points / 2 } else { 0 },
            is_retry: true,
            was_previously_correct: Some(false),
        },
    }
}

/// Case-insensitive option comparison; selections are stored uppercased.
pub fn is_correct_selection(selected: &str, correct_option: &str) -> bool {
    selected.eq_ignore_ascii_case(correct_option.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attempt_full_or_nothing() {
        assert_eq!(grade(10, true, None).points_awarded, 10);
        assert_eq!(grade(10, false, None).points_awarded, 0);
        assert!(!grade(10, true, None).is_retry);
    }

    #[test]
    fn retry_after_wrong_answer_earns_half() {
        let prior = Some(PriorAnswer {
            was_correct: false,
            points_awarded: 0,
        });
        let award = grade(5, true, prior);
        assert_eq!(award.points_awarded, 2); // floor(5/2)
        assert!(award.is_retry);
        assert_eq!(award.was_previously_correct, Some(false));
    }

    #[test]
    fn retry_after_wrong_answer_can_still_earn_nothing() {
        let prior = Some(PriorAnswer {
            was_correct: false,
            points_awarded: 0,
        });
        assert_eq!(grade(5, false, prior).points_awarded, 0);
    }

    #[test]
    fn retry_after_correct_answer_freezes_the_award() {
        let prior = Some(PriorAnswer {
            was_correct: true,
            points_awarded: 10,
        });
        // Even a now-wrong retry keeps the original award.
        assert_eq!(grade(10, false, prior).points_awarded, 10);
        assert_eq!(grade(10, true, prior).points_awarded, 10);
        assert_eq!(grade(10, false, prior).was_previously_correct, Some(true));
    }

    #[test]
    fn selection_comparison_ignores_case() {
        assert!(is_correct_selection("B", "b"));
        assert!(is_correct_selection("b", "B"));
        assert!(!is_correct_selection("A", "B"));
    }
}
