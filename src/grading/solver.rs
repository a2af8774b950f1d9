use serde::Serialize;

use super::aggregate::aggregate;
use super::component::{find, AssessmentComponent};

/// Slack for float noise before rounding up, e.g. 40.2 * 100 / 60 is
/// 67.00000000000001 and must still round to 67.
const CEIL_TOLERANCE: f64 = 1e-9;

fn ceil_tolerant(x: f64) -> f64 {
    (x - CEIL_TOLERANCE).ceil()
}

/// Minimum mark on the unknown component for one target grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredScore {
    /// Whole percentage, rounded up. May exceed 100 when out of reach.
    pub percentage: i64,
    /// Raw mark out of the component's maximum, rounded up.
    pub raw_score: i64,
    pub achievable: bool,
}

/// Solve for the smallest mark on `unknown_id` that lifts the module grade
/// to `target_grade`, never below the component's own sub-minimum.
///
/// Returns `None` when the unknown component is not in the list or has no
/// usable maximum. Every other component with a known score counts towards
/// the current total; the unknown one is excluded even if it carries a score.
pub fn solve_required(
    components: &[AssessmentComponent],
    unknown_id: &str,
    target_grade: f64,
    final_sub_minimum: f64,
) -> Option<RequiredScore> {
    let unknown = find(components, unknown_id)?;
    if !unknown.has_valid_maximum() {
        return None;
    }

    let known: Vec<AssessmentComponent> = components
        .iter()
        .filter(|c| c.id != unknown_id)
        .cloned()
        .collect();
    let current = aggregate(&known).weighted_total;
    let points_needed = target_grade - current;

    let required_percentage = if points_needed <= 0.0 {
        final_sub_minimum
    } else if unknown.weight.is_finite() && unknown.weight > 0.0 {
        (points_needed * 100.0 / unknown.weight).max(final_sub_minimum)
    } else {
        f64::INFINITY
    };

    // Float to int casts saturate, so an unreachable target stays huge.
    let percentage = ceil_tolerant(required_percentage) as i64;
    let raw_score = ceil_tolerant(percentage as f64 * unknown.maximum / 100.0) as i64;

    Some(RequiredScore {
        percentage,
        raw_score,
        achievable: percentage <= 100,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::component::Mark;

    fn known(kcq: f64, case_study: f64) -> Vec<AssessmentComponent> {
        vec![
            AssessmentComponent::new("kcq", kcq, 10.0, 10.0),
            AssessmentComponent::new("case-study", case_study, 30.0, 30.0),
            AssessmentComponent::new("osa", Mark::Empty, 100.0, 60.0),
        ]
    }

    #[test]
    fn test_distinction_target() {
        let required = solve_required(&known(7.0, 22.0), "osa", 75.0, 30.0).unwrap();
        assert_eq!(
            required,
            RequiredScore {
                percentage: 77,
                raw_score: 77,
                achievable: true,
            }
        );
    }

    #[test]
    fn test_pass_target_exact_percentage() {
        // 21 points over a weight of 60 is exactly 35%
        let required = solve_required(&known(7.0, 22.0), "osa", 50.0, 30.0).unwrap();
        assert_eq!(required.percentage, 35);
        assert_eq!(required.raw_score, 35);
        assert!(required.achievable);
    }

    #[test]
    fn test_floors_at_sub_minimum() {
        // 38 known points leaves 12 needed, i.e. 20%, below the 30% floor
        let required = solve_required(&known(8.0, 30.0), "osa", 50.0, 30.0).unwrap();
        assert_eq!(required.percentage, 30);
        assert_eq!(required.raw_score, 30);
    }

    #[test]
    fn test_target_already_reached_still_needs_sub_minimum() {
        let mut components = known(10.0, 30.0);
        components.push(AssessmentComponent::new("bonus", 20.0, 20.0, 20.0));
        let required = solve_required(&components, "osa", 50.0, 40.0).unwrap();
        assert_eq!(required.percentage, 40);
        assert_eq!(required.raw_score, 40);
        assert!(required.achievable);
    }

    #[test]
    fn test_raw_score_rounds_up_on_other_maximum() {
        let components = vec![
            AssessmentComponent::new("kcq", 7.0, 10.0, 10.0),
            AssessmentComponent::new("case-study", 22.0, 30.0, 30.0),
            AssessmentComponent::new("osa", Mark::Empty, 30.0, 60.0),
        ];
        let required = solve_required(&components, "osa", 75.0, 30.0).unwrap();
        assert_eq!(required.percentage, 77);
        // 77% of 30 is 23.1
        assert_eq!(required.raw_score, 24);
    }

    #[test]
    fn test_fractional_known_marks_give_true_minimum() {
        // 29.8 known points leave 40.2 needed, exactly 67% of a weight of 60
        let required = solve_required(&known(0.0, 29.8), "osa", 70.0, 30.0).unwrap();
        assert_eq!(required.percentage, 67);
        assert_eq!(required.raw_score, 67);

        let required = solve_required(&known(0.0, 9.8), "osa", 50.0, 30.0).unwrap();
        assert_eq!(required.percentage, 67);
    }

    #[test]
    fn test_unreachable_target() {
        let required = solve_required(&known(0.0, 0.0), "osa", 75.0, 30.0).unwrap();
        assert_eq!(required.percentage, 125);
        assert_eq!(required.raw_score, 125);
        assert!(!required.achievable);
    }

    #[test]
    fn test_exactly_one_hundred_is_achievable() {
        // 15 known points, 60 needed from a weight of 60
        let required = solve_required(&known(0.0, 15.0), "osa", 75.0, 30.0).unwrap();
        assert_eq!(required.percentage, 100);
        assert!(required.achievable);
    }

    #[test]
    fn test_unknown_score_is_ignored() {
        let mut components = known(7.0, 22.0);
        components[2].raw_score = Mark::Value(99.0);
        let required = solve_required(&components, "osa", 75.0, 30.0).unwrap();
        assert_eq!(required.percentage, 77);
    }

    #[test]
    fn test_missing_unknown_component() {
        assert!(solve_required(&known(7.0, 22.0), "exam", 50.0, 30.0).is_none());
    }

    #[test]
    fn test_invalid_maximum() {
        let mut components = known(7.0, 22.0);
        components[2].maximum = 0.0;
        assert!(solve_required(&components, "osa", 50.0, 30.0).is_none());
    }

    #[test]
    fn test_zero_weight_unreachable() {
        let mut components = known(7.0, 22.0);
        components[2].weight = 0.0;
        let required = solve_required(&components, "osa", 50.0, 30.0).unwrap();
        assert!(!required.achievable);
    }
}
