use serde::Serialize;

use super::component::AssessmentComponent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub weighted_total: f64,
    pub total_weight_counted: f64,
}

/// Sum `score / maximum * weight` over every component with a usable score,
/// maximum and weight. Anything else is skipped, so a placeholder for the
/// unknown component can sit in the same list.
pub fn aggregate(components: &[AssessmentComponent]) -> Aggregate {
    let mut weighted_total = 0.0;
    let mut total_weight_counted = 0.0;

    for component in components {
        let Some(score) = component.raw_score.known_score() else {
            continue;
        };
        if !component.weight.is_finite() || !component.has_valid_maximum() {
            continue;
        }
        weighted_total += score * component.weight / component.maximum;
        total_weight_counted += component.weight;
    }

    Aggregate {
        weighted_total,
        total_weight_counted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::component::Mark;

    fn year_two(kcq: f64, case_study: f64, osa: Option<f64>) -> Vec<AssessmentComponent> {
        vec![
            AssessmentComponent::new("kcq", kcq, 10.0, 10.0),
            AssessmentComponent::new("case-study", case_study, 30.0, 30.0),
            AssessmentComponent::new("osa", osa, 100.0, 60.0),
        ]
    }

    #[test]
    fn test_complete_list() {
        let result = aggregate(&year_two(7.0, 22.0, Some(52.0)));
        assert!((result.weighted_total - 60.2).abs() < 1e-9);
        assert_eq!(result.total_weight_counted, 100.0);
    }

    #[test]
    fn test_skips_unknown_component() {
        let result = aggregate(&year_two(7.0, 22.0, None));
        assert!((result.weighted_total - 29.0).abs() < 1e-9);
        assert_eq!(result.total_weight_counted, 40.0);
    }

    #[test]
    fn test_skips_invalid_fields() {
        let components = vec![
            AssessmentComponent::new("kcq", Mark::Invalid("seven".to_string()), 10.0, 10.0),
            AssessmentComponent::new("case-study", 22.0, 0.0, 30.0),
            AssessmentComponent::new("extra", 5.0, 10.0, f64::NAN),
            AssessmentComponent::new("osa", 50.0, 100.0, 60.0),
        ];
        let result = aggregate(&components);
        assert!((result.weighted_total - 30.0).abs() < 1e-9);
        assert_eq!(result.total_weight_counted, 60.0);
    }

    #[test]
    fn test_empty_list() {
        let result = aggregate(&[]);
        assert_eq!(result.weighted_total, 0.0);
        assert_eq!(result.total_weight_counted, 0.0);
    }

    #[test]
    fn test_linear_in_scores() {
        let base = aggregate(&year_two(4.0, 10.0, Some(30.0)));
        let doubled = aggregate(&year_two(8.0, 20.0, Some(60.0)));
        assert!((doubled.weighted_total - 2.0 * base.weighted_total).abs() < 1e-9);

        let halved = aggregate(&year_two(2.0, 5.0, Some(15.0)));
        assert!((halved.weighted_total - 0.5 * base.weighted_total).abs() < 1e-9);
    }
}
