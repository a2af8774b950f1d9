use serde::{Deserialize, Serialize};

use super::component::{find, AssessmentComponent};

/// Which component ids play the formative and final roles in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRoles {
    pub formative: Vec<String>,
    pub final_component: String,
}

impl ComponentRoles {
    pub fn new<I, S>(formative: I, final_component: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formative: formative.into_iter().map(Into::into).collect(),
            final_component: final_component.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubMinimumCheck {
    pub percentage: f64,
    pub threshold: f64,
    pub met: bool,
}

impl SubMinimumCheck {
    fn evaluate(percentage: f64, threshold: f64) -> Self {
        Self {
            percentage,
            threshold,
            met: percentage >= threshold,
        }
    }

    fn not_met(threshold: f64) -> Self {
        Self {
            percentage: 0.0,
            threshold,
            met: false,
        }
    }
}

/// State of the final-component gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FinalGate {
    Checked(SubMinimumCheck),
    /// Score not entered yet; the solver carries the floor instead.
    Pending,
    /// No component with the final id in the list.
    Missing,
}

impl FinalGate {
    /// Only a checked, passing gate counts as met.
    pub fn is_met(&self) -> bool {
        matches!(self, FinalGate::Checked(check) if check.met)
    }
}

/// Combined `sum(score) / sum(maximum)` over the formative ids.
///
/// Any designated id missing from the list fails the gate. Empty or invalid
/// scores count as zero, as do unusable maximums.
pub fn formative_gate(
    components: &[AssessmentComponent],
    roles: &ComponentRoles,
    threshold: f64,
) -> SubMinimumCheck {
    if roles.formative.is_empty() {
        return SubMinimumCheck::not_met(threshold);
    }

    let mut score = 0.0;
    let mut total = 0.0;
    for id in &roles.formative {
        let Some(component) = find(components, id) else {
            return SubMinimumCheck::not_met(threshold);
        };
        score += component.raw_score.score_or_zero();
        if component.maximum.is_finite() {
            total += component.maximum;
        }
    }

    let percentage = if total > 0.0 { score / total * 100.0 } else { 0.0 };
    SubMinimumCheck::evaluate(percentage, threshold)
}

pub fn final_gate(
    components: &[AssessmentComponent],
    roles: &ComponentRoles,
    threshold: f64,
) -> FinalGate {
    let Some(component) = find(components, &roles.final_component) else {
        return FinalGate::Missing;
    };
    if component.raw_score.is_empty() {
        return FinalGate::Pending;
    }

    let percentage = component.percentage().unwrap_or(0.0);
    FinalGate::Checked(SubMinimumCheck::evaluate(percentage, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::component::Mark;

    fn roles() -> ComponentRoles {
        ComponentRoles::new(["kcq", "case-study"], "osa")
    }

    fn components(kcq: f64, case_study: f64, osa: impl Into<Mark>) -> Vec<AssessmentComponent> {
        vec![
            AssessmentComponent::new("kcq", kcq, 10.0, 10.0),
            AssessmentComponent::new("case-study", case_study, 30.0, 30.0),
            AssessmentComponent::new("osa", osa, 100.0, 60.0),
        ]
    }

    #[test]
    fn test_formative_met() {
        let check = formative_gate(&components(7.0, 22.0, 52.0), &roles(), 50.0);
        assert!((check.percentage - 72.5).abs() < 1e-9);
        assert!(check.met);
    }

    #[test]
    fn test_formative_exactly_at_threshold_is_met() {
        let check = formative_gate(&components(5.0, 15.0, 52.0), &roles(), 50.0);
        assert_eq!(check.percentage, 50.0);
        assert!(check.met);
    }

    #[test]
    fn test_formative_below_threshold() {
        let check = formative_gate(&components(2.0, 5.0, 90.0), &roles(), 50.0);
        assert!((check.percentage - 17.5).abs() < 1e-9);
        assert!(!check.met);
    }

    #[test]
    fn test_formative_missing_component_not_met() {
        let list = vec![
            AssessmentComponent::new("kcq", 10.0, 10.0, 10.0),
            AssessmentComponent::new("osa", 80.0, 100.0, 60.0),
        ];
        let check = formative_gate(&list, &roles(), 50.0);
        assert!(!check.met);
    }

    #[test]
    fn test_formative_no_designated_ids_not_met() {
        let roles = ComponentRoles::new(Vec::<String>::new(), "osa");
        assert!(!formative_gate(&components(10.0, 30.0, 80.0), &roles, 50.0).met);
    }

    #[test]
    fn test_formative_invalid_score_counts_as_zero() {
        let list = vec![
            AssessmentComponent::new("kcq", Mark::Invalid("ten".to_string()), 10.0, 10.0),
            AssessmentComponent::new("case-study", 20.0, 30.0, 30.0),
        ];
        let check = formative_gate(&list, &roles(), 50.0);
        assert_eq!(check.percentage, 50.0);
        assert!(check.met);
    }

    #[test]
    fn test_final_checked() {
        match final_gate(&components(7.0, 22.0, 52.0), &roles(), 30.0) {
            FinalGate::Checked(check) => {
                assert_eq!(check.percentage, 52.0);
                assert!(check.met);
            }
            other => panic!("expected checked gate, got {other:?}"),
        }
    }

    #[test]
    fn test_final_below_sub_minimum() {
        let gate = final_gate(&components(7.0, 22.0, 25.0), &roles(), 30.0);
        assert!(!gate.is_met());
        assert!(matches!(gate, FinalGate::Checked(_)));
    }

    #[test]
    fn test_final_pending_when_empty() {
        let gate = final_gate(&components(7.0, 22.0, Mark::Empty), &roles(), 30.0);
        assert_eq!(gate, FinalGate::Pending);
        assert!(!gate.is_met());
    }

    #[test]
    fn test_final_missing() {
        let list = vec![AssessmentComponent::new("kcq", 7.0, 10.0, 10.0)];
        assert_eq!(final_gate(&list, &roles(), 30.0), FinalGate::Missing);
    }

    #[test]
    fn test_final_invalid_score_not_met() {
        let gate = final_gate(
            &components(7.0, 22.0, Mark::Invalid("abc".to_string())),
            &roles(),
            30.0,
        );
        assert!(!gate.is_met());
    }

    #[test]
    fn test_final_year_three_floor() {
        let list = components(7.0, 22.0, 35.0);
        assert!(final_gate(&list, &roles(), 30.0).is_met());
        assert!(!final_gate(&list, &roles(), 40.0).is_met());
    }
}
