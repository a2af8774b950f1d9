use serde::Serialize;
use tracing::{debug, warn};

use super::aggregate::aggregate;
use super::classification::{classify_grade, Classification};
use super::component::{find, AssessmentComponent, Mark};
use super::gate::{final_gate, formative_gate, ComponentRoles, FinalGate, SubMinimumCheck};
use super::policy::{Policy, Thresholds};
use super::solver::{solve_required, RequiredScore};

/// Forward-mode result for a complete set of marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub classification: Classification,
    /// Weighted grade truncated to a whole number.
    pub final_grade: i64,
    pub weighted_total: f64,
    pub meets_formative_sub_minimum: bool,
    pub meets_final_sub_minimum: bool,
    pub formative: SubMinimumCheck,
    pub final_gate: FinalGate,
}

/// Required mark on the outstanding component for one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub target: Classification,
    pub target_grade: f64,
    pub required: RequiredScore,
}

/// Inverse-mode result: what the final component still has to deliver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub unknown_component: String,
    pub current_weighted_score: f64,
    pub meets_formative_sub_minimum: bool,
    pub formative: SubMinimumCheck,
    /// Already settled outcome, if a gate has failed regardless of the final mark.
    pub outcome_floor: Option<Classification>,
    pub scenarios: Vec<Scenario>,
}

impl Projection {
    pub fn scenario(&self, target: Classification) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.target == target)
    }

    pub fn can_achieve(&self, target: Classification) -> bool {
        self.outcome_floor.is_none()
            && self
                .scenario(target)
                .map(|s| s.required.achievable)
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModuleResult {
    Final(CalculationResult),
    Projected(Projection),
}

/// Classify a complete component list.
///
/// The final gate only counts as met once its component is present and
/// scored; a pending or missing final component yields `ConditionNotMet`.
pub fn classify(
    components: &[AssessmentComponent],
    thresholds: &Thresholds,
    roles: &ComponentRoles,
) -> CalculationResult {
    let totals = aggregate(components);
    let formative = formative_gate(components, roles, thresholds.formative_sub_minimum);
    let final_check = final_gate(components, roles, thresholds.final_sub_minimum);

    let meets_final = final_check.is_met();
    let classification = classify_grade(totals.weighted_total, formative.met, meets_final, thresholds);

    debug!(
        weighted_total = totals.weighted_total,
        weight_counted = totals.total_weight_counted,
        formative_pct = formative.percentage,
        formative_met = formative.met,
        final_met = meets_final,
        %classification,
        "classified components"
    );

    CalculationResult {
        classification,
        final_grade: totals.weighted_total.floor() as i64,
        weighted_total: totals.weighted_total,
        meets_formative_sub_minimum: formative.met,
        meets_final_sub_minimum: meets_final,
        formative,
        final_gate: final_check,
    }
}

/// Required mark on `unknown_id` for `target_grade` under a policy.
///
/// The policy's final sub-minimum floors the answer only when the unknown
/// is the policy's final component.
pub fn required_for(
    components: &[AssessmentComponent],
    policy: &Policy,
    unknown_id: &str,
    target_grade: f64,
) -> Option<RequiredScore> {
    let roles = policy.roles();
    let floor = if unknown_id == roles.final_component {
        policy.thresholds.final_sub_minimum
    } else {
        0.0
    };
    solve_required(components, unknown_id, target_grade, floor)
}

/// Evaluate a module under a policy.
///
/// With the final mark entered (even an unparsable one) this is forward
/// classification. With it left empty, each band is solved for instead.
pub fn evaluate(components: &[AssessmentComponent], policy: &Policy) -> ModuleResult {
    let roles = policy.roles();
    warn_on_unusual_input(components, policy);

    let final_empty = find(components, &roles.final_component)
        .map(|c| c.raw_score.is_empty())
        .unwrap_or(false);
    if !final_empty {
        return ModuleResult::Final(classify(components, &policy.thresholds, &roles));
    }

    let thresholds = &policy.thresholds;
    let formative = formative_gate(components, &roles, thresholds.formative_sub_minimum);
    let current = aggregate(components).weighted_total;

    let targets = [
        (Classification::Pass, thresholds.pass),
        (Classification::CondonedDistinction, thresholds.condoned_min),
        (Classification::Distinction, thresholds.distinction),
    ];
    let scenarios: Vec<Scenario> = targets
        .iter()
        .filter_map(|&(target, target_grade)| {
            let required = solve_required(
                components,
                &roles.final_component,
                target_grade,
                thresholds.final_sub_minimum,
            )?;
            debug!(
                band = %target,
                target_grade,
                percentage = required.percentage,
                raw_score = required.raw_score,
                achievable = required.achievable,
                "solved required mark"
            );
            Some(Scenario {
                target,
                target_grade,
                required,
            })
        })
        .collect();

    if scenarios.is_empty() {
        warn!(
            component = %roles.final_component,
            "final component has no usable maximum; nothing to solve"
        );
    }

    ModuleResult::Projected(Projection {
        unknown_component: roles.final_component,
        current_weighted_score: current,
        meets_formative_sub_minimum: formative.met,
        formative,
        outcome_floor: (!formative.met).then_some(Classification::ConditionNotMet),
        scenarios,
    })
}

fn warn_on_unusual_input(components: &[AssessmentComponent], policy: &Policy) {
    for component in components {
        match &component.raw_score {
            Mark::Invalid(text) => {
                warn!(component = %component.id, value = %text, "invalid mark counted as zero");
            }
            Mark::Value(v) if *v < 0.0 || *v > component.maximum => {
                warn!(
                    component = %component.id,
                    value = *v,
                    maximum = component.maximum,
                    "mark outside 0 and the maximum"
                );
            }
            _ => {}
        }
    }

    let total_weight = policy.total_weight();
    if (total_weight - 100.0).abs() > 0.01 {
        warn!(
            policy = %policy.id,
            total_weight,
            "assessment weights do not add up to 100"
        );
    }
}
