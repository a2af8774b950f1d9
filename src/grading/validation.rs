use std::collections::HashSet;

use super::policy::{AssessmentKind, Policy};

/// Validate a policy at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_policy(policy: &Policy) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let prefix = if policy.id.trim().is_empty() {
        errors.push("policy.id: must not be empty".to_string());
        "policy".to_string()
    } else {
        format!("policies.{}", policy.id)
    };

    if policy.assessments.is_empty() {
        errors.push(format!("{}.assessments: at least one assessment is required", prefix));
    }

    let mut seen = HashSet::new();
    for (i, assessment) in policy.assessments.iter().enumerate() {
        if assessment.id.trim().is_empty() {
            errors.push(format!("{}.assessments[{}].id: must not be empty", prefix, i));
        } else if !seen.insert(assessment.id.as_str()) {
            errors.push(format!(
                "{}.assessments[{}].id: duplicate id '{}'",
                prefix, i, assessment.id
            ));
        }
        if !(assessment.out_of.is_finite() && assessment.out_of > 0.0) {
            errors.push(format!(
                "{}.assessments[{}].out_of: must be positive, got {}",
                prefix, i, assessment.out_of
            ));
        }
        if !(assessment.weight.is_finite() && assessment.weight >= 0.0) {
            errors.push(format!(
                "{}.assessments[{}].weight: must be non-negative, got {}",
                prefix, i, assessment.weight
            ));
        }
    }

    let summative = policy
        .assessments
        .iter()
        .filter(|a| a.kind == AssessmentKind::Summative)
        .count();
    if summative != 1 {
        errors.push(format!(
            "{}.assessments: exactly one summative assessment is required, found {}",
            prefix, summative
        ));
    }
    if !policy.assessments.is_empty()
        && !policy
            .assessments
            .iter()
            .any(|a| a.kind == AssessmentKind::Formative)
    {
        errors.push(format!(
            "{}.assessments: at least one formative assessment is required",
            prefix
        ));
    }

    let total = policy.total_weight();
    if (total - 100.0).abs() > 0.01 {
        errors.push(format!(
            "{}.assessments: weights must add up to 100, got {}",
            prefix, total
        ));
    }

    let t = &policy.thresholds;
    let named = [
        ("pass", t.pass),
        ("distinction", t.distinction),
        ("condoned_min", t.condoned_min),
        ("formative_sub_minimum", t.formative_sub_minimum),
        ("final_sub_minimum", t.final_sub_minimum),
    ];
    for (name, value) in named {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!(
                "{}.thresholds.{}: must be between 0 and 100, got {}",
                prefix, name, value
            ));
        }
    }
    if !(t.pass <= t.condoned_min && t.condoned_min <= t.distinction) {
        errors.push(format!(
            "{}.thresholds: expected pass <= condoned_min <= distinction, got {} / {} / {}",
            prefix, t.pass, t.condoned_min, t.distinction
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a set of policies, also rejecting duplicate policy ids.
pub fn validate_policies(policies: &[Policy]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for policy in policies {
        if !seen.insert(policy.id.to_ascii_uppercase()) {
            errors.push(format!("policies: duplicate policy id '{}'", policy.id));
        }
        if let Err(mut policy_errors) = validate_policy(policy) {
            errors.append(&mut policy_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
