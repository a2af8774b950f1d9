use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::grading::{
    CalculationResult, Classification, FinalGate, ModuleResult, Policy, Projection, RequiredScore,
    SubMinimumCheck,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a percentage with at most one decimal, trimming a trailing ".0"
pub fn format_percentage(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{}%", trimmed)
}

fn paint_classification(classification: Classification, use_colors: bool) -> String {
    let label = classification.label();
    if !use_colors {
        return label.to_string();
    }
    match classification {
        Classification::Distinction => label.green().bold().to_string(),
        Classification::CondonedDistinction => label.cyan().bold().to_string(),
        Classification::Pass => label.green().to_string(),
        Classification::Fail => label.red().bold().to_string(),
        Classification::ConditionNotMet => label.yellow().bold().to_string(),
    }
}

fn gate_line(name: &str, check: &SubMinimumCheck, use_colors: bool) -> String {
    let status = if check.met { "met" } else { "not met" };
    let status = match (use_colors, check.met) {
        (false, _) => status.to_string(),
        (true, true) => status.green().to_string(),
        (true, false) => status.red().to_string(),
    };
    format!(
        "  {}: {} (needs {}) - {}",
        name,
        format_percentage(check.percentage),
        format_percentage(check.threshold),
        status
    )
}

fn final_gate_line(policy: &Policy, gate: &FinalGate, use_colors: bool) -> String {
    let name = final_label(policy);
    match gate {
        FinalGate::Checked(check) => gate_line(&format!("{} sub-minimum", name), check, use_colors),
        FinalGate::Pending => format!("  {} sub-minimum: pending", name),
        FinalGate::Missing => format!("  {} sub-minimum: not met (assessment missing)", name),
    }
}

fn final_label(policy: &Policy) -> String {
    policy
        .summative()
        .map(|a| a.label.clone())
        .unwrap_or_else(|| "Final".to_string())
}

fn final_out_of(policy: &Policy) -> f64 {
    policy.summative().map(|a| a.out_of).unwrap_or(100.0)
}

/// Multi-line report for a complete set of marks
pub fn format_final(result: &CalculationResult, policy: &Policy, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let grade = format!("{}%", result.final_grade);
    let grade = if use_colors {
        grade.bold().to_string()
    } else {
        grade
    };
    lines.push(format!(
        "{}  {}",
        grade,
        paint_classification(result.classification, use_colors)
    ));
    lines.push(format!("  Policy: {}", policy.display_name));
    lines.push(gate_line("Formative sub-minimum", &result.formative, use_colors));
    lines.push(final_gate_line(policy, &result.final_gate, use_colors));

    if result.classification == Classification::ConditionNotMet {
        lines.push(format!(
            "  A sub-minimum was not met; the weighted grade of {} does not count.",
            format_percentage(result.weighted_total)
        ));
    }

    lines.join("\n")
}

/// Describe one required mark, e.g. "77% (77 / 100)" or "not achievable (needs 125%)"
pub fn format_required(required: &RequiredScore, out_of: f64, use_colors: bool) -> String {
    if required.achievable {
        let text = format!("{}% ({} / {})", required.percentage, required.raw_score, out_of);
        if use_colors {
            text.bold().to_string()
        } else {
            text
        }
    } else {
        let text = format!("not achievable (needs {}%)", required.percentage);
        if use_colors {
            text.dimmed().to_string()
        } else {
            text
        }
    }
}

/// Multi-line report of what the final component still has to deliver
pub fn format_projection(projection: &Projection, policy: &Policy, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let name = final_label(policy);
    let out_of = final_out_of(policy);

    lines.push(format!(
        "Current weighted score: {}",
        format_percentage(projection.current_weighted_score)
    ));
    lines.push(format!("  Policy: {}", policy.display_name));
    lines.push(gate_line("Formative sub-minimum", &projection.formative, use_colors));

    if let Some(floor) = projection.outcome_floor {
        lines.push(format!(
            "  Outcome: {} regardless of the {} mark.",
            paint_classification(floor, use_colors),
            name
        ));
        return lines.join("\n");
    }

    if projection.scenarios.is_empty() {
        lines.push(format!("  Nothing to solve: {} has no usable maximum.", name));
        return lines.join("\n");
    }

    lines.push(format!("Required on {}:", name));
    for scenario in &projection.scenarios {
        lines.push(format!(
            "  {:<22}{}",
            format!("{}:", scenario.target.label()),
            format_required(&scenario.required, out_of, use_colors)
        ));
    }
    lines.join("\n")
}

pub fn format_result(result: &ModuleResult, policy: &Policy, use_colors: bool) -> String {
    match result {
        ModuleResult::Final(r) => format_final(r, policy, use_colors),
        ModuleResult::Projected(p) => format_projection(p, policy, use_colors),
    }
}

/// Tab-separated output for scripting (no headers, no colors)
///
/// Final: `final  CLASSIFICATION  grade  formative_met  final_met`
/// Projection: one `required  TARGET  percentage  raw  achievable` line per band
pub fn format_tsv(result: &ModuleResult) -> String {
    match result {
        ModuleResult::Final(r) => format!(
            "final\t{}\t{}\t{}\t{}",
            classification_key(r.classification),
            r.final_grade,
            r.meets_formative_sub_minimum,
            r.meets_final_sub_minimum
        ),
        ModuleResult::Projected(p) => p
            .scenarios
            .iter()
            .map(|s| {
                format!(
                    "required\t{}\t{}\t{}\t{}",
                    classification_key(s.target),
                    s.required.percentage,
                    s.required.raw_score,
                    s.required.achievable && p.outcome_floor.is_none()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn classification_key(classification: Classification) -> &'static str {
    match classification {
        Classification::Fail => "FAIL",
        Classification::Pass => "PASS",
        Classification::CondonedDistinction => "CONDONED_DISTINCTION",
        Classification::Distinction => "DISTINCTION",
        Classification::ConditionNotMet => "CONDITION_NOT_MET",
    }
}

/// One line per policy: id, name, assessments and final sub-minimum
pub fn format_policy_list(policies: &[Policy], default_id: &str, use_colors: bool) -> String {
    if policies.is_empty() {
        return "No policies configured.".to_string();
    }

    policies
        .iter()
        .map(|policy| {
            let marker = if policy.id.eq_ignore_ascii_case(default_id) {
                "*"
            } else {
                " "
            };
            let assessments = policy
                .assessments
                .iter()
                .map(|a| format!("{} {}/{}", a.id, a.weight, a.out_of))
                .collect::<Vec<_>>()
                .join(", ");
            let id = if use_colors {
                policy.id.cyan().to_string()
            } else {
                policy.id.clone()
            };
            format!(
                "{} {}  {}  [{}]  final sub-minimum {}",
                marker,
                id,
                policy.display_name,
                assessments,
                format_percentage(policy.thresholds.final_sub_minimum)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
