use serde::{Deserialize, Serialize};
use std::fmt;

use super::policy::Thresholds;

/// Outcome band for a module.
///
/// `ConditionNotMet` is not a kind of `Fail`: it means a sub-minimum gate
/// failed, and the weighted grade may well be above the pass mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Fail,
    Pass,
    CondonedDistinction,
    Distinction,
    ConditionNotMet,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Fail => "Fail",
            Classification::Pass => "Pass",
            Classification::CondonedDistinction => "Condoned Distinction",
            Classification::Distinction => "Distinction",
            Classification::ConditionNotMet => "Requirements Not Met",
        }
    }

    /// Position on the threshold ladder. `None` for the gate outcome, which
    /// sits outside the ladder.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Classification::Fail => Some(0),
            Classification::Pass => Some(1),
            Classification::CondonedDistinction => Some(2),
            Classification::Distinction => Some(3),
            Classification::ConditionNotMet => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gates first, then the ladder on the truncated grade.
///
/// Truncation keeps 74.9 out of the distinction band.
pub fn classify_grade(
    final_grade: f64,
    meets_formative: bool,
    meets_final: bool,
    thresholds: &Thresholds,
) -> Classification {
    if !meets_formative || !meets_final {
        return Classification::ConditionNotMet;
    }

    let grade = final_grade.floor();
    match grade {
        g if g >= thresholds.distinction => Classification::Distinction,
        g if g >= thresholds.condoned_min => Classification::CondonedDistinction,
        g if g >= thresholds.pass => Classification::Pass,
        _ => Classification::Fail,
    }
}
