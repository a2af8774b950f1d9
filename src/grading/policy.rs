use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::component::{AssessmentComponent, Mark};
use super::gate::ComponentRoles;

/// Grade thresholds for one policy, all on the 0-100 scale.
///
/// Example YAML:
/// ```yaml
/// thresholds:
///   pass: 50
///   distinction: 75
///   condoned_min: 70
///   formative_sub_minimum: 50
///   final_sub_minimum: 40
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Thresholds {
    pub pass: f64,
    pub distinction: f64,
    /// Lower edge of the condoned-distinction band
    pub condoned_min: f64,
    /// Combined formative percentage needed
    pub formative_sub_minimum: f64,
    /// Percentage needed on the summative component
    pub final_sub_minimum: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pass: 50.0,
            distinction: 75.0,
            condoned_min: 70.0,
            formative_sub_minimum: 50.0,
            final_sub_minimum: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicLevel {
    #[serde(rename = "UG_YEAR_1")]
    UgYear1,
    #[serde(rename = "UG_YEAR_2")]
    UgYear2,
    #[serde(rename = "UG_YEAR_3")]
    UgYear3,
    AdvDip,
    PostgradCourse,
    ResearchOnly,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Formative,
    Summative,
}

/// One assessment a policy grades, with its weight on the module scale.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssessmentDefinition {
    pub id: String,
    pub label: String,
    pub weight: f64,
    pub out_of: f64,
    pub kind: AssessmentKind,
}

/// Named bundle of assessments and thresholds for a cohort.
///
/// Policies are plain data: every engine call receives the one it should
/// use, so several cohorts can be evaluated side by side.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub id: String,
    pub display_name: String,
    pub academic_level: AcademicLevel,
    pub version: String,
    pub assessments: Vec<AssessmentDefinition>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Policy {
    /// Formative ids in definition order, plus the first summative id.
    pub fn roles(&self) -> ComponentRoles {
        let formative = self
            .assessments
            .iter()
            .filter(|a| a.kind == AssessmentKind::Formative)
            .map(|a| a.id.clone())
            .collect();
        let final_component = self
            .summative()
            .map(|a| a.id.clone())
            .unwrap_or_default();
        ComponentRoles {
            formative,
            final_component,
        }
    }

    pub fn summative(&self) -> Option<&AssessmentDefinition> {
        self.assessments
            .iter()
            .find(|a| a.kind == AssessmentKind::Summative)
    }

    pub fn assessment(&self, id: &str) -> Option<&AssessmentDefinition> {
        self.assessments.iter().find(|a| a.id == id)
    }

    /// Build the component list for this policy from an `id -> text` map.
    /// Assessments without an entry are left empty.
    pub fn components(&self, scores: &HashMap<String, String>) -> Vec<AssessmentComponent> {
        self.assessments
            .iter()
            .map(|a| AssessmentComponent {
                id: a.id.clone(),
                raw_score: scores
                    .get(&a.id)
                    .map(|s| Mark::parse(s))
                    .unwrap_or(Mark::Empty),
                maximum: a.out_of,
                weight: a.weight,
            })
            .collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.assessments.iter().map(|a| a.weight).sum()
    }
}

fn definition(id: &str, label: &str, weight: f64, out_of: f64, kind: AssessmentKind) -> AssessmentDefinition {
    AssessmentDefinition {
        id: id.to_string(),
        label: label.to_string(),
        weight,
        out_of,
        kind,
    }
}

fn kcq_case_study_osa() -> Vec<AssessmentDefinition> {
    vec![
        definition("kcq", "Knowledge Check Quiz", 10.0, 10.0, AssessmentKind::Formative),
        definition("case-study", "Case Study", 30.0, 30.0, AssessmentKind::Formative),
        definition("osa", "Online Summative Assessment", 60.0, 100.0, AssessmentKind::Summative),
    ]
}

/// The policies that ship with the tool.
pub fn builtin_policies() -> Vec<Policy> {
    vec![
        Policy {
            id: "UG_YEAR_1_DEFAULT".to_string(),
            display_name: "Undergraduate Year 1".to_string(),
            academic_level: AcademicLevel::UgYear1,
            version: "2024-01".to_string(),
            assessments: vec![
                definition("fa1", "Formative Assessment 1", 20.0, 20.0, AssessmentKind::Formative),
                definition("fa2", "Formative Assessment 2", 20.0, 20.0, AssessmentKind::Formative),
                definition("osa", "Online Summative Assessment", 60.0, 100.0, AssessmentKind::Summative),
            ],
            thresholds: Thresholds::default(),
            notes: Some("Year 1 pattern with two formative assessments".to_string()),
        },
        Policy {
            id: "UG_YEAR_2_DEFAULT".to_string(),
            display_name: "Undergraduate Year 2".to_string(),
            academic_level: AcademicLevel::UgYear2,
            version: "2024-01".to_string(),
            assessments: kcq_case_study_osa(),
            thresholds: Thresholds::default(),
            notes: Some("Year 2 pattern with KCQ and Case Study".to_string()),
        },
        Policy {
            id: "UG_YEAR_3_DEFAULT".to_string(),
            display_name: "Undergraduate Year 3".to_string(),
            academic_level: AcademicLevel::UgYear3,
            version: "2024-01".to_string(),
            assessments: kcq_case_study_osa(),
            thresholds: Thresholds {
                final_sub_minimum: 40.0,
                ..Thresholds::default()
            },
            notes: Some("Year 3 pattern with higher OSA sub-minimum (40%)".to_string()),
        },
    ]
}

pub const DEFAULT_POLICY_ID: &str = "UG_YEAR_2_DEFAULT";

/// Case-insensitive lookup by policy id.
pub fn find_policy<'a>(policies: &'a [Policy], id: &str) -> Option<&'a Policy> {
    policies.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}
