use serde::{Deserialize, Serialize};

use crate::grading::{builtin_policies, Policy, DEFAULT_POLICY_ID};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Policy used when `--policy` is not given
    #[serde(default)]
    pub default_policy: Option<String>,

    /// Extra policies; an entry with a built-in id replaces that built-in
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl Config {
    /// Built-in policies merged with the configured ones.
    pub fn policies(&self) -> Vec<Policy> {
        let mut merged = builtin_policies();
        for policy in &self.policies {
            match merged
                .iter_mut()
                .find(|p| p.id.eq_ignore_ascii_case(&policy.id))
            {
                Some(existing) => *existing = policy.clone(),
                None => merged.push(policy.clone()),
            }
        }
        merged
    }

    pub fn default_policy_id(&self) -> &str {
        self.default_policy.as_deref().unwrap_or(DEFAULT_POLICY_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::find_policy;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.default_policy.is_none());
        assert!(config.policies.is_empty());
        assert_eq!(config.default_policy_id(), "UG_YEAR_2_DEFAULT");
        assert_eq!(config.policies().len(), 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }

    #[test]
    fn test_configured_policy_overrides_builtin() {
        let yaml = r#"
default_policy: UG_YEAR_3_DEFAULT
policies:
  - id: UG_YEAR_3_DEFAULT
    display_name: Undergraduate Year 3 (2025)
    academic_level: UG_YEAR_3
    version: "2025-01"
    assessments:
      - { id: kcq, label: Knowledge Check Quiz, weight: 20, out_of: 20, kind: formative }
      - { id: case-study, label: Case Study, weight: 30, out_of: 30, kind: formative }
      - { id: osa, label: Online Summative Assessment, weight: 50, out_of: 100, kind: summative }
    thresholds:
      final_sub_minimum: 45
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.default_policy_id(), "UG_YEAR_3_DEFAULT");

        let policies = config.policies();
        assert_eq!(policies.len(), 3);
        let year3 = find_policy(&policies, "UG_YEAR_3_DEFAULT").unwrap();
        assert_eq!(year3.version, "2025-01");
        assert_eq!(year3.thresholds.final_sub_minimum, 45.0);
    }

    #[test]
    fn test_configured_policy_is_added() {
        let yaml = r#"
policies:
  - id: PG_DEFAULT
    display_name: Postgraduate Course
    academic_level: POSTGRAD_COURSE
    version: "2024-01"
    assessments:
      - { id: assignment, label: Assignment, weight: 40, out_of: 100, kind: formative }
      - { id: exam, label: Exam, weight: 60, out_of: 100, kind: summative }
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let policies = config.policies();
        assert_eq!(policies.len(), 4);
        assert!(find_policy(&policies, "PG_DEFAULT").is_some());
    }
}
