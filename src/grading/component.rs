use serde::{Deserialize, Serialize};

/// A caller-supplied score for one assessment.
///
/// `Empty` is significant: it marks the component the solver works out.
/// `Invalid` keeps the offending text so it can be reported, but counts as
/// zero wherever a number is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Empty,
    Value(f64),
    Invalid(String),
}

impl Mark {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Mark::Empty;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Mark::Value(v),
            _ => Mark::Invalid(s.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Mark::Empty)
    }

    /// The numeric value, if there is one.
    pub fn known_score(&self) -> Option<f64> {
        match self {
            Mark::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value with the permissive policy: empty and invalid marks are 0.
    pub fn score_or_zero(&self) -> f64 {
        self.known_score().unwrap_or(0.0)
    }
}

impl From<f64> for Mark {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Mark::Value(value)
        } else {
            Mark::Invalid(value.to_string())
        }
    }
}

impl From<Option<f64>> for Mark {
    fn from(value: Option<f64>) -> Self {
        value.map(Mark::from).unwrap_or(Mark::Empty)
    }
}

/// One graded item: a mark out of `maximum`, contributing `weight` points
/// to the 0-100 module scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentComponent {
    pub id: String,
    pub raw_score: Mark,
    pub maximum: f64,
    pub weight: f64,
}

impl AssessmentComponent {
    pub fn new(id: impl Into<String>, raw_score: impl Into<Mark>, maximum: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            raw_score: raw_score.into(),
            maximum,
            weight,
        }
    }

    /// Build a component from form text. Unparsable maximum or weight become
    /// NaN, which the aggregator skips like any other invalid field.
    pub fn from_text(id: &str, score: &str, maximum: &str, weight: &str) -> Self {
        Self {
            id: id.to_string(),
            raw_score: Mark::parse(score),
            maximum: parse_number(maximum),
            weight: parse_number(weight),
        }
    }

    pub fn has_valid_maximum(&self) -> bool {
        self.maximum.is_finite() && self.maximum > 0.0
    }

    /// Percentage of the maximum achieved, for a known score on a valid maximum.
    pub fn percentage(&self) -> Option<f64> {
        let score = self.raw_score.known_score()?;
        if !self.has_valid_maximum() {
            return None;
        }
        Some(score / self.maximum * 100.0)
    }
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

pub(crate) fn find<'a>(components: &'a [AssessmentComponent], id: &str) -> Option<&'a AssessmentComponent> {
    components.iter().find(|c| c.id == id)
}
