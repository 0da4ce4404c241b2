//! Plan schema and review state
//!
//! These are the types exchanged with the external collaborators: the plan
//! the generation collaborator must produce, and the verdict the review
//! collaborator returns. Component data is deliberately loose where the
//! collaborator is unreliable — chart values accept raw strings and are
//! sanitized at render time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::template::LayoutKind;

/// The full externally-generated plan: one entry per slide to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPlan {
    pub slides: Vec<SlidePlan>,
}

/// Content for one slide, prior to rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidePlan {
    /// Index into the template guide's layouts
    pub layout_index: usize,
    pub kind: LayoutKind,
    /// Slot fills, matched against canonical slot names by the resolver
    #[serde(default)]
    pub common_fields: BTreeMap<String, String>,
    /// Free-form components for dynamic layouts
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

/// One visual component targeting an anchor region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentSpec {
    Text {
        position: String,
        content: String,
    },
    Table {
        position: String,
        rows: Vec<Vec<String>>,
        #[serde(default)]
        style: Option<String>,
        #[serde(default)]
        font_size: Option<f64>,
    },
    Chart {
        position: String,
        #[serde(default = "default_chart_type")]
        chart_type: String,
        labels: Vec<String>,
        series: Vec<SeriesSpec>,
        #[serde(default)]
        title: Option<String>,
    },
}

fn default_chart_type() -> String {
    "bar".to_string()
}

impl ComponentSpec {
    /// The anchor name this component targets
    pub fn position(&self) -> &str {
        match self {
            ComponentSpec::Text { position, .. } => position,
            ComponentSpec::Table { position, .. } => position,
            ComponentSpec::Chart { position, .. } => position,
        }
    }
}

/// One chart series as the collaborator supplies it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub values: Vec<RawNumber>,
}

/// A numeric value that may arrive as a string ("1,000", "10%", ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

/// Outcome of the review step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    /// No review has happened yet
    Draft,
    Pass,
    Fail,
    /// Terminal outcome reached purely by retry-budget exhaustion
    ForcedPass,
}

/// Review bookkeeping carried across the plan/review loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub status: ReviewStatus,
    pub feedback: String,
    /// Number of failed reviews so far; monotonically increasing
    pub retry_count: u32,
}

impl ReviewState {
    pub fn new() -> Self {
        Self {
            status: ReviewStatus::Draft,
            feedback: String::new(),
            retry_count: 0,
        }
    }
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Input to the plan-generation collaborator
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    /// Guide details text: layouts, slots, anchors, authoring rules
    pub guide: &'a str,
    /// The original user instruction
    pub instruction: &'a str,
    /// Reviewer feedback, present only on retries
    pub feedback: Option<&'a str>,
    /// The rejected plan, present only on retries
    pub prior_plan: Option<&'a DeckPlan>,
}

/// Input to the review collaborator
#[derive(Debug, Clone)]
pub struct ReviewRequest<'a> {
    /// The rules text the plan was written against
    pub rules: &'a str,
    pub plan: &'a DeckPlan,
}

/// The review collaborator's answer; feedback is opaque advisory text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_spec_tagged_decode() {
        let json = r#"[
            {"type": "text", "position": "Guide_Right", "content": "Summary"},
            {"type": "table", "position": "Guide_Left",
             "rows": [["A", "B"], ["1", "2"]], "style": "dark"},
            {"type": "chart", "position": "Guide_Main",
             "labels": ["Q1", "Q2"],
             "series": [{"name": "Revenue", "values": [10, "1,000"]}]}
        ]"#;
        let specs: Vec<ComponentSpec> = serde_json::from_str(json).expect("Should decode");
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].position(), "Guide_Right");
        match &specs[2] {
            ComponentSpec::Chart {
                chart_type, series, ..
            } => {
                // chart_type omitted -> default
                assert_eq!(chart_type, "bar");
                assert_eq!(
                    series[0].values,
                    vec![
                        RawNumber::Number(10.0),
                        RawNumber::Text("1,000".to_string())
                    ]
                );
            }
            other => panic!("Expected Chart, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_component_type_is_rejected() {
        let json = r#"{"type": "video", "position": "Guide_Main"}"#;
        let result: Result<ComponentSpec, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_slide_plan_defaults() {
        let json = r#"{"layout_index": 0, "kind": "static"}"#;
        let plan: SlidePlan = serde_json::from_str(json).expect("Should decode");
        assert!(plan.common_fields.is_empty());
        assert!(plan.components.is_empty());
    }

    #[test]
    fn test_review_state_starts_draft() {
        let state = ReviewState::new();
        assert_eq!(state.status, ReviewStatus::Draft);
        assert_eq!(state.retry_count, 0);
        assert!(state.feedback.is_empty());
    }
}
