//! Core types for Planforge.
//!
//! Two families live here:
//! - chat messages in the `{role, content}` shape every vendor accepts
//! - the project analysis a model returns, and the plan built from it
//!
//! Model output is free-form, so the analysis types deserialize leniently:
//! missing lists become empty, numbers may arrive as strings, and enum labels
//! are matched loosely instead of failing the whole parse.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// A chat message, tagged by its `role`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "assistant")]
    Assistant { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
        }
    }

    /// The role string as sent on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
        }
    }

    /// The text content.
    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// Project classification
// ─────────────────────────────────────────────

/// Kind of project the model classified the description as.
///
/// Selects which phase templates build the plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "serde_json::Value")]
pub enum ProjectType {
    #[default]
    WebApp,
    Game,
    Tool,
}

impl ProjectType {
    /// Loose label matching. Unknown labels fall back to `WebApp`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "game" | "games" | "游戏" => ProjectType::Game,
            "tool" | "tools" | "tool_app" | "utility" | "工具应用" | "工具" => ProjectType::Tool,
            _ if lower.contains("game") => ProjectType::Game,
            _ if lower.contains("tool") => ProjectType::Tool,
            _ => ProjectType::WebApp,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::WebApp => "Web application",
            ProjectType::Game => "Game",
            ProjectType::Tool => "Tool",
        }
    }
}

impl From<serde_json::Value> for ProjectType {
    fn from(value: serde_json::Value) -> Self {
        value
            .as_str()
            .map(ProjectType::from_label)
            .unwrap_or_default()
    }
}

/// Estimated project complexity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "serde_json::Value")]
pub enum Complexity {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Complexity {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "simple" | "低" => Complexity::Low,
            "medium" | "moderate" | "mid" | "中" => Complexity::Medium,
            "high" | "complex" | "高" => Complexity::High,
            _ => Complexity::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
            Complexity::Unknown => "unknown",
        }
    }
}

impl From<serde_json::Value> for Complexity {
    fn from(value: serde_json::Value) -> Self {
        value
            .as_str()
            .map(Complexity::from_label)
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────

/// Name used when the model returns no project name.
pub const UNTITLED_PROJECT: &str = "Untitled project";

/// The JSON analysis a model returns for a project description.
///
/// JSON keys are camelCase, matching the schema in the analysis prompt.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectAnalysis {
    pub project_type: ProjectType,
    #[serde(deserialize_with = "lenient::string")]
    pub project_name: String,
    pub complexity: Complexity,
    #[serde(deserialize_with = "lenient::hours")]
    pub estimated_hours: Option<f64>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub main_features: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub technical_challenges: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub recommended_tech: Vec<String>,
    #[serde(deserialize_with = "lenient::phases")]
    pub development_phases: Vec<DevelopmentPhase>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub risk_factors: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub success_criteria: Vec<String>,
}

impl ProjectAnalysis {
    /// Fill in defaults for fields the model left blank.
    pub fn normalized(mut self) -> Self {
        let name = self.project_name.trim();
        self.project_name = if name.is_empty() {
            UNTITLED_PROJECT.to_string()
        } else {
            name.to_string()
        };
        self
    }
}

/// One development phase suggested by the model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevelopmentPhase {
    #[serde(deserialize_with = "lenient::string")]
    pub phase: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tasks: Vec<String>,
    #[serde(deserialize_with = "lenient::hours")]
    pub estimated_hours: Option<f64>,
}

// ─────────────────────────────────────────────
// Plan
// ─────────────────────────────────────────────

/// Category of a plan step, in checklist order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Foundation,
    Feature,
    Enhancement,
    Testing,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Foundation => "foundation",
            StepKind::Feature => "feature",
            StepKind::Enhancement => "enhancement",
            StepKind::Testing => "testing",
        }
    }
}

/// One checklist entry with prompt text ready to paste into an assistant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub title: String,
    pub kind: StepKind,
    pub prompt: String,
}

/// A full plan: the analysis plus the generated steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub analysis: ProjectAnalysis,
    pub steps: Vec<PlanStep>,
    pub project_type: ProjectType,
}

// ─────────────────────────────────────────────
// Lenient deserializers
// ─────────────────────────────────────────────

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::DevelopmentPhase;

    fn value_to_text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Any scalar as a string; `null` becomes empty.
    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(value_to_text(Value::deserialize(de)?).unwrap_or_default())
    }

    /// An array of anything as strings. A lone string becomes a one-item list.
    pub fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        let items = match Value::deserialize(de)? {
            Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
            Value::Null => Vec::new(),
            other => value_to_text(other).into_iter().collect(),
        };
        Ok(items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// A number, or the first number inside a string such as `"40-60 hours"`.
    pub fn hours<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => first_number(&s),
            _ => None,
        })
    }

    /// Phases that are not objects are dropped instead of failing the analysis.
    pub fn phases<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<DevelopmentPhase>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub(super) fn first_number(s: &str) -> Option<f64> {
        let start = s.find(|c: char| c.is_ascii_digit())?;
        let rest = &s[start..];
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        rest[..end].trim_end_matches('.').parse().ok()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Messages ──

    #[test]
    fn test_user_message_serialization() {
        let json = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn test_message_deserialization() {
        let msg: Message =
            serde_json::from_value(json!({"role": "system", "content": "Be brief."})).unwrap();
        assert_eq!(msg, Message::system("Be brief."));
        assert_eq!(msg.role(), "system");
        assert_eq!(msg.content(), "Be brief.");
    }

    #[test]
    fn test_message_unknown_role_rejected() {
        let result: Result<Message, _> =
            serde_json::from_value(json!({"role": "tool", "content": "x"}));
        assert!(result.is_err());
    }

    // ── ProjectType / Complexity ──

    #[test]
    fn test_project_type_labels() {
        assert_eq!(ProjectType::from_label("game"), ProjectType::Game);
        assert_eq!(ProjectType::from_label("游戏"), ProjectType::Game);
        assert_eq!(ProjectType::from_label("Tool"), ProjectType::Tool);
        assert_eq!(ProjectType::from_label("工具应用"), ProjectType::Tool);
        assert_eq!(ProjectType::from_label("web_app"), ProjectType::WebApp);
        assert_eq!(ProjectType::from_label("web应用"), ProjectType::WebApp);
        assert_eq!(ProjectType::from_label("mobile app"), ProjectType::WebApp);
        assert_eq!(ProjectType::from_label("browser game"), ProjectType::Game);
    }

    #[test]
    fn test_project_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ProjectType::WebApp).unwrap(),
            json!("web_app")
        );
        let back: ProjectType = serde_json::from_value(json!("web_app")).unwrap();
        assert_eq!(back, ProjectType::WebApp);
    }

    #[test]
    fn test_complexity_labels() {
        assert_eq!(Complexity::from_label("HIGH"), Complexity::High);
        assert_eq!(Complexity::from_label("中"), Complexity::Medium);
        assert_eq!(Complexity::from_label("低"), Complexity::Low);
        assert_eq!(Complexity::from_label("extreme"), Complexity::Unknown);
        let c: Complexity = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(c, Complexity::Unknown);
    }

    // ── ProjectAnalysis ──

    #[test]
    fn test_analysis_full_document() {
        let analysis: ProjectAnalysis = serde_json::from_value(json!({
            "projectType": "game",
            "projectName": "Keyboard Piano",
            "complexity": "medium",
            "estimatedHours": "40",
            "mainFeatures": ["Play notes", "Record"],
            "technicalChallenges": ["Audio latency"],
            "recommendedTech": ["Web Audio API"],
            "developmentPhases": [{
                "phase": "Setup",
                "description": "Scaffold",
                "tasks": ["init repo"],
                "estimatedHours": 4
            }],
            "riskFactors": ["Mobile audio"],
            "recommendations": ["Start small"],
            "successCriteria": ["Latency under 50ms"]
        }))
        .unwrap();

        assert_eq!(analysis.project_type, ProjectType::Game);
        assert_eq!(analysis.project_name, "Keyboard Piano");
        assert_eq!(analysis.complexity, Complexity::Medium);
        assert_eq!(analysis.estimated_hours, Some(40.0));
        assert_eq!(analysis.main_features, vec!["Play notes", "Record"]);
        assert_eq!(analysis.development_phases.len(), 1);
        assert_eq!(analysis.development_phases[0].estimated_hours, Some(4.0));
        assert_eq!(analysis.success_criteria, vec!["Latency under 50ms"]);
    }

    #[test]
    fn test_analysis_missing_fields_default() {
        let analysis: ProjectAnalysis = serde_json::from_value(json!({})).unwrap();
        assert_eq!(analysis.project_type, ProjectType::WebApp);
        assert_eq!(analysis.complexity, Complexity::Unknown);
        assert!(analysis.main_features.is_empty());
        assert!(analysis.development_phases.is_empty());
        assert_eq!(analysis.estimated_hours, None);
    }

    #[test]
    fn test_analysis_tolerates_odd_shapes() {
        let analysis: ProjectAnalysis = serde_json::from_value(json!({
            "projectName": null,
            "projectType": null,
            "estimatedHours": "about 120-160 hours",
            "mainFeatures": "Single feature",
            "riskFactors": null,
            "recommendations": ["ok", "", 42],
            "developmentPhases": ["not an object", {"phase": "Build"}]
        }))
        .unwrap();

        assert_eq!(analysis.project_name, "");
        assert_eq!(analysis.project_type, ProjectType::WebApp);
        assert_eq!(analysis.estimated_hours, Some(120.0));
        assert_eq!(analysis.main_features, vec!["Single feature"]);
        assert!(analysis.risk_factors.is_empty());
        assert_eq!(analysis.recommendations, vec!["ok", "42"]);
        assert_eq!(analysis.development_phases.len(), 1);
        assert_eq!(analysis.development_phases[0].phase, "Build");
    }

    #[test]
    fn test_normalized_fills_blank_name() {
        let analysis = ProjectAnalysis {
            project_name: "   ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(analysis.project_name, UNTITLED_PROJECT);

        let named = ProjectAnalysis {
            project_name: "  Piano ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(named.project_name, "Piano");
    }

    #[test]
    fn test_first_number() {
        assert_eq!(lenient::first_number("12.5h"), Some(12.5));
        assert_eq!(lenient::first_number("~ 30 to 40"), Some(30.0));
        assert_eq!(lenient::first_number("unknown"), None);
        assert_eq!(lenient::first_number("7."), Some(7.0));
    }

    // ── Plan ──

    #[test]
    fn test_plan_serialization_shape() {
        let plan = Plan {
            analysis: ProjectAnalysis::default().normalized(),
            steps: vec![PlanStep {
                id: "setup".to_string(),
                title: "Project foundation".to_string(),
                kind: StepKind::Foundation,
                prompt: "Create the project".to_string(),
            }],
            project_type: ProjectType::Tool,
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["projectType"], "tool");
        assert_eq!(json["steps"][0]["kind"], "foundation");
        assert_eq!(json["analysis"]["projectName"], UNTITLED_PROJECT);

        let back: Plan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }
}
