//! Analysis response shapes and normalization

use crate::error::SubmissionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized analysis returned by the service.
///
/// Order of `skills` and `recommended_roles` is the server's; nothing is
/// deduplicated or sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub skills: Vec<String>,
    pub experience_level: String,
    pub recommended_roles: Vec<RoleRecommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub link: String,
}

/// Body of a 2xx reply, exactly as the service sends it.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub recommended_roles: Option<Vec<RoleRecommendation>>,
}

impl AnalyzeResponse {
    /// A truthy `error` field wins over any data next to it. Missing sections
    /// become empty.
    pub fn into_result(self) -> Result<AnalysisResult, SubmissionError> {
        if let Some(error) = self.error.filter(is_truthy) {
            let message = match error {
                Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(SubmissionError::Application(message));
        }

        Ok(AnalysisResult {
            skills: self.skills.unwrap_or_default(),
            experience_level: self.experience_level.unwrap_or_default(),
            recommended_roles: self.recommended_roles.unwrap_or_default(),
        })
    }
}

/// `null`, `false`, `0` and `""` do not signal a failure; anything else does.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Body of a non-2xx reply. Anything that is not `{"error": "..."}` is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
