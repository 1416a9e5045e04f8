//! Display projection of an analysis result

use crate::client::{AnalysisResult, RoleRecommendation};
use crate::session::SubmissionState;
use serde::{Deserialize, Serialize};

/// What the result panel shows, derived from an `AnalysisResult` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisView {
    /// Rendered verbatim
    pub experience_level: String,

    /// One tag per skill, server order, duplicates kept
    pub skill_tags: Vec<SkillTag>,

    /// Server order
    pub roles: Vec<RoleLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTag {
    pub label: String,
}

/// Outbound link for a recommended role, with the reason shown beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLink {
    pub title: String,
    pub href: String,
    pub reason: String,

    /// Links always open in a new browsing context.
    pub opens_new_context: bool,
}

impl From<&RoleRecommendation> for RoleLink {
    fn from(role: &RoleRecommendation) -> Self {
        Self {
            title: role.title.clone(),
            href: role.link.clone(),
            reason: role.reason.clone(),
            opens_new_context: true,
        }
    }
}

impl From<&AnalysisResult> for AnalysisView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            experience_level: result.experience_level.clone(),
            skill_tags: result
                .skills
                .iter()
                .map(|s| SkillTag { label: s.clone() })
                .collect(),
            roles: result.recommended_roles.iter().map(RoleLink::from).collect(),
        }
    }
}

/// The result panel exists only when the session holds a result.
pub fn render(state: &SubmissionState) -> Option<AnalysisView> {
    state.result().map(AnalysisView::from)
}
