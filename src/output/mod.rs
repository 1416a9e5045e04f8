//! Result rendering
//! Pure projection of an analysis result plus the formatters that print it

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportContext, ReportGenerator};
pub use report::{render, AnalysisView, RoleLink, SkillTag};
