//! Analysis endpoint resolution

use std::fmt;

pub const ANALYZE_PATH: &str = "/analyze";

/// Used when no base URL is configured, standing in for "same origin".
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    /// Prefer an explicit, non-blank base URL; otherwise fall back to the origin.
    pub fn resolve(base_url: Option<&str>, origin: &str) -> Self {
        let base = base_url
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(origin)
            .trim_end_matches('/')
            .to_string();

        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base, ANALYZE_PATH)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::resolve(None, DEFAULT_ORIGIN)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
