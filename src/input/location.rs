//! Optional preferred-location hint

use std::fmt;

/// A non-empty, trimmed location. Blank input never becomes a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationHint(String);

impl LocationHint {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
