//! The file staged for submission

use crate::error::{Result, ResumeLensError};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// A named binary blob picked or dropped by the user.
///
/// Construction does not validate; acceptance happens when the session
/// selects it.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResumeLensError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        let bytes = fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Type implied by the name, if it is one we accept.
    pub fn file_type(&self) -> Option<FileType> {
        FileType::from_file_name(&self.name)
    }

    /// Warn when the content does not look like the extension claims.
    pub(crate) fn check_content(&self, expected: FileType) {
        match FileType::sniff(&self.bytes) {
            Some(found) if found == expected => {}
            Some(found) => warn!(
                "{} is named as .{} but looks like .{}",
                self.name,
                expected.extension(),
                found.extension()
            ),
            None => warn!(
                "{} does not carry a recognizable .{} signature",
                self.name,
                expected.extension()
            ),
        }
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
