//! Multipart payload for the analysis endpoint

use crate::error::SubmissionError;
use crate::input::{CandidateFile, FileType, LocationHint};
use reqwest::multipart::{Form, Part};

pub const FILE_FIELD: &str = "file";
pub const LOCATION_FIELD: &str = "location";

/// Everything one submission sends. Built by the session when it enters
/// the pending state, so later edits to the session do not leak into an
/// in-flight request.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub file: CandidateFile,
    pub file_type: FileType,
    pub location: Option<LocationHint>,
}

impl AnalyzeRequest {
    pub fn to_form(&self) -> Result<Form, SubmissionError> {
        let part = Part::bytes(self.file.bytes().to_vec())
            .file_name(self.file.name().to_string())
            .mime_str(self.file_type.mime_type())
            .map_err(|e| SubmissionError::Request(format!("Failed to create multipart: {}", e)))?;

        let mut form = Form::new().part(FILE_FIELD, part);
        if let Some(location) = &self.location {
            form = form.text(LOCATION_FIELD, location.as_str().to_string());
        }

        Ok(form)
    }
}
