//! Error handling for the resume lens client

use thiserror::Error;

/// Lead-in shared by every failed submission message.
pub const SUBMISSION_ERROR_PREFIX: &str = "Error analyzing resume.";

/// Shown when the request went out but nothing came back (including timeouts).
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check that the analysis backend is running and reachable.";

/// Shown when a submission is abandoned before it settles.
pub const CANCELLED_MESSAGE: &str = "The submission was cancelled before a response arrived.";

#[derive(Error, Debug)]
pub enum ResumeLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeLensError>;

/// Local validation failures. They never touch the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a PDF or DOCX file")]
    UnsupportedFile,

    #[error("Please select a resume file")]
    NoFileSelected,
}

/// Failure of a single submission attempt.
///
/// Exactly one variant describes the outcome; `Display` always carries the
/// generic lead-in followed by the detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// 2xx response whose body carried an `error` field.
    #[error("{} {}", SUBMISSION_ERROR_PREFIX, .0)]
    Application(String),

    /// Server answered with a non-success status.
    #[error("{} {}", SUBMISSION_ERROR_PREFIX, .message)]
    Status { status: u16, message: String },

    /// Request was sent but no response arrived (connect failure, timeout).
    #[error("{} {}", SUBMISSION_ERROR_PREFIX, NO_RESPONSE_MESSAGE)]
    NoResponse,

    /// Request could not be built or sent, or the reply could not be read.
    #[error("{} {}", SUBMISSION_ERROR_PREFIX, .0)]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_fixed() {
        assert_eq!(
            ValidationError::UnsupportedFile.to_string(),
            "Please upload a PDF or DOCX file"
        );
        assert_eq!(
            ValidationError::NoFileSelected.to_string(),
            "Please select a resume file"
        );
    }

    #[test]
    fn test_submission_errors_carry_lead_in() {
        let errors = vec![
            SubmissionError::Application("bad file".to_string()),
            SubmissionError::Status { status: 500, message: "Internal Server Error".to_string() },
            SubmissionError::NoResponse,
            SubmissionError::Request("builder error".to_string()),
        ];

        for err in errors {
            assert!(err.to_string().starts_with("Error analyzing resume. "));
        }

        assert_eq!(
            SubmissionError::Application("bad file".to_string()).to_string(),
            "Error analyzing resume. bad file"
        );
        assert!(SubmissionError::NoResponse.to_string().contains("backend"));
    }
}
