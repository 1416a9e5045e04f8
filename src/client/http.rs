//! HTTP analysis client

use crate::client::endpoint::Endpoint;
use crate::client::request::AnalyzeRequest;
use crate::client::response::{AnalysisResult, AnalyzeResponse, ErrorBody};
use crate::client::service::AnalysisService;
use crate::error::{Result, ResumeLensError, SubmissionError};
use log::{debug, error, info};
use reqwest::StatusCode;
use std::time::Duration;

pub struct HttpAnalysisClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ResumeLensError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl AnalysisService for HttpAnalysisClient {
    async fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> std::result::Result<AnalysisResult, SubmissionError> {
        let url = self.endpoint.analyze_url();
        let form = request.to_form()?;

        info!(
            "Calling analysis service: {} ({}, {} bytes)",
            url,
            request.file.name(),
            request.file.len()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.bytes().await.map_err(classify_transport_error)?;

        if status.is_success() {
            let parsed: AnalyzeResponse = serde_json::from_slice(&body).map_err(|e| {
                SubmissionError::Request(format!("Unexpected response from server: {}", e))
            })?;
            parsed.into_result()
        } else {
            let error = status_error(status, &body);
            error!("Analysis service error response: {}", error);
            Err(error)
        }
    }
}

/// Map a reqwest failure onto the submission taxonomy.
fn classify_transport_error(err: reqwest::Error) -> SubmissionError {
    if err.is_builder() {
        SubmissionError::Request(err.to_string())
    } else if err.is_timeout() || err.is_connect() || err.is_request() {
        debug!("No response from analysis service: {}", err);
        SubmissionError::NoResponse
    } else {
        SubmissionError::Request(err.to_string())
    }
}

/// Server text from an `{"error": ...}` body, else the status reason phrase.
pub(crate) fn status_error(status: StatusCode, body: &[u8]) -> SubmissionError {
    let server_text = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty());

    let message = server_text.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });

    SubmissionError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_server_text() {
        let err = status_error(StatusCode::BAD_REQUEST, br#"{"error": "Unsupported file"}"#);
        assert_eq!(
            err,
            SubmissionError::Status {
                status: 400,
                message: "Unsupported file".to_string()
            }
        );
        assert_eq!(err.to_string(), "Error analyzing resume. Unsupported file");
    }

    #[test]
    fn test_status_error_falls_back_to_reason_phrase() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Error analyzing resume. Internal Server Error");

        let err = status_error(StatusCode::BAD_GATEWAY, br#"{"detail": "upstream"}"#);
        assert_eq!(err.to_string(), "Error analyzing resume. Bad Gateway");
    }

    #[test]
    fn test_status_error_without_reason_phrase() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = status_error(status, b"");
        assert_eq!(err.to_string(), "Error analyzing resume. HTTP 599");
    }
}
