//! Seam between the session and whatever performs the analysis

use crate::client::request::AnalyzeRequest;
use crate::client::response::AnalysisResult;
use crate::error::SubmissionError;

pub trait AnalysisService {
    fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> impl std::future::Future<Output = Result<AnalysisResult, SubmissionError>> + Send;
}
