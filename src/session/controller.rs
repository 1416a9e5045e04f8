//! Session controller: file selection, drag state and the submission lifecycle

use crate::client::{AnalysisResult, AnalysisService, AnalyzeRequest};
use crate::error::{SubmissionError, ValidationError, CANCELLED_MESSAGE};
use crate::input::{CandidateFile, DefaultAction, DragEvent, FileSource, FileType, LocationHint};
use crate::session::state::SubmissionState;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Why a submission could not start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Proof that the session is pending. Only the session hands these out and
/// only `Session::settle` consumes them, so a pending state always has
/// exactly one owner responsible for ending it.
#[derive(Debug)]
#[must_use = "a pending submission must be settled"]
pub struct PendingSubmission {
    request: AnalyzeRequest,
    timeout: Duration,
    started: Instant,
}

impl PendingSubmission {
    pub fn request(&self) -> &AnalyzeRequest {
        &self.request
    }

    /// Call the service, bounded by the session timeout. Elapsing counts as
    /// "no response".
    pub async fn run<S: AnalysisService>(
        &self,
        service: &S,
    ) -> Result<AnalysisResult, SubmissionError> {
        match tokio::time::timeout(self.timeout, service.analyze(&self.request)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    "Analysis of {} timed out after {}ms",
                    self.request.file.name(),
                    self.timeout.as_millis()
                );
                Err(SubmissionError::NoResponse)
            }
        }
    }
}

/// Ends `Pending` if `Session::submit` is dropped before the call settles.
struct SettleOnDrop<'a> {
    session: &'a mut Session,
    armed: bool,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed && self.session.is_pending() {
            warn!("Submission dropped before it settled");
            self.session.rejection = None;
            self.session.state = SubmissionState::Error(
                SubmissionError::Request(CANCELLED_MESSAGE.to_string()).to_string(),
            );
        }
    }
}

/// State container for one upload surface.
///
/// Holds at most one candidate file and at most one submission in flight.
#[derive(Debug)]
pub struct Session {
    candidate: Option<CandidateFile>,
    location: String,
    dragging: bool,
    state: SubmissionState,
    /// Selection rejected while a request was in flight
    rejection: Option<String>,
    timeout: Duration,
}

impl Session {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_SUBMIT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            candidate: None,
            location: String::new(),
            dragging: false,
            state: SubmissionState::Idle,
            rejection: None,
            timeout,
        }
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn location_hint(&self) -> Option<LocationHint> {
        LocationHint::parse(&self.location)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The message to show: a failed state, else a selection rejected
    /// while the last request was in flight.
    pub fn error_message(&self) -> Option<&str> {
        self.state
            .error_message()
            .or(self.rejection.as_deref())
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.state.result()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Stage the first file of a picker or drop selection.
    ///
    /// Returns `Ok(None)` when the source carried no files. A rejected file
    /// leaves the current candidate in place.
    pub fn select_file(
        &mut self,
        source: FileSource,
    ) -> Result<Option<FileType>, ValidationError> {
        let kind = source.kind();
        let ignored = source.files().len().saturating_sub(1);
        if ignored > 0 {
            debug!("Ignoring {} additional file(s) from {}", ignored, kind);
        }

        let Some(file) = source.into_first() else {
            debug!("Empty {} selection", kind);
            return Ok(None);
        };

        let Some(file_type) = file.file_type() else {
            warn!("Rejected {} from {}: unsupported extension", file.name(), kind);
            return Err(self.report_validation(ValidationError::UnsupportedFile));
        };

        file.check_content(file_type);
        info!("Selected {} ({} bytes) via {}", file.name(), file.len(), kind);

        self.candidate = Some(file);
        self.rejection = None;
        if self.state.error_message().is_some() {
            self.state = SubmissionState::Idle;
        }

        Ok(Some(file_type))
    }

    /// Update the drag indicator. A drop goes through the same validation as
    /// a picker selection, whatever its outcome the indicator ends up off.
    pub fn handle_drag(&mut self, event: DragEvent) -> DefaultAction {
        match event {
            DragEvent::Enter | DragEvent::Over => self.dragging = true,
            DragEvent::Leave => self.dragging = false,
            DragEvent::Drop(files) => {
                self.dragging = false;
                if let Err(e) = self.select_file(FileSource::Drop(files)) {
                    warn!("Drop rejected: {}", e);
                }
            }
        }

        DefaultAction::Prevented
    }

    /// Raw text of the location field. Trimming happens at submit time.
    pub fn set_location(&mut self, text: &str) {
        self.location = text.to_string();
    }

    /// Enter `Pending` and build the request, or explain why not.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if self.is_pending() {
            debug!("Submit ignored: a request is already in flight");
            return Err(SubmitRejected::InFlight);
        }

        let Some(file) = self.candidate.clone() else {
            return Err(self.report_validation(ValidationError::NoFileSelected).into());
        };

        let Some(file_type) = file.file_type() else {
            return Err(self.report_validation(ValidationError::UnsupportedFile).into());
        };

        let request = AnalyzeRequest {
            file,
            file_type,
            location: self.location_hint(),
        };

        self.state = SubmissionState::Pending;
        self.rejection = None;
        debug!(
            "Submitting {} (location: {})",
            request.file.name(),
            request
                .location
                .as_ref()
                .map(LocationHint::as_str)
                .unwrap_or("none")
        );

        Ok(PendingSubmission {
            request,
            timeout: self.timeout,
            started: Instant::now(),
        })
    }

    /// Leave `Pending` for exactly one of `Success` or `Error`.
    pub fn settle(
        &mut self,
        submission: PendingSubmission,
        outcome: Result<AnalysisResult, SubmissionError>,
    ) -> &SubmissionState {
        let elapsed = submission.started.elapsed().as_millis();

        self.state = match outcome {
            Ok(result) => {
                info!(
                    "Analysis of {} finished in {}ms: {} skills, {} roles",
                    submission.request.file.name(),
                    elapsed,
                    result.skills.len(),
                    result.recommended_roles.len()
                );
                SubmissionState::Success(result)
            }
            Err(e) => {
                error!("Analysis of {} failed after {}ms: {}", submission.request.file.name(), elapsed, e);
                self.rejection = None;
                SubmissionState::Error(e.to_string())
            }
        };

        &self.state
    }

    /// Begin, call the service, settle. Dropping the returned future before
    /// it completes still leaves the session out of `Pending`.
    pub async fn submit<S: AnalysisService>(&mut self, service: &S) -> &SubmissionState {
        let submission = match self.begin_submit() {
            Ok(submission) => submission,
            Err(_) => return &self.state,
        };

        let mut guard = SettleOnDrop {
            session: &mut *self,
            armed: true,
        };
        let outcome = submission.run(service).await;
        guard.armed = false;
        drop(guard);

        self.settle(submission, outcome)
    }

    /// Surface a local validation error. While a request is in flight the
    /// pending state stays and the message is kept beside it.
    fn report_validation(&mut self, err: ValidationError) -> ValidationError {
        if self.is_pending() {
            self.rejection = Some(err.to_string());
        } else {
            self.state = SubmissionState::Error(err.to_string());
        }
        err
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RoleRecommendation;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubService {
        outcome: Result<AnalysisResult, SubmissionError>,
        calls: AtomicUsize,
    }

    impl StubService {
        fn new(outcome: Result<AnalysisResult, SubmissionError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AnalysisService for StubService {
        async fn analyze(
            &self,
            _request: &AnalyzeRequest,
        ) -> Result<AnalysisResult, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct SlowService;

    impl AnalysisService for SlowService {
        async fn analyze(
            &self,
            _request: &AnalyzeRequest,
        ) -> Result<AnalysisResult, SubmissionError> {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok(AnalysisResult::default())
        }
    }

    fn pdf(name: &str) -> CandidateFile {
        CandidateFile::new(name, b"%PDF-1.7".to_vec())
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
            experience_level: "Senior".to_string(),
            recommended_roles: vec![RoleRecommendation {
                title: "Platform Engineer".to_string(),
                reason: "Infra background".to_string(),
                link: "https://jobs.example.com/pe".to_string(),
            }],
        }
    }

    #[test]
    fn test_select_valid_file_clears_error() {
        let mut session = Session::new();
        let _ = session.select_file(FileSource::Picker(vec![pdf("notes.txt")]));
        assert_eq!(session.error_message(), Some("Please upload a PDF or DOCX file"));

        let selected = session
            .select_file(FileSource::Picker(vec![pdf("resume.PDF")]))
            .unwrap();
        assert_eq!(selected, Some(FileType::Pdf));
        assert_eq!(session.candidate().unwrap().name(), "resume.PDF");
        assert_eq!(session.error_message(), None);
        assert_eq!(session.state(), &SubmissionState::Idle);
    }

    #[test]
    fn test_rejected_file_keeps_previous_candidate() {
        let mut session = Session::new();
        session
            .select_file(FileSource::Picker(vec![pdf("first.docx")]))
            .unwrap();

        for name in ["photo.png", "resume.doc", "resume.pdf.zip", "README"] {
            let err = session
                .select_file(FileSource::Picker(vec![pdf(name)]))
                .unwrap_err();
            assert_eq!(err, ValidationError::UnsupportedFile);
            assert_eq!(session.candidate().unwrap().name(), "first.docx");
            assert_eq!(session.error_message(), Some("Please upload a PDF or DOCX file"));
        }
    }

    #[test]
    fn test_only_first_file_is_considered() {
        let mut session = Session::new();
        session
            .select_file(FileSource::Picker(vec![pdf("a.pdf"), pdf("b.pdf")]))
            .unwrap();
        assert_eq!(session.candidate().unwrap().name(), "a.pdf");

        let err = session
            .select_file(FileSource::Drop(vec![pdf("bad.txt"), pdf("good.pdf")]))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFile);
        assert_eq!(session.candidate().unwrap().name(), "a.pdf");
    }

    #[test]
    fn test_empty_selection_changes_nothing() {
        let mut session = Session::new();
        assert_eq!(session.select_file(FileSource::Picker(vec![])), Ok(None));
        assert!(session.candidate().is_none());
        assert_eq!(session.state(), &SubmissionState::Idle);
    }

    #[test]
    fn test_valid_selection_keeps_previous_result() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("a.pdf")])).unwrap();
        let pending = session.begin_submit().unwrap();
        session.settle(pending, Ok(sample_result()));

        session.select_file(FileSource::Picker(vec![pdf("b.pdf")])).unwrap();
        assert!(session.result().is_some());
    }

    #[test]
    fn test_drag_sequence() {
        let mut session = Session::new();
        assert_eq!(session.handle_drag(DragEvent::Enter), DefaultAction::Prevented);
        assert!(session.is_dragging());
        assert_eq!(session.handle_drag(DragEvent::Over), DefaultAction::Prevented);
        assert!(session.is_dragging());
        assert_eq!(session.handle_drag(DragEvent::Leave), DefaultAction::Prevented);
        assert!(!session.is_dragging());

        session.handle_drag(DragEvent::Enter);
        let action = session.handle_drag(DragEvent::Drop(vec![pdf("valid.pdf")]));
        assert_eq!(action, DefaultAction::Prevented);
        assert!(!session.is_dragging());
        assert_eq!(session.candidate().unwrap().name(), "valid.pdf");
        assert_eq!(session.error_message(), None);
    }

    #[test]
    fn test_invalid_drop_resets_indicator() {
        let mut session = Session::new();
        session.handle_drag(DragEvent::Enter);
        session.handle_drag(DragEvent::Drop(vec![pdf("image.jpeg")]));
        assert!(!session.is_dragging());
        assert!(session.candidate().is_none());
        assert_eq!(session.error_message(), Some("Please upload a PDF or DOCX file"));
    }

    #[tokio::test]
    async fn test_submit_without_file_makes_no_call() {
        let service = StubService::new(Ok(sample_result()));
        let mut session = Session::new();

        let state = session.submit(&service).await;
        assert_eq!(state, &SubmissionState::Error("Please select a resume file".to_string()));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_success() {
        let service = StubService::new(Ok(sample_result()));
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        session.submit(&service).await;
        assert_eq!(service.calls(), 1);
        assert_eq!(session.result(), Some(&sample_result()));
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_submit_failure_settles_to_error() {
        let service = StubService::new(Err(SubmissionError::Application("bad file".to_string())));
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        session.submit(&service).await;
        let message = session.error_message().unwrap();
        assert!(message.starts_with("Error analyzing resume."));
        assert!(message.contains("bad file"));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_new_submission_clears_previous_outcome() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();
        session
            .submit(&StubService::new(Err(SubmissionError::NoResponse)))
            .await;
        assert!(session.error_message().is_some());

        let pending = session.begin_submit().unwrap();
        assert_eq!(session.state(), &SubmissionState::Pending);
        assert!(session.error_message().is_none());
        session.settle(pending, Ok(AnalysisResult::default()));
    }

    #[test]
    fn test_location_is_trimmed_and_omitted_when_blank() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        session.set_location("   ");
        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.request().location, None);
        session.settle(pending, Ok(AnalysisResult::default()));

        session.set_location("  Lisbon ");
        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.request().location.as_ref().unwrap().as_str(), "Lisbon");
        session.settle(pending, Ok(AnalysisResult::default()));
    }

    #[test]
    fn test_pending_session_stays_responsive_but_rejects_resubmit() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        let pending = session.begin_submit().unwrap();
        assert!(!session.can_submit());
        assert_eq!(session.begin_submit().unwrap_err(), SubmitRejected::InFlight);

        session.handle_drag(DragEvent::Enter);
        assert!(session.is_dragging());
        session.handle_drag(DragEvent::Drop(vec![pdf("bad.rtf")]));
        assert!(session.is_pending());

        session.handle_drag(DragEvent::Drop(vec![pdf("next.docx")]));
        assert_eq!(session.candidate().unwrap().name(), "next.docx");
        assert_eq!(pending.request().file.name(), "cv.pdf");

        session.settle(pending, Ok(sample_result()));
        assert!(session.can_submit());
        assert!(session.result().is_some());
    }

    #[test]
    fn test_rejected_drop_while_pending_is_shown() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();
        let pending = session.begin_submit().unwrap();

        session.handle_drag(DragEvent::Drop(vec![pdf("photo.png")]));
        assert!(session.is_pending());
        assert_eq!(session.error_message(), Some("Please upload a PDF or DOCX file"));

        session.settle(pending, Ok(sample_result()));
        assert!(session.result().is_some());
        assert_eq!(session.error_message(), Some("Please upload a PDF or DOCX file"));

        session.handle_drag(DragEvent::Drop(vec![pdf("fixed.pdf")]));
        assert_eq!(session.error_message(), None);
        assert!(session.result().is_some());
    }

    #[test]
    fn test_rejection_while_pending_replaced_by_failure() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();
        let pending = session.begin_submit().unwrap();
        let _ = session.select_file(FileSource::Picker(vec![pdf("notes.odt")]));

        session.settle(pending, Err(SubmissionError::NoResponse));
        assert_eq!(
            session.error_message(),
            Some(SubmissionError::NoResponse.to_string().as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_does_not_leave_pending() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        let cut_short = tokio::time::timeout(Duration::from_secs(1), session.submit(&SlowService)).await;
        assert!(cut_short.is_err());

        assert!(!session.is_pending());
        assert!(session.can_submit());
        assert!(session.error_message().unwrap().contains(CANCELLED_MESSAGE));

        let pending = session.begin_submit().unwrap();
        session.settle(pending, Ok(sample_result()));
        assert!(session.result().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_resolves_to_no_response() {
        let mut session = Session::new();
        session.select_file(FileSource::Picker(vec![pdf("cv.pdf")])).unwrap();

        session.submit(&SlowService).await;
        assert_eq!(
            session.error_message(),
            Some(SubmissionError::NoResponse.to_string().as_str())
        );
        assert!(!session.is_pending());
    }
}
