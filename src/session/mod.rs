//! Upload session
//! Holds the staged file, the drag indicator and the submission lifecycle

pub mod controller;
pub mod state;

pub use controller::{PendingSubmission, Session, SubmitRejected, DEFAULT_SUBMIT_TIMEOUT};
pub use state::SubmissionState;
