//! Resume lens client library

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::{Result, ResumeLensError};
pub use session::{Session, SubmissionState};
