//! Input events delivered to the session

use crate::input::candidate::CandidateFile;

/// Where a selection came from. Both carry whatever files the surface
/// handed over; only the first one is ever considered.
#[derive(Debug, Clone)]
pub enum FileSource {
    Picker(Vec<CandidateFile>),
    Drop(Vec<CandidateFile>),
}

impl FileSource {
    pub fn files(&self) -> &[CandidateFile] {
        match self {
            FileSource::Picker(files) | FileSource::Drop(files) => files,
        }
    }

    pub fn into_first(self) -> Option<CandidateFile> {
        match self {
            FileSource::Picker(files) | FileSource::Drop(files) => files.into_iter().next(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FileSource::Picker(_) => "picker",
            FileSource::Drop(_) => "drop",
        }
    }
}

/// Drag-and-drop events over the drop zone.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<CandidateFile>),
}

/// What a drag handler did about the host's default action.
///
/// Every drag handler returns `Prevented`: a dropped file must never make
/// the host navigate away or open it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Prevented,
}
