//! Input acquisition module
//! Handles file type detection, staged files, drag/picker events and the location hint

pub mod candidate;
pub mod events;
pub mod file_detector;
pub mod location;

pub use candidate::CandidateFile;
pub use events::{DefaultAction, DragEvent, FileSource};
pub use file_detector::FileType;
pub use location::LocationHint;
