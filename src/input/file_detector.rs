//! File type detection

use regex::Regex;
use std::sync::LazyLock;

static ACCEPTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(pdf|docx)$").expect("static pattern"));

/// Value for a picker `accept` filter.
pub const ACCEPT_FILTER: &str = ".pdf,.docx";

/// Advisory only, nothing enforces it.
pub const SIZE_HINT: &str = "PDF or DOCX, up to 10MB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
}

impl FileType {
    /// Detect by file name. Only `.pdf` and `.docx` (any case) are accepted.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let captures = ACCEPTED_NAME.captures(name)?;
        match captures[1].to_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            _ => None,
        }
    }

    /// Best-effort content check. A DOCX is a ZIP container so only the
    /// archive signature can be checked here.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(FileType::Pdf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            Some(FileType::Docx)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_and_docx_any_case() {
        assert_eq!(FileType::from_file_name("resume.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_file_name("RESUME.PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_file_name("cv.final.DocX"), Some(FileType::Docx));
    }

    #[test]
    fn test_rejects_other_names() {
        for name in ["resume.doc", "resume.txt", "resume.pdf.exe", "pdf", "resume", "notes.docx.bak", ""] {
            assert_eq!(FileType::from_file_name(name), None, "{name} should be rejected");
        }
    }

    #[test]
    fn test_sniff() {
        assert_eq!(FileType::sniff(b"%PDF-1.7\n..."), Some(FileType::Pdf));
        assert_eq!(FileType::sniff(b"PK\x03\x04rest"), Some(FileType::Docx));
        assert_eq!(FileType::sniff(b"hello"), None);
    }
}
