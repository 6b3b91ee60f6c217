//! Attachment rules: which files the public pages list, how each one is
//! previewed, and which resume file to show inline.
//!
//! Everything is keyed on the stored file name's extension (see
//! [`file_ext`]); file contents are never inspected.

use crate::models::Resume;
use crate::naming::file_ext;
use serde::Serialize;

/// How the preview page shows a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    Pdf,
    Notebook,
    Image,
    Text,
    Audio,
    Video,
    None,
}

impl PreviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PreviewKind::Pdf => "pdf",
            PreviewKind::Notebook => "notebook",
            PreviewKind::Image => "image",
            PreviewKind::Text => "text",
            PreviewKind::Audio => "audio",
            PreviewKind::Video => "video",
            PreviewKind::None => "none",
        }
    }
}

const TEXT_EXTS: &[&str] = &[
    "py", "js", "ts", "json", "md", "txt", "csv", "yml", "yaml", "toml", "cfg", "ini", "html",
    "css", "xml", "sql", "sh", "bat", "ps1", "r", "rb", "go", "rs", "java", "c", "cpp", "h",
];
const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const AUDIO_EXTS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a"];
const VIDEO_EXTS: &[&str] = &["mp4", "webm", "ogv", "mov"];

/// Source, script and notes files kept off public project pages.
const HIDDEN_EXTS: &[&str] = &[
    "py", "txt", "md", "ps1", "sh", "js", "ts", "json", "yaml", "yml", "csv", "rb", "php",
    "java", "c", "cpp", "cs", "go", "rs",
];
const HIDDEN_TITLES: &[&str] = &["helper script", "project notes"];

/// Preview kind for a lowercase extension (no dot).
pub fn preview_kind_for_ext(ext: &str) -> PreviewKind {
    match ext {
        "pdf" => PreviewKind::Pdf,
        "ipynb" => PreviewKind::Notebook,
        e if IMAGE_EXTS.contains(&e) => PreviewKind::Image,
        e if TEXT_EXTS.contains(&e) => PreviewKind::Text,
        e if AUDIO_EXTS.contains(&e) => PreviewKind::Audio,
        e if VIDEO_EXTS.contains(&e) => PreviewKind::Video,
        _ => PreviewKind::None,
    }
}

/// A file attached to a project, education entry or certification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub title: String,
    /// Stored file name, e.g. `attachments/report.pdf`.
    pub file: String,
}

impl Attachment {
    pub fn new(title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
        }
    }

    pub fn preview_kind(&self) -> PreviewKind {
        preview_kind_for_ext(&file_ext(&self.file))
    }

    /// Hidden from public listings by title or extension.
    pub fn is_hidden(&self) -> bool {
        let title = self.title.trim().to_lowercase();
        if HIDDEN_TITLES.contains(&title.as_str()) {
            return true;
        }
        HIDDEN_EXTS.contains(&file_ext(&self.file).as_str())
    }
}

/// Attachments a public page may list, in input order.
pub fn public_attachments(attachments: &[Attachment]) -> Vec<&Attachment> {
    attachments.iter().filter(|a| !a.is_hidden()).collect()
}

fn is_pdf(name: &str) -> bool {
    file_ext(name) == "pdf"
}

/// The file to show inline for a resume: the preview PDF, else the main
/// file when it is a PDF, else the alternate file when it is a PDF.
pub fn best_pdf(resume: &Resume) -> Option<&str> {
    if let Some(preview) = resume.preview_pdf.as_deref()
        && !preview.is_empty()
    {
        return Some(preview);
    }
    if is_pdf(&resume.file) {
        return Some(&resume.file);
    }
    resume.alternate_file.as_deref().filter(|f| is_pdf(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_kinds() {
        assert_eq!(preview_kind_for_ext("pdf"), PreviewKind::Pdf);
        assert_eq!(preview_kind_for_ext("ipynb"), PreviewKind::Notebook);
        assert_eq!(preview_kind_for_ext("png"), PreviewKind::Image);
        assert_eq!(preview_kind_for_ext("sql"), PreviewKind::Text);
        assert_eq!(preview_kind_for_ext("flac"), PreviewKind::Audio);
        assert_eq!(preview_kind_for_ext("mov"), PreviewKind::Video);
        assert_eq!(preview_kind_for_ext("docx"), PreviewKind::None);
        assert_eq!(preview_kind_for_ext(""), PreviewKind::None);
    }

    #[test]
    fn attachment_kind_uses_case_insensitive_ext() {
        assert_eq!(Attachment::new("Slides", "decks/Q3.PDF").preview_kind(), PreviewKind::Pdf);
    }

    #[test]
    fn hidden_by_extension() {
        assert!(Attachment::new("Loader", "scripts/load.py").is_hidden());
        assert!(Attachment::new("Notes", "notes.MD").is_hidden());
        assert!(Attachment::new("Service", "main.go").is_hidden());
        assert!(!Attachment::new("Report", "report.pdf").is_hidden());
        assert!(!Attachment::new("Notebook", "analysis.ipynb").is_hidden());
    }

    #[test]
    fn hidden_by_title() {
        assert!(Attachment::new("Helper Script", "run.bin").is_hidden());
        assert!(Attachment::new("  project notes ", "notes.pdf").is_hidden());
        assert!(!Attachment::new("Project summary", "summary.pdf").is_hidden());
    }

    #[test]
    fn public_attachments_keeps_order() {
        let all = vec![
            Attachment::new("Report", "report.pdf"),
            Attachment::new("Helper Script", "x.sh"),
            Attachment::new("Dashboard", "dash.png"),
        ];
        let titles: Vec<&str> = public_attachments(&all).iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Report", "Dashboard"]);
    }

    #[test]
    fn best_pdf_prefers_preview() {
        let mut r = Resume::new("CV", "general", "cv.pdf");
        r.preview_pdf = Some("cv-preview.pdf".to_string());
        assert_eq!(best_pdf(&r), Some("cv-preview.pdf"));
    }

    #[test]
    fn best_pdf_falls_back_to_file_then_alternate() {
        let r = Resume::new("CV", "general", "cv.pdf");
        assert_eq!(best_pdf(&r), Some("cv.pdf"));

        let mut r = Resume::new("CV", "general", "cv.docx");
        r.alternate_file = Some("cv-alt.pdf".to_string());
        assert_eq!(best_pdf(&r), Some("cv-alt.pdf"));

        r.alternate_file = Some("cv-alt.doc".to_string());
        assert_eq!(best_pdf(&r), None);
    }
}
