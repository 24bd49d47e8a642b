//! PDF capture: turns a rendered HTML page into a PDF file on disk.
//!
//! The only component that touches the filesystem and an external process.
//! One browser session per call; nothing is shared between captures.
//! `AppState` holds an `Arc<dyn PdfCapture>` so tests can swap the backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod chromium;
pub mod session;
#[cfg(test)]
pub mod stub;

pub use chromium::ChromiumCapture;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Template stylesheet {path} could not be read")]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not stage page for capture")]
    Staging(#[source] std::io::Error),

    #[error("Failed to launch browser '{binary}'")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Page did not finish rendering within {0:?}")]
    Timeout(Duration),

    #[error("Browser exited with {status}: {stderr}")]
    BrowserFailed { status: String, stderr: String },

    #[error("Browser finished without producing a PDF")]
    MissingOutput,

    #[error("Could not write PDF to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    /// Human-readable message including the underlying cause chain.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        message
    }
}

/// Fixed print geometry for every capture.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptions {
    pub page_size: &'static str,
    pub margin: &'static str,
    pub print_background: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            page_size: "A4",
            margin: "2cm",
            print_background: true,
        }
    }
}

impl PrintOptions {
    pub fn page_css(&self) -> String {
        let mut css = format!(
            "@page {{ size: {}; margin: {}; }}\n",
            self.page_size, self.margin
        );
        if self.print_background {
            css.push_str(
                "html, body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n",
            );
        }
        css
    }
}

/// Inserts the print rules at the end of `<head>` (or at the top of the
/// document when there is no head) so they win over template styles.
pub fn inject_print_styles(html: &str, options: &PrintOptions) -> String {
    let block = format!("<style media=\"print\">\n{}</style>\n", options.page_css());
    match html.find("</head>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..idx]);
            out.push_str(&block);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{block}{html}"),
    }
}

/// Reads the template stylesheet the page depends on.
pub async fn load_stylesheet(path: &Path) -> Result<String, CaptureError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CaptureError::Stylesheet {
            path: path.to_path_buf(),
            source,
        })
}

/// The capture trait. Implementations must fully overwrite `output_path`
/// and never leave a browser process behind, whatever the outcome.
#[async_trait]
pub trait PdfCapture: Send + Sync {
    async fn capture(&self, html: &str, output_path: &Path) -> Result<(), CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_css_is_a4_with_2cm_margins() {
        let css = PrintOptions::default().page_css();
        assert!(css.contains("@page { size: A4; margin: 2cm; }"));
        assert!(css.contains("print-color-adjust: exact"));
    }

    #[test]
    fn test_inject_before_head_close() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let out = inject_print_styles(html, &PrintOptions::default());
        let style = out.find("<style media=\"print\">").unwrap();
        assert!(out.find("<title>").unwrap() < style);
        assert!(style < out.find("</head>").unwrap());
    }

    #[test]
    fn test_inject_without_head() {
        let out = inject_print_styles("<p>bare</p>", &PrintOptions::default());
        assert!(out.starts_with("<style media=\"print\">"));
        assert!(out.ends_with("<p>bare</p>"));
    }

    #[tokio::test]
    async fn test_missing_stylesheet_is_capture_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.css");
        let err = load_stylesheet(&path).await.unwrap_err();
        assert!(matches!(err, CaptureError::Stylesheet { .. }));
        assert!(err.detailed_message().contains("missing.css"));
    }

    #[tokio::test]
    async fn test_load_stylesheet_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.css");
        tokio::fs::write(&path, "body { margin: 0; }").await.unwrap();
        assert_eq!(load_stylesheet(&path).await.unwrap(), "body { margin: 0; }");
    }
}
