//! Capture backends for tests that must not depend on a real browser.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::capture::{CaptureError, PdfCapture};

/// Writes the page HTML to `output_path` in place of a PDF.
#[derive(Default)]
pub struct WritingCapture {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PdfCapture for WritingCapture {
    async fn capture(&self, html: &str, output_path: &Path) -> Result<(), CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CaptureError::Write {
                    path: output_path.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(output_path, html)
            .await
            .map_err(|source| CaptureError::Write {
                path: output_path.to_path_buf(),
                source,
            })
    }
}

/// Always fails as a browser that never produced output would.
pub struct FailingCapture;

#[async_trait]
impl PdfCapture for FailingCapture {
    async fn capture(&self, _html: &str, _output_path: &Path) -> Result<(), CaptureError> {
        Err(CaptureError::MissingOutput)
    }
}
