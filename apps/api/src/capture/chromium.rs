use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::capture::session::BrowserSession;
use crate::capture::{inject_print_styles, CaptureError, PdfCapture, PrintOptions};

const CAPTURE_FILE: &str = "capture.pdf";
const PARTIAL_SUFFIX: &str = ".partial";

/// Headless Chromium driven through its command line: load the staged page,
/// let network activity settle, print with the page's print rules.
#[derive(Debug, Clone)]
pub struct ChromiumCapture {
    binary: String,
    timeout: Duration,
    no_sandbox: bool,
    print: PrintOptions,
}

impl ChromiumCapture {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            no_sandbox: false,
            print: PrintOptions::default(),
        }
    }

    /// Needed when running as root inside containers.
    pub fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    fn args(&self, profile: &Path, page: &Path, pdf: &Path) -> Vec<OsString> {
        // Leave part of the budget for process startup and the print itself.
        let settle_ms = (self.timeout.as_millis() / 2).max(1_000);
        let mut args: Vec<OsString> = vec![
            "--headless=new".into(),
            "--disable-gpu".into(),
            "--no-first-run".into(),
            "--no-default-browser-check".into(),
            "--hide-scrollbars".into(),
            "--no-pdf-header-footer".into(),
            "--run-all-compositor-stages-before-draw".into(),
            format!("--virtual-time-budget={settle_ms}").into(),
        ];
        if self.no_sandbox {
            args.push("--no-sandbox".into());
        }
        let mut user_data_dir = OsString::from("--user-data-dir=");
        user_data_dir.push(profile);
        args.push(user_data_dir);
        let mut print_to = OsString::from("--print-to-pdf=");
        print_to.push(pdf);
        args.push(print_to);
        let mut url = OsString::from("file://");
        url.push(page);
        args.push(url);
        args
    }
}

#[async_trait]
impl PdfCapture for ChromiumCapture {
    async fn capture(&self, html: &str, output_path: &Path) -> Result<(), CaptureError> {
        let mut session = BrowserSession::open()?;
        let page = session
            .stage_page(&inject_print_styles(html, &self.print))
            .await?;
        let pdf = session.dir().join(CAPTURE_FILE);

        let args = self.args(session.dir(), &page, &pdf);
        session.launch(&self.binary, &args)?;
        let output = session.wait(self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::BrowserFailed {
                status: output.status.to_string(),
                stderr: tail(&stderr, 20),
            });
        }

        let size = match tokio::fs::metadata(&pdf).await {
            Ok(meta) if meta.len() > 0 => meta.len(),
            _ => return Err(CaptureError::MissingOutput),
        };
        debug!(bytes = size, "Browser produced PDF");

        publish(&pdf, output_path).await?;
        info!(path = %output_path.display(), bytes = size, "PDF captured");
        Ok(())
    }
}

/// Copies the PDF into a uniquely named temp file beside its destination and
/// renames it into place, so the public path only ever holds a complete file
/// and concurrent captures of the same resume never share a staging file.
async fn publish(pdf: &Path, output_path: &Path) -> Result<(), CaptureError> {
    let pdf = pdf.to_path_buf();
    let output = output_path.to_path_buf();
    tokio::task::spawn_blocking(move || publish_blocking(&pdf, &output))
        .await
        .map_err(|e| CaptureError::Write {
            path: output_path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?
}

fn publish_blocking(pdf: &Path, output_path: &Path) -> Result<(), CaptureError> {
    let write_err = |source| CaptureError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let prefix = format!(".{}.", output_path.file_name().unwrap_or_default().to_string_lossy());
    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(parent)
        .map_err(write_err)?;
    let mut source = std::fs::File::open(pdf).map_err(write_err)?;
    std::io::copy(&mut source, staged.as_file_mut()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;

    // A failed persist drops the temp file, which deletes it.
    staged
        .persist(output_path)
        .map_err(|e| write_err(e.error))?;
    Ok(())
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
