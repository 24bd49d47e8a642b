//! Scoped headless-browser session.
//!
//! `BrowserSession` owns the browser child process and its private profile
//! directory. Dropping the session kills the process and deletes the directory,
//! so every exit path (success, error, timeout, panic) releases both.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::capture::CaptureError;

const PAGE_FILE: &str = "page.html";

pub struct BrowserSession {
    child: Option<Child>,
    profile: TempDir,
}

impl BrowserSession {
    pub fn open() -> Result<Self, CaptureError> {
        let profile = tempfile::Builder::new()
            .prefix("resume-capture-")
            .tempdir()
            .map_err(CaptureError::Staging)?;
        Ok(Self {
            child: None,
            profile,
        })
    }

    pub fn dir(&self) -> &Path {
        self.profile.path()
    }

    /// Writes the page the browser will load and returns its path.
    pub async fn stage_page(&self, html: &str) -> Result<PathBuf, CaptureError> {
        let path = self.dir().join(PAGE_FILE);
        tokio::fs::write(&path, html)
            .await
            .map_err(CaptureError::Staging)?;
        Ok(path)
    }

    pub fn launch(&mut self, binary: &str, args: &[OsString]) -> Result<(), CaptureError> {
        let child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CaptureError::Launch {
                binary: binary.to_string(),
                source,
            })?;
        debug!(pid = ?child.id(), binary, "Browser launched");
        self.child = Some(child);
        Ok(())
    }

    /// Waits for the browser to exit. On timeout the in-flight wait is dropped,
    /// which kills the child.
    pub async fn wait(&mut self, timeout: Duration) -> Result<Output, CaptureError> {
        let child = self.child.take().ok_or_else(|| CaptureError::BrowserFailed {
            status: "not launched".to_string(),
            stderr: String::new(),
        })?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(CaptureError::BrowserFailed {
                status: "unknown".to_string(),
                stderr: e.to_string(),
            }),
            Err(_) => {
                warn!(?timeout, "Browser timed out, killed");
                Err(CaptureError::Timeout(timeout))
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                debug!("Browser already gone at teardown: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_page_writes_inside_profile() {
        let session = BrowserSession::open().unwrap();
        let page = session.stage_page("<p>hi</p>").await.unwrap();
        assert!(page.starts_with(session.dir()));
        assert_eq!(tokio::fs::read_to_string(&page).await.unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_profile_removed_on_drop() {
        let session = BrowserSession::open().unwrap();
        let dir = session.dir().to_path_buf();
        assert!(dir.exists());
        drop(session);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_launch_missing_binary() {
        let mut session = BrowserSession::open().unwrap();
        let err = session
            .launch("/nonexistent/chromium-binary", &[])
            .unwrap_err();
        assert!(matches!(err, CaptureError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_wait_times_out_and_kills() {
        let mut session = BrowserSession::open().unwrap();
        session
            .launch("sleep", &[OsString::from("30")])
            .unwrap();
        let started = std::time::Instant::now();
        let err = session.wait(Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, CaptureError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_wait_without_launch() {
        let mut session = BrowserSession::open().unwrap();
        let err = session.wait(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, CaptureError::BrowserFailed { .. }));
    }
}
