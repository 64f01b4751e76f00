//! Capture error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while capturing a screenshot.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("emulation failed: {0}")]
    EmulationFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("output directory {} does not exist", dir.display())]
    OutputDirMissing {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CDP error: {0}")]
    Cdp(String),
}

impl CaptureError {
    /// The missing output directory, when the write failed because of it.
    pub fn missing_output_dir(&self) -> Option<&std::path::Path> {
        match self {
            Self::OutputDirMissing { dir, .. } => Some(dir),
            _ => None,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for CaptureError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CaptureError::Cdp(err.to_string())
    }
}
