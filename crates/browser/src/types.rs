//! Capture task types and browser launch configuration.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// JPEG compression quality (0-100).
pub const JPEG_QUALITY: i64 = 90;

/// Output image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// File extension, also used as the format name on the command line.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// Compression quality, for lossy formats only.
    pub fn quality(self) -> Option<i64> {
        match self {
            Self::Png => None,
            Self::Jpeg => Some(JPEG_QUALITY),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            other => Err(format!(
                "unsupported image format '{other}', expected png or jpeg"
            )),
        }
    }
}

/// Options shared by every task in a run.
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    pub url: String,
    pub full_page: bool,
    /// Requested preset; `None` means the default preset.
    pub preset: Option<String>,
    /// Optional tag inserted into the file name.
    pub name: Option<String>,
    pub dark: bool,
    /// Capture every preset in catalog order instead of a single one.
    pub all: bool,
    pub image_format: ImageFormat,
    pub output_dir: Option<PathBuf>,
}

/// A single screenshot to take.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureTask {
    pub url: String,
    pub full_page: bool,
    pub preset: String,
    pub name: Option<String>,
    pub dark: bool,
    pub image_format: ImageFormat,
    pub output_dir: Option<PathBuf>,
}

/// Browser launch configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Upper bound for navigation plus the wait for network idle.
    pub navigation_timeout_ms: u64,
    /// User agent for desktop presets (browser default if not set).
    pub user_agent: Option<String>,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self::from(&webshots_config::BrowserConfig::default())
    }
}

impl From<&webshots_config::BrowserConfig> for BrowserConfig {
    fn from(cfg: &webshots_config::BrowserConfig) -> Self {
        Self {
            chrome_path: cfg.chrome_path.clone(),
            headless: cfg.headless,
            navigation_timeout_ms: cfg.navigation_timeout_ms,
            user_agent: cfg.user_agent.clone(),
            chrome_args: cfg.chrome_args.clone(),
        }
    }
}
