/// Config schema types for the screenshot tool (`[browser]` and `[capture]`).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebshotsConfig {
    pub browser: BrowserConfig,
    pub capture: CaptureConfig,
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Navigation timeout in milliseconds, covering the wait for network idle.
    pub navigation_timeout_ms: u64,
    /// User agent override for desktop presets. Mobile presets always use
    /// their device user agent.
    pub user_agent: Option<String>,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            navigation_timeout_ms: 30_000,
            user_agent: None,
            chrome_args: Vec::new(),
        }
    }
}

/// Defaults for capture flags. Command-line flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Preset used when `--preset` is not given.
    pub preset: Option<String>,
    /// Image format (`png` or `jpeg`) used when `--imageFormat` is not given.
    pub image_format: Option<String>,
    /// Output directory used when `--output` is not given.
    pub output_dir: Option<PathBuf>,
}
