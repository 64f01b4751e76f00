//! A single-use browser instance.
//!
//! Every capture launches its own browser and closes it before the next one
//! starts. [`BrowserSession::close`] shuts Chrome down cleanly; if a session is
//! dropped without being closed, the CDP handler task is aborted and
//! chromiumoxide kills the child process.

use std::time::Duration;

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page, handler::viewport::Viewport as CdpViewport,
    },
    futures::StreamExt,
    tokio::task::JoinHandle,
    tracing::{debug, info, warn},
};

use crate::{
    detect,
    error::CaptureError,
    presets::{Preset, Viewport},
    types::BrowserConfig,
};

pub struct BrowserSession {
    id: String,
    browser: Browser,
    handler: JoinHandle<()>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a fresh headless browser whose initial viewport matches `preset`.
    pub async fn launch(config: &BrowserConfig, preset: &Preset) -> Result<Self, CaptureError> {
        let Some(executable) = detect::detect_browser(config.chrome_path.as_deref()) else {
            return Err(CaptureError::LaunchFailed(format!(
                "Chrome/Chromium not found. {}",
                detect::install_instructions()
            )));
        };

        let id = generate_session_id();
        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless unless asked otherwise
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .chrome_executable(&executable)
            .viewport(launch_viewport(preset))
            .request_timeout(Duration::from_millis(config.navigation_timeout_ms));

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars")
            .arg("--no-sandbox");

        let cdp_config = builder.build().map_err(|e| {
            CaptureError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;

        let session_id = id.clone();
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(session_id, error = %e, "browser handler error");
                }
            }
            debug!(session_id, "browser event handler exited");
        });

        info!(
            session_id = id,
            executable = %executable.display(),
            headless = config.headless,
            "launched browser"
        );

        Ok(Self {
            id,
            browser,
            handler,
            closed: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Open a blank page in this browser.
    pub async fn new_page(&mut self) -> Result<Page, CaptureError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::LaunchFailed(format!("failed to open page: {e}")))
    }

    /// Close the browser and wait for the process to exit.
    ///
    /// Falls back to killing the process when the CDP close command fails.
    pub async fn close(&mut self) -> Result<(), CaptureError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = match self.browser.close().await {
            Ok(_) => {
                if let Err(e) = self.browser.wait().await {
                    warn!(session_id = self.id, error = %e, "failed to wait for browser exit");
                }
                Ok(())
            },
            Err(e) => {
                warn!(session_id = self.id, error = %e, "browser close failed, killing process");
                if let Some(Err(kill_err)) = self.browser.kill().await {
                    warn!(session_id = self.id, error = %kill_err, "failed to kill browser");
                }
                Err(CaptureError::from(e))
            },
        };

        self.handler.abort();
        debug!(session_id = self.id, "closed browser session");
        result
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                session_id = self.id,
                "browser session dropped without close, killing browser"
            );
        }
        self.handler.abort();
    }
}

fn launch_viewport(preset: &Preset) -> CdpViewport {
    let (has_touch, is_landscape) = match preset.viewport {
        Viewport::Mobile(device) => (device.has_touch, device.is_landscape),
        Viewport::Desktop { .. } => (false, true),
    };
    CdpViewport {
        width: preset.width(),
        height: preset.height(),
        device_scale_factor: Some(preset.device_scale_factor()),
        emulating_mobile: preset.is_mobile(),
        is_landscape,
        has_touch,
    }
}

/// Random identifier used to correlate log lines of one browser instance.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let id: u64 = rng.random();
    format!("browser-{id:016x}")
}

#[cfg(test)]
mod tests {
    use {super::*, crate::presets};

    #[test]
    fn session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert!(a.starts_with("browser-"));
    }

    #[test]
    fn launch_viewport_for_mobile_preset() {
        let viewport = launch_viewport(presets::resolve(Some("pixel2")));
        assert_eq!((viewport.width, viewport.height), (411, 731));
        assert_eq!(viewport.device_scale_factor, Some(2.625));
        assert!(viewport.emulating_mobile);
        assert!(viewport.has_touch);
        assert!(!viewport.is_landscape);
    }

    #[test]
    fn launch_viewport_for_desktop_preset() {
        let viewport = launch_viewport(presets::resolve(Some("4k")));
        assert_eq!((viewport.width, viewport.height), (3840, 2160));
        assert_eq!(viewport.device_scale_factor, Some(1.0));
        assert!(!viewport.emulating_mobile);
        assert!(!viewport.has_touch);
    }
}
