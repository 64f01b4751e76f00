//! Capturing one task with a real browser.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use {
    async_trait::async_trait,
    base64::{Engine, engine::general_purpose::STANDARD as BASE64},
    chromiumoxide::{
        Page,
        cdp::browser_protocol::{
            dom::Rect,
            emulation::{
                MediaFeature, SetDeviceMetricsOverrideParams, SetEmulatedMediaParams,
                SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
            },
            page::{
                CaptureScreenshotFormat, CaptureScreenshotParams, EventLifecycleEvent,
                SetLifecycleEventsEnabledParams, Viewport as Clip,
            },
        },
    },
    futures::StreamExt,
    tokio::time::timeout,
    tracing::{debug, info, warn},
};

use crate::{
    error::CaptureError,
    idle::IdleWatch,
    presets::{self, Preset, Viewport},
    runner::Capturer,
    session::BrowserSession,
    types::{BrowserConfig, CaptureTask, ImageFormat},
};

/// Captures tasks with a freshly launched Chrome/Chromium per task.
pub struct ChromeCapturer {
    config: BrowserConfig,
}

impl Default for ChromeCapturer {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

impl ChromeCapturer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    async fn capture_task(&self, task: &CaptureTask) -> Result<PathBuf, CaptureError> {
        validate_url(&task.url)?;

        let preset = presets::resolve(Some(&task.preset));
        if preset.name != task.preset {
            warn!(
                requested = task.preset,
                fallback = preset.name,
                "unknown preset, using default"
            );
        }

        info!(url = task.url, preset = preset.name, "taking screenshot");

        let mut session = BrowserSession::launch(&self.config, preset).await?;
        let captured = match session.new_page().await {
            Ok(page) => self.capture_in(&page, task, preset).await,
            Err(e) => Err(e),
        };
        let closed = session.close().await;

        let path = captured?;
        closed?;

        info!(session_id = session.id(), path = %path.display(), "saved image");
        Ok(path)
    }

    async fn capture_in(
        &self,
        page: &Page,
        task: &CaptureTask,
        preset: &Preset,
    ) -> Result<PathBuf, CaptureError> {
        if task.dark {
            emulate_dark_mode(page).await?;
        }

        apply_preset(page, preset, self.config.user_agent.as_deref()).await?;

        navigate(
            page,
            &task.url,
            Duration::from_millis(self.config.navigation_timeout_ms),
        )
        .await?;

        let path = task.output_path(chrono::Utc::now().timestamp_millis());
        let image = take_screenshot(page, preset, task).await?;

        debug!(
            bytes = image.len(),
            full_page = task.full_page,
            format = %task.image_format,
            "took screenshot"
        );

        write_image(&path, &image, task.output_dir.as_deref()).await?;
        Ok(path)
    }
}

#[async_trait]
impl Capturer for ChromeCapturer {
    async fn capture(&self, task: &CaptureTask) -> Result<PathBuf, CaptureError> {
        self.capture_task(task).await
    }
}

async fn emulate_dark_mode(page: &Page) -> Result<(), CaptureError> {
    let params = SetEmulatedMediaParams::builder()
        .features(vec![MediaFeature::new("prefers-color-scheme", "dark")])
        .build();
    page.execute(params)
        .await
        .map_err(|e| CaptureError::EmulationFailed(format!("prefers-color-scheme: {e}")))?;
    Ok(())
}

/// Emulate the preset's device, or set a plain desktop viewport at scale 1.
async fn apply_preset(
    page: &Page,
    preset: &Preset,
    desktop_user_agent: Option<&str>,
) -> Result<(), CaptureError> {
    page.execute(device_metrics(preset))
        .await
        .map_err(|e| CaptureError::EmulationFailed(format!("device metrics: {e}")))?;

    let (user_agent, has_touch) = device_overrides(preset, desktop_user_agent);

    if has_touch {
        page.execute(SetTouchEmulationEnabledParams::new(true))
            .await
            .map_err(|e| CaptureError::EmulationFailed(format!("touch: {e}")))?;
    }

    if let Some(ua) = user_agent {
        page.execute(SetUserAgentOverrideParams::new(ua))
            .await
            .map_err(|e| CaptureError::EmulationFailed(format!("user agent: {e}")))?;
    }

    debug!(
        preset = preset.name,
        width = preset.width(),
        height = preset.height(),
        mobile = preset.is_mobile(),
        "applied preset"
    );
    Ok(())
}

fn device_metrics(preset: &Preset) -> SetDeviceMetricsOverrideParams {
    SetDeviceMetricsOverrideParams::new(
        preset.width(),
        preset.height(),
        preset.device_scale_factor(),
        preset.is_mobile(),
    )
}

/// User agent override and touch support for `preset`. Desktop presets only
/// override the user agent when one is configured.
fn device_overrides<'a>(
    preset: &Preset,
    desktop_user_agent: Option<&'a str>,
) -> (Option<&'a str>, bool) {
    match preset.viewport {
        Viewport::Mobile(device) => (Some(device.user_agent), device.has_touch),
        Viewport::Desktop { .. } => (desktop_user_agent, false),
    }
}

/// Capture the viewport, or the whole document when `task.full_page` is set.
///
/// Full-page captures grow the emulated viewport to the content size while
/// keeping the preset's scale factor and mobile flag.
async fn take_screenshot(
    page: &Page,
    preset: &Preset,
    task: &CaptureTask,
) -> Result<Vec<u8>, CaptureError> {
    let clip = if task.full_page {
        let content = page.layout_metrics().await?.css_content_size;
        page.execute(full_page_metrics(preset, &content))
            .await
            .map_err(|e| CaptureError::EmulationFailed(format!("full page metrics: {e}")))?;
        Some(content_clip(&content))
    } else {
        None
    };

    let shot = page
        .execute(screenshot_params(task.image_format, clip))
        .await
        .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;

    BASE64
        .decode(&shot.result.data)
        .map_err(|e| CaptureError::ScreenshotFailed(format!("invalid image data: {e}")))
}

fn full_page_metrics(preset: &Preset, content: &Rect) -> SetDeviceMetricsOverrideParams {
    let (width, height) = content_size(content);
    SetDeviceMetricsOverrideParams::new(
        width,
        height,
        preset.device_scale_factor(),
        preset.is_mobile(),
    )
}

fn content_clip(content: &Rect) -> Clip {
    let (width, height) = content_size(content);
    Clip {
        x: 0.,
        y: 0.,
        width: width as f64,
        height: height as f64,
        scale: 1.,
    }
}

fn content_size(content: &Rect) -> (i64, i64) {
    (
        content.width.ceil().max(1.) as i64,
        content.height.ceil().max(1.) as i64,
    )
}

fn screenshot_params(format: ImageFormat, clip: Option<Clip>) -> CaptureScreenshotParams {
    CaptureScreenshotParams {
        format: Some(screenshot_format(format)),
        quality: format.quality(),
        clip,
        ..Default::default()
    }
}

/// Navigate and wait until the main frame reports network idle.
async fn navigate(page: &Page, url: &str, limit: Duration) -> Result<(), CaptureError> {
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;

    // Subscribe before navigating so no lifecycle event is missed.
    let mut events = page.event_listener::<EventLifecycleEvent>().await?;
    let main_frame = page.mainframe().await?;

    let wait = async {
        page.goto(url)
            .await
            .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;

        let mut watch = IdleWatch::default();
        while let Some(event) = events.next().await {
            if main_frame.as_ref().is_some_and(|f| *f != event.frame_id) {
                continue;
            }
            if watch.observe(&event.name) {
                return Ok(());
            }
        }
        Err(CaptureError::NavigationFailed(
            "page closed before the network went idle".into(),
        ))
    };

    timeout(limit, wait).await.map_err(|_| {
        CaptureError::Timeout(format!(
            "navigation to {} did not reach network idle within {} ms",
            truncate_url(url),
            limit.as_millis()
        ))
    })??;

    debug!(url, "network idle");
    Ok(())
}

fn screenshot_format(format: ImageFormat) -> CaptureScreenshotFormat {
    match format {
        ImageFormat::Png => CaptureScreenshotFormat::Png,
        ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
    }
}

/// Write image bytes to `path`.
///
/// When an `output_dir` was requested, a `NotFound` failure is reported as
/// [`CaptureError::OutputDirMissing`] for that directory.
pub async fn write_image(
    path: &Path,
    image: &[u8],
    output_dir: Option<&Path>,
) -> Result<(), CaptureError> {
    tokio::fs::write(path, image)
        .await
        .map_err(|source| match (source.kind(), output_dir) {
            (ErrorKind::NotFound, Some(dir)) => CaptureError::OutputDirMissing {
                dir: dir.to_path_buf(),
                source,
            },
            _ => CaptureError::WriteFailed {
                path: path.to_path_buf(),
                source,
            },
        })
}

/// Validate a URL before launching a browser for it.
///
/// The URL must parse and use `http`, `https` or `file`.
pub fn validate_url(url: &str) -> Result<(), CaptureError> {
    if url.is_empty() {
        return Err(CaptureError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| CaptureError::InvalidUrl(format!("'{}': {e}", truncate_url(url))))?;

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(()),
        scheme => Err(CaptureError::InvalidUrl(format!(
            "unsupported URL scheme '{scheme}', only http, https and file are allowed"
        ))),
    }
}

/// Truncate a URL for error messages.
fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::presets::PRESETS, rstest::rstest};

    fn rect(width: f64, height: f64) -> Rect {
        Rect {
            x: 0.,
            y: 0.,
            width,
            height,
        }
    }

    #[test]
    fn validate_url_valid() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path?q=1").is_ok());
        assert!(validate_url("file:///tmp/index.html").is_ok());
    }

    #[test]
    fn validate_url_empty() {
        assert!(matches!(validate_url(""), Err(CaptureError::InvalidUrl(_))));
    }

    #[test]
    fn validate_url_invalid_scheme() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn validate_url_malformed() {
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("://missing.scheme").is_err());
    }

    #[test]
    fn truncate_url_keeps_short_urls() {
        assert_eq!(truncate_url("https://a.b"), "https://a.b");
        let long = format!("https://example.com/{}", "é".repeat(200));
        let truncated = truncate_url(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 103);
    }

    #[test]
    fn screenshot_format_mapping() {
        assert_eq!(
            screenshot_format(ImageFormat::Png),
            CaptureScreenshotFormat::Png
        );
        assert_eq!(
            screenshot_format(ImageFormat::Jpeg),
            CaptureScreenshotFormat::Jpeg
        );
    }

    #[rstest]
    #[case("iphone11", 414, 828, 2.0, true)]
    #[case("pixel2", 411, 731, 2.625, true)]
    #[case("galaxy", 320, 658, 4.5, true)]
    #[case("4k", 3840, 2160, 1.0, false)]
    #[case("wqhd", 2560, 1440, 1.0, false)]
    #[case("fhd", 1920, 1080, 1.0, false)]
    fn device_metrics_follow_preset(
        #[case] name: &str,
        #[case] width: i64,
        #[case] height: i64,
        #[case] scale: f64,
        #[case] mobile: bool,
    ) {
        let metrics = device_metrics(presets::resolve(Some(name)));
        assert_eq!((metrics.width, metrics.height), (width, height));
        assert_eq!(metrics.device_scale_factor, scale);
        assert_eq!(metrics.mobile, mobile);
    }

    #[test]
    fn mobile_presets_emulate_touch_and_device_user_agent() {
        for preset in PRESETS {
            let (user_agent, touch) = device_overrides(preset, Some("custom-agent"));
            match preset.viewport {
                Viewport::Mobile(device) => {
                    assert!(touch);
                    assert_eq!(user_agent, Some(device.user_agent));
                },
                Viewport::Desktop { .. } => {
                    assert!(!touch);
                    assert_eq!(user_agent, Some("custom-agent"));
                },
            }
        }
    }

    #[test]
    fn desktop_presets_keep_browser_user_agent_by_default() {
        let (user_agent, touch) = device_overrides(presets::resolve(Some("4k")), None);
        assert_eq!(user_agent, None);
        assert!(!touch);
    }

    #[test]
    fn full_page_keeps_scale_and_mobile_flag_of_every_preset() {
        let content = rect(980.4, 5230.2);
        for preset in PRESETS {
            let metrics = full_page_metrics(preset, &content);
            assert_eq!((metrics.width, metrics.height), (981, 5231), "{}", preset.name);
            assert_eq!(metrics.device_scale_factor, preset.device_scale_factor());
            assert_eq!(metrics.mobile, preset.is_mobile());
        }
    }

    #[test]
    fn full_page_clip_covers_content_at_css_scale() {
        let clip = content_clip(&rect(980.4, 5230.2));
        assert_eq!((clip.x, clip.y), (0., 0.));
        assert_eq!((clip.width, clip.height), (981., 5231.));
        assert_eq!(clip.scale, 1.);
    }

    #[test]
    fn empty_content_still_has_a_size() {
        assert_eq!(content_size(&rect(0., 0.)), (1, 1));
    }

    #[rstest]
    #[case(ImageFormat::Png, false)]
    #[case(ImageFormat::Png, true)]
    #[case(ImageFormat::Jpeg, false)]
    #[case(ImageFormat::Jpeg, true)]
    fn screenshot_params_by_format_and_mode(
        #[case] format: ImageFormat,
        #[case] full_page: bool,
    ) {
        let clip = full_page.then(|| content_clip(&rect(400., 3000.)));
        let params = screenshot_params(format, clip.clone());

        assert_eq!(params.format, Some(screenshot_format(format)));
        match format {
            ImageFormat::Png => assert_eq!(params.quality, None),
            ImageFormat::Jpeg => assert_eq!(params.quality, Some(90)),
        }
        assert_eq!(params.clip, clip);
        assert_eq!(params.capture_beyond_viewport, None);
    }

    #[tokio::test]
    async fn write_image_into_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("website-screenshot-fhd-1.png");
        write_image(&path, b"\x89PNG", Some(dir.path())).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn write_image_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nonexistent");
        let path = missing.join("website-screenshot-fhd-1.png");

        let err = write_image(&path, b"\x89PNG", Some(&missing))
            .await
            .unwrap_err();
        assert_eq!(err.missing_output_dir(), Some(missing.as_path()));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_failure_without_output_dir_is_not_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        // `--name a/b` without `--output`
        let path = dir.path().join("website-screenshot-a").join("b-fhd-1.png");

        let err = write_image(&path, b"\x89PNG", None).await.unwrap_err();
        assert!(err.missing_output_dir().is_none());
        assert!(matches!(err, CaptureError::WriteFailed { .. }));
    }
}
