//! Website screenshots at device and desktop viewport presets.
//!
//! Each capture launches a dedicated headless Chrome/Chromium over CDP,
//! emulates the preset (and optionally `prefers-color-scheme: dark`), waits
//! for the network to go idle and writes a PNG or JPEG file. Tasks run strictly
//! one after another.
//!
//! # Example
//!
//! ```ignore
//! use webshots_browser::{CaptureOptions, ChromeCapturer, build_tasks, run_tasks};
//!
//! let options = CaptureOptions {
//!     url: "https://example.com".into(),
//!     all: true,
//!     ..Default::default()
//! };
//!
//! let capturer = ChromeCapturer::default();
//! let written = run_tasks(&capturer, build_tasks(&options)).await?;
//! ```

pub mod capture;
pub mod detect;
pub mod error;
mod idle;
pub mod presets;
pub mod runner;
pub mod session;
pub mod tasks;
pub mod types;

pub use {
    capture::{ChromeCapturer, validate_url, write_image},
    error::CaptureError,
    runner::{Capturer, run_tasks},
    tasks::build_tasks,
    types::{BrowserConfig, CaptureOptions, CaptureTask, ImageFormat},
};
