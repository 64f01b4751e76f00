//! Expanding command-line options into capture tasks, and naming their output.

use std::path::{Path, PathBuf};

use crate::{
    presets::{self, DEFAULT_PRESET},
    types::{CaptureOptions, CaptureTask, ImageFormat},
};

/// Build the ordered task list for a run.
///
/// With `all` set, one task per catalog preset in catalog order; otherwise a
/// single task for the requested (or default) preset.
pub fn build_tasks(options: &CaptureOptions) -> Vec<CaptureTask> {
    let task = |preset: &str| CaptureTask {
        url: options.url.clone(),
        full_page: options.full_page,
        preset: preset.to_string(),
        name: options.name.clone(),
        dark: options.dark,
        image_format: options.image_format,
        output_dir: options.output_dir.clone(),
    };

    if options.all {
        presets::names().map(task).collect()
    } else {
        vec![task(options.preset.as_deref().unwrap_or(DEFAULT_PRESET))]
    }
}

/// `website-screenshot[-<name>]-<preset>-<timestamp_ms>.<ext>`
pub fn file_name(
    format: ImageFormat,
    preset: &str,
    name: Option<&str>,
    timestamp_ms: i64,
) -> String {
    let tag = name.map(|n| format!("-{n}")).unwrap_or_default();
    format!(
        "website-screenshot{tag}-{preset}-{timestamp_ms}.{}",
        format.extension()
    )
}

/// Where the file goes: inside `output_dir` when given, else the working directory.
pub fn output_path(file_name: String, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

impl CaptureTask {
    /// Output path for this task when captured at `timestamp_ms`.
    pub fn output_path(&self, timestamp_ms: i64) -> PathBuf {
        output_path(
            file_name(
                self.image_format,
                &self.preset,
                self.name.as_deref(),
                timestamp_ms,
            ),
            self.output_dir.as_deref(),
        )
    }
}
