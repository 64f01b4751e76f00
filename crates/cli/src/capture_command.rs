//! Screenshot flags, merged with config defaults and run to completion.

use std::{path::PathBuf, process::ExitCode};

use {
    anyhow::{Context, Result},
    clap::{Args, ValueEnum},
    webshots_browser::{
        BrowserConfig, CaptureOptions, ChromeCapturer, ImageFormat, build_tasks, run_tasks,
        validate_url,
    },
    webshots_config::{CaptureConfig, WebshotsConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Jpeg,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Jpeg => ImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// A URL to screenshot.
    #[arg(short, long)]
    pub url: String,

    /// Capture the full page instead of the viewport.
    #[arg(short = 'f', long = "fullPage")]
    pub full_page: bool,

    /// Use dark mode, if the site supports it.
    #[arg(short, long)]
    pub dark: bool,

    /// Optional name inserted into the file name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Capture every preset.
    #[arg(short, long)]
    pub all: bool,

    /// Directory where images are saved (must exist).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolution preset: iphone11, pixel2, galaxy, 4k, wqhd or fhd [default: fhd].
    /// Unknown names fall back to fhd.
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Image format [default: png].
    #[arg(short = 'i', long = "imageFormat", value_enum)]
    pub image_format: Option<ImageFormatArg>,
}

/// Merge flags over config defaults. Fails on values that can never work, so
/// no browser is launched for them.
pub fn capture_options(args: CaptureArgs, config: &CaptureConfig) -> Result<CaptureOptions> {
    validate_url(&args.url)?;

    let image_format = match (args.image_format, config.image_format.as_deref()) {
        (Some(arg), _) => arg.into(),
        (None, Some(configured)) => configured
            .parse::<ImageFormat>()
            .map_err(anyhow::Error::msg)
            .context("invalid capture.image_format in config")?,
        (None, None) => ImageFormat::default(),
    };

    Ok(CaptureOptions {
        url: args.url,
        full_page: args.full_page,
        // Unknown names are resolved to the default preset at capture time.
        preset: args.preset.or_else(|| config.preset.clone()),
        name: args.name,
        dark: args.dark,
        all: args.all,
        image_format,
        output_dir: args.output.or_else(|| config.output_dir.clone()),
    })
}

/// Build the task list, run it, and report the outcome to the user.
pub async fn handle_capture(args: CaptureArgs, config: &WebshotsConfig) -> ExitCode {
    let options = match capture_options(args, &config.capture) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        },
    };

    let capturer = ChromeCapturer::new(BrowserConfig::from(&config.browser));

    match run_tasks(&capturer, build_tasks(&options)).await {
        Ok(_) => {
            println!("Done! Have a nice day.");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{e}");
            if let Some(dir) = e.missing_output_dir() {
                eprintln!("Output directory \"{}\" does not exist.", dir.display());
            }
            eprintln!("An error happened while taking screenshots.");
            ExitCode::FAILURE
        },
    }
}
