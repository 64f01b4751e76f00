mod capture_command;

use std::{path::PathBuf, process::ExitCode};

use {
    clap::Parser,
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    webshots_config::WebshotsConfig,
};

#[derive(Parser)]
#[command(
    name = "website-screenshots",
    version,
    about = "Take a screenshot of a website and save it as a file."
)]
struct Cli {
    #[command(flatten)]
    capture: capture_command::CaptureArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Config file (skips discovery of webshots.toml in ./ and ~/.config/webshots/).
    #[arg(long, env = "WEBSHOTS_CONFIG")]
    config: Option<PathBuf>,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<WebshotsConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config from --config");
            webshots_config::load_config(path)
        },
        None => Ok(webshots_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "website-screenshots starting");

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        },
    };

    capture_command::handle_capture(cli.capture, &config).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::capture_command::ImageFormatArg, clap::CommandFactory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn url_is_required() {
        assert!(Cli::try_parse_from(["website-screenshots"]).is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["website-screenshots", "--url", "https://example.com"])
            .unwrap();
        let args = &cli.capture;
        assert_eq!(args.url, "https://example.com");
        assert!(!args.full_page);
        assert!(!args.dark);
        assert!(!args.all);
        assert!(args.name.is_none());
        assert!(args.output.is_none());
        assert!(args.preset.is_none());
        assert!(args.image_format.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn long_flags() {
        let cli = Cli::try_parse_from([
            "website-screenshots",
            "--url",
            "https://example.com",
            "--fullPage",
            "--dark",
            "--name",
            "home",
            "--all",
            "--output",
            "/tmp/shots",
            "--preset",
            "pixel2",
            "--imageFormat",
            "jpeg",
        ])
        .unwrap();
        let args = &cli.capture;
        assert!(args.full_page);
        assert!(args.dark);
        assert!(args.all);
        assert_eq!(args.name.as_deref(), Some("home"));
        assert_eq!(args.output, Some(PathBuf::from("/tmp/shots")));
        assert_eq!(args.preset.as_deref(), Some("pixel2"));
        assert_eq!(args.image_format, Some(ImageFormatArg::Jpeg));
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from([
            "website-screenshots",
            "-u",
            "https://example.com",
            "-f",
            "-d",
            "-a",
            "-n",
            "home",
            "-o",
            "out",
            "-p",
            "4k",
            "-i",
            "png",
        ])
        .unwrap();
        let args = &cli.capture;
        assert!(args.full_page && args.dark && args.all);
        assert_eq!(args.preset.as_deref(), Some("4k"));
        assert_eq!(args.image_format, Some(ImageFormatArg::Png));
    }

    #[test]
    fn unknown_image_format_is_rejected() {
        assert!(
            Cli::try_parse_from([
                "website-screenshots",
                "--url",
                "https://example.com",
                "--imageFormat",
                "gif",
            ])
            .is_err()
        );
    }

    #[test]
    fn unknown_preset_is_accepted() {
        let cli = Cli::try_parse_from([
            "website-screenshots",
            "--url",
            "https://example.com",
            "--preset",
            "nokia3310",
        ])
        .unwrap();
        assert_eq!(cli.capture.preset.as_deref(), Some("nokia3310"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("webshots.toml");
        std::fs::write(&path, "[capture]\npreset = \"wqhd\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.capture.preset.as_deref(), Some("wqhd"));
    }
}
