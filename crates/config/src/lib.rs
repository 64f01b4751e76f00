//! Configuration loading and env substitution for the screenshot tool.
//!
//! Config files: `webshots.toml`, `webshots.yaml`, or `webshots.json`
//! Searched in `./` then `~/.config/webshots/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{BrowserConfig, CaptureConfig, WebshotsConfig},
};
