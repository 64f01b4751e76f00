//! Locating a Chromium-family executable and install guidance.

use std::path::PathBuf;

/// Executable names searched for in `$PATH`. All of them speak CDP.
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "chrome-browser",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge",
    "microsoft-edge-stable",
    "brave",
    "brave-browser",
];

#[cfg(target_os = "macos")]
const INSTALL_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

#[cfg(target_os = "windows")]
const INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const INSTALL_PATHS: &[&str] = &[];

/// Find a browser executable.
///
/// Checked in order: the configured path, the `CHROME` environment variable,
/// platform install locations, then [`CHROMIUM_EXECUTABLES`] on `$PATH`.
/// Install locations come before `$PATH` because `$PATH` may hold stale
/// wrapper scripts.
pub fn detect_browser(custom_path: Option<&str>) -> Option<PathBuf> {
    custom_path
        .map(PathBuf::from)
        .into_iter()
        .chain(std::env::var_os("CHROME").map(PathBuf::from))
        .chain(INSTALL_PATHS.iter().map(PathBuf::from))
        .find(|p| p.exists())
        .or_else(|| {
            CHROMIUM_EXECUTABLES
                .iter()
                .find_map(|name| which::which(name).ok())
        })
}

/// Platform-specific install instructions, shown when no browser is found.
pub fn install_instructions() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium\n  \
         Fedora:        sudo dnf install chromium\n  \
         Arch:          sudo pacman -S chromium"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Or point to an existing binary in webshots.toml:\n  \
         [browser]\n  \
         chrome_path = \"/path/to/browser\"\n\n\
         Or set the CHROME environment variable."
    )
}
