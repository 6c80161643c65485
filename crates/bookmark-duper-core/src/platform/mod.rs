use std::path::PathBuf;

/// Default-profile `Bookmarks` file for a Chromium-family browser, relative to
/// the user's data directory on this platform. `None` for unknown browsers or
/// when the base directory cannot be determined.
pub fn default_bookmarks_path(browser: &str) -> Option<PathBuf> {
    let relative = profile_relative_dir(&browser.to_lowercase())?;
    let base = user_data_base()?;
    Some(base.join(relative).join("Default").join("Bookmarks"))
}

#[cfg(target_os = "windows")]
fn user_data_base() -> Option<PathBuf> {
    dirs::data_local_dir()
}

/// `~/Library/Application Support` on macOS, `$XDG_CONFIG_HOME` or
/// `~/.config` elsewhere.
#[cfg(not(target_os = "windows"))]
fn user_data_base() -> Option<PathBuf> {
    dirs::config_dir()
}

#[cfg(target_os = "windows")]
fn profile_relative_dir(browser: &str) -> Option<&'static str> {
    match browser {
        "chrome" => Some("Google/Chrome/User Data"),
        "chromium" => Some("Chromium/User Data"),
        "edge" => Some("Microsoft/Edge/User Data"),
        "brave" => Some("BraveSoftware/Brave-Browser/User Data"),
        _ => None,
    }
}

#[cfg(target_os = "macos")]
fn profile_relative_dir(browser: &str) -> Option<&'static str> {
    match browser {
        "chrome" => Some("Google/Chrome"),
        "chromium" => Some("Chromium"),
        "edge" => Some("Microsoft Edge"),
        "brave" => Some("BraveSoftware/Brave-Browser"),
        _ => None,
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn profile_relative_dir(browser: &str) -> Option<&'static str> {
    match browser {
        "chrome" => Some("google-chrome"),
        "chromium" => Some("chromium"),
        "edge" => Some("microsoft-edge"),
        "brave" => Some("BraveSoftware/Brave-Browser"),
        _ => None,
    }
}
