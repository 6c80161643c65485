use crate::error::Error;
use crate::platform;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Explicit `Bookmarks` file. Falls back to the browser's default profile.
    pub bookmarks_file: Option<String>,
    pub browser: String,
    /// Copy the file to `<file>.bak` before writing changes.
    pub backup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bookmarks_file: None,
            browser: "chrome".to_string(),
            backup: true,
        }
    }
}

impl AppConfig {
    /// CLI override, then the configured file, then the platform default.
    pub fn resolve_bookmarks_path(&self, cli_override: Option<&str>) -> Result<PathBuf, Error> {
        if let Some(path) = cli_override.or(self.bookmarks_file.as_deref()) {
            return Ok(PathBuf::from(path));
        }
        platform::default_bookmarks_path(&self.browser).ok_or_else(|| {
            Error::Other(format!(
                "no bookmarks file configured and no default location known for browser '{}'",
                self.browser
            ))
        })
    }
}

/// `Config.toml` in the working directory (optional), overridden by
/// `BOOKMARK_DUPER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("browser", defaults.browser)?
        .set_default("backup", defaults.backup)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("BOOKMARK_DUPER"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
