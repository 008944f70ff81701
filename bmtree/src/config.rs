use crate::domain::entry::ListingOrder;
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace, warn};

pub const ENV_DB_URL: &str = "BMTREE_DB_URL";
pub const ENV_FOLDERS_FIRST: &str = "BMTREE_FOLDERS_FIRST";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    /// List sub-folders before bookmarks (default: true)
    #[serde(default = "default_folders_first")]
    pub folders_first: bool,

    /// Timeout for fetching page title and favicon
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/bmtree")
}

fn default_db_path() -> String {
    config_dir().join("bmtree.db").to_string_lossy().to_string()
}

fn default_folders_first() -> bool {
    true
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            folders_first: default_folders_first(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn listing_order(&self) -> ListingOrder {
        ListingOrder::from_folders_first(self.folders_first)
    }
}

fn parse_bool(name: &str, value: &str) -> DomainResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DomainError::Other(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str::<Settings>(&text).map_err(|e| {
        DomainError::Other(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Load settings: defaults, then a config file, then environment variables.
///
/// An explicit `config_file` has to exist and parse. The default
/// `~/.config/bmtree/config.toml` is optional and skipped with a warning if broken.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => {
            debug!("Loading config from: {:?}", path);
            read_config_file(path)?
        }
        None => {
            let default_path = config_dir().join("config.toml");
            if default_path.exists() {
                read_config_file(&default_path).unwrap_or_else(|e| {
                    warn!("Ignoring config: {}", e);
                    Settings::default()
                })
            } else {
                Settings::default()
            }
        }
    };

    if let Ok(db_url) = std::env::var(ENV_DB_URL) {
        trace!("Using {} from environment: {}", ENV_DB_URL, db_url);
        settings.db_url = db_url;
    }

    if let Ok(folders_first) = std::env::var(ENV_FOLDERS_FIRST) {
        settings.folders_first = parse_bool(ENV_FOLDERS_FIRST, &folders_first)?;
    }

    settings.db_url = shellexpand::tilde(&settings.db_url).to_string();

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    toml::to_string_pretty(&Settings::default())
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::EnvGuard;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config_file(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        (temp_dir, config_path)
    }

    fn clear_env() -> EnvGuard {
        let guard = EnvGuard::new();
        env::remove_var(ENV_DB_URL);
        env::remove_var(ENV_FOLDERS_FIRST);
        guard
    }

    #[test]
    #[serial]
    fn given_partial_config_file_when_loaded_then_defaults_fill_gaps() {
        let _guard = clear_env();
        let (_dir, path) = create_temp_config_file("db_url = \"/data/tree.db\"\n");

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.db_url, "/data/tree.db");
        assert!(settings.folders_first);
        assert_eq!(settings.fetch_timeout_ms, 10_000);
        assert_eq!(settings.listing_order(), ListingOrder::FoldersFirst);
    }

    #[test]
    #[serial]
    fn given_environment_when_loaded_then_overrides_file() {
        let _guard = clear_env();
        let (_dir, path) =
            create_temp_config_file("db_url = \"/data/tree.db\"\nfolders_first = true\n");
        env::set_var(ENV_DB_URL, "/env/tree.db");
        env::set_var(ENV_FOLDERS_FIRST, "no");

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.db_url, "/env/tree.db");
        assert_eq!(settings.listing_order(), ListingOrder::Interleaved);
    }

    #[test]
    #[serial]
    fn given_tilde_db_url_when_loaded_then_expanded() {
        let _guard = clear_env();
        env::set_var(ENV_DB_URL, "~/x/tree.db");

        let settings = load_settings(None).unwrap();

        assert!(!settings.db_url.starts_with('~'));
        assert!(settings.db_url.ends_with("x/tree.db"));
    }

    #[test]
    #[serial]
    fn given_bad_boolean_when_loaded_then_error() {
        let _guard = clear_env();
        env::set_var(ENV_FOLDERS_FIRST, "maybe");

        assert!(load_settings(None).is_err());
    }

    #[test]
    #[serial]
    fn given_missing_or_broken_explicit_file_when_loaded_then_error() {
        let _guard = clear_env();
        let (_dir, path) = create_temp_config_file("folders_first = \"nope\"");

        assert!(matches!(
            load_settings(Some(Path::new("/nonexistent/bmtree.toml"))),
            Err(DomainError::Io(_))
        ));
        assert!(matches!(
            load_settings(Some(&path)),
            Err(DomainError::Other(_))
        ));
    }

    #[test]
    fn given_default_config_when_generated_then_parses_back() {
        let text = generate_default_config();
        assert!(text.contains("db_url"));
        assert!(text.contains("folders_first = true"));

        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
