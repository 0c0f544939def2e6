//! Layered configuration for the `dd` binary.
//!
//! Later sources win: built-in defaults, the user config file
//! (`~/.config/dd/config.toml` on Linux), a file passed with `--config`,
//! then `DD_*` environment variables such as `DD_DATABASE_PATH`.

use std::path::{Path, PathBuf};

use dd_core::{Category, Priority};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "dd";
const ENV_PREFIX: &str = "DD_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the log snapshot.
    pub database_path: PathBuf,
    /// Category used by `dd add` when `--category` is omitted.
    pub default_category: Category,
    /// Priority used by `dd add` when `--priority` is omitted.
    pub default_priority: Priority,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = app_data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("dd.db"),
            default_category: Category::default(),
            default_priority: Priority::default(),
        }
    }
}

impl Config {
    /// Resolves the configuration, reading `explicit` after the user file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = app_config_dir().map(|dir| dir.join("config.toml"));
        Self::figment(user_file.as_deref(), explicit).extract()
    }

    fn figment(user_file: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let files = user_file.into_iter().chain(explicit);
        files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX))
    }
}

fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// On Linux: `~/.local/share/dd`
fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_toml(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        assert_eq!(config.database_path, app_data_dir().unwrap().join("dd.db"));
        assert_eq!(config.default_category, Category::Development);
        assert_eq!(config.default_priority, Priority::Medium);
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config: Config = Config::figment(Some(&temp.path().join("absent.toml")), None)
            .extract()
            .unwrap();
        assert_eq!(config.default_category, Category::Development);
    }

    #[test]
    fn test_explicit_file_overrides_user_file() {
        let temp = tempfile::tempdir().unwrap();
        let user = write_toml(
            temp.path(),
            "user.toml",
            "default_category = \"research\"\ndefault_priority = \"low\"\n",
        );
        let explicit = write_toml(
            temp.path(),
            "explicit.toml",
            "database_path = \"/tmp/custom.db\"\ndefault_priority = \"high\"\n",
        );

        let config: Config = Config::figment(Some(&user), Some(&explicit))
            .extract()
            .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.default_category, Category::Research);
        assert_eq!(config.default_priority, Priority::High);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let file = write_toml(temp.path(), "bad.toml", "default_category = \"gardening\"\n");
        assert!(Config::figment(None, Some(&file)).extract::<Config>().is_err());
    }
}
