//! Optional TOML configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::games::Prefs;

const APP_DIR: &str = "safelearn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig
{
    /// Where the stored entries live.
    pub data_dir: PathBuf,
    pub sound: bool,
    pub parent_password: String,
    /// Falling-word speed multiplier, clamped to 0.5..=2.0 when used.
    pub typing_speed: f32,
}

fn default_data_dir() -> PathBuf
{
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for AppConfig
{
    fn default() -> Self
    {
        Self {
            data_dir: default_data_dir(),
            sound: true,
            parent_password: "parent123".to_string(),
            typing_speed: 1.0,
        }
    }
}

impl AppConfig
{
    /// `<config_dir>/safelearn/config.toml`
    pub fn default_path() -> PathBuf
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError>
    {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file is normal. A file that cannot be read or parsed yields
    /// defaults plus the error, for the caller to report once logging is up.
    pub fn load(path: Option<&Path>) -> (Self, Option<ConfigError>)
    {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return (Self::default(), None);
        }
        match Self::from_file(&path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config");
                (config, None)
            }
            Err(err) => (Self::default(), Some(err)),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError>
    {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn prefs(&self) -> Prefs
    {
        Prefs {
            sound: self.sound,
            typing_speed: self.typing_speed,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_other_defaults()
    {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "sound = false\ntyping_speed = 1.5\n").expect("write config");

        let (config, err) = AppConfig::load(Some(&path));
        assert!(err.is_none());
        assert!(!config.sound);
        assert_eq!(config.typing_speed, 1.5);
        assert_eq!(config.parent_password, "parent123");
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults()
    {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "sound = [not toml").expect("write config");

        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse { .. })));
        let (config, err) = AppConfig::load(Some(&path));
        assert_eq!(config, AppConfig::default());
        let err = err.expect("parse error is handed back");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn missing_file_uses_defaults()
    {
        let dir = TempDir::new().expect("temp dir");
        let (config, err) = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert_eq!(config, AppConfig::default());
        assert!(err.is_none());
    }

    #[test]
    fn serialized_config_parses_back()
    {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/safelearn-test"),
            sound: false,
            parent_password: "secret".to_string(),
            typing_speed: 0.5,
        };
        let text = config.to_toml().expect("serialize");
        let parsed: AppConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
        assert_eq!(parsed.prefs().typing_speed, 0.5);
    }
}
