use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const MIN_LINE_WIDTH: usize = 20;

/// Configuration for shelf, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Width of printed tables; the terminal width when unset
    #[serde(default)]
    pub line_width: Option<usize>,

    /// Where attached files are stored; `<data dir>/files` when unset
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
}

/// Keys accepted by `shelf config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    LineWidth,
    MediaDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::LineWidth, ConfigKey::MediaDir];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LineWidth => "line-width",
            ConfigKey::MediaDir => "media-dir",
        }
    }
}

impl std::str::FromStr for ConfigKey {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.replace('_', "-").as_str() {
            "line-width" => Ok(ConfigKey::LineWidth),
            "media-dir" => Ok(ConfigKey::MediaDir),
            other => Err(ShelfError::Config(format!("Unknown config key: {}", other))),
        }
    }
}

impl ShelfConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShelfError::Io)?;
        let config: ShelfConfig =
            serde_json::from_str(&content).map_err(ShelfError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShelfError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShelfError::Serialization)?;
        fs::write(config_path, content).map_err(ShelfError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::LineWidth => self.line_width.map(|w| w.to_string()),
            ConfigKey::MediaDir => self.media_dir.as_ref().map(|p| p.display().to_string()),
        }
    }

    /// Set a key from its textual value; an empty value unsets it.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::LineWidth if value.is_empty() => self.line_width = None,
            ConfigKey::LineWidth => {
                let width: usize = value.parse().map_err(|_| {
                    ShelfError::invalid_value(key.name(), value, "expected a number of columns")
                })?;
                if width < MIN_LINE_WIDTH {
                    return Err(ShelfError::invalid_value(
                        key.name(),
                        value,
                        format!("must be at least {}", MIN_LINE_WIDTH),
                    ));
                }
                self.line_width = Some(width);
            }
            ConfigKey::MediaDir if value.is_empty() => self.media_dir = None,
            ConfigKey::MediaDir => self.media_dir = Some(PathBuf::from(value)),
        }
        Ok(())
    }

    /// Media directory, resolved against the data directory.
    pub fn media_dir_in(&self, data_dir: &Path) -> PathBuf {
        match &self.media_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => data_dir.join(dir),
            None => data_dir.join("files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ShelfConfig::default();
        assert_eq!(config.line_width, None);
        assert_eq!(config.media_dir, None);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = ShelfConfig::load(dir.path()).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = ShelfConfig::default();
        config.set(ConfigKey::LineWidth, "120").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = ShelfConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.line_width, Some(120));
    }

    #[test]
    fn test_line_width_validation() {
        let mut config = ShelfConfig::default();
        assert!(config.set(ConfigKey::LineWidth, "wide").is_err());
        assert!(config.set(ConfigKey::LineWidth, "5").is_err());
        config.set(ConfigKey::LineWidth, "80").unwrap();
        config.set(ConfigKey::LineWidth, "").unwrap();
        assert_eq!(config.line_width, None);
    }

    #[test]
    fn test_media_dir_resolution() {
        let data = Path::new("/data/shelf");
        let mut config = ShelfConfig::default();
        assert_eq!(config.media_dir_in(data), data.join("files"));
        config.set(ConfigKey::MediaDir, "blobs").unwrap();
        assert_eq!(config.media_dir_in(data), data.join("blobs"));
        config.set(ConfigKey::MediaDir, "/mnt/media").unwrap();
        assert_eq!(config.media_dir_in(data), PathBuf::from("/mnt/media"));
    }

    #[test]
    fn test_key_names() {
        assert_eq!("line_width".parse::<ConfigKey>().unwrap(), ConfigKey::LineWidth);
        assert_eq!("media-dir".parse::<ConfigKey>().unwrap(), ConfigKey::MediaDir);
        assert!("colour".parse::<ConfigKey>().is_err());
    }
}
