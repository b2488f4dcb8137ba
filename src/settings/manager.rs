//! Settings manager for loading and saving the configuration
//!
//! This module provides the SettingsManager struct which handles:
//! - Locating the settings file (platform config dir or an explicit directory)
//! - Loading settings, falling back to defaults when the file is missing
//! - Backing up corrupt files instead of failing startup
//! - Saving settings atomically (temp file + rename)

use super::types::Config;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Current settings file version
pub const CURRENT_SETTINGS_VERSION: u32 = 1;

const APP_DIR_NAME: &str = "entity-overlay";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// The on-disk settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    pub version: u32,
    /// RFC 3339 local time of the last save
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub config: Config,
}

pub struct SettingsManager {
    directory: PathBuf,
}

impl SettingsManager {
    /// Creates a manager that stores settings in `directory`
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }
        Ok(SettingsManager { directory })
    }

    /// Creates a manager in the platform config directory
    pub fn in_config_dir() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDirectory)?;
        SettingsManager::new(base.join(APP_DIR_NAME))
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(SETTINGS_FILE_NAME)
    }

    /// Loads the configuration
    ///
    /// - Missing file: defaults
    /// - Newer version: `SettingsError::InvalidVersion`
    /// - Unparseable file: renamed to `settings.corrupt-<timestamp>.json`, defaults returned
    pub fn load(&self) -> Result<Config, SettingsError> {
        let path = self.path();
        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Config::default());
        }

        let json = fs::read_to_string(&path)?;
        let file: SettingsFile = match serde_json::from_str(&json) {
            Ok(file) => file,
            Err(err) => {
                let backup = self.backup_corrupt(&path)?;
                warn!(error = %err, backup = %backup.display(), "settings file is corrupt, using defaults");
                return Ok(Config::default());
            }
        };

        if file.version > CURRENT_SETTINGS_VERSION {
            return Err(SettingsError::InvalidVersion(file.version));
        }

        info!(path = %path.display(), saved_at = file.saved_at.as_deref().unwrap_or("-"), "settings loaded");
        Ok(file.config)
    }

    /// Saves the configuration, returning the written path
    pub fn save(&self, config: &Config) -> Result<PathBuf, SettingsError> {
        let file = SettingsFile {
            version: CURRENT_SETTINGS_VERSION,
            saved_at: Some(chrono::Local::now().to_rfc3339()),
            config: config.clone(),
        };

        // Pretty JSON so the file stays hand-editable
        let json = serde_json::to_string_pretty(&file)?;

        let path = self.path();
        let tmp = self.directory.join(format!("{SETTINGS_FILE_NAME}.tmp"));
        fs::write(&tmp, json)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            warn!(error = %err, "failed to move settings into place");
            return Err(err.into());
        }

        info!(path = %path.display(), "settings saved");
        Ok(path)
    }

    fn backup_corrupt(&self, path: &Path) -> Result<PathBuf, SettingsError> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup = self.directory.join(format!("settings.corrupt-{timestamp}.json"));
        fs::rename(path, &backup)?;
        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn temp_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "entity-overlay-test-{}-{}-{}",
            label,
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let manager = SettingsManager::new(temp_dir("missing")).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let manager = SettingsManager::new(temp_dir("roundtrip")).unwrap();
        let mut config = Config::default();
        config.appearance.global_opacity = 0.4;
        config.players.trails.enabled = true;

        let path = manager.save(&config).unwrap();
        assert!(path.exists());
        assert_eq!(manager.load().unwrap(), config);

        let raw: SettingsFile = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw.version, CURRENT_SETTINGS_VERSION);
        assert!(raw.saved_at.is_some());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let manager = SettingsManager::new(temp_dir("version")).unwrap();
        fs::write(manager.path(), r#"{ "version": 99 }"#).unwrap();
        assert!(matches!(manager.load(), Err(SettingsError::InvalidVersion(99))));
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let dir = temp_dir("corrupt");
        let manager = SettingsManager::new(&dir).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();

        assert_eq!(manager.load().unwrap(), Config::default());
        assert!(!manager.path().exists());

        let backups = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("settings.corrupt-"))
            .count();
        assert_eq!(backups, 1);
    }
}
