// src/config.rs
//! Configuration management with file-based storage

use crate::{
    error::{RelayError, Result},
    relay::RelayMode,
    serialize::DeviceIdentity,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub serial_port: Option<String>,
    pub serial_baudrate: u32,
    pub identity: DeviceIdentity,
    pub mode: RelayMode,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            serial_port: None,
            serial_baudrate: 9600,
            identity: DeviceIdentity::default(),
            mode: RelayMode::Combined,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| RelayError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RelayError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| RelayError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// `$HOME/.config/nmea-relay/config.json`
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| RelayError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("nmea-relay")
            .join("config.json"))
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.serial_port = Some(port);
        self.serial_baudrate = baudrate;
    }

    /// Update the constant fields stamped on records
    pub fn update_identity(&mut self, device_id: Option<String>, route_id: Option<u32>) {
        if let Some(id) = device_id {
            self.identity.device_id = id;
        }
        if let Some(route) = route_id {
            self.identity.route_id = route;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("nmea-relay-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.serial_baudrate, 9600);
        assert_eq!(config.serial_port, None);
        assert_eq!(config.identity.device_id, "06ABC123");
        assert_eq!(config.identity.route_id, 1);
        assert_eq!(config.mode, RelayMode::Combined);
    }

    #[test]
    fn test_update_serial() {
        let mut config = RelayConfig::default();
        config.update_serial("/dev/ttyUSB0".to_string(), 115200);
        assert_eq!(config.serial_port, Some("/dev/ttyUSB0".to_string()));
        assert_eq!(config.serial_baudrate, 115200);
    }

    #[test]
    fn test_update_identity_keeps_unset_fields() {
        let mut config = RelayConfig::default();
        config.update_identity(None, Some(7));
        assert_eq!(config.identity.device_id, "06ABC123");
        assert_eq!(config.identity.route_id, 7);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut config = RelayConfig::default();
        config.update_serial("/dev/ttyS1".to_string(), 4800);
        config.mode = RelayMode::All;

        config.save_to(&path).unwrap();
        let loaded = RelayConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = RelayConfig::load_from(&temp_path("missing")).unwrap();
        assert_eq!(loaded, RelayConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"serial_port":"/dev/ttyAMA0"}"#).unwrap();

        let loaded = RelayConfig::load_from(&path).unwrap();
        assert_eq!(loaded.serial_port, Some("/dev/ttyAMA0".to_string()));
        assert_eq!(loaded.serial_baudrate, 9600);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            RelayConfig::load_from(&path),
            Err(RelayError::Config(_))
        ));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
