// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Coordinator configuration
//!
//! Settings are stored in TOML format. Every field has a default, so a
//! partial file (or no file at all) yields a usable configuration.
//!
//! # Example
//!
//! ```
//! use oricra::core::config::CoordinatorConfig;
//!
//! let config = CoordinatorConfig::from_toml_str("fullscreen = true").unwrap();
//! assert!(config.fullscreen);
//! assert_eq!(config.display_width, 640);
//! ```

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logical overlay width (no scaling options)
pub const DEFAULT_DISPLAY_WIDTH: u32 = 640;

/// Logical overlay height (no scaling options)
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 480;

/// Keystrokes queued after a tape image is attached
pub const DEFAULT_TAPE_AUTOLOAD: &str = "CLOAD\"\"\r";

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Client name reported to the achievement engine
    pub client_name: String,

    /// Client version reported to the achievement engine
    pub client_version: String,

    /// Logical overlay width in pixels
    pub display_width: u32,

    /// Logical overlay height in pixels
    pub display_height: u32,

    /// Whether the host window is fullscreen
    pub fullscreen: bool,

    /// Re-activate the title even when the same title is re-inserted
    ///
    /// Default: false (swapping disks of one game keeps the session)
    pub reload_on_same_title: bool,

    /// Keystrokes typed after a tape image is attached
    pub tape_autoload_command: String,

    /// Attempt login during system initialization
    pub auto_login: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            client_name: "RAOricutron".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            display_width: DEFAULT_DISPLAY_WIDTH,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            fullscreen: false,
            reload_on_same_title: false,
            tape_autoload_command: DEFAULT_TAPE_AUTOLOAD.to_string(),
            auto_login: true,
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file
    ///
    /// # Returns
    ///
    /// - `Ok(CoordinatorConfig)` if the file was read and validated
    /// - `Err(ConfigError)` if reading, parsing or validation failed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero (got {}x{})",
                self.display_width, self.display_height
            )));
        }

        if self.client_name.trim().is_empty() {
            return Err(ConfigError::Invalid("client_name is empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.display_width, 640);
        assert_eq!(config.display_height, 480);
        assert!(!config.fullscreen);
        assert!(!config.reload_on_same_title);
        assert!(config.auto_login);
        assert_eq!(config.tape_autoload_command, "CLOAD\"\"\r");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CoordinatorConfig::from_toml_str(
            r#"
                fullscreen = true
                reload_on_same_title = true
            "#,
        )
        .unwrap();

        assert!(config.fullscreen);
        assert!(config.reload_on_same_title);
        assert_eq!(config.client_name, "RAOricutron");
        assert_eq!(config.display_height, 480);
    }

    #[test]
    fn test_zero_display_size_rejected() {
        let result = CoordinatorConfig::from_toml_str("display_width = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = CoordinatorConfig::from_toml_str("fullscreen = maybe");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_toml_string_reparses() {
        let config = CoordinatorConfig {
            fullscreen: true,
            tape_autoload_command: "RUN\r".to_string(),
            ..Default::default()
        };

        let text = config.to_toml_string().unwrap();
        let parsed = CoordinatorConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = CoordinatorConfig::load("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::Builder::new()
            .prefix("oricra_config_")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        std::fs::write(file.path(), "client_name = \"TestClient\"\n").unwrap();

        let config = CoordinatorConfig::load(file.path()).unwrap();
        assert_eq!(config.client_name, "TestClient");
    }
}
