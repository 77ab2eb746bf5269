// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host configuration.
//!
//! Supports both programmatic and file-based configuration.

use crate::codec::{qualified::check_component, CharSet};
use crate::invoke::{FormatTable, RetryPolicy, RECEIVER_HEADER_LEN};
use crate::scratch::DEFAULT_LIBRARY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Connection-independent settings for calls made on a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Character set of the host job.
    #[serde(default)]
    pub charset: CharSet,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub scratch: ScratchSettings,

    #[serde(default)]
    pub formats: FormatTable,
}

/// Scratch object settings for list programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchSettings {
    /// Library scratch objects are created in.
    #[serde(default = "default_library")]
    pub library: String,

    /// Initial size for field lists (QUSLFLD).
    #[serde(default = "default_field_list_capacity")]
    pub field_list_capacity: u32,

    /// Initial size for record format lists (QUSLRCD).
    #[serde(default = "default_record_list_capacity")]
    pub record_list_capacity: u32,

    /// Initial size for save file listings (QSRLSAVF).
    #[serde(default = "default_save_file_capacity")]
    pub save_file_capacity: u32,

    #[serde(default = "default_true")]
    pub auto_extend: bool,

    #[serde(default)]
    pub fill: u8,
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

fn default_field_list_capacity() -> u32 {
    80_000
}

fn default_record_list_capacity() -> u32 {
    20_000
}

fn default_save_file_capacity() -> u32 {
    80_000
}

fn default_true() -> bool {
    true
}

impl Default for ScratchSettings {
    fn default() -> Self {
        Self {
            library: default_library(),
            field_list_capacity: default_field_list_capacity(),
            record_list_capacity: default_record_list_capacity(),
            save_file_capacity: default_save_file_capacity(),
            auto_extend: true,
            fill: 0,
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if (self.retry.max_buffer_bytes as usize) < RECEIVER_HEADER_LEN {
            return Err(ConfigError::Invalid(format!(
                "retry.max_buffer_bytes must be at least {}",
                RECEIVER_HEADER_LEN
            )));
        }

        check_component(&self.scratch.library).map_err(|e| {
            ConfigError::Invalid(format!("scratch.library: {}", e))
        })?;

        let capacities = [
            ("field_list_capacity", self.scratch.field_list_capacity),
            ("record_list_capacity", self.scratch.record_list_capacity),
            ("save_file_capacity", self.scratch.save_file_capacity),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(ConfigError::Invalid(format!(
                    "scratch.{} must be greater than 0",
                    name
                )));
            }
        }

        if self.formats.variable_estimate == 0 {
            return Err(ConfigError::Invalid(
                "formats.variable_estimate must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.charset, CharSet::Ebcdic037);
        assert_eq!(config.retry.max_attempts, 8);
        assert_eq!(config.scratch.library, "QTEMP");
        assert_eq!(config.scratch.field_list_capacity, 80_000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
charset = "latin1"

[retry]
max_attempts = 3

[scratch]
library = "SCRATCH"
record_list_capacity = 4096

[formats]
variable_estimate = 4096

[formats.lengths]
OBJD0100 = 128
"#;

        let config = HostConfig::from_toml_str(toml).expect("parse");
        assert_eq!(config.charset, CharSet::Latin1);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.max_buffer_bytes, 16 * 1024 * 1024);
        assert_eq!(config.scratch.library, "SCRATCH");
        assert_eq!(config.scratch.record_list_capacity, 4096);
        assert_eq!(config.scratch.save_file_capacity, 80_000);
        assert!(config.scratch.auto_extend);
        assert_eq!(config.formats.initial_length("OBJD0100").ok(), Some(128));
        assert_eq!(config.formats.initial_length("FILD0200").ok(), Some(4096));
        assert_eq!(config.formats.initial_length("PGMI0100").ok(), Some(537));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = HostConfig::from_toml_str("").expect("parse");
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = HostConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = HostConfig::default();
        config.retry.max_buffer_bytes = 4;
        assert!(config.validate().is_err());

        let mut config = HostConfig::default();
        config.scratch.library = "WAYTOOLONGLIB".to_string();
        assert!(config.validate().is_err());

        let mut config = HostConfig::default();
        config.scratch.save_file_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_charset_rejected() {
        let err = HostConfig::from_toml_str("charset = \"utf8\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[retry]\nmax_buffer_bytes = 65536").expect("write");

        let config = HostConfig::from_file(file.path()).expect("load");
        assert_eq!(config.retry.max_buffer_bytes, 65536);

        let missing = HostConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
