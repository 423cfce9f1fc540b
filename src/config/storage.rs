//! Blob storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where uploaded version files and visa attachments live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory; one sub-directory per bucket
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE_BASE_PATH"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./data/files")
}

// 50 MiB
fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StorageConfig::default();
        assert_eq!(config.max_file_size_bytes, 52_428_800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = StorageConfig {
            max_file_size_bytes: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUploadLimit)
        ));
    }

    #[test]
    fn empty_path_is_rejected() {
        let config = StorageConfig {
            base_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
