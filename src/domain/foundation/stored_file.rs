//! References to objects held in the blob store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Storage bucket an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Version files.
    Documents,
    /// Visa attachments (annotated plans, observation sheets).
    Visas,
    /// Marché cover images.
    Covers,
    /// Company logos.
    Logos,
}

impl Bucket {
    /// Bucket name as used by the blob store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Documents => "documents",
            Bucket::Visas => "visas",
            Bucket::Covers => "covers",
            Bucket::Logos => "logos",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents" => Ok(Bucket::Documents),
            "visas" => Ok(Bucket::Visas),
            "covers" => Ok(Bucket::Covers),
            "logos" => Ok(Bucket::Logos),
            other => Err(ValidationError::invalid_format(
                "bucket",
                format!("unknown bucket '{}'", other),
            )),
        }
    }
}

/// A file persisted in the blob store and referenced from a version or visa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Bucket holding the object.
    pub bucket: Bucket,
    /// Object key within the bucket.
    pub key: String,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Hex SHA-256 of the content.
    pub checksum: String,
}

impl StoredFile {
    /// Returns the `bucket/key` path of the object.
    pub fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}
