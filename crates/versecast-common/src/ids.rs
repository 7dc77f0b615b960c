//! Typed ID wrappers for type safety across versecast.
//!
//! Fileset identifiers are opaque hash strings assigned by the catalog
//! ingestion pipeline, so they wrap `String` rather than a UUID. Transaction
//! IDs group every signed URL issued in one response for audit/revocation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque hash identifier of a fileset (one edition of content in one medium).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilesetId(String);

impl FilesetId {
    /// Wrap a raw hash id string.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Borrow the raw hash id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FilesetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FilesetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for FilesetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier shared by every signed URL issued in one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random transaction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TransactionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
