//! Durable storage for the credential record.
//!
//! The connect flow keeps exactly one [`CredentialRecord`] at a time. Storage
//! is abstracted behind the [`SessionStore`] trait so the flow can be backed
//! by a file on disk in production and by memory in tests.
//!
//! Both bundled stores hold the record as JSON under the well-known key
//! [`STORAGE_KEY`]. Writes are last-writer-wins. Stored data that fails to
//! parse is reported as absent rather than as an error.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{CredentialRecord, MemorySessionStore, SessionStore, ShopDomain};
//!
//! let store = MemorySessionStore::new();
//! assert!(store.load().is_none());
//!
//! let record = CredentialRecord::new(
//!     ShopDomain::new("demo").unwrap(),
//!     "tok_abc".to_string(),
//!     "read_products".to_string(),
//! );
//! store.save(&record).unwrap();
//! assert_eq!(store.load(), Some(record));
//!
//! store.clear().unwrap();
//! store.clear().unwrap();
//! assert!(store.load().is_none());
//! ```

use crate::auth::session::CredentialRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// The key the credential record is stored under.
pub const STORAGE_KEY: &str = "shopify_auth";

/// Errors raised while writing or removing the stored record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record could not be encoded as JSON.
    #[error("Failed to serialize credential record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The record has an empty token or an out-of-range timestamp.
    #[error("Refusing to store an incomplete credential record")]
    IncompleteRecord,

    /// The backing file could not be written or removed.
    #[error("Failed to access session file '{path}': {source}")]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Single-slot storage for the credential record.
///
/// Implementations must be `Send + Sync`; the flow holds the store for the
/// lifetime of the process.
pub trait SessionStore: Send + Sync {
    /// Writes `record`, replacing any record already stored.
    ///
    /// A failed write leaves the previously stored record in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IncompleteRecord`] for a record that would not
    /// load back, or another [`StoreError`] if it could not be written.
    fn save(&self, record: &CredentialRecord) -> Result<(), StoreError>;

    /// Reads the stored record.
    ///
    /// Returns `None` when nothing is stored or the stored data is corrupt.
    fn load(&self) -> Option<CredentialRecord>;

    /// Removes the stored record. Removing an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage could not be modified.
    fn clear(&self) -> Result<(), StoreError>;
}

fn encode(record: &CredentialRecord) -> Result<String, StoreError> {
    if !record.is_complete() {
        return Err(StoreError::IncompleteRecord);
    }
    Ok(serde_json::to_string(record)?)
}

fn decode(raw: &str) -> Option<CredentialRecord> {
    match serde_json::from_str::<CredentialRecord>(raw) {
        Ok(record) if record.is_complete() => Some(record),
        Ok(_) => {
            tracing::warn!("Ignoring stored credential record with empty fields");
            None
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable stored credential record: {e}");
            None
        }
    }
}

/// A [`SessionStore`] held in process memory.
///
/// The record is kept in its serialized JSON form so that reads go through
/// the same decoding as the file store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with raw stored data.
    ///
    /// The data is not validated; a value that does not decode loads as absent.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let encoded = encode(record)?;
        *self.slot() = Some(encoded);
        Ok(())
    }

    fn load(&self) -> Option<CredentialRecord> {
        self.slot().as_deref().and_then(decode)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot().take();
        Ok(())
    }
}

/// A [`SessionStore`] backed by a JSON file.
///
/// The file is named after [`STORAGE_KEY`] (`shopify_auth.json`) inside the
/// configured directory and has owner-only permissions on Unix. Each save
/// writes a temporary file next to it and renames it into place.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Stores the record as `shopify_auth.json` inside `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::at_path(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    /// Stores the record at exactly `path`.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        // Created 0600 on Unix
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.as_file().sync_all().map_err(|e| self.io_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let encoded = encode(record)?;
        self.write(&encoded)?;
        tracing::debug!("Saved credential record to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Option<CredentialRecord> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => decode(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    "Failed to read session file {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed session file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// Verify the bundled stores are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemorySessionStore>();
    assert_send_sync::<FileSessionStore>();
    assert_send_sync::<StoreError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopDomain;
    use chrono::{TimeZone, Utc};

    fn sample_record() -> CredentialRecord {
        CredentialRecord::issued_at(
            ShopDomain::new("demo").unwrap(),
            "tok_abc".to_string(),
            "write_orders,read_products".to_string(),
            Utc.timestamp_millis_opt(1_700_000_123_456).unwrap(),
        )
    }

    #[test]
    fn test_memory_store_round_trips_all_fields() {
        let store = MemorySessionStore::new();
        let record = sample_record();

        store.save(&record).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.shop, record.shop);
        assert_eq!(loaded.access_token, "tok_abc");
        assert_eq!(loaded.scope, "write_orders,read_products");
        assert_eq!(loaded.issued_at, 1_700_000_123_456);
    }

    #[test]
    fn test_memory_store_save_overwrites_previous_record() {
        let store = MemorySessionStore::new();
        store.save(&sample_record()).unwrap();

        let mut replacement = sample_record();
        replacement.shop = ShopDomain::new("other-shop").unwrap();
        replacement.access_token = "tok_new".to_string();
        store.save(&replacement).unwrap();

        assert_eq!(store.load(), Some(replacement));
    }

    #[test]
    fn test_memory_store_clear_is_idempotent() {
        let store = MemorySessionStore::new();
        store.clear().unwrap();

        store.save(&sample_record()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_data_loads_as_absent() {
        for raw in [
            "not json",
            "{}",
            r#"{"shop":"demo.myshopify.com","accessToken":"tok","scope":"read_products"}"#,
            r#"{"shop":"bad shop!","accessToken":"tok","scope":"s","issuedAt":1}"#,
            r#"{"shop":"demo.myshopify.com","accessToken":"","scope":"s","issuedAt":1}"#,
        ] {
            let store = MemorySessionStore::with_raw(raw);
            assert!(store.load().is_none(), "expected absent for {raw}");
        }
    }

    #[test]
    fn test_stored_layout_uses_well_known_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_record()).unwrap();

        assert_eq!(store.path(), dir.path().join("shopify_auth.json"));

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["accessToken", "issuedAt", "scope", "shop"]);
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested"));

        assert!(store.load().is_none());

        let record = sample_record();
        store.save(&record).unwrap();
        assert_eq!(store.load(), Some(record));

        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(!store.path().exists());

        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_refuses_incomplete_record() {
        let store = MemorySessionStore::new();
        store.save(&sample_record()).unwrap();

        let mut incomplete = sample_record();
        incomplete.access_token.clear();

        assert!(matches!(
            store.save(&incomplete),
            Err(StoreError::IncompleteRecord)
        ));
        assert_eq!(store.load(), Some(sample_record()));
    }

    #[test]
    fn test_file_store_failed_save_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_record()).unwrap();

        let mut incomplete = sample_record();
        incomplete.access_token.clear();
        assert!(store.save(&incomplete).is_err());

        assert_eq!(store.load(), Some(sample_record()));
    }

    #[test]
    fn test_file_store_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_record()).unwrap();

        let mut replacement = sample_record();
        replacement.access_token = "tok_new".to_string();
        store.save(&replacement).unwrap();

        assert_eq!(store.load(), Some(replacement));
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("shopify_auth.json")]);
    }

    #[test]
    fn test_file_store_save_fails_when_target_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shopify_auth.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let store = FileSessionStore::at_path(&target);
        assert!(matches!(
            store.save(&sample_record()),
            Err(StoreError::Io { .. })
        ));
        // The temporary file is cleaned up on failure
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_file_store_treats_corrupt_file_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        fs::write(store.path(), "{ truncated").unwrap();

        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_record()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
