use crate::error::Result;

/// Abstract interface for the local key-value persistence facility.
///
/// Each store owns exactly one key and writes its whole state as one opaque
/// string blob. The backend knows nothing about records or the codec.
///
/// Backends are cheap handles: clones share the same underlying storage, so a
/// single backend can serve the plant, activity and settings stores at once.
pub trait StorageBackend {
    /// Read the blob stored under `key`.
    /// Returns Ok(None) when nothing has been written yet.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    /// MUST be atomic: readers see either the old blob or the new one.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob stored under `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
