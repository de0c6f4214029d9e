//! # Local Address Cache
//!
//! Named addresses persisted across independent script runs, backed by a
//! sled key-value store. A script that creates a mint on Monday saves it as
//! `"mint"`; the script that mints on Tuesday loads it back instead of
//! re-reading console output.
//!
//! Strictly a between-runs convenience: nothing on the compile/sign/submit
//! path reads or writes this. Keys are UTF-8 names, values are raw 32-byte
//! addresses.

use sled::Tree;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::address::Address;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("cache entry {name:?} is corrupt: {reason}")]
    Corrupt { name: String, reason: String },
}

/// The tree holding the name → address mapping.
const ADDRESSES_TREE: &str = "addresses";

/// A persisted name → address mapping.
///
/// sled handles are thread-safe and cheap to clone; a single `AddressCache`
/// can be shared freely. Writes are flushed before `save` returns, so a
/// script killed right after saving still finds the entry next run.
#[derive(Debug, Clone)]
pub struct AddressCache {
    db: sled::Db,
    addresses: Tree,
}

impl AddressCache {
    /// Open or create a cache at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary in-memory cache, cleaned up on drop.
    /// Ideal for tests — no filesystem side effects.
    pub fn open_temporary() -> Result<Self, CacheError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, CacheError> {
        let addresses = db.open_tree(ADDRESSES_TREE)?;
        Ok(Self { db, addresses })
    }

    /// Persist `address` under `name`, overwriting any previous entry,
    /// and flush to disk.
    pub fn save(&self, name: &str, address: &Address) -> Result<(), CacheError> {
        self.addresses
            .insert(name.as_bytes(), address.as_bytes().as_slice())?;
        self.db.flush()?;
        Ok(())
    }

    /// Look up a single name.
    pub fn get(&self, name: &str) -> Result<Option<Address>, CacheError> {
        match self.addresses.get(name.as_bytes())? {
            None => Ok(None),
            Some(bytes) => {
                let address =
                    Address::try_from_slice(&bytes).map_err(|_| CacheError::Corrupt {
                        name: name.to_string(),
                        reason: format!("expected 32 bytes, found {}", bytes.len()),
                    })?;
                Ok(Some(address))
            }
        }
    }

    /// Load the complete mapping, sorted by name.
    pub fn load(&self) -> Result<BTreeMap<String, Address>, CacheError> {
        let mut map = BTreeMap::new();
        for entry in self.addresses.iter() {
            let (key, value) = entry?;
            let name = String::from_utf8(key.to_vec()).map_err(|_| CacheError::Corrupt {
                name: String::from_utf8_lossy(&key).into_owned(),
                reason: "key is not valid UTF-8".to_string(),
            })?;
            let address = Address::try_from_slice(&value).map_err(|_| CacheError::Corrupt {
                name: name.clone(),
                reason: format!("expected 32 bytes, found {}", value.len()),
            })?;
            map.insert(name, address);
        }
        Ok(map)
    }

    /// Remove an entry. Removing a missing name is not an error.
    pub fn remove(&self, name: &str) -> Result<(), CacheError> {
        self.addresses.remove(name.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_get_roundtrip() {
        let cache = AddressCache::open_temporary().unwrap();
        let mint = Address::new_unique();

        cache.save("mint", &mint).unwrap();
        assert_eq!(cache.get("mint").unwrap(), Some(mint));
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn save_overwrites_previous_entry() {
        let cache = AddressCache::open_temporary().unwrap();
        let first = Address::new_unique();
        let second = Address::new_unique();

        cache.save("record", &first).unwrap();
        cache.save("record", &second).unwrap();
        assert_eq!(cache.get("record").unwrap(), Some(second));
    }

    #[test]
    fn load_returns_all_entries_sorted() {
        let cache = AddressCache::open_temporary().unwrap();
        let mint = Address::new_unique();
        let metadata = Address::new_unique();
        cache.save("mint", &mint).unwrap();
        cache.save("metadata", &metadata).unwrap();

        let map = cache.load().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["mint"], mint);
        assert_eq!(map["metadata"], metadata);
        // BTreeMap iteration is name-sorted.
        let names: Vec<&String> = map.keys().collect();
        assert_eq!(names, vec!["metadata", "mint"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let cache = AddressCache::open_temporary().unwrap();
        cache.save("temp", &Address::new_unique()).unwrap();
        cache.remove("temp").unwrap();
        cache.remove("temp").unwrap();
        assert_eq!(cache.get("temp").unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_reported_not_propagated_as_garbage() {
        let cache = AddressCache::open_temporary().unwrap();
        cache
            .addresses
            .insert(b"broken", &[1u8, 2, 3][..])
            .unwrap();

        assert!(matches!(
            cache.get("broken"),
            Err(CacheError::Corrupt { .. })
        ));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mint = Address::new_unique();

        {
            let cache = AddressCache::open(dir.path()).unwrap();
            cache.save("mint", &mint).unwrap();
        }
        let reopened = AddressCache::open(dir.path()).unwrap();
        assert_eq!(reopened.get("mint").unwrap(), Some(mint));
    }
}
