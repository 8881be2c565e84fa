//! Implements an in-memory key-value store.

use std::collections::HashMap;

use crate::{Error, stores::KeyValueStore};

/// Keeps values in a hash map.
///
/// An optional quota limits the total size of the stored keys and values in
/// bytes, the way browser local storage does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn size_without(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(existing_key, _)| existing_key.as_str() != key)
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(key).cloned())
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    /// Returns an [Error::QuotaExceeded] if the store would grow past its quota.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if let Some(quota) = self.quota {
            let needed = self.size_without(key) + key.len() + value.len();

            if needed > quota {
                return Err(Error::QuotaExceeded { needed, quota });
            }
        }

        self.values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.values.remove(key);

        Ok(())
    }
}
