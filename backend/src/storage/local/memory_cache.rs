use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::CacheKey;
use crate::storage::LocalCache;

/// Process-local cache; contents are lost when the process exits
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get_raw(&self, key: CacheKey) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| anyhow!("memory cache lock poisoned"))?;
        Ok(entries.get(&key).cloned())
    }

    fn set_raw(&self, key: CacheKey, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("memory cache lock poisoned"))?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("memory cache lock poisoned"))?;
        entries.remove(&key);
        Ok(())
    }
}
