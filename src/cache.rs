//! Key/value store for rendered partials.

use std::{collections::HashMap, sync::Mutex, time::{Duration, Instant}};

use anyhow::{Result, Context, anyhow};
use globset::Glob;
use kstring::KString;

/// What `SwiftRender` needs from a cache. Methods take `&self`, so
/// implementations synchronize internally.
pub trait Cache {
    fn has(&self, key: &str) -> Result<bool>;
    /// `None` if missing or expired.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    fn delete_multiple(&self, keys: &[KString]) -> Result<()>;
    fn get_all_keys(&self) -> Result<Vec<KString>>;
}

/// All keys in `cache` matching the glob `pattern`. Use
/// `globset::escape` for literal parts.
pub fn matching_keys(cache: &dyn Cache, pattern: &str) -> Result<Vec<KString>> {
    let matcher = Glob::new(pattern).with_context(
        || anyhow!("invalid cache key pattern {pattern:?}"))?.compile_matcher();
    Ok(cache.get_all_keys()?
       .into_iter()
       .filter(|k| matcher.is_match(k.as_str()))
       .collect())
}


struct Entry {
    value: String,
    // None: does not expire within what `Instant` can represent
    expires: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires.map_or(true, |t| t > now)
    }
}

/// In-process cache. Expired entries are dropped on `get` and
/// whenever a new entry is stored.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<KString, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<KString, Entry>>> {
        self.entries.lock().map_err(|_| anyhow!("MemoryCache: poisoned lock"))
    }
}

impl Cache for MemoryCache {
    fn has(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self.lock()?.get(key).map_or(false, |e| e.is_live(now)))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(e) if e.is_live(now) => Ok(Some(e.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let expires = now.checked_add(ttl);
        let mut entries = self.lock()?;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(KString::from_ref(key), Entry { value: value.to_string(), expires });
        Ok(())
    }

    fn delete_multiple(&self, keys: &[KString]) -> Result<()> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    fn get_all_keys(&self) -> Result<Vec<KString>> {
        let now = Instant::now();
        Ok(self.lock()?
           .iter()
           .filter(|(_, e)| e.is_live(now))
           .map(|(k, _)| k.clone())
           .collect())
    }
}
