//! A `Cache` keeping one file per key in a directory.

use std::{fs, path::{Path, PathBuf}, time::Duration};

use anyhow::{Result, Context, anyhow};
use kstring::KString;
use pct_str::{PctStr, PctString, URIReserved};
use serde::{Deserialize, Serialize};

use crate::{cache::Cache, io_util::{my_read_to_string, now_unixtime}};

const SUFFIX: &str = ".cache";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    // unixtime
    expires: u64,
    value: String,
}

/// Keys are percent-encoded into file names, so they may contain any
/// characters.
#[derive(Debug, Clone)]
pub struct FileSystemCache {
    dir: PathBuf,
}

fn key_to_filename(key: &str) -> String {
    format!("{}{SUFFIX}", PctString::encode(key.chars(), URIReserved))
}

fn filename_to_key(filename: &str) -> Option<KString> {
    let encoded = filename.strip_suffix(SUFFIX)?;
    let pct = PctStr::new(encoded).ok()?;
    Some(KString::from_string(pct.decode()))
}

impl FileSystemCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(
            || anyhow!("can't create cache directory {:?}", dir.to_string_lossy()))?;
        Ok(FileSystemCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key_to_filename(key))
    }

    fn read(&self, key: &str) -> Result<Option<Envelope>> {
        let path = self.path(key);
        if ! path.is_file() {
            return Ok(None)
        }
        let s = my_read_to_string(&path)?;
        let envelope: Envelope = serde_json::from_str(&s).with_context(
            || anyhow!("decoding cache file {:?}", path.to_string_lossy()))?;
        if envelope.expires > now_unixtime() {
            Ok(Some(envelope))
        } else {
            Ok(None)
        }
    }
}

impl Cache for FileSystemCache {
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read(key)?.map(|e| e.value))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let envelope = Envelope {
            expires: now_unixtime().checked_add(ttl.as_secs()).unwrap_or(u64::MAX),
            value: value.to_string(),
        };
        let path = self.path(key);
        // write and rename, so that readers never see half a file
        let tmp = self.dir.join(format!(".{}.tmp", key_to_filename(key)));
        fs::write(&tmp, serde_json::to_string(&envelope)?).with_context(
            || anyhow!("writing cache file {:?}", tmp.to_string_lossy()))?;
        fs::rename(&tmp, &path).with_context(
            || anyhow!("renaming cache file to {:?}", path.to_string_lossy()))?;
        Ok(())
    }

    fn delete_multiple(&self, keys: &[KString]) -> Result<()> {
        for key in keys {
            let path = self.path(key);
            match fs::remove_file(&path) {
                Ok(()) => (),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => (),
                Err(e) => return Err(e).with_context(
                    || anyhow!("deleting cache file {:?}", path.to_string_lossy())),
            }
        }
        Ok(())
    }

    fn get_all_keys(&self) -> Result<Vec<KString>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).with_context(
            || anyhow!("can't open directory for reading: {:?}",
                       self.dir.to_string_lossy()))?
        {
            let entry = entry.with_context(
                || anyhow!("reading directory: {:?}", self.dir.to_string_lossy()))?;
            let filename = entry.file_name();
            if let Some(key) = filename.to_str().and_then(filename_to_key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_filenames() {
        let f = key_to_filename("blog_side.widgets-1700000000");
        assert!(f.ends_with(SUFFIX));
        assert_eq!(filename_to_key(&f).as_deref(), Some("blog_side.widgets-1700000000"));
        let f = key_to_filename("a/b:c");
        assert!(! f.contains('/'));
        assert_eq!(filename_to_key(&f).as_deref(), Some("a/b:c"));
        assert_eq!(filename_to_key("stray.txt"), None);
    }

    #[test]
    fn t_fs_cache() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let c = FileSystemCache::new(dir.path().join("caches"))?;
        assert!(! c.has("p-1")?);
        c.set("p-1", "<b>one</b>", Duration::from_secs(600))?;
        c.set("p-2", "two", Duration::from_secs(600))?;
        c.set("q-1", "three", Duration::ZERO)?;
        assert!(c.has("p-1")?);
        assert_eq!(c.get("p-1")?.as_deref(), Some("<b>one</b>"));
        // expired
        assert!(! c.has("q-1")?);

        let mut keys = c.get_all_keys()?;
        keys.sort();
        assert_eq!(keys, vec![KString::from_static("p-1"),
                              KString::from_static("p-2"),
                              KString::from_static("q-1")]);
        c.delete_multiple(&[KString::from_static("p-1"), KString::from_static("nope")])?;
        assert!(! c.has("p-1")?);
        assert!(c.has("p-2")?);
        Ok(())
    }

    #[test]
    fn t_fs_cache_unbounded_ttl() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let c = FileSystemCache::new(dir.path())?;
        c.set("p-1", "one", Duration::MAX)?;
        assert!(c.has("p-1")?);
        assert_eq!(c.get("p-1")?.as_deref(), Some("one"));
        Ok(())
    }
}
