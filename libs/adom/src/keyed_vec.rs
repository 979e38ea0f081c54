//! An ordered collection whose entries are either positional or
//! bound to a string key. Iteration follows insertion order; storing
//! to an existing key replaces the value in place.

use std::collections::HashMap;

use kstring::KString;

/// How an entry in a `KeyedVec` is addressed. Positional entries are
/// numbered in append order, counting positional entries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'k> {
    Index(usize),
    Name(&'k str),
}

#[derive(Debug, Clone)]
pub struct KeyedVec<T> {
    entries: Vec<(Option<KString>, T)>,
    // key -> position in `entries`
    index: HashMap<KString, usize>,
}

impl<T> Default for KeyedVec<T> {
    fn default() -> Self {
        KeyedVec {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> KeyedVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a positional entry.
    pub fn push(&mut self, val: T) -> &mut T {
        self.entries.push((None, val));
        let last = self.entries.len() - 1;
        &mut self.entries[last].1
    }

    /// Store `val` at `key`. An existing entry at `key` keeps its
    /// position and gets its value replaced, otherwise the entry is
    /// appended.
    pub fn insert(&mut self, key: KString, val: T) -> &mut T {
        let i = match self.index.get(&key) {
            Some(&i) => {
                self.entries[i].1 = val;
                i
            }
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((Some(key), val));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// The value at `key`, appending `f()` there first if the key is
    /// not bound yet.
    pub fn get_or_insert_with<F>(&mut self, key: &str, f: F) -> &mut T
    where F: FnOnce() -> T
    {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let key = KString::from_ref(key);
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((Some(key), f()));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Put `val` in front of all other entries. If `key` is given and
    /// already bound, the old entry is dropped first.
    pub fn prepend(&mut self, key: Option<KString>, val: T) -> &mut T {
        if let Some(key) = &key {
            if let Some(i) = self.index.remove(key) {
                self.entries.remove(i);
            }
        }
        self.entries.insert(0, (key, val));
        self.reindex();
        &mut self.entries[0].1
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let i = self.index.remove(key)?;
        let (_, val) = self.entries.remove(i);
        self.reindex();
        Some(val)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (key, _)) in self.entries.iter().enumerate() {
            if let Some(key) = key {
                self.index.insert(key.clone(), i);
            }
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryKey<'_>, &T)> {
        let mut pos = 0;
        self.entries.iter().map(move |(key, val)| {
            let k = match key {
                Some(key) => EntryKey::Name(key.as_str()),
                None => {
                    pos += 1;
                    EntryKey::Index(pos - 1)
                }
            };
            (k, val)
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntryKey<'_>, &mut T)> {
        let mut pos = 0;
        self.entries.iter_mut().map(move |(key, val)| {
            let k = match key {
                Some(key) => EntryKey::Name(key.as_str()),
                None => {
                    pos += 1;
                    EntryKey::Index(pos - 1)
                }
            };
            (k, val)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn keys(v: &KeyedVec<u32>) -> Vec<(String, u32)> {
        v.iter().map(|(k, v)| {
            let k = match k {
                EntryKey::Index(i) => i.to_string(),
                EntryKey::Name(n) => n.to_string(),
            };
            (k, *v)
        }).collect()
    }

    #[test]
    fn t_insert_overwrites_in_place() {
        let mut v = KeyedVec::new();
        v.push(1);
        v.insert(KString::from_static("a"), 2);
        v.push(3);
        v.insert(KString::from_static("a"), 4);
        assert_eq!(keys(&v), vec![("0".into(), 1), ("a".into(), 4), ("1".into(), 3)]);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn t_prepend() {
        let mut v = KeyedVec::new();
        v.push(1);
        v.insert(KString::from_static("a"), 2);
        v.prepend(Some(KString::from_static("b")), 3);
        v.prepend(None, 4);
        assert_eq!(keys(&v), vec![("0".into(), 4), ("b".into(), 3),
                                  ("1".into(), 1), ("a".into(), 2)]);
        assert_eq!(v.get("a"), Some(&2));

        // re-prepending an existing key moves it to the front
        v.prepend(Some(KString::from_static("a")), 5);
        assert_eq!(keys(&v), vec![("a".into(), 5), ("0".into(), 4),
                                  ("b".into(), 3), ("1".into(), 1)]);
        assert_eq!(v.get("b"), Some(&3));
    }

    #[test]
    fn t_remove() {
        let mut v = KeyedVec::new();
        v.insert(KString::from_static("a"), 1);
        v.insert(KString::from_static("b"), 2);
        assert_eq!(v.remove("a"), Some(1));
        assert_eq!(v.remove("a"), None);
        assert_eq!(v.get("b"), Some(&2));
        *v.get_mut("b").unwrap() = 7;
        assert_eq!(v.values().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn t_get_or_insert_with() {
        let mut v: KeyedVec<Vec<u32>> = KeyedVec::new();
        v.get_or_insert_with("a", Vec::new).push(1);
        v.get_or_insert_with("b", Vec::new).push(2);
        v.get_or_insert_with("a", || vec![99]).push(3);
        assert_eq!(v.get("a"), Some(&vec![1, 3]));
        assert_eq!(v.len(), 2);
    }
}
