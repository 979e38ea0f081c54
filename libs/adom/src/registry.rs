//! Named `Document`s, created on first access.
//!
//! Create one registry per request (or per process if only a single
//! thread renders); it is not synchronized.

use std::collections::HashMap;

use kstring::KString;

use crate::document::Document;

#[derive(Debug, Default, Clone)]
pub struct DomRegistry {
    docs: HashMap<KString, Document>,
}

impl DomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document for `key`, created if it doesn't exist yet.
    pub fn dom(&mut self, key: &str) -> &mut Document {
        self.docs.entry(KString::from_ref(key)).or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.docs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.docs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
