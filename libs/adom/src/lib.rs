//! Html element trees that are built up imperatively and printed as
//! text. Elements can be bound to keys so that a later `create` with
//! the same key replaces them.

pub mod myfrom;
pub mod keyed_vec;
pub mod attributes;
pub mod element;
pub mod document;
pub mod registry;

use std::collections::HashSet;

use lazy_static::lazy_static;

pub use attributes::{AttributeSet, html_escape};
pub use document::{Document, Tree};
pub use element::Element;
pub use keyed_vec::{EntryKey, KeyedVec};
pub use registry::DomRegistry;

/// Elements that have neither a body nor a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "meta",
    "link",
    "img",
    "br",
    "hr",
    "input",
    "keygen",
    "param",
    "source",
    "track",
    "embed",
];

lazy_static!{
    static ref VOID_TAG_SET: HashSet<&'static str> = VOID_TAGS.iter().copied().collect();
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAG_SET.contains(tag)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_void_tag() {
        assert!(is_void_tag("img"));
        assert!(is_void_tag("embed"));
        assert!(! is_void_tag("div"));
        assert!(! is_void_tag("IMG"));
    }
}
