//! Addressing of partials.
//!
//! A partial key `"group.sub"` registers under `group`/`sub` and uses
//! `sub` as the template file list. A bare `"name"` is group, subkey
//! and file at once. Further segments extend the subkey:
//! `"group.sub.x"` registers under `group`/`sub-x`, still using the
//! `sub` files. Leading `!` (optional file) and `|alternative` file
//! candidates do not become part of the group or subkey.

use kstring::KString;

use crate::str_util::strip_optional;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialKey {
    pub group: KString,
    pub subkey: KString,
    /// The file candidate list, including `!` markers.
    pub file: KString,
}

fn truncate_alternatives(s: &str) -> &str {
    match s.find('|') {
        Some(pos) => &s[..pos],
        None => s,
    }
}

fn clean(s: &str) -> &str {
    truncate_alternatives(strip_optional(s).1)
}

impl PartialKey {
    pub fn parse(key: &str) -> PartialKey {
        let mut segments = key.split('.');
        let first = segments.next().expect("split always gives one item");
        match segments.next() {
            None => {
                let name = KString::from_ref(clean(first));
                PartialKey {
                    group: name.clone(),
                    subkey: name,
                    file: KString::from_ref(first),
                }
            }
            Some(second) => {
                let mut subkey = strip_optional(second).1.to_string();
                for rest in segments {
                    subkey.push('-');
                    subkey.push_str(strip_optional(rest).1);
                }
                PartialKey {
                    group: KString::from_ref(clean(first)),
                    subkey: KString::from_ref(truncate_alternatives(&subkey)),
                    file: KString::from_ref(second),
                }
            }
        }
    }

    /// Whether the key names a whole group (no `.`).
    pub fn is_group_key(key: &str) -> bool {
        ! key.contains('.')
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn parts(key: &str) -> (String, String, String) {
        let k = PartialKey::parse(key);
        (k.group.to_string(), k.subkey.to_string(), k.file.to_string())
    }

    fn s3(a: &str, b: &str, c: &str) -> (String, String, String) {
        (a.into(), b.into(), c.into())
    }

    #[test]
    fn t_parse() {
        assert_eq!(parts("sidebar"), s3("sidebar", "sidebar", "sidebar"));
        assert_eq!(parts("!sidebar"), s3("sidebar", "sidebar", "!sidebar"));
        assert_eq!(parts("sidebar.widgets"), s3("sidebar", "widgets", "widgets"));
        assert_eq!(parts("sidebar.!widgets"), s3("sidebar", "widgets", "!widgets"));
        assert_eq!(parts("!sidebar.widgets"), s3("sidebar", "widgets", "widgets"));
        assert_eq!(parts("sidebar.widgets|fallback"),
                   s3("sidebar", "widgets", "widgets|fallback"));
        assert_eq!(parts("sidebar.widgets.top"), s3("sidebar", "widgets-top", "widgets"));
        assert_eq!(parts("a.b.c|d"), s3("a", "b-c", "b"));
        assert_eq!(parts("a|b"), s3("a", "a", "a|b"));
    }

    #[test]
    fn t_is_group_key() {
        assert!(PartialKey::is_group_key("sidebar"));
        assert!(! PartialKey::is_group_key("sidebar.widgets"));
    }
}
