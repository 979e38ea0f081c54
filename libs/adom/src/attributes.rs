//! Ordered HTML attributes.
//!
//! Values are written out exactly as given: *no* HTML escaping
//! happens here. Whoever produces a value that may contain `"`, `<`
//! or `&` has to escape it before handing it over (see
//! `html_escape`), otherwise the output is open to markup
//! injection.

use kstring::KString;

use crate::myfrom::MyFrom;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    // `None` is a boolean attribute, printed as bare name
    atts: Vec<(KString, Option<KString>)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.atts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atts.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.atts.iter().position(|(k, _)| k.as_str() == key)
    }

    /// Set `key` to `val`. A key that is already present keeps its
    /// position.
    pub fn set(&mut self, key: KString, val: Option<KString>) {
        match self.position(&key) {
            Some(i) => self.atts[i].1 = val,
            None => self.atts.push((key, val)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.position(key).map(|i| self.atts[i].1.as_deref())
    }

    /// Shallow merge, entries from `atts` win.
    pub fn merge<I, K, V>(&mut self, atts: I)
    where I: IntoIterator<Item = (K, Option<V>)>,
          KString: MyFrom<K> + MyFrom<V>
    {
        for (k, v) in atts {
            self.set(KString::myfrom(k), v.map(KString::myfrom));
        }
    }

    /// Append `val` to the current value of `key`, separated by
    /// `sep`; sets it if `key` is missing (or boolean).
    pub fn add_to_existing(&mut self, key: KString, val: &str, sep: &str) {
        match self.position(&key) {
            Some(i) => {
                let new = match &self.atts[i].1 {
                    Some(old) => KString::from_string(format!("{old}{sep}{val}")),
                    None => KString::from_ref(val),
                };
                self.atts[i].1 = Some(new);
            }
            None => self.atts.push((key, Some(KString::from_ref(val)))),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<KString>> {
        let i = self.position(key)?;
        Some(self.atts.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.atts.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Print all attributes, each with a leading space.
    pub fn print(&self, out: &mut String) {
        for (k, v) in &self.atts {
            out.push(' ');
            out.push_str(k);
            if let Some(v) = v {
                out.push_str("=\"");
                out.push_str(v);
                out.push('"');
            }
        }
    }

    pub fn serialize(&self) -> String {
        let mut s = String::new();
        self.print(&mut s);
        s
    }
}

/// Escape text for use in element bodies or attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::myfrom::ks;

    #[test]
    fn t_serialize_in_insertion_order() {
        let mut a = AttributeSet::new();
        a.set(ks("class"), Some(ks("x")));
        a.set(ks("hidden"), None);
        a.set(ks("id"), Some(ks("main")));
        assert_eq!(a.serialize(), r#" class="x" hidden id="main""#);

        a.set(ks("class"), Some(ks("y")));
        assert_eq!(a.serialize(), r#" class="y" hidden id="main""#);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn t_merge() {
        let mut a = AttributeSet::new();
        a.set(ks("a"), Some(ks("1")));
        a.merge([("b", Some("2")), ("a", Some("3")), ("c", None)]);
        assert_eq!(a.serialize(), r#" a="3" b="2" c"#);
    }

    #[test]
    fn t_add_to_existing() {
        let mut a = AttributeSet::new();
        a.add_to_existing(ks("class"), "btn", " ");
        a.add_to_existing(ks("class"), "primary", " ");
        a.add_to_existing(ks("style"), "a:b", ";");
        a.add_to_existing(ks("style"), "c:d", ";");
        assert_eq!(a.get("class"), Some(Some("btn primary")));
        assert_eq!(a.serialize(), r#" class="btn primary" style="a:b;c:d""#);
    }

    #[test]
    fn t_no_escaping() {
        let mut a = AttributeSet::new();
        a.set(ks("title"), Some(ks("a<b")));
        assert_eq!(a.serialize(), r#" title="a<b""#);
        a.set(ks("title"), Some(KString::from_string(html_escape("a<\"b\""))));
        assert_eq!(a.serialize(), r#" title="a&lt;&quot;b&quot;""#);
    }
}
