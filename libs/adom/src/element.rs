use std::fmt::{Display, Formatter};

use kstring::KString;

use crate::{attributes::AttributeSet,
            document::{print_element, Tree},
            keyed_vec::{EntryKey, KeyedVec},
            myfrom::MyFrom};

/// A single tag with text value, attributes and child elements.
///
/// Children are created through the `Tree` methods, the same way as
/// for a `Document`.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: KString,
    value: Option<String>,
    attr: AttributeSet,
    children: KeyedVec<Element>,
    snippet: bool,
    hide_empty_tag: bool,
}

impl Element {
    pub fn new<T>(tag: T, value: Option<&str>) -> Element
    where KString: MyFrom<T>
    {
        Self::new_snippet(tag, value, false)
    }

    pub fn new_snippet<T>(tag: T, value: Option<&str>, snippet: bool) -> Element
    where KString: MyFrom<T>
    {
        Element {
            tag: KString::myfrom(tag),
            value: value.map(String::from),
            snippet,
            ..Default::default()
        }
    }

    /// Replace the tag name.
    pub fn set_tag<T>(&mut self, tag: T) -> &mut Self
    where KString: MyFrom<T>
    {
        self.tag = KString::myfrom(tag);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set the text between the opening and closing tag.
    pub fn set_value(&mut self, value: Option<&str>) -> &mut Self {
        self.value = value.map(String::from);
        self
    }

    /// The text value, empty if unset.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is_snippet(&self) -> bool {
        self.snippet
    }

    /// Set an attribute; `None` gives a boolean attribute.
    pub fn attr<K, V>(&mut self, key: K, val: Option<V>) -> &mut Self
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.attr.set(KString::myfrom(key), val.map(KString::myfrom));
        self
    }

    pub fn attrs<I, K, V>(&mut self, atts: I) -> &mut Self
    where I: IntoIterator<Item = (K, Option<V>)>,
          KString: MyFrom<K> + MyFrom<V>
    {
        self.attr.merge(atts);
        self
    }

    /// Append to an attribute value, e.g. another class name.
    pub fn attr_add<K>(&mut self, key: K, val: &str, sep: &str) -> &mut Self
    where KString: MyFrom<K>
    {
        self.attr.add_to_existing(KString::myfrom(key), val, sep);
        self
    }

    pub fn attr_add_to<K>(&mut self, key: K, val: &str, sep: &str) -> &mut Self
    where KString: MyFrom<K>
    {
        self.attr_add(key, val, sep)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attr
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attr
    }

    /// Leave out the opening and closing tag if the value is empty;
    /// the children are still printed.
    pub fn hide_empty_tag(&mut self, hide: bool) -> &mut Self {
        self.hide_empty_tag = hide;
        self
    }

    pub(crate) fn hides_tag(&self) -> bool {
        self.hide_empty_tag && self.value().is_empty()
    }

    /// A fresh, independent copy to be used as a new instance of a
    /// template element. `None` if there is no tag to copy.
    pub fn with_element(&self) -> Option<Element> {
        if self.tag.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }

    /// Print this element including its children. `hook` is called
    /// on every element right before it is printed and may modify it.
    pub fn execute(
        &mut self,
        hook: Option<&mut dyn FnMut(&mut Element, EntryKey<'_>, bool)>
    ) -> String {
        let mut out = String::new();
        match hook {
            Some(hook) => print_element(self, EntryKey::Index(0), hook, &mut out),
            None => print_element(self, EntryKey::Index(0), &mut |_, _, _| (), &mut out),
        }
        out
    }
}

impl Tree for Element {
    fn nodes(&self) -> &KeyedVec<Element> {
        &self.children
    }
    fn nodes_mut(&mut self) -> &mut KeyedVec<Element> {
        &mut self.children
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut e = self.clone();
        f.write_str(&e.execute(None))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_void_tags_ignore_value() {
        for tag in crate::VOID_TAGS {
            let mut e = Element::new(*tag, Some("ignored"));
            e.attr("class", Some("x"));
            let s = e.to_string();
            assert_eq!(s, format!("<{tag} class=\"x\">\n"));
        }
    }

    #[test]
    fn t_plain() {
        let mut e = Element::new("p", Some("Hello"));
        e.attr("id", Some("greeting")).attr("hidden", None::<&str>);
        assert_eq!(e.to_string(), "<p id=\"greeting\" hidden>Hello</p>\n");
    }

    #[test]
    fn t_hide_empty_tag() {
        let mut e = Element::new("div", None);
        e.hide_empty_tag(true);
        e.create("span", Some("inner"), None);
        assert_eq!(e.to_string(), "<span>inner</span>\n");

        e.set_value(Some("text"));
        assert_eq!(e.to_string(), "<div>text<span>inner</span>\n</div>\n");
    }

    #[test]
    fn t_hide_empty_tag_only_when_empty() {
        let mut e = Element::new("em", Some(""));
        e.hide_empty_tag(true);
        assert_eq!(e.to_string(), "");
        let mut e = Element::new("em", Some("x"));
        e.hide_empty_tag(true);
        assert_eq!(e.to_string(), "<em>x</em>\n");
    }

    #[test]
    fn t_with_element() {
        let mut proto = Element::new("li", Some("item"));
        proto.attr("class", Some("entry"));
        let mut copy = proto.with_element().unwrap();
        copy.set_value(Some("other")).attr_add("class", "active", " ");
        assert_eq!(proto.to_string(), "<li class=\"entry\">item</li>\n");
        assert_eq!(copy.to_string(), "<li class=\"entry active\">other</li>\n");

        assert!(Element::new("", None).with_element().is_none());
    }

    #[test]
    fn t_snippet() {
        assert!(Element::new_snippet("b", None, true).is_snippet());
        assert!(! Element::new("b", None).is_snippet());
    }
}
