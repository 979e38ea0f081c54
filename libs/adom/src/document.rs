use std::{cell::OnceCell, fmt::{Display, Formatter}};

use kstring::KString;

use crate::{element::Element,
            is_void_tag,
            keyed_vec::{EntryKey, KeyedVec},
            myfrom::MyFrom};

/// Creation and lookup of child elements, shared by `Document` (the
/// root level) and `Element` (its children).
pub trait Tree {
    fn nodes(&self) -> &KeyedVec<Element>;
    fn nodes_mut(&mut self) -> &mut KeyedVec<Element>;

    /// Append a new element, or store it at `bind`, replacing any
    /// element previously bound there.
    fn create<T>(&mut self, tag: T, value: Option<&str>, bind: Option<&str>) -> &mut Element
    where KString: MyFrom<T>
    {
        let elt = Element::new(tag, value);
        match bind {
            Some(key) => self.nodes_mut().insert(KString::from_ref(key), elt),
            None => self.nodes_mut().push(elt),
        }
    }

    /// Like `create`, but the new element goes first.
    fn create_prepend<T>(
        &mut self,
        tag: T,
        value: Option<&str>,
        bind: Option<&str>
    ) -> &mut Element
    where KString: MyFrom<T>
    {
        let elt = Element::new(tag, value);
        self.nodes_mut().prepend(bind.map(KString::from_ref), elt)
    }

    /// Create an empty element bound to `key`, so that it can be
    /// overwritten later.
    fn bind_tag<T>(&mut self, tag: T, key: &str, prepend: bool) -> &mut Element
    where KString: MyFrom<T>
    {
        if prepend {
            self.create_prepend(tag, None, Some(key))
        } else {
            self.create(tag, None, Some(key))
        }
    }

    fn element(&self, key: &str) -> Option<&Element> {
        self.nodes().get(key)
    }

    fn element_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.nodes_mut().get_mut(key)
    }

    fn elements(&self) -> &KeyedVec<Element> {
        self.nodes()
    }
}


pub(crate) fn print_element(
    elt: &mut Element,
    key: EntryKey<'_>,
    hook: &mut dyn FnMut(&mut Element, EntryKey<'_>, bool),
    out: &mut String,
) {
    let void = is_void_tag(elt.tag());
    hook(elt, key, void);
    let hidden = elt.hides_tag();
    if ! hidden {
        out.push('<');
        out.push_str(elt.tag());
        elt.attributes().print(out);
        out.push('>');
    }
    if ! void {
        // Also printed when the wrapper is hidden, so that a hidden
        // wrapper still lets its contents through.
        out.push_str(elt.value());
    }
    print_nodes(elt.nodes_mut(), hook, out);
    if ! hidden {
        if void {
            out.push('\n');
        } else {
            out.push_str("</");
            out.push_str(elt.tag());
            out.push_str(">\n");
        }
    }
}

pub(crate) fn print_nodes(
    nodes: &mut KeyedVec<Element>,
    hook: &mut dyn FnMut(&mut Element, EntryKey<'_>, bool),
    out: &mut String,
) {
    for (key, elt) in nodes.iter_mut() {
        print_element(elt, key, hook, out);
    }
}


/// A list of root elements which is serialized once and then kept.
#[derive(Debug, Default, Clone)]
pub struct Document {
    elements: KeyedVec<Element>,
    html: OnceCell<String>,
}

impl Tree for Document {
    fn nodes(&self) -> &KeyedVec<Element> {
        &self.elements
    }
    fn nodes_mut(&mut self) -> &mut KeyedVec<Element> {
        &mut self.elements
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialized document. Only the first call (or `execute`)
    /// builds it, elements added afterwards do not show up.
    pub fn get(&self) -> &str {
        self.html.get_or_init(|| {
            let mut elements = self.elements.clone();
            let mut out = String::new();
            print_nodes(&mut elements, &mut |_, _, _| (), &mut out);
            out
        })
    }

    /// Serialize (again), calling `hook` on every element before it
    /// is printed. Changes the hook makes to the elements are kept.
    pub fn execute(
        &mut self,
        hook: Option<&mut dyn FnMut(&mut Element, EntryKey<'_>, bool)>
    ) -> &str {
        let mut out = String::new();
        match hook {
            Some(hook) => print_nodes(&mut self.elements, hook, &mut out),
            None => print_nodes(&mut self.elements, &mut |_, _, _| (), &mut out),
        }
        self.html = OnceCell::new();
        self.html.get_or_init(|| out)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.get())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_create_and_nest() {
        let mut doc = Document::new();
        {
            let ul = doc.create("ul", None, None);
            ul.attr("class", Some("menu"));
            ul.create("li", Some("One"), None);
            ul.create("li", Some("Two"), None);
        }
        doc.create("br", None, None);
        assert_eq!(doc.get(),
                   "<ul class=\"menu\"><li>One</li>\n<li>Two</li>\n</ul>\n<br>\n");
    }

    #[test]
    fn t_keyed_overwrite() {
        let mut doc = Document::new();
        doc.create("title", Some("First"), Some("title"));
        doc.create("meta", None, None).attr("charset", Some("utf-8"));
        doc.create("title", Some("Second"), Some("title"));
        assert_eq!(doc.elements().len(), 2);
        assert_eq!(doc.get(), "<title>Second</title>\n<meta charset=\"utf-8\">\n");
    }

    #[test]
    fn t_bind_tag_prepend() {
        let mut doc = Document::new();
        doc.create("p", Some("body"), None);
        doc.bind_tag("h1", "heading", false).set_value(Some("End"));
        doc.bind_tag("h2", "top", true).set_value(Some("Start"));
        assert_eq!(doc.get(), "<h2>Start</h2>\n<p>body</p>\n<h1>End</h1>\n");
        assert_eq!(doc.element("top").map(|e| e.value()), Some("Start"));
    }

    #[test]
    fn t_memoized() {
        let mut doc = Document::new();
        doc.create("b", Some("x"), None);
        assert_eq!(doc.get(), "<b>x</b>\n");
        doc.create("i", Some("y"), None);
        // still the first result
        assert_eq!(doc.to_string(), "<b>x</b>\n");
        assert_eq!(doc.execute(None), "<b>x</b>\n<i>y</i>\n");
        assert_eq!(doc.get(), "<b>x</b>\n<i>y</i>\n");
    }

    #[test]
    fn t_execute_hook() {
        let mut doc = Document::new();
        doc.create("a", Some("link"), Some("nav"));
        doc.create("img", None, None);
        let mut seen = Vec::new();
        let mut hook = |elt: &mut Element, key: EntryKey<'_>, void: bool| {
            seen.push((elt.tag().to_string(), format!("{key:?}"), void));
            if elt.tag() == "a" {
                elt.attr("href", Some("/"));
            }
        };
        let html = doc.execute(Some(&mut hook)).to_string();
        assert_eq!(html, "<a href=\"/\">link</a>\n<img>\n");
        assert_eq!(seen, vec![("a".into(), "Name(\"nav\")".into(), false),
                              ("img".into(), "Index(0)".into(), true)]);
        // the change made by the hook stays
        assert_eq!(doc.element("nav").unwrap().attributes().get("href"), Some(Some("/")));
    }

    #[test]
    fn t_empty() {
        let doc = Document::new();
        assert_eq!(doc.get(), "");
    }
}
