//! The template dispatcher.
//!
//! Templates are registered per slot (index, buffer, view, or a
//! keyed partial) and only executed when a slot is selected and
//! `get` is called:
//!
//! ```ignore
//! render.set_view_dir("tpl/views").set_view("home", args);
//! let html = render.view(None).get(None)?;
//! ```
//!
//! A selection is used up by `get`, even if that fails.

use std::{collections::HashMap,
          fmt::Display,
          path::{Path, PathBuf},
          sync::Arc,
          time::Duration};

use adom::{DomRegistry, Document, Element, KeyedVec};
use kstring::KString;
use serde_json::Value;

use crate::{args::{Args, merge_args},
            builder::{Resource, SlotBuilder},
            cache::Cache,
            config::{RenderConfig, DEFAULT_FILE_ENDING},
            container::{Container, Service},
            error::{RenderError, RenderErrorKind},
            nowarn,
            partial_key::PartialKey,
            slot::SlotKind,
            template::{RawFileEngine, TemplateEngine},
            time_guard};

/// Partial builders by group, then subkey.
type Partials = KeyedVec<KeyedVec<Vec<Arc<SlotBuilder>>>>;

#[derive(Debug, Clone)]
enum Selection {
    Slot(SlotKind, Option<Args>),
    Partial(KString),
}

#[derive(Debug, Clone)]
struct StatusBinding {
    builder: Arc<SlotBuilder>,
    triggers: Vec<KString>,
}

#[derive(Clone)]
pub struct SwiftRender {
    file_ending: KString,
    // file list for the next set_partial or bind_to_body
    file: Option<KString>,
    dirs: HashMap<SlotKind, PathBuf>,

    index: Option<Arc<SlotBuilder>>,
    buffer: Option<Arc<SlotBuilder>>,
    view: Option<Arc<SlotBuilder>>,
    partials: Partials,

    bindings: KeyedVec<StatusBinding>,
    bound_view: Option<Arc<SlotBuilder>>,

    selected: Option<Selection>,

    engine: Arc<dyn TemplateEngine>,
    cache: Option<Arc<dyn Cache>>,
    container: Option<Arc<dyn Container>>,
    dom: DomRegistry,
}

impl Default for SwiftRender {
    fn default() -> Self {
        SwiftRender::new(RawFileEngine)
    }
}

impl SwiftRender {
    pub fn new<E: TemplateEngine + 'static>(engine: E) -> Self {
        SwiftRender {
            file_ending: KString::from_static(DEFAULT_FILE_ENDING),
            file: None,
            dirs: HashMap::new(),
            index: None,
            buffer: None,
            view: None,
            partials: KeyedVec::new(),
            bindings: KeyedVec::new(),
            bound_view: None,
            selected: None,
            engine: Arc::new(engine),
            cache: None,
            container: None,
            dom: DomRegistry::new(),
        }
    }

    pub fn from_config<E: TemplateEngine + 'static>(engine: E, config: &RenderConfig) -> Self {
        let mut render = SwiftRender::new(engine);
        render.apply_config(config);
        render
    }

    /// Take over the directories that are set in `config`, and its
    /// file ending.
    pub fn apply_config(&mut self, config: &RenderConfig) -> &mut Self {
        for slot in SlotKind::members() {
            if let Some(dir) = config.dir(*slot) {
                self.set_dir(*slot, dir);
            }
        }
        self.set_file_ending(&config.file_ending)
    }

    // ---- Configuration ------------------------------------------------

    pub fn set_engine<E: TemplateEngine + 'static>(&mut self, engine: E) -> &mut Self {
        self.engine = Arc::new(engine);
        self
    }

    /// Ending of template files, without the dot.
    pub fn set_file_ending(&mut self, ending: &str) -> &mut Self {
        self.file_ending = KString::from_ref(ending.trim_start_matches('.'));
        self
    }

    pub fn file_ending(&self) -> &str {
        &self.file_ending
    }

    /// Use `files` instead of the key for the next `set_partial` or
    /// `bind_to_body`.
    pub fn set_file(&mut self, files: &str) -> &mut Self {
        self.file = Some(KString::from_ref(files));
        self
    }

    pub fn set_dir<P: Into<PathBuf>>(&mut self, slot: SlotKind, dir: P) -> &mut Self {
        self.dirs.insert(slot, dir.into());
        self
    }

    pub fn set_index_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.set_dir(SlotKind::Index, dir)
    }

    pub fn set_buffer_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.set_dir(SlotKind::Buffer, dir)
    }

    pub fn set_view_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.set_dir(SlotKind::View, dir)
    }

    pub fn set_partial_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.set_dir(SlotKind::Partial, dir)
    }

    pub fn dir(&self, slot: SlotKind) -> Option<&Path> {
        self.dirs.get(&slot).map(PathBuf::as_path)
    }

    /// Needed before registering partials with a cache lifetime.
    pub fn set_cache(&mut self, cache: Arc<dyn Cache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.cache.as_ref()
    }

    pub fn set_container(&mut self, container: Arc<dyn Container>) -> &mut Self {
        self.container = Some(container);
        self
    }

    pub fn container(&self) -> Option<&Arc<dyn Container>> {
        self.container.as_ref()
    }

    // ---- Registration -------------------------------------------------

    pub fn set_index<R: Into<Resource>>(&mut self, resource: R, args: Args) -> &mut Self {
        self.index = Some(Arc::new(SlotBuilder::new(resource.into(), args)));
        self
    }

    pub fn set_view<R: Into<Resource>>(&mut self, resource: R, args: Args) -> &mut Self {
        self.view = Some(Arc::new(SlotBuilder::new(resource.into(), args)));
        self
    }

    /// Use `text` as the buffer, e.g. the body produced by a handler.
    pub fn set_buffer<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.buffer = Some(Arc::new(SlotBuilder::new(
            Resource::Text(text.into()), Args::new())));
        self
    }

    pub fn set_buffer_resource<R: Into<Resource>>(&mut self, resource: R, args: Args) -> &mut Self {
        self.buffer = Some(Arc::new(SlotBuilder::new(resource.into(), args)));
        self
    }

    /// Register a partial under `key` (see `PartialKey`). Registering
    /// the same key again adds another builder; all of them are run
    /// in order. With `cache_ttl`, the output is kept in the cache,
    /// which has to be set already.
    pub fn set_partial(
        &mut self,
        key: &str,
        args: Args,
        cache_ttl: Option<Duration>,
    ) -> Result<&mut Self, RenderError> {
        if cache_ttl.is_some() && self.cache.is_none() {
            return Err(RenderErrorKind::CacheMisconfigured {
                partial: KString::from_ref(key)
            }.into())
        }
        let pk = PartialKey::parse(key);
        let files = self.file.take().unwrap_or(pk.file);
        let builders = self.partials
            .get_or_insert_with(&pk.group, KeyedVec::new)
            .get_or_insert_with(&pk.subkey, Vec::new);
        let builder = SlotBuilder::for_partial(
            Resource::Files(files), args, key, builders.len(), cache_ttl);
        builders.push(Arc::new(builder));
        Ok(self)
    }

    /// Register a template that replaces the index or buffer once
    /// `find_bind` is called with one of `triggers`. It is looked up in
    /// the directory of the slot it replaces.
    pub fn bind_to_body<I, T>(&mut self, key: &str, triggers: I, args: Args) -> &mut Self
    where I: IntoIterator<Item = T>,
          T: Display
    {
        let files = self.file.take().unwrap_or_else(|| KString::from_ref(key));
        let builder = Arc::new(SlotBuilder::new(Resource::Files(files), args));
        let triggers = triggers.into_iter()
            .map(|t| KString::from_string(t.to_string()))
            .collect();
        self.bindings.insert(KString::from_ref(key), StatusBinding { builder, triggers });
        self
    }

    /// Activate the first binding that lists `value` as a trigger.
    /// An already active binding is only replaced if `overwrite` is
    /// true. Returns whether a binding was activated.
    pub fn find_bind<T: Display>(&mut self, value: T, overwrite: bool) -> bool {
        let value = value.to_string();
        if self.bound_view.is_some() && ! overwrite {
            nowarn!("find_bind({value:?}): keeping the active binding");
            return false
        }
        let found = self.bindings.values()
            .find(|b| b.triggers.iter().any(|t| t.as_str() == value))
            .map(|b| b.builder.clone());
        match found {
            Some(builder) => {
                self.bound_view = Some(builder);
                true
            }
            None => false
        }
    }

    /// Remove all partials in `group`.
    pub fn unset_partial(&mut self, group: &str) -> &mut Self {
        self.partials.remove(&PartialKey::parse(group).group);
        self
    }

    /// Whether a partial is registered for `key`, which may be a
    /// group or a `group.subkey`.
    pub fn has_partial(&self, key: &str) -> bool {
        let pk = PartialKey::parse(key);
        match self.partials.get(&pk.group) {
            None => false,
            Some(group) => PartialKey::is_group_key(key) || group.contains_key(&pk.subkey),
        }
    }

    /// Whether anything is registered in `group`.
    pub fn partial_exists(&self, group: &str) -> bool {
        self.partials.get(group).map_or(false, |g| ! g.is_empty())
    }

    /// Whether something is registered for `slot`.
    pub fn exists(&self, slot: SlotKind) -> bool {
        match slot {
            SlotKind::Index => self.index.is_some(),
            SlotKind::Buffer => self.buffer.is_some(),
            SlotKind::View => self.view.is_some(),
            SlotKind::Partial => ! self.partials.is_empty(),
        }
    }

    // ---- Selection ------------------------------------------------------

    pub fn index(&mut self, args: Option<Args>) -> &mut Self {
        self.selected = Some(Selection::Slot(SlotKind::Index, args));
        self
    }

    pub fn buffer(&mut self) -> &mut Self {
        self.selected = Some(Selection::Slot(SlotKind::Buffer, None));
        self
    }

    pub fn view(&mut self, args: Option<Args>) -> &mut Self {
        self.selected = Some(Selection::Slot(SlotKind::View, args));
        self
    }

    pub fn partial(&mut self, key: &str) -> &mut Self {
        self.selected = Some(Selection::Partial(KString::from_ref(key)));
        self
    }

    /// A copy of this dispatcher with `resource` as the view, already
    /// selected.
    pub fn with_view<R: Into<Resource>>(&self, resource: R, args: Args) -> SwiftRender {
        let mut render = self.clone();
        render.set_view(resource, args).view(None);
        render
    }

    // ---- Materialization --------------------------------------------------

    /// Render the selected slot. `args` are merged over those given
    /// to the selector, which are merged over the registered ones.
    pub fn get(&mut self, args: Option<Args>) -> Result<String, RenderError> {
        time_guard!("SwiftRender::get");
        let selection = self.selected.take().ok_or_else(
            || RenderError::missing_view("selected"))?;
        let (slot, builders, selector_args) = match selection {
            Selection::Slot(slot, selector_args) =>
                (slot, vec![self.slot_builder(slot)?], selector_args),
            Selection::Partial(key) =>
                (SlotKind::Partial, self.partial_builders(&key)?, None),
        };
        let runtime = match (selector_args, args) {
            (Some(a), Some(b)) => merge_args(&a, &b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => Args::new(),
        };
        let mut out = String::new();
        for builder in builders {
            builder.invoke(self, slot, &runtime, &mut out)?;
        }
        Ok(out)
    }

    fn slot_builder(&self, slot: SlotKind) -> Result<Arc<SlotBuilder>, RenderError> {
        if slot.takes_bound_view() {
            if let Some(builder) = &self.bound_view {
                return Ok(builder.clone())
            }
        }
        let builder = match slot {
            SlotKind::Index => self.index.as_ref(),
            SlotKind::Buffer => self.buffer.as_ref(),
            SlotKind::View => self.view.as_ref(),
            SlotKind::Partial => None,
        };
        builder.cloned().ok_or_else(|| RenderError::missing_view(slot.as_str()))
    }

    fn partial_builders(&self, key: &str) -> Result<Vec<Arc<SlotBuilder>>, RenderError> {
        let pk = PartialKey::parse(key);
        let builders: Vec<Arc<SlotBuilder>> = match self.partials.get(&pk.group) {
            None => vec![],
            Some(group) =>
                if PartialKey::is_group_key(key) {
                    group.values().flatten().cloned().collect()
                } else {
                    group.get(&pk.subkey).cloned().unwrap_or_default()
                }
        };
        if builders.is_empty() {
            Err(RenderError::missing_view(format!("partial {key:?}")))
        } else {
            Ok(builders)
        }
    }

    /// Run the template engine on `path`. Used by `SlotBuilder`.
    pub fn execute_template(
        &mut self,
        path: &Path,
        args: &Args,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let engine = self.engine.clone();
        engine.execute(path, args, self, out).map_err(
            |error| RenderErrorKind::Template { path: path.to_path_buf(), error }.into())
    }

    // ---- Markup -----------------------------------------------------------

    /// The document named `key`, created on first use.
    pub fn dom(&mut self, key: &str) -> &mut Document {
        self.dom.dom(key)
    }

    pub fn dom_registry(&self) -> &DomRegistry {
        &self.dom
    }

    /// A detached element, e.g. to print from a template.
    pub fn create_tag<I, K, V>(&self, tag: &str, value: Option<&str>, attrs: I) -> Element
    where I: IntoIterator<Item = (K, Option<V>)>,
          K: AsRef<str>,
          V: AsRef<str>
    {
        let mut elt = Element::new(tag, value);
        for (k, v) in attrs {
            let val: Option<&str> = v.as_ref().map(|v| v.as_ref());
            elt.attr(k.as_ref(), val);
        }
        elt
    }

    // ---- Services ---------------------------------------------------------

    /// Look up `name` in the container.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Service, RenderError> {
        match &self.container {
            Some(container) if container.has(name) =>
                container.get(name, args).map_err(
                    |error| RenderErrorKind::Container {
                        name: KString::from_ref(name),
                        error
                    }.into()),
            _ => Err(RenderErrorKind::MethodNotFound { name: KString::from_ref(name) }.into()),
        }
    }
}
