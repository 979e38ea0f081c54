//! Deferred rendering of a single slot.
//!
//! A `SlotBuilder` only records what to render; nothing is looked up
//! on disk until `invoke` is called, so registering many partials
//! that end up unused costs nothing. The template directory is taken
//! from the `SwiftRender` at invocation time, so it may be configured
//! after registration.

use std::{fmt::{Debug, Formatter}, path::{Path, PathBuf}, sync::Arc, time::Duration};

use kstring::KString;

use crate::{args::{Args, merge_args},
            cache::matching_keys,
            error::{RenderError, RenderErrorKind},
            io_util::modified_unixtime,
            render::SwiftRender,
            slot::SlotKind,
            str_util::{sanitize_cache_key, strip_optional},
            nowarn,
            warn};

/// Code standing in for a template file. Returned text is appended
/// to the output.
pub type SlotFn = dyn Fn(&mut SwiftRender, &Args) -> anyhow::Result<Option<String>>;

#[derive(Clone)]
pub enum Resource {
    /// `|`-separated list of template file names (without directory
    /// and ending), tried in order. A leading `!` makes a missing
    /// file non-fatal.
    Files(KString),
    Callable(Arc<SlotFn>),
    /// Emitted as is.
    Text(String),
}

impl Resource {
    pub fn callable<F>(f: F) -> Resource
    where F: Fn(&mut SwiftRender, &Args) -> anyhow::Result<Option<String>> + 'static
    {
        Resource::Callable(Arc::new(f))
    }

    /// For error messages.
    pub fn describe(&self) -> KString {
        match self {
            Resource::Files(files) => files.clone(),
            Resource::Callable(_) => KString::from_static("[callable]"),
            Resource::Text(_) => KString::from_static("[text]"),
        }
    }
}

impl Debug for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Files(files) => write!(f, "Files({:?})", files.as_str()),
            Resource::Callable(_) => write!(f, "Callable"),
            Resource::Text(s) => write!(f, "Text({s:?})"),
        }
    }
}

impl From<&str> for Resource {
    fn from(files: &str) -> Self {
        Resource::Files(KString::from_ref(files))
    }
}

impl From<String> for Resource {
    fn from(files: String) -> Self {
        Resource::Files(KString::from_string(files))
    }
}

impl From<KString> for Resource {
    fn from(files: KString) -> Self {
        Resource::Files(files)
    }
}


/// Cache identity of a partial builder. Several builders can be
/// registered under the same partial key, `position` tells them
/// apart.
#[derive(Debug, Clone)]
struct CacheSpec {
    partial_key: KString,
    position: usize,
    ttl: Duration,
}

/// What to render for one slot. Which template directory the files
/// are looked up in is decided by the slot being rendered, see
/// `invoke`.
#[derive(Debug, Clone)]
pub struct SlotBuilder {
    resource: Resource,
    args: Args,
    cache: Option<CacheSpec>,
}

impl SlotBuilder {
    pub fn new(resource: Resource, args: Args) -> SlotBuilder {
        SlotBuilder { resource, args, cache: None }
    }

    /// A partial builder; with `cache_ttl`, its output is cached under
    /// a key derived from `partial_key` and `position`, the number of
    /// builders registered for the same key before it.
    pub fn for_partial(
        resource: Resource,
        args: Args,
        partial_key: &str,
        position: usize,
        cache_ttl: Option<Duration>,
    ) -> SlotBuilder {
        SlotBuilder {
            resource,
            args,
            cache: cache_ttl.map(|ttl| CacheSpec {
                partial_key: KString::from_ref(partial_key),
                position,
                ttl,
            }),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn default_args(&self) -> &Args {
        &self.args
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache.as_ref().map(|c| c.ttl)
    }

    /// Render into `out`, as the template for `slot`; files are
    /// looked up in the directory configured for `slot`. `runtime`
    /// args are merged over the default args.
    pub fn invoke(
        &self,
        render: &mut SwiftRender,
        slot: SlotKind,
        runtime: &Args,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let files = match &self.resource {
            Resource::Text(text) => {
                out.push_str(text);
                return Ok(())
            }
            Resource::Callable(f) => {
                self.directory(render, slot)?;
                let args = self.merged_args(runtime);
                let s = (**f)(render, &args).map_err(
                    |error| RenderErrorKind::Callable { slot, error })?;
                if let Some(s) = s {
                    out.push_str(&s);
                }
                return Ok(())
            }
            Resource::Files(files) => files,
        };

        let dir = self.directory(render, slot)?;
        let mut missing = Vec::new();
        for candidate in files.split('|') {
            let (optional, name) = strip_optional(candidate);
            let path = dir.join(format!("{name}.{}", render.file_ending()));
            if path.is_file() {
                let args = self.merged_args(runtime);
                return self.output(render, slot, &path, &args, out)
            }
            if ! optional {
                missing.push(path);
            }
        }
        if missing.is_empty() {
            nowarn!("no file found for optional {slot} template(s) {:?}, \
                     leaving it empty", files.as_str());
            Ok(())
        } else {
            Err(RenderErrorKind::MissingTemplate { slot, candidates: missing }.into())
        }
    }

    fn directory(&self, render: &SwiftRender, slot: SlotKind) -> Result<PathBuf, RenderError> {
        render.dir(slot).map(Path::to_path_buf).ok_or_else(
            || RenderErrorKind::Configuration {
                slot,
                resource: self.resource.describe()
            }.into())
    }

    fn merged_args(&self, runtime: &Args) -> Args {
        if runtime.is_empty() {
            self.args.clone()
        } else {
            merge_args(&self.args, runtime)
        }
    }

    /// Run the template file, going through the cache for partials
    /// that asked for it.
    fn output(
        &self,
        render: &mut SwiftRender,
        slot: SlotKind,
        path: &Path,
        args: &Args,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let cached = match (slot, &self.cache, render.cache()) {
            (SlotKind::Partial, Some(spec), Some(cache)) => Some((spec, cache.clone())),
            _ => None,
        };
        let (spec, cache) = match cached {
            Some(c) => c,
            None => return render.execute_template(path, args, out),
        };

        let prefix = format!("{}-{}", sanitize_cache_key(&spec.partial_key), spec.position);
        let mtime = modified_unixtime(path).map_err(
            |source| RenderErrorKind::Io { path: path.to_path_buf(), source })?;
        let cache_key = format!("{prefix}-{mtime}");

        if cache.has(&cache_key).map_err(RenderErrorKind::Cache)? {
            if let Some(s) = cache.get(&cache_key).map_err(RenderErrorKind::Cache)? {
                out.push_str(&s);
                return Ok(())
            }
        }

        // Entries for older versions of the file can't be hit anymore.
        let stale = matching_keys(&*cache, &format!("{}-*", globset::escape(&prefix)))
            .map_err(RenderErrorKind::Cache)?;
        if ! stale.is_empty() {
            warn!("partial {:?} changed on disk, dropping {} cache entries",
                  spec.partial_key.as_str(), stale.len());
            cache.delete_multiple(&stale).map_err(RenderErrorKind::Cache)?;
        }

        let mut s = String::new();
        render.execute_template(path, args, &mut s)?;
        cache.set(&cache_key, &s, spec.ttl).map_err(RenderErrorKind::Cache)?;
        out.push_str(&s);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;

    use super::*;
    use crate::args::args_from_value;

    #[test]
    fn t_text_needs_no_dir() -> Result<()> {
        let mut render = SwiftRender::default();
        let b = SlotBuilder::new(Resource::Text("hi".into()), Args::new());
        let mut out = String::from(">");
        b.invoke(&mut render, SlotKind::Buffer, &Args::new(), &mut out)?;
        assert_eq!(out, ">hi");
        Ok(())
    }

    #[test]
    fn t_callable_needs_dir() -> Result<()> {
        let mut render = SwiftRender::default();
        let b = SlotBuilder::new(
            Resource::callable(|_, args| Ok(Some(format!("{}{}", args["a"], args["b"])))),
            args_from_value(json!({"a": 1, "b": 2})));
        let mut out = String::new();
        let e = b.invoke(&mut render, SlotKind::Index, &Args::new(), &mut out).err().unwrap();
        assert_eq!(e.to_string(),
                   "no directory set for index templates (needed for [callable]), \
                    call `set_index_dir` first");
        render.set_index_dir("/nonexistent");
        b.invoke(&mut render, SlotKind::Index, &args_from_value(json!({"a": 3})), &mut out)?;
        assert_eq!(out, "32");
        Ok(())
    }

    #[test]
    fn t_raw_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("x.html"), "<p>x</p>")?;
        let mut render = SwiftRender::default();
        render.set_file_ending(".html").set_view_dir(dir.path());
        let b = SlotBuilder::new(Resource::from("!missing|x"), Args::new());
        let mut out = String::new();
        b.invoke(&mut render, SlotKind::View, &Args::new(), &mut out)?;
        assert_eq!(out, "<p>x</p>");
        assert_eq!(b.resource().describe().as_str(), "!missing|x");
        Ok(())
    }
}
