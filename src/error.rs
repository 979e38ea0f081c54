//! Errors aborting a render cycle.
//!
//! `RenderError` is a box around `RenderErrorKind`, to keep `Result`s
//! small; it derefs to the kind, so match on `&*err`.

use std::path::PathBuf;

use itertools::Itertools;
use kstring::KString;

use crate::slot::SlotKind;

fn show_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| format!("{:?}", p.to_string_lossy())).join(", ")
}

#[derive(thiserror::Error, Debug)]
pub enum RenderErrorKind {
    #[error("no directory set for {slot} templates (needed for {resource}), \
             call `set_{slot}_dir` first")]
    Configuration { slot: SlotKind, resource: KString },

    #[error("could not find {slot} template files: {}", show_paths(.candidates))]
    MissingTemplate { slot: SlotKind, candidates: Vec<PathBuf> },

    #[error("expecting the {view} view")]
    MissingView { view: String },

    #[error("the method {:?} does not exist in the container or on SwiftRender", .name.as_str())]
    MethodNotFound { name: KString },

    #[error("caching was requested for partial {:?} but no cache is configured",
             .partial.as_str())]
    CacheMisconfigured { partial: KString },

    #[error("executing template {:?}: {error}", .path.to_string_lossy())]
    Template { path: PathBuf, error: anyhow::Error },

    #[error("{slot} callable: {error}")]
    Callable { slot: SlotKind, error: anyhow::Error },

    #[error("container service {:?}: {error}", .name.as_str())]
    Container { name: KString, error: anyhow::Error },

    #[error("cache: {0}")]
    Cache(anyhow::Error),

    #[error("reading metadata of {:?}: {source}", .path.to_string_lossy())]
    Io { path: PathBuf, source: std::io::Error },
}

#[derive(Debug)]
pub struct RenderError(Box<RenderErrorKind>);

impl std::ops::Deref for RenderError {
    type Target = RenderErrorKind;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl<E> From<E> for RenderError where RenderErrorKind: From<E> {
    fn from(err: E) -> Self {
        RenderError(Box::new(RenderErrorKind::from(err)))
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&*self.0, f)
    }
}

impl RenderError {
    pub fn kind(&self) -> &RenderErrorKind {
        &self.0
    }

    pub(crate) fn missing_view(view: impl Into<String>) -> Self {
        RenderErrorKind::MissingView { view: view.into() }.into()
    }
}
