//! Running template files.
//!
//! How a template file turns variables into text is up to a
//! `TemplateEngine`; `SwiftRender` only finds the file and collects
//! the output. Engines get the `SwiftRender` passed in, so templates
//! can render partials or use DOM documents themselves.

use std::path::Path;

use anyhow::Result;

use crate::{args::Args, io_util::my_read_to_string, render::SwiftRender};

pub trait TemplateEngine {
    /// Run the template at `path` with the variables in `scope`,
    /// appending its output to `out`.
    fn execute(
        &self,
        path: &Path,
        scope: &Args,
        render: &mut SwiftRender,
        out: &mut String,
    ) -> Result<()>;
}

/// Copies the template file to the output, unchanged. For static
/// fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawFileEngine;

impl TemplateEngine for RawFileEngine {
    fn execute(
        &self,
        path: &Path,
        _scope: &Args,
        _render: &mut SwiftRender,
        out: &mut String,
    ) -> Result<()> {
        out.push_str(&my_read_to_string(path)?);
        Ok(())
    }
}

/// An engine made from a closure.
pub struct FnEngine<F>(pub F);

impl<F> TemplateEngine for FnEngine<F>
where F: Fn(&Path, &Args, &mut SwiftRender, &mut String) -> Result<()>
{
    fn execute(
        &self,
        path: &Path,
        scope: &Args,
        render: &mut SwiftRender,
        out: &mut String,
    ) -> Result<()> {
        (self.0)(path, scope, render, out)
    }
}
