//! Deferred template slots.
//!
//! A `SwiftRender` holds templates registered for the index, buffer
//! and view slots and for keyed partials, and only runs them when a
//! slot is selected and rendered. Partials can have their output
//! cached; html element trees are available through `adom`.

pub mod warn;
pub mod time_guard;
pub mod util;
pub mod io_util;
pub mod str_util;
pub mod error;
pub mod slot;
pub mod args;
pub mod partial_key;
pub mod config;
pub mod template;
pub mod cache;
pub mod fs_cache;
pub mod container;
pub mod builder;
pub mod render;

pub use adom;

pub use builder::{Resource, SlotBuilder};
pub use error::{RenderError, RenderErrorKind};
pub use render::SwiftRender;
pub use slot::SlotKind;
