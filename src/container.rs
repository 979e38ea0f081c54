//! Lookup of services that templates can ask `SwiftRender` for.

use std::{any::Any, sync::Arc};

use anyhow::Result;
use serde_json::Value;

pub type Service = Arc<dyn Any + Send + Sync>;

pub trait Container {
    fn has(&self, name: &str) -> bool;
    fn get(&self, name: &str, args: &[Value]) -> Result<Service>;
}
