//! Directories and file ending for the template slots.

use std::path::{Path, PathBuf};

use anyhow::{Result, Context, anyhow};
use serde::Deserialize;

use crate::{io_util::my_read_to_string, slot::SlotKind, util::{getenv, getenv_or}};

pub const DEFAULT_FILE_ENDING: &str = "php";

fn default_file_ending() -> String {
    DEFAULT_FILE_ENDING.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    pub index_dir: Option<PathBuf>,
    pub buffer_dir: Option<PathBuf>,
    pub view_dir: Option<PathBuf>,
    pub partial_dir: Option<PathBuf>,
    #[serde(default = "default_file_ending")]
    pub file_ending: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            index_dir: None,
            buffer_dir: None,
            view_dir: None,
            partial_dir: None,
            file_ending: default_file_ending(),
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::from_json_str(&my_read_to_string(path)?).with_context(
            || anyhow!("parsing render config {:?}", path.to_string_lossy()))
    }

    /// Read `SWIFTRENDER_INDEX_DIR`, `SWIFTRENDER_BUFFER_DIR`,
    /// `SWIFTRENDER_VIEW_DIR`, `SWIFTRENDER_PARTIAL_DIR` and
    /// `SWIFTRENDER_FILE_ENDING`.
    pub fn from_env() -> Result<Self> {
        let dir = |name| -> Result<Option<PathBuf>> {
            Ok(getenv(name)?.map(PathBuf::from))
        };
        Ok(RenderConfig {
            index_dir: dir("SWIFTRENDER_INDEX_DIR")?,
            buffer_dir: dir("SWIFTRENDER_BUFFER_DIR")?,
            view_dir: dir("SWIFTRENDER_VIEW_DIR")?,
            partial_dir: dir("SWIFTRENDER_PARTIAL_DIR")?,
            file_ending: getenv_or("SWIFTRENDER_FILE_ENDING", Some(DEFAULT_FILE_ENDING))?,
        })
    }

    pub fn dir(&self, slot: SlotKind) -> Option<&Path> {
        match slot {
            SlotKind::Index => self.index_dir.as_deref(),
            SlotKind::Buffer => self.buffer_dir.as_deref(),
            SlotKind::View => self.view_dir.as_deref(),
            SlotKind::Partial => self.partial_dir.as_deref(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_from_json() -> Result<()> {
        let c = RenderConfig::from_json_str(
            r#"{"view_dir": "tpl/views", "partial_dir": "tpl/partials"}"#)?;
        assert_eq!(c.dir(SlotKind::View), Some(Path::new("tpl/views")));
        assert_eq!(c.dir(SlotKind::Index), None);
        assert_eq!(c.file_ending, "php");

        let c = RenderConfig::from_json_str(r#"{"file_ending": "html"}"#)?;
        assert_eq!(c.file_ending, "html");
        assert!(RenderConfig::from_json_str(r#"{"viewdir": "x"}"#).is_err());
        Ok(())
    }

    #[test]
    fn t_from_json_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{"index_dir": "/srv/index"}"#)?;
        let c = RenderConfig::from_json_file(&path)?;
        assert_eq!(c, RenderConfig {
            index_dir: Some("/srv/index".into()),
            ..Default::default()
        });
        std::fs::write(&path, "{")?;
        let e = RenderConfig::from_json_file(&path).err().unwrap();
        assert!(e.to_string().starts_with("parsing render config"));
        Ok(())
    }
}
