//! # Configuration
//!
//! attrkit configuration is loaded with [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `path_separator` | `ATTRKIT_PATH_SEPARATOR` | `.` | Separator between path segments |
//! | `private_prefix` | `ATTRKIT_PRIVATE_PREFIX` | `_` | Names with this prefix are private |

use crate::error::{AttrError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for attrkit, stored in `attrkit.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttrkitConfig {
    /// Separator between segments of a traversal path.
    #[config(env = "ATTRKIT_PATH_SEPARATOR", default = ".")]
    pub path_separator: String,

    /// Names starting with this prefix are skipped when copying public names.
    #[config(env = "ATTRKIT_PRIVATE_PREFIX", default = "_")]
    pub private_prefix: String,
}

impl Default for AttrkitConfig {
    fn default() -> Self {
        Self {
            path_separator: ".".to_string(),
            private_prefix: "_".to_string(),
        }
    }
}

impl AttrkitConfig {
    /// Loads the configuration: environment, then `file` (if given), then
    /// defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(file) = file {
            builder = builder.file(file);
        }
        let config = builder.load()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.path_separator.is_empty() {
            return Err(AttrError::InvalidPath(
                "configured path_separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(&self.private_prefix)
    }
}
