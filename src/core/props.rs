//! Resolved application configuration.
//!
//! The application props are the fold of every configuration source, in
//! precedence order: static defaults, each component's config block in
//! collection order, the project-level `app.yml`, and finally the
//! mode-specific `app-<mode>.yml`.
//!
//! The merge rule is deliberate and asymmetric: mappings merge key by key,
//! but sequences REPLACE the earlier value wholesale. Two components that
//! both customize the same list must override each other, not concatenate.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{json, Value};
use thiserror::Error;

use crate::util::fs;

/// Project-level override file name.
pub const APP_CONFIG_NAME: &str = "app.yml";

/// Mode-specific override file name.
pub fn app_config_name_for_mode(mode: &str) -> String {
    format!("app-{mode}.yml")
}

/// Fatal configuration errors.
///
/// Missing override files are never an error; these fire only when a file
/// is present but cannot participate in the merge.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse override file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("override file {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// The resolved application configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationProps(Value);

impl ApplicationProps {
    /// The static default tree every resolution starts from.
    pub fn default_value() -> Value {
        json!({
            "frontend": {},
            "backend": {},
        })
    }

    /// Wrap an already-merged configuration tree.
    pub fn new(value: Value) -> Self {
        ApplicationProps(value)
    }

    /// The configured mode, when some merge source set one.
    pub fn mode(&self) -> Option<&str> {
        self.0.get("mode").and_then(Value::as_str)
    }

    /// Look up a value by JSON pointer, e.g. `/frontend/entry`.
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// The frontend configuration subtree, if any.
    pub fn frontend(&self) -> Option<&Value> {
        self.0.get("frontend")
    }

    /// The backend configuration subtree, if any.
    pub fn backend(&self) -> Option<&Value> {
        self.0.get("backend")
    }

    /// The whole tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Deep-merge `src` into `dst`.
///
/// Rule table: object into object merges per key, recursively; every other
/// source value (sequence, scalar, null) replaces the destination. The
/// sequence-replace rule falls out of the second arm and is load-bearing —
/// see the merge tests before changing it.
pub fn merge_values(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                match dst.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        dst.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (dst, src) => *dst = src.clone(),
    }
}

/// Load an override file and validate it is a mapping.
///
/// The file must exist; callers treat absence as a soft miss and skip the
/// merge step entirely.
pub fn load_override(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(value)
}
