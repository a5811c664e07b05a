//! Test doubles for convoy unit tests.
//!
//! Only available when compiling tests.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::resolver::ModuleResolver;

/// An in-memory resolver over a fixed set of known module paths.
///
/// Known paths resolve under a synthetic `/virtual` root; everything else
/// fails, the same way a missing module does for [`crate::FsResolver`].
#[derive(Debug, Default)]
pub struct MockResolver {
    known: HashSet<String>,
}

impl MockResolver {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResolver {
            known: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark another module path as resolvable.
    pub fn add(&mut self, path: impl Into<String>) {
        self.known.insert(path.into());
    }
}

impl ModuleResolver for MockResolver {
    fn resolve(&self, module_path: &str) -> Result<PathBuf> {
        if self.known.contains(module_path) {
            Ok(PathBuf::from(format!("/virtual/{module_path}")))
        } else {
            bail!("module not found: {module_path}");
        }
    }
}
