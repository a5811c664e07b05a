//! Module resolution.
//!
//! The collector and auto discovery never touch the filesystem directly;
//! they go through a [`ModuleResolver`], so resolution strategy (and test
//! doubles) stay injectable.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Directory dependency modules are installed under.
pub const MODULES_DIR: &str = "node_modules";

/// Resolves a module path to an absolute filesystem location.
///
/// Failure means "the module cannot be located" and is never fatal to the
/// caller: unresolvable dependencies and probes are skipped.
pub trait ModuleResolver {
    fn resolve(&self, module_path: &str) -> Result<PathBuf>;
}

/// Filesystem-backed resolver over an ordered list of root directories.
///
/// A module path resolves to the first root under which it exists as a file
/// or directory, or as a file with one of the configured extensions
/// appended.
#[derive(Debug, Clone)]
pub struct FsResolver {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl FsResolver {
    /// Create a resolver over the given roots, with the default extension
    /// list (`js`).
    pub fn new(roots: Vec<PathBuf>) -> Self {
        FsResolver {
            roots,
            extensions: vec!["js".to_string()],
        }
    }

    /// The conventional resolver for a project: its modules directory
    /// first, then the project root itself (for the root project's own
    /// modules).
    pub fn for_project(project_path: &Path) -> Self {
        Self::new(vec![
            project_path.join(MODULES_DIR),
            project_path.to_path_buf(),
        ])
    }

    /// Replace the extension list tried for file candidates.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

impl ModuleResolver for FsResolver {
    fn resolve(&self, module_path: &str) -> Result<PathBuf> {
        for root in &self.roots {
            let candidate = root.join(module_path);
            if candidate.exists() {
                return Ok(candidate);
            }
            for extension in &self.extensions {
                let candidate = root.join(format!("{module_path}.{extension}"));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
        bail!("module not found: {module_path}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_through_roots_in_order() {
        let tmp = TempDir::new().unwrap();
        let modules = tmp.path().join(MODULES_DIR);
        std::fs::create_dir_all(modules.join("comp")).unwrap();
        std::fs::write(modules.join("comp/package.json"), "{}").unwrap();

        let resolver = FsResolver::for_project(tmp.path());
        let resolved = resolver.resolve("comp/package.json").unwrap();
        assert_eq!(resolved, modules.join("comp/package.json"));
    }

    #[test]
    fn test_resolves_with_extension() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("lib/frontend");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("app-frontend-module.js"), "").unwrap();

        let resolver = FsResolver::for_project(tmp.path());
        assert!(resolver.resolve("lib/frontend/app-frontend-module").is_ok());
    }

    #[test]
    fn test_missing_module_fails() {
        let tmp = TempDir::new().unwrap();
        let resolver = FsResolver::for_project(tmp.path());
        assert!(resolver.resolve("nothing/here").is_err());
    }
}
