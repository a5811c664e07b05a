//! package.json manifest parsing and schema.
//!
//! The manifest is the package descriptor convoy reads for every package it
//! visits: the root project and each declared dependency. Only the fields
//! the assembly cares about are modeled; everything else is ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::component::ComponentMetadata;
use crate::util::fs;

/// File name of the package descriptor.
pub const MANIFEST_NAME: &str = "package.json";

/// Manifest key holding the component metadata block.
pub const COMPONENT_KEY: &str = "convoy";

/// A parsed package manifest.
///
/// `dependencies` preserves declaration order; the collector's walk and the
/// resulting component order depend on it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name. Private root projects may omit it.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared dependencies, name -> version requirement.
    #[serde(default)]
    pub dependencies: Map<String, Value>,

    /// Whether the package is private (never published).
    #[serde(default)]
    pub private: bool,

    /// Workspace marker. Presence alone is meaningful; the member list is
    /// not interpreted here.
    #[serde(default)]
    pub workspaces: Option<Value>,

    /// Raw component metadata block, validated lazily by
    /// [`Manifest::component_metadata`].
    #[serde(default, rename = "convoy")]
    pub component: Option<Value>,
}

/// External manifest source: a pure `path -> Manifest` function.
///
/// The default implementation reads JSON descriptors from disk; tests
/// inject in-memory readers.
pub trait ManifestReader {
    fn read(&self, path: &Path) -> Result<Manifest>;
}

/// Filesystem-backed [`ManifestReader`] for JSON package descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestReader;

impl ManifestReader for JsonManifestReader {
    fn read(&self, path: &Path) -> Result<Manifest> {
        Manifest::load(path)
    }
}

impl Manifest {
    /// Load a manifest from a file path.
    ///
    /// A missing or unparseable file is an error; callers that treat absence
    /// as a soft miss must check for the file (or resolve it) first.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Dependency names in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }

    /// The declared version requirement for a dependency, if any.
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).and_then(Value::as_str)
    }

    /// Whether the manifest declares a workspace of member packages.
    pub fn has_workspaces(&self) -> bool {
        self.workspaces.is_some()
    }

    /// Whether the manifest is a private workspace root, i.e. a pure
    /// container package that contributes no modules of its own.
    pub fn is_private_workspace_root(&self) -> bool {
        self.private && self.has_workspaces()
    }

    /// Validated component metadata, or `None` when the package does not
    /// declare itself as a component (including malformed declarations,
    /// which degrade to absence).
    pub fn component_metadata(&self) -> Option<ComponentMetadata> {
        self.component.as_ref().and_then(ComponentMetadata::from_value)
    }

    /// Set or remove a dependency.
    ///
    /// Removes the entry when `version` is `None`. Returns `false` without
    /// touching the map when the requested value already holds. On any
    /// actual change the dependency map is rewritten sorted by key, so a
    /// later persisted form is deterministic regardless of edit history.
    pub fn set_dependency(&mut self, name: &str, version: Option<&str>) -> bool {
        let current = self.dependency(name);
        if current == version {
            return false;
        }
        match version {
            Some(version) => {
                self.dependencies
                    .insert(name.to_string(), Value::String(version.to_string()));
            }
            None => {
                self.dependencies.remove(name);
            }
        }
        self.sort_dependencies();
        true
    }

    fn sort_dependencies(&mut self) {
        let mut entries: Vec<(String, Value)> = std::mem::take(&mut self.dependencies)
            .into_iter()
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        self.dependencies = entries.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(content: &str) -> Manifest {
        Manifest::parse(content, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = parse(
            r#"{
                "name": "app",
                "private": true,
                "dependencies": { "b": "^1.0.0", "a": "^2.0.0" },
                "convoy": {
                    "config": { "mode": "test" },
                    "frontends": ["lib/frontend/extra"]
                }
            }"#,
        );
        assert_eq!(manifest.name.as_deref(), Some("app"));
        assert!(manifest.private);
        // Declaration order, not alphabetical.
        let names: Vec<_> = manifest.dependency_names().collect();
        assert_eq!(names, ["b", "a"]);
        let component = manifest.component_metadata().unwrap();
        assert_eq!(component.config.get("mode"), Some(&json!("test")));
        assert_eq!(component.frontends, ["lib/frontend/extra"]);
    }

    #[test]
    fn test_parse_bare_manifest() {
        let manifest = parse("{}");
        assert_eq!(manifest.name, None);
        assert!(!manifest.private);
        assert!(!manifest.has_workspaces());
        assert!(manifest.component_metadata().is_none());
    }

    #[test]
    fn test_malformed_component_block_degrades_to_absent() {
        let manifest = parse(r#"{ "convoy": "yes" }"#);
        assert!(manifest.component_metadata().is_none());

        let manifest = parse(r#"{ "convoy": { "config": [1, 2] } }"#);
        assert!(manifest.component_metadata().is_none());
    }

    #[test]
    fn test_unparseable_manifest_is_fatal() {
        let err = Manifest::parse("not json", Path::new("pkg/package.json")).unwrap_err();
        assert!(err.to_string().contains("pkg/package.json"));
    }

    #[test]
    fn test_private_workspace_root() {
        let manifest = parse(r#"{ "private": true, "workspaces": ["packages/*"] }"#);
        assert!(manifest.is_private_workspace_root());

        let manifest = parse(r#"{ "workspaces": ["packages/*"] }"#);
        assert!(!manifest.is_private_workspace_root());
    }

    #[test]
    fn test_set_dependency_noop() {
        let mut manifest = parse(r#"{ "dependencies": { "b": "1.0.0", "a": "2.0.0" } }"#);
        assert!(!manifest.set_dependency("b", Some("1.0.0")));
        // No-op leaves the declaration order untouched.
        let names: Vec<_> = manifest.dependency_names().collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_set_dependency_sorts_on_change() {
        let mut manifest = parse(r#"{ "dependencies": { "b": "1.0.0" } }"#);
        assert!(manifest.set_dependency("a", Some("2.0.0")));
        let names: Vec<_> = manifest.dependency_names().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(manifest.dependency("a"), Some("2.0.0"));
    }

    #[test]
    fn test_set_dependency_remove() {
        let mut manifest = parse(r#"{ "dependencies": { "a": "1.0.0" } }"#);
        assert!(manifest.set_dependency("a", None));
        assert!(manifest.dependencies.is_empty());
        // Removing an absent entry is a no-op.
        assert!(!manifest.set_dependency("a", None));
    }
}
