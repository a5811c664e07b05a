//! Component metadata and component packages.
//!
//! A package becomes a component by carrying a metadata block in its
//! manifest: a configuration tree plus declared frontend/backend module
//! lists. A ComponentPackage pairs one manifest with that (validated)
//! metadata and a resolved identity.

use serde_json::{Map, Value};

use crate::core::manifest::Manifest;

/// One of the two module categories an application is assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Frontend,
    Backend,
}

impl Target {
    /// Both targets, in the conventional order.
    pub const ALL: [Target; 2] = [Target::Frontend, Target::Backend];

    /// The target identifier used in probe paths and module-map keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Frontend => "frontend",
            Target::Backend => "backend",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated component metadata from a manifest's component block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMetadata {
    /// Component configuration tree. Empty when the block declares none.
    pub config: Map<String, Value>,

    /// Declared frontend module paths, relative to the component root.
    pub frontends: Vec<String>,

    /// Declared backend module paths, relative to the component root.
    pub backends: Vec<String>,
}

impl ComponentMetadata {
    /// Validate a raw metadata block.
    ///
    /// Returns `None` when the block is not an object, or when it carries a
    /// non-object `config` — malformed metadata degrades to absence rather
    /// than failing the walk. Non-string module entries are dropped and
    /// duplicates collapse.
    pub fn from_value(value: &Value) -> Option<Self> {
        let block = value.as_object()?;
        let config = match block.get("config") {
            None => Map::new(),
            Some(Value::Object(config)) => config.clone(),
            Some(other) => {
                tracing::debug!(?other, "component config is not an object, ignoring metadata");
                return None;
            }
        };
        let mut metadata = ComponentMetadata {
            config,
            frontends: Vec::new(),
            backends: Vec::new(),
        };
        for target in Target::ALL {
            if let Some(Value::Array(entries)) = block.get(Self::list_key(target)) {
                for entry in entries {
                    if let Some(path) = entry.as_str() {
                        metadata.add_module(target, path.to_string());
                    }
                }
            }
        }
        Some(metadata)
    }

    fn list_key(target: Target) -> &'static str {
        match target {
            Target::Frontend => "frontends",
            Target::Backend => "backends",
        }
    }

    /// Whether auto module discovery applies. Defaults to true; only an
    /// explicit `auto: false` in the config suppresses it.
    pub fn auto(&self) -> bool {
        self.config.get("auto") != Some(&Value::Bool(false))
    }

    /// Declared module paths for one target.
    pub fn modules(&self, target: Target) -> &[String] {
        match target {
            Target::Frontend => &self.frontends,
            Target::Backend => &self.backends,
        }
    }

    /// Append a module path unless it is already listed.
    pub fn add_module(&mut self, target: Target, path: String) {
        let list = match target {
            Target::Frontend => &mut self.frontends,
            Target::Backend => &mut self.backends,
        };
        if !list.contains(&path) {
            list.push(path);
        }
    }
}

/// A manifest paired with its validated component metadata.
#[derive(Debug, Clone)]
pub struct ComponentPackage {
    manifest: Manifest,
    component: ComponentMetadata,
    name: String,
    root: bool,
}

impl ComponentPackage {
    /// Wrap a dependency manifest that carries component metadata.
    pub fn new(manifest: Manifest, component: ComponentMetadata) -> Self {
        let name = manifest.name.clone().unwrap_or_default();
        ComponentPackage {
            manifest,
            component,
            name,
            root: false,
        }
    }

    /// Wrap the root project as a pseudo component. `name` falls back to
    /// the project folder name when the manifest has none.
    pub fn new_root(manifest: Manifest, component: ComponentMetadata, name: String) -> Self {
        ComponentPackage {
            manifest,
            component,
            name,
            root: true,
        }
    }

    /// The component's identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the synthesized root project entry.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// The underlying manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The component metadata.
    pub fn component(&self) -> &ComponentMetadata {
        &self.component
    }

    /// Mutable metadata access, used by module discovery and entry
    /// prefixing during component list construction.
    pub fn component_mut(&mut self) -> &mut ComponentMetadata {
        &mut self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_shapes() {
        assert!(ComponentMetadata::from_value(&json!("component")).is_none());
        assert!(ComponentMetadata::from_value(&json!(42)).is_none());
        assert!(ComponentMetadata::from_value(&json!({ "config": "x" })).is_none());

        let metadata = ComponentMetadata::from_value(&json!({})).unwrap();
        assert!(metadata.config.is_empty());
        assert!(metadata.frontends.is_empty());
    }

    #[test]
    fn test_from_value_drops_non_string_modules_and_duplicates() {
        let metadata = ComponentMetadata::from_value(&json!({
            "frontends": ["lib/a", 7, "lib/a", "lib/b"],
            "backends": ["lib/c"]
        }))
        .unwrap();
        assert_eq!(metadata.frontends, ["lib/a", "lib/b"]);
        assert_eq!(metadata.backends, ["lib/c"]);
    }

    #[test]
    fn test_auto_defaults_true() {
        let metadata = ComponentMetadata::default();
        assert!(metadata.auto());

        let metadata = ComponentMetadata::from_value(&json!({
            "config": { "auto": false }
        }))
        .unwrap();
        assert!(!metadata.auto());

        let metadata = ComponentMetadata::from_value(&json!({
            "config": { "auto": true }
        }))
        .unwrap();
        assert!(metadata.auto());
    }

    #[test]
    fn test_add_module_is_idempotent() {
        let mut metadata = ComponentMetadata::default();
        metadata.add_module(Target::Frontend, "lib/frontend/x".into());
        metadata.add_module(Target::Frontend, "lib/frontend/x".into());
        metadata.add_module(Target::Backend, "lib/backend/x".into());
        assert_eq!(metadata.frontends, ["lib/frontend/x"]);
        assert_eq!(metadata.backends, ["lib/backend/x"]);
    }
}
