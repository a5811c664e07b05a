//! Component package collection.
//!
//! Walks the dependency graph declared by a root manifest and returns every
//! reachable component package in topological order: a component always
//! appears after the components it depends on, with ties between
//! independent branches broken by declaration order.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::core::component::ComponentPackage;
use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::core::resolver::ModuleResolver;

/// Collects component packages reachable from a root manifest.
///
/// Dependency manifests are located through the injected resolver and read
/// through the injected loading function. A dependency whose manifest
/// cannot be located is skipped silently (most dependencies are not
/// components); a manifest that is located but cannot be parsed is fatal.
pub struct ComponentCollector<'a, F>
where
    F: Fn(&Path) -> Result<Manifest>,
{
    resolver: &'a dyn ModuleResolver,
    load_manifest: F,
    visited: HashSet<String>,
    sorted: Vec<ComponentPackage>,
}

impl<'a, F> ComponentCollector<'a, F>
where
    F: Fn(&Path) -> Result<Manifest>,
{
    /// Create a collector with its two collaborators.
    pub fn new(resolver: &'a dyn ModuleResolver, load_manifest: F) -> Self {
        ComponentCollector {
            resolver,
            load_manifest,
            visited: HashSet::new(),
            sorted: Vec::new(),
        }
    }

    /// Walk the root manifest's dependencies and return the component
    /// packages in dependency order.
    pub fn collect(mut self, root: &Manifest) -> Result<Vec<ComponentPackage>> {
        self.visit_dependencies(root)?;
        Ok(self.sorted)
    }

    fn visit_dependencies(&mut self, manifest: &Manifest) -> Result<()> {
        for name in manifest.dependency_names() {
            self.visit(name)?;
        }
        Ok(())
    }

    fn visit(&mut self, name: &str) -> Result<()> {
        // The visited set keys on package name whether or not the package
        // turns out to be a component; it is what terminates cycles.
        if !self.visited.insert(name.to_string()) {
            return Ok(());
        }
        let Some(manifest) = self.load_dependency(name)? else {
            return Ok(());
        };
        // Post-order: dependencies land in the result before the package
        // itself, and transitive components are reachable through
        // non-component intermediaries.
        self.visit_dependencies(&manifest)?;
        if let Some(component) = manifest.component_metadata() {
            self.sorted.push(ComponentPackage::new(manifest, component));
        }
        Ok(())
    }

    fn load_dependency(&self, name: &str) -> Result<Option<Manifest>> {
        match self.resolver.resolve(&format!("{name}/{MANIFEST_NAME}")) {
            Ok(path) => Ok(Some((self.load_manifest)(&path)?)),
            Err(error) => {
                tracing::debug!(name, %error, "dependency manifest not resolvable, skipping");
                Ok(None)
            }
        }
    }
}
