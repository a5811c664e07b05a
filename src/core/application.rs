//! ApplicationPackage - the assembly orchestrator.
//!
//! Owns the project root and lazily computes, caching each result on first
//! access: the root manifest, the ordered component package list, the
//! resolved configuration, and the per-target module maps. A fatal error
//! leaves the triggering cache unpopulated, so a retry after fixing the
//! input can succeed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::collector::ComponentCollector;
use crate::core::component::{ComponentMetadata, ComponentPackage, Target};
use crate::core::manifest::{JsonManifestReader, Manifest, ManifestReader, MANIFEST_NAME};
use crate::core::props::{app_config_name_for_mode, load_override, merge_values, ApplicationProps, APP_CONFIG_NAME};
use crate::core::resolver::{FsResolver, ModuleResolver};
use crate::util::paths;

/// One computed module map: ordered `"<target>_<n>"` keys to forward-slash
/// paths.
pub type ModuleMap = Vec<(String, String)>;

/// The logical application assembled from a project's component packages.
pub struct ApplicationPackage {
    project_path: PathBuf,
    reader: Box<dyn ManifestReader>,
    resolver: Box<dyn ModuleResolver>,

    pkg: Option<Manifest>,
    component_packages: Option<Vec<ComponentPackage>>,
    props: Option<ApplicationProps>,
    frontend_modules: Option<ModuleMap>,
    backend_modules: Option<ModuleMap>,
}

impl ApplicationPackage {
    /// Create an application package rooted at a project directory, with
    /// the conventional manifest reader and module resolver.
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let resolver = Box::new(FsResolver::for_project(&project_path));
        ApplicationPackage {
            project_path,
            reader: Box::new(JsonManifestReader),
            resolver,
            pkg: None,
            component_packages: None,
            props: None,
            frontend_modules: None,
            backend_modules: None,
        }
    }

    /// Replace the module resolver.
    pub fn with_resolver(mut self, resolver: Box<dyn ModuleResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the manifest reader.
    pub fn with_manifest_reader(mut self, reader: Box<dyn ManifestReader>) -> Self {
        self.reader = reader;
        self
    }

    /// The project root directory as given.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Resolve a path against the project root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_path.join(relative)
    }

    /// Resolve a path against `<project>/lib`.
    pub fn lib(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_path.join("lib").join(relative)
    }

    /// Express a path relative to the project root, when possible.
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        pathdiff::diff_paths(path, &self.project_path)
    }

    /// Path of the root package manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.path(MANIFEST_NAME)
    }

    /// The root package manifest, read once and cached.
    pub fn pkg(&mut self) -> Result<&Manifest> {
        self.pkg_mut().map(|pkg| &*pkg)
    }

    fn pkg_mut(&mut self) -> Result<&mut Manifest> {
        let pkg = match self.pkg.take() {
            Some(pkg) => pkg,
            None => self.reader.read(&self.manifest_path())?,
        };
        Ok(self.pkg.insert(pkg))
    }

    /// Set or remove a dependency of the root manifest.
    ///
    /// Returns `Ok(false)` when the requested value already holds. The edit
    /// is visible to subsequent reads in this process; persisting it is an
    /// external collaborator's responsibility.
    pub fn set_dependency(&mut self, name: &str, version: Option<&str>) -> Result<bool> {
        Ok(self.pkg_mut()?.set_dependency(name, version))
    }

    /// Component packages in topological order, the root project's own
    /// pseudo component last.
    pub fn component_packages(&mut self) -> Result<&[ComponentPackage]> {
        let components = match self.component_packages.take() {
            Some(components) => components,
            None => self.compute_component_packages()?,
        };
        Ok(self.component_packages.insert(components))
    }

    /// Find a component package by name.
    pub fn get_component_package(&mut self, name: &str) -> Result<Option<&ComponentPackage>> {
        Ok(self
            .component_packages()?
            .iter()
            .find(|component| component.name() == name))
    }

    fn compute_component_packages(&mut self) -> Result<Vec<ComponentPackage>> {
        let root = self.pkg()?.clone();
        let reader = &*self.reader;
        let resolver = &*self.resolver;

        let collector = ComponentCollector::new(resolver, |path| reader.read(path));
        let mut components = collector.collect(&root)?;
        for component in &mut components {
            let name = component.name().to_string();
            discover_modules(resolver, &name, true, component.component_mut());
            prefix_entries(&name, component.component_mut());
        }

        // The root project contributes its own pseudo component unless it
        // is a private workspace root, i.e. purely a container package.
        if !root.is_private_workspace_root() {
            let metadata = root.component_metadata().unwrap_or_default();
            let name = root
                .name
                .clone()
                .unwrap_or_else(|| self.project_folder_name());
            let mut root_component = ComponentPackage::new_root(root, metadata, name.clone());
            discover_modules(resolver, &name, false, root_component.component_mut());
            prefix_entries(".", root_component.component_mut());
            components.push(root_component);
        }
        Ok(components)
    }

    fn project_folder_name(&self) -> String {
        self.project_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The resolved application configuration.
    ///
    /// Merged in precedence order: static defaults, each component config
    /// in collection order, `app.yml`, then `app-<mode>.yml` when a mode is
    /// exposed after the `app.yml` merge.
    pub fn props(&mut self) -> Result<&ApplicationProps> {
        let props = match self.props.take() {
            Some(props) => props,
            None => self.compute_props()?,
        };
        Ok(self.props.insert(props))
    }

    fn compute_props(&mut self) -> Result<ApplicationProps> {
        let mut props = ApplicationProps::default_value();
        let configs: Vec<Value> = self
            .component_packages()?
            .iter()
            .map(|component| Value::Object(component.component().config.clone()))
            .collect();
        for config in &configs {
            merge_values(&mut props, config);
        }

        let override_path = self.path(APP_CONFIG_NAME);
        if override_path.exists() {
            merge_values(&mut props, &load_override(&override_path)?);
        }

        let mode = props
            .get("mode")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(mode) = mode {
            let mode_path = self.path(app_config_name_for_mode(&mode));
            if mode_path.exists() {
                merge_values(&mut props, &load_override(&mode_path)?);
            }
        }
        Ok(ApplicationProps::new(props))
    }

    /// The frontend module map.
    pub fn frontend_modules(&mut self) -> Result<&[(String, String)]> {
        let modules = match self.frontend_modules.take() {
            Some(modules) => modules,
            None => self.compute_modules(Target::Frontend)?,
        };
        Ok(self.frontend_modules.insert(modules))
    }

    /// The backend module map.
    pub fn backend_modules(&mut self) -> Result<&[(String, String)]> {
        let modules = match self.backend_modules.take() {
            Some(modules) => modules,
            None => self.compute_modules(Target::Backend)?,
        };
        Ok(self.backend_modules.insert(modules))
    }

    /// The module map for either target.
    pub fn modules(&mut self, target: Target) -> Result<&[(String, String)]> {
        match target {
            Target::Frontend => self.frontend_modules(),
            Target::Backend => self.backend_modules(),
        }
    }

    fn compute_modules(&mut self, target: Target) -> Result<ModuleMap> {
        let project_root = self.absolute_project_path()?;
        let mut modules = Vec::new();
        let mut index = 1;
        for component in self.component_packages()? {
            for module in component.component().modules(target) {
                // Root modules resolve through the filesystem, dependency
                // modules through the module system under their own name.
                let path = if component.is_root() {
                    paths::to_forward_slashes(&project_root.join(module))
                } else {
                    paths::join_slash(component.name(), module)
                };
                modules.push((format!("{target}_{index}"), path));
                index += 1;
            }
        }
        Ok(modules)
    }

    fn absolute_project_path(&self) -> Result<PathBuf> {
        if self.project_path.is_absolute() {
            Ok(self.project_path.clone())
        } else {
            let cwd = std::env::current_dir().context("failed to resolve working directory")?;
            Ok(cwd.join(&self.project_path))
        }
    }
}

/// Probe for a component's conventional module entry points and append the
/// ones that resolve. Probe failure is silent; most components declare
/// their modules explicitly or have none for one target.
fn discover_modules(
    resolver: &dyn ModuleResolver,
    name: &str,
    is_module: bool,
    component: &mut ComponentMetadata,
) {
    if !component.auto() {
        return;
    }
    for target in Target::ALL {
        let module = format!("lib/{target}/{name}-{target}-module");
        let probe = if is_module {
            paths::join_slash(name, &module)
        } else {
            module.clone()
        };
        match resolver.resolve(&probe) {
            Ok(_) => component.add_module(target, module),
            Err(error) => {
                tracing::trace!(name, %probe, %error, "module probe missed");
            }
        }
    }
}

/// Rewrite declared entry paths to be relative to the component's own name
/// (or to the project root, for the root pseudo component).
fn prefix_entries(prefix: &str, component: &mut ComponentMetadata) {
    for target in Target::ALL {
        let entry = component
            .config
            .get_mut(target.as_str())
            .and_then(|config| config.get_mut("entry"));
        if let Some(entry) = entry {
            if let Some(path) = entry.as_str() {
                *entry = Value::String(paths::join_slash(prefix, path));
            }
        }
    }
}
