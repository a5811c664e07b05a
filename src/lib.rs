//! Convoy - component package discovery and application configuration
//! assembly for multi-package projects.
//!
//! A project declares dependencies on component packages; convoy walks that
//! graph, orders the components deterministically (dependencies first),
//! merges their declared configuration with well-defined precedence, and
//! computes the frontend/backend module maps that downstream build tooling
//! consumes.

pub mod core;
pub mod util;

/// Test doubles for convoy unit tests.
///
/// Only available when compiling tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    ApplicationPackage, ApplicationProps, ComponentCollector, ComponentMetadata, ComponentPackage,
    ConfigError, FsResolver, JsonManifestReader, Manifest, ManifestReader, ModuleMap,
    ModuleResolver, Target,
};
