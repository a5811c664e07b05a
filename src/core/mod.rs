//! Core data structures and algorithms for convoy.
//!
//! This module contains the foundational types of the assembly:
//! - Manifests and component metadata
//! - The component collector (dependency walk, topological order)
//! - Resolved configuration and the deep-merge rules
//! - The ApplicationPackage orchestrator

pub mod application;
pub mod collector;
pub mod component;
pub mod manifest;
pub mod props;
pub mod resolver;

pub use application::{ApplicationPackage, ModuleMap};
pub use collector::ComponentCollector;
pub use component::{ComponentMetadata, ComponentPackage, Target};
pub use manifest::{JsonManifestReader, Manifest, ManifestReader, COMPONENT_KEY, MANIFEST_NAME};
pub use props::{ApplicationProps, ConfigError, APP_CONFIG_NAME};
pub use resolver::{FsResolver, ModuleResolver, MODULES_DIR};
