//! # atomspace-boundary
//!
//! A strictly-tiered hierarchy of typed nodes ("atoms"):
//!
//! > Global → Organization → Project → Resource
//!
//! Every atom is reachable in constant time by its stable id and by its
//! slash-delimited path, and carries a free-form attribute map.
//!
//! ## Containment
//!
//! | Parent | May contain |
//! |--------|-------------|
//! | Global | Organization, Resource |
//! | Organization | Project, Resource |
//! | Project | Resource |
//! | Resource | nothing |
//!
//! ## Architecture
//!
//! ```text
//! caller → AtomRegistry ──resolve path──→ by_path index
//!               │
//!               └──create──→ AtomArena (owns atoms, id index) → parent/child links
//! ```
//!
//! Paths are derived from the live parent chain on demand. Resolution
//! failures are ordinary `Err` values (`RegistryError::is_resolution_failure`)
//! and listing operations return empty vectors for unknown ancestors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod canonical;
pub mod config;
pub mod registry;
pub mod shared;
pub mod types;

// Re-exports
pub use arena::{Ancestors, AtomArena, AtomError};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use config::{ConfigError, DuplicateNamePolicy, RegistryConfig, DEFAULT_ROOT_NAME};
pub use registry::{AtomRegistry, RegistryError};
pub use shared::SharedRegistry;
pub use types::{
    depth, split_path, validate_name, Atom, AtomId, AtomKind, AttributeValue, GlobalInfo,
    HierarchyInfo, NameError, OrganizationInfo, ProjectInfo, ResourceInfo, DEFAULT_RESOURCE_TYPE,
    PATH_SEPARATOR,
};

/// Conceptual name of the registry.
pub type AtomSpace = AtomRegistry;

/// Schema version of the hierarchy snapshot records.
/// Increment on breaking changes to `HierarchyInfo`.
pub const HIERARCHY_SCHEMA_VERSION: &str = "1.0.0";
