//! Core types for the atom hierarchy.

pub mod atom;
pub mod hierarchy;
pub mod kind;
pub mod path;

pub use atom::{Atom, AtomId, AttributeValue, DEFAULT_RESOURCE_TYPE};
pub use hierarchy::{GlobalInfo, HierarchyInfo, OrganizationInfo, ProjectInfo, ResourceInfo};
pub use kind::AtomKind;
pub use path::{depth, split_path, validate_name, NameError, PATH_SEPARATOR};
