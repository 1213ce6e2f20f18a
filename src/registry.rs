//! Atom registry (AtomSpace).
//!
//! The registry owns one Global root and keeps two indices:
//!
//! - **by id**: the [`AtomArena`] itself, which owns every atom
//! - **by path**: `HashMap<String, AtomId>` from derived path to atom
//!
//! Both are seeded with the root and updated together by every creation and
//! removal. Callers pass plain names; paths are built internally.
//!
//! ## Resolution
//!
//! Two and three level operations build the expected ancestor path
//! (`root/org`, `root/org/project`), look it up in the path index and check
//! the kind found there. A miss or a kind mismatch is reported as
//! [`RegistryError::NotFound`] or [`RegistryError::WrongKind`] before anything
//! is mutated. Listing operations turn the same misses into an empty `Vec`.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::arena::{Ancestors, AtomArena, AtomError};
use crate::config::{ConfigError, DuplicateNamePolicy, RegistryConfig};
use crate::types::path::{join_path, validate_name, PATH_SEPARATOR};
use crate::types::{
    Atom, AtomId, AtomKind, GlobalInfo, HierarchyInfo, OrganizationInfo, ProjectInfo,
    ResourceInfo, DEFAULT_RESOURCE_TYPE,
};

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Named ancestor path is not indexed.
    #[error("No atom at path: {path}")]
    NotFound {
        /// The path that was looked up.
        path: String,
    },
    /// Named ancestor exists but has the wrong kind.
    #[error("Atom at {path} is a {found}, expected a {expected}")]
    WrongKind {
        /// The path that was looked up.
        path: String,
        /// Kind the operation needed.
        expected: AtomKind,
        /// Kind actually indexed at the path.
        found: AtomKind,
    },
    /// A sibling with the same name already occupies the path.
    #[error("An atom already exists at path: {path}")]
    DuplicateName {
        /// The contested path.
        path: String,
    },
    /// The Global root is never removed.
    #[error("The root atom cannot be removed")]
    RootRemoval,
    /// Atom-layer failure.
    #[error(transparent)]
    Atom(#[from] AtomError),
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RegistryError {
    /// Whether this is the routine "no such ancestor" outcome.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::WrongKind { .. })
    }
}

/// One independent Global > Organization > Project > Resource hierarchy.
///
/// Registries share no state; several may coexist (one per enterprise).
///
/// The root is inserted at construction and lives as long as the registry:
/// [`remove_atom`](Self::remove_atom) refuses it and nothing else removes
/// atoms, so [`root`](Self::root) always resolves and [`len`](Self::len) is
/// never zero.
#[derive(Debug, Clone)]
pub struct AtomRegistry {
    config: RegistryConfig,
    arena: AtomArena,
    root: AtomId,
    by_path: HashMap<String, AtomId>,
}

impl AtomRegistry {
    /// Create a registry whose root is named `global`.
    pub fn new() -> Self {
        Self::bootstrap(RegistryConfig::default())
    }

    /// Create a registry from a configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        Ok(Self::bootstrap(config))
    }

    /// Create a registry with a custom root name.
    pub fn with_root_name(root_name: impl Into<String>) -> Result<Self, RegistryError> {
        Self::with_config(RegistryConfig::with_root_name(root_name))
    }

    fn bootstrap(config: RegistryConfig) -> Self {
        let mut arena = AtomArena::new();
        let root = arena.insert_root(config.root_name.clone());

        let mut by_path = HashMap::new();
        by_path.insert(config.root_name.clone(), root);

        debug!(root_id = %root, root_name = %config.root_name, "atom registry created");

        Self {
            config,
            arena,
            root,
            by_path,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────

    /// Create an organization under the root.
    pub fn create_organization(&mut self, name: &str) -> Result<&mut Atom, RegistryError> {
        self.create_under(self.root, name, AtomKind::Organization, None)
    }

    /// Create a project in the named organization.
    pub fn create_project(
        &mut self,
        org_name: &str,
        project_name: &str,
    ) -> Result<&mut Atom, RegistryError> {
        let org = self.resolve(&[org_name], AtomKind::Organization)?;
        self.create_under(org, project_name, AtomKind::Project, None)
    }

    /// Create a resource in the named project.
    pub fn create_resource(
        &mut self,
        org_name: &str,
        project_name: &str,
        resource_name: &str,
        resource_type: &str,
    ) -> Result<&mut Atom, RegistryError> {
        let project = self.resolve(&[org_name, project_name], AtomKind::Project)?;
        self.create_under(project, resource_name, AtomKind::Resource, Some(resource_type))
    }

    /// Create a resource directly under the root.
    pub fn create_global_resource(
        &mut self,
        name: &str,
        resource_type: &str,
    ) -> Result<&mut Atom, RegistryError> {
        self.create_under(self.root, name, AtomKind::Resource, Some(resource_type))
    }

    /// Create a resource directly under the named organization.
    pub fn create_org_resource(
        &mut self,
        org_name: &str,
        name: &str,
        resource_type: &str,
    ) -> Result<&mut Atom, RegistryError> {
        let org = self.resolve(&[org_name], AtomKind::Organization)?;
        self.create_under(org, name, AtomKind::Resource, Some(resource_type))
    }

    /// Shared creation path: check name and collisions, create, index.
    fn create_under(
        &mut self,
        parent: AtomId,
        name: &str,
        kind: AtomKind,
        resource_type: Option<&str>,
    ) -> Result<&mut Atom, RegistryError> {
        validate_name(name).map_err(AtomError::from)?;
        let parent_path = self
            .arena
            .path(parent)
            .ok_or(AtomError::UnknownAtom(parent))?;
        let path = format!("{parent_path}{PATH_SEPARATOR}{name}");

        if let Some(existing) = self.by_path.get(&path) {
            match self.config.duplicate_names {
                DuplicateNamePolicy::Reject => {
                    return Err(RegistryError::DuplicateName { path });
                }
                DuplicateNamePolicy::Replace => {
                    warn!(
                        path = %path,
                        previous_id = %existing,
                        "path index entry replaced by duplicate sibling name"
                    );
                }
            }
        }

        let id = self
            .arena
            .create(name, kind, resource_type.map(str::to_string), Some(parent))?;
        debug!(atom_id = %id, kind = %kind, path = %path, "atom registered");
        self.by_path.insert(path, id);

        Ok(self.arena.get_mut(id).ok_or(AtomError::UnknownAtom(id))?)
    }

    /// Resolve `root/segments...` and require `expected` kind.
    fn resolve(&self, segments: &[&str], expected: AtomKind) -> Result<AtomId, RegistryError> {
        let path = join_path(&self.config.root_name, segments);
        match self.get_atom_by_path(&path) {
            None => {
                trace!(path = %path, expected = %expected, "ancestor not found");
                Err(RegistryError::NotFound { path })
            }
            Some(atom) if atom.kind() != expected => {
                trace!(
                    path = %path,
                    expected = %expected,
                    found = %atom.kind(),
                    "ancestor has wrong kind"
                );
                Err(RegistryError::WrongKind {
                    path,
                    expected,
                    found: atom.kind(),
                })
            }
            Some(atom) => Ok(atom.id()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────

    /// Look up an atom by id.
    pub fn get_atom_by_id(&self, id: AtomId) -> Option<&Atom> {
        self.arena.get(id)
    }

    /// Look up an atom by id, mutably (for attributes).
    pub fn get_atom_by_id_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.arena.get_mut(id)
    }

    /// Look up an atom by path.
    pub fn get_atom_by_path(&self, path: &str) -> Option<&Atom> {
        self.by_path.get(path).and_then(|id| self.arena.get(*id))
    }

    /// Look up an atom by path, mutably (for attributes).
    pub fn get_atom_by_path_mut(&mut self, path: &str) -> Option<&mut Atom> {
        let id = *self.by_path.get(path)?;
        self.arena.get_mut(id)
    }

    /// Parent of `id`, if it has one and it still exists.
    pub fn get_parent(&self, id: AtomId) -> Option<&Atom> {
        self.arena.parent(id)
    }

    /// Path of `id`, derived from the live parent chain.
    pub fn get_path(&self, id: AtomId) -> Option<String> {
        self.arena.path(id)
    }

    /// Walk from `id` up to the root, `id` first.
    pub fn ancestors(&self, id: AtomId) -> Ancestors<'_> {
        self.arena.ancestors(id)
    }

    /// The Global root.
    pub fn root(&self) -> &Atom {
        self.arena
            .get(self.root)
            .expect("root atom is never removed")
    }

    /// Id of the Global root.
    pub fn root_id(&self) -> AtomId {
        self.root
    }

    /// Name of the Global root.
    pub fn root_name(&self) -> &str {
        &self.config.root_name
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Read-only view of the arena.
    pub fn arena(&self) -> &AtomArena {
        &self.arena
    }

    /// Number of entries in the id index (root included).
    pub fn id_index_len(&self) -> usize {
        self.arena.len()
    }

    /// Number of entries in the path index (root included).
    pub fn path_index_len(&self) -> usize {
        self.by_path.len()
    }

    /// Number of atoms in the hierarchy, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Listing
    // ─────────────────────────────────────────────────────────────────────

    /// All organizations under the root.
    pub fn list_organizations(&self) -> Vec<&Atom> {
        self.arena.children_of_kind(self.root, AtomKind::Organization)
    }

    /// Projects of the named organization; empty if it does not resolve.
    pub fn list_projects(&self, org_name: &str) -> Vec<&Atom> {
        self.list_under(&[org_name], AtomKind::Organization, AtomKind::Project)
    }

    /// Resources of the named project; empty if it does not resolve.
    pub fn list_resources(&self, org_name: &str, project_name: &str) -> Vec<&Atom> {
        self.list_under(&[org_name, project_name], AtomKind::Project, AtomKind::Resource)
    }

    /// Resources directly under the root.
    pub fn list_global_resources(&self) -> Vec<&Atom> {
        self.arena.children_of_kind(self.root, AtomKind::Resource)
    }

    /// Resources directly under the named organization; empty if it does not resolve.
    pub fn list_org_resources(&self, org_name: &str) -> Vec<&Atom> {
        self.list_under(&[org_name], AtomKind::Organization, AtomKind::Resource)
    }

    fn list_under(
        &self,
        segments: &[&str],
        parent_kind: AtomKind,
        child_kind: AtomKind,
    ) -> Vec<&Atom> {
        match self.resolve(segments, parent_kind) {
            Ok(parent) => self.arena.children_of_kind(parent, child_kind),
            Err(_) => Vec::new(),
        }
    }

    /// Depth-first walk below `id`, excluding `id`.
    pub fn descendants(&self, id: AtomId) -> Vec<&Atom> {
        self.arena.descendants(id)
    }

    /// Every resource in the hierarchy matching `predicate`, depth-first.
    pub fn find_resources<F>(&self, predicate: F) -> Vec<&Atom>
    where
        F: Fn(&Atom) -> bool,
    {
        self.arena
            .descendants(self.root)
            .into_iter()
            .filter(|atom| atom.kind() == AtomKind::Resource && predicate(*atom))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Structure
    // ─────────────────────────────────────────────────────────────────────

    /// Re-attach a detached child to its recorded parent.
    pub fn add_child(&mut self, parent: AtomId, child: AtomId) -> Result<bool, RegistryError> {
        Ok(self.arena.add_child(parent, child)?)
    }

    /// Detach `child` from the child set of `parent`.
    ///
    /// The child stays indexed by id and path; only listings stop showing it.
    pub fn remove_child(&mut self, parent: AtomId, child: AtomId) -> bool {
        self.arena.remove_child(parent, child)
    }

    /// Delete an atom and all of its descendants from the tree and both indices.
    ///
    /// Atoms detached with [`remove_child`](Self::remove_child) still count as
    /// descendants of their recorded parent. Returns the number of atoms removed.
    pub fn remove_atom(&mut self, id: AtomId) -> Result<usize, RegistryError> {
        if id == self.root {
            return Err(RegistryError::RootRemoval);
        }
        if !self.arena.contains(id) {
            return Err(AtomError::UnknownAtom(id).into());
        }

        // Paths must be derived while the parent chain is still intact.
        let entries: Vec<(AtomId, String)> = self
            .arena
            .subtree(id)
            .into_iter()
            .filter_map(|atom| Some((atom, self.arena.path(atom)?)))
            .collect();

        let removed = self.arena.remove_subtree(id);
        for (atom, path) in entries {
            // Under `Replace` the path may already belong to a newer sibling.
            if self.by_path.get(&path) == Some(&atom) {
                self.by_path.remove(&path);
            }
        }

        debug!(atom_id = %id, removed = removed.len(), "atom subtree removed");
        Ok(removed.len())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Snapshot
    // ─────────────────────────────────────────────────────────────────────

    /// Build a fresh recursive snapshot of the hierarchy.
    pub fn get_hierarchy_info(&self) -> HierarchyInfo {
        let organizations = self
            .list_organizations()
            .into_iter()
            .map(|org| OrganizationInfo {
                name: org.name().to_string(),
                resources: self.resource_infos(org.id()),
                projects: self
                    .arena
                    .children_of_kind(org.id(), AtomKind::Project)
                    .into_iter()
                    .map(|project| ProjectInfo {
                        name: project.name().to_string(),
                        resources: self.resource_infos(project.id()),
                    })
                    .collect(),
            })
            .collect();

        HierarchyInfo {
            global: GlobalInfo {
                name: self.config.root_name.clone(),
                resources: self.resource_infos(self.root),
                organizations,
            },
        }
    }

    fn resource_infos(&self, parent: AtomId) -> Vec<ResourceInfo> {
        self.arena
            .children_of_kind(parent, AtomKind::Resource)
            .into_iter()
            .map(|res| ResourceInfo {
                name: res.name().to_string(),
                resource_type: res
                    .resource_type()
                    .unwrap_or(DEFAULT_RESOURCE_TYPE)
                    .to_string(),
            })
            .collect()
    }
}

impl Default for AtomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
