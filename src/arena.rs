//! Atom arena: sole owner of every atom in one hierarchy.
//!
//! Atoms refer to each other by [`AtomId`]. A parent lookup is a map query,
//! so a child never keeps its parent alive and a missing parent simply
//! resolves to `None`.
//!
//! ## Atom-layer operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `create` | validate name, check containment, insert, wire child link |
//! | `add_child` / `remove_child` | mutate a parent's child set |
//! | `parent` / `ancestors` / `path` | upward walks over the live parent chain |
//! | `children_of_kind` / `descendants` | read-only downward traversals |
//! | `remove_subtree` | delete an atom with everything below it |
//!
//! Every check runs before the first mutation, so a rejected call leaves the
//! arena untouched.

use std::collections::{HashMap, HashSet};

use crate::types::path::{validate_name, NameError, PATH_SEPARATOR};
use crate::types::{Atom, AtomId, AtomKind};

/// Error type for atom-layer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomError {
    /// Name is not a valid path segment.
    #[error("Invalid atom name: {0}")]
    InvalidName(#[from] NameError),
    /// Referenced atom is not in the arena.
    #[error("Atom not found: {0}")]
    UnknownAtom(AtomId),
    /// Parent kind does not accept the child kind.
    #[error("A {parent_kind} atom cannot contain a {child_kind} atom")]
    ContainmentViolation {
        /// Kind of the would-be parent.
        parent_kind: AtomKind,
        /// Kind of the rejected child.
        child_kind: AtomKind,
    },
    /// Child was constructed under a different parent.
    #[error("Atom {child} is not a child of {parent}")]
    ForeignChild {
        /// Parent the caller tried to attach to.
        parent: AtomId,
        /// The child atom.
        child: AtomId,
    },
}

/// Owner of all atoms, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AtomArena {
    atoms: HashMap<AtomId, Atom>,
}

impl AtomArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an atom, optionally under `parent`.
    ///
    /// With a parent, the parent must exist and its kind must accept `kind`;
    /// the new id is then appended to the parent's child set. Resources get
    /// [`DEFAULT_RESOURCE_TYPE`](crate::types::DEFAULT_RESOURCE_TYPE) when
    /// `resource_type` is `None`; other kinds ignore it.
    ///
    /// Sibling name uniqueness is not checked here.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        kind: AtomKind,
        resource_type: Option<String>,
        parent: Option<AtomId>,
    ) -> Result<AtomId, AtomError> {
        let name = name.into();
        validate_name(&name)?;

        if let Some(parent_id) = parent {
            let parent_atom = self
                .atoms
                .get(&parent_id)
                .ok_or(AtomError::UnknownAtom(parent_id))?;
            if !parent_atom.can_contain(kind) {
                return Err(AtomError::ContainmentViolation {
                    parent_kind: parent_atom.kind(),
                    child_kind: kind,
                });
            }
        }

        let atom = Atom::new(name, kind, parent, resource_type);
        let id = atom.id();
        self.atoms.insert(id, atom);

        if let Some(parent_atom) = parent.and_then(|p| self.atoms.get_mut(&p)) {
            parent_atom.add_child(id);
        }

        Ok(id)
    }

    /// Insert a root atom whose name the caller has already validated.
    pub(crate) fn insert_root(&mut self, name: String) -> AtomId {
        let atom = Atom::new(name, AtomKind::Global, None, None);
        let id = atom.id();
        self.atoms.insert(id, atom);
        id
    }

    /// Create a parentless Global atom.
    pub fn create_global(&mut self, name: impl Into<String>) -> Result<AtomId, AtomError> {
        self.create(name, AtomKind::Global, None, None)
    }

    /// Create an organization under a Global atom.
    pub fn create_organization(
        &mut self,
        global: AtomId,
        name: impl Into<String>,
    ) -> Result<AtomId, AtomError> {
        self.create(name, AtomKind::Organization, None, Some(global))
    }

    /// Create a project under an organization.
    pub fn create_project(
        &mut self,
        organization: AtomId,
        name: impl Into<String>,
    ) -> Result<AtomId, AtomError> {
        self.create(name, AtomKind::Project, None, Some(organization))
    }

    /// Create a resource under a global, organization or project atom.
    pub fn create_resource(
        &mut self,
        parent: AtomId,
        name: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Result<AtomId, AtomError> {
        self.create(name, AtomKind::Resource, Some(resource_type.into()), Some(parent))
    }

    /// Re-attach `child` to the child set of `parent`.
    ///
    /// The child's recorded parent must be `parent`: parents are fixed at
    /// construction. Returns `Ok(false)` when the child was already attached.
    pub fn add_child(&mut self, parent: AtomId, child: AtomId) -> Result<bool, AtomError> {
        let child_atom = self.atoms.get(&child).ok_or(AtomError::UnknownAtom(child))?;
        let child_kind = child_atom.kind();
        if child_atom.parent_id() != Some(parent) {
            return Err(AtomError::ForeignChild { parent, child });
        }

        let parent_atom = self
            .atoms
            .get_mut(&parent)
            .ok_or(AtomError::UnknownAtom(parent))?;
        if !parent_atom.can_contain(child_kind) {
            return Err(AtomError::ContainmentViolation {
                parent_kind: parent_atom.kind(),
                child_kind,
            });
        }

        Ok(parent_atom.add_child(child))
    }

    /// Detach `child` from the child set of `parent`.
    ///
    /// Idempotent: returns false when there was nothing to remove. The child
    /// stays in the arena and keeps its parent id.
    pub fn remove_child(&mut self, parent: AtomId, child: AtomId) -> bool {
        self.atoms
            .get_mut(&parent)
            .map(|p| p.remove_child(child))
            .unwrap_or(false)
    }

    /// Look up an atom.
    pub fn get(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    /// Look up an atom mutably.
    pub fn get_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(&id)
    }

    /// Whether the arena owns `id`.
    pub fn contains(&self, id: AtomId) -> bool {
        self.atoms.contains_key(&id)
    }

    /// Resolve the parent of `id`; `None` for roots, unknown ids and removed parents.
    pub fn parent(&self, id: AtomId) -> Option<&Atom> {
        self.atoms
            .get(&id)?
            .parent_id()
            .and_then(|p| self.atoms.get(&p))
    }

    /// Walk from `id` up to its root, starting with `id` itself.
    pub fn ancestors(&self, id: AtomId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: Some(id),
        }
    }

    /// Derive the path of `id` from the current parent chain.
    pub fn path(&self, id: AtomId) -> Option<String> {
        if !self.contains(id) {
            return None;
        }
        let mut names: Vec<&str> = self.ancestors(id).map(Atom::name).collect();
        names.reverse();

        let separator = PATH_SEPARATOR.to_string();
        Some(names.join(separator.as_str()))
    }

    /// Children of `id` with the given kind, in creation order.
    pub fn children_of_kind(&self, id: AtomId, kind: AtomKind) -> Vec<&Atom> {
        let Some(atom) = self.atoms.get(&id) else {
            return Vec::new();
        };
        atom.children()
            .iter()
            .filter_map(|c| self.atoms.get(c))
            .filter(|c| c.kind() == kind)
            .collect()
    }

    /// Depth-first pre-order walk below `id` (excluding `id`).
    pub fn descendants(&self, id: AtomId) -> Vec<&Atom> {
        let mut out = Vec::new();
        let mut stack: Vec<AtomId> = match self.atoms.get(&id) {
            Some(atom) => atom.children().iter().rev().copied().collect(),
            None => return out,
        };

        while let Some(next) = stack.pop() {
            if let Some(atom) = self.atoms.get(&next) {
                stack.extend(atom.children().iter().rev().copied());
                out.push(atom);
            }
        }
        out
    }

    /// Ids of `id` and every atom whose parent chain reaches it, `id` first.
    ///
    /// Unlike [`descendants`](Self::descendants) this follows recorded parent
    /// ids, so atoms detached with `remove_child` are included. Empty when
    /// `id` is unknown.
    pub fn subtree(&self, id: AtomId) -> Vec<AtomId> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut ids = vec![id];
        ids.extend(self.descendants(id).into_iter().map(Atom::id));
        let attached: HashSet<AtomId> = ids.iter().copied().collect();

        ids.extend(
            self.atoms
                .keys()
                .copied()
                .filter(|a| !attached.contains(a))
                .filter(|a| self.ancestors(*a).any(|anc| anc.id() == id)),
        );
        ids
    }

    /// Remove `id` and everything below it, detaching it from its parent.
    ///
    /// Detached descendants go too. Returns the removed atoms, `id` first.
    /// Empty when `id` is unknown.
    pub fn remove_subtree(&mut self, id: AtomId) -> Vec<Atom> {
        let doomed = self.subtree(id);
        if doomed.is_empty() {
            return Vec::new();
        }

        if let Some(parent) = self.atoms.get(&id).and_then(Atom::parent_id) {
            self.remove_child(parent, id);
        }

        doomed
            .into_iter()
            .filter_map(|d| self.atoms.remove(&d))
            .collect()
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the arena holds no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterate over all atoms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values()
    }
}

/// Iterator returned by [`AtomArena::ancestors`].
pub struct Ancestors<'a> {
    arena: &'a AtomArena,
    next: Option<AtomId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Atom;

    fn next(&mut self) -> Option<Self::Item> {
        let atom = self.arena.get(self.next?)?;
        self.next = atom.parent_id();
        Some(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tree {
        arena: AtomArena,
        global: AtomId,
        org: AtomId,
        project: AtomId,
        resource: AtomId,
    }

    fn build_tree() -> Tree {
        let mut arena = AtomArena::new();
        let global = arena.create_global("test-global").unwrap();
        let org = arena.create_organization(global, "test-org").unwrap();
        let project = arena.create_project(org, "test-project").unwrap();
        let resource = arena.create_resource(project, "test-resource", "host").unwrap();
        Tree {
            arena,
            global,
            org,
            project,
            resource,
        }
    }

    #[test]
    fn test_parent_links() {
        let t = build_tree();
        assert_eq!(t.arena.parent(t.org).map(Atom::id), Some(t.global));
        assert_eq!(t.arena.parent(t.project).map(Atom::id), Some(t.org));
        assert_eq!(t.arena.parent(t.resource).map(Atom::id), Some(t.project));
        assert!(t.arena.parent(t.global).is_none());
        assert!(t.arena.get(t.project).unwrap().has_child(t.resource));
    }

    #[test]
    fn test_paths() {
        let t = build_tree();
        assert_eq!(t.arena.path(t.global).as_deref(), Some("test-global"));
        assert_eq!(t.arena.path(t.org).as_deref(), Some("test-global/test-org"));
        assert_eq!(
            t.arena.path(t.project).as_deref(),
            Some("test-global/test-org/test-project")
        );
        assert_eq!(
            t.arena.path(t.resource).as_deref(),
            Some("test-global/test-org/test-project/test-resource")
        );
        assert_eq!(t.arena.path(AtomId::generate()), None);
    }

    #[test]
    fn test_ancestors_walk_bottom_up() {
        let t = build_tree();
        let kinds: Vec<AtomKind> = t.arena.ancestors(t.resource).map(Atom::kind).collect();
        assert_eq!(
            kinds,
            vec![AtomKind::Resource, AtomKind::Project, AtomKind::Organization, AtomKind::Global]
        );
    }

    #[test]
    fn test_containment_rejected_before_mutation() {
        let mut t = build_tree();
        let before = t.arena.len();

        let err = t.arena.create("nested", AtomKind::Project, None, Some(t.project));
        assert_eq!(
            err,
            Err(AtomError::ContainmentViolation {
                parent_kind: AtomKind::Project,
                child_kind: AtomKind::Project,
            })
        );

        let err = t.arena.create_resource(t.resource, "inner", "host");
        assert!(matches!(err, Err(AtomError::ContainmentViolation { .. })));

        let err = t.arena.create("org-in-org", AtomKind::Organization, None, Some(t.org));
        assert!(matches!(err, Err(AtomError::ContainmentViolation { .. })));

        assert_eq!(t.arena.len(), before);
        assert_eq!(t.arena.get(t.project).unwrap().children().len(), 1);
        assert!(t.arena.get(t.resource).unwrap().children().is_empty());
    }

    #[test]
    fn test_unknown_parent_and_bad_name() {
        let mut t = build_tree();
        let ghost = AtomId::generate();
        assert_eq!(
            t.arena.create_project(ghost, "p"),
            Err(AtomError::UnknownAtom(ghost))
        );
        assert_eq!(
            t.arena.create_project(t.org, ""),
            Err(AtomError::InvalidName(NameError::Empty))
        );
        assert!(matches!(
            t.arena.create_project(t.org, "a/b"),
            Err(AtomError::InvalidName(NameError::ContainsSeparator { .. }))
        ));
    }

    #[test]
    fn test_resources_at_every_tier() {
        let mut t = build_tree();
        let dns = t.arena.create_resource(t.global, "global-dns", "service").unwrap();
        let net = t.arena.create_resource(t.org, "org-network", "network").unwrap();

        assert_eq!(t.arena.path(dns).as_deref(), Some("test-global/global-dns"));
        assert_eq!(t.arena.path(net).as_deref(), Some("test-global/test-org/org-network"));
        assert_eq!(t.arena.children_of_kind(t.global, AtomKind::Resource).len(), 1);
        assert_eq!(t.arena.children_of_kind(t.global, AtomKind::Organization).len(), 1);
        assert_eq!(t.arena.children_of_kind(t.org, AtomKind::Resource).len(), 1);
        assert_eq!(t.arena.children_of_kind(t.org, AtomKind::Project).len(), 1);
    }

    #[test]
    fn test_remove_and_add_child() {
        let mut t = build_tree();

        assert!(t.arena.remove_child(t.project, t.resource));
        assert!(!t.arena.remove_child(t.project, t.resource));
        assert!(t.arena.children_of_kind(t.project, AtomKind::Resource).is_empty());
        // Detached atoms keep their parent id and path.
        assert_eq!(t.arena.parent(t.resource).map(Atom::id), Some(t.project));

        assert_eq!(t.arena.add_child(t.project, t.resource), Ok(true));
        assert_eq!(t.arena.add_child(t.project, t.resource), Ok(false));
        assert_eq!(t.arena.get(t.project).unwrap().children().len(), 1);

        assert_eq!(
            t.arena.add_child(t.org, t.resource),
            Err(AtomError::ForeignChild {
                parent: t.org,
                child: t.resource,
            })
        );
    }

    #[test]
    fn test_descendants_preorder() {
        let mut t = build_tree();
        let second = t.arena.create_resource(t.project, "second", "db").unwrap();
        let names: Vec<&str> = t.arena.descendants(t.global).into_iter().map(Atom::name).collect();
        assert_eq!(names, vec!["test-org", "test-project", "test-resource", "second"]);
        assert!(t.arena.descendants(second).is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut t = build_tree();
        let removed = t.arena.remove_subtree(t.org);

        assert_eq!(removed.len(), 3);
        assert_eq!(removed[0].id(), t.org);
        assert_eq!(t.arena.len(), 1);
        assert!(t.arena.get(t.global).unwrap().children().is_empty());
        assert!(t.arena.parent(t.resource).is_none());
        assert!(t.arena.remove_subtree(t.org).is_empty());
    }

    #[test]
    fn test_remove_subtree_includes_detached_descendants() {
        let mut t = build_tree();
        assert!(t.arena.remove_child(t.project, t.resource));
        assert_eq!(t.arena.subtree(t.org), vec![t.org, t.project, t.resource]);

        let removed = t.arena.remove_subtree(t.org);
        assert_eq!(removed.len(), 3);
        assert!(!t.arena.contains(t.resource));
        assert_eq!(t.arena.len(), 1);
        assert!(t.arena.subtree(t.org).is_empty());
    }

    #[test]
    fn test_missing_parent_degrades_to_none() {
        let mut t = build_tree();
        // Drop only the project, leaving its resource orphaned in the arena.
        t.arena.atoms.remove(&t.project);
        assert!(t.arena.parent(t.resource).is_none());
        assert_eq!(t.arena.path(t.resource).as_deref(), Some("test-resource"));
    }
}
