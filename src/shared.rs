//! Thread-safe registry handle.
//!
//! The tree and both indices are mutated together, so a single
//! `parking_lot::RwLock` guards the whole [`AtomRegistry`]: writers hold it
//! for a complete create/remove, readers never see a half-indexed atom.
//! Borrowed atoms cannot outlive the guard, so the convenience methods here
//! return owned values (ids, paths, snapshots).

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::registry::{AtomRegistry, RegistryError};
use crate::types::{AtomId, AttributeValue, HierarchyInfo};

/// Cloneable, lock-protected handle to one registry.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AtomRegistry>>,
}

impl SharedRegistry {
    /// Wrap an existing registry.
    pub fn new(registry: AtomRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, AtomRegistry> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, AtomRegistry> {
        self.inner.write()
    }

    /// Run `f` under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&AtomRegistry) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` under the write lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut AtomRegistry) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// Create an organization, returning its id.
    pub fn create_organization(&self, name: &str) -> Result<AtomId, RegistryError> {
        self.with_write(|r| r.create_organization(name).map(|a| a.id()))
    }

    /// Create a project, returning its id.
    pub fn create_project(
        &self,
        org_name: &str,
        project_name: &str,
    ) -> Result<AtomId, RegistryError> {
        self.with_write(|r| r.create_project(org_name, project_name).map(|a| a.id()))
    }

    /// Create a project-level resource, returning its id.
    pub fn create_resource(
        &self,
        org_name: &str,
        project_name: &str,
        resource_name: &str,
        resource_type: &str,
    ) -> Result<AtomId, RegistryError> {
        self.with_write(|r| {
            r.create_resource(org_name, project_name, resource_name, resource_type)
                .map(|a| a.id())
        })
    }

    /// Set an attribute on an atom. Returns false if the id is unknown.
    pub fn set_attribute(&self, id: AtomId, key: &str, value: impl Into<AttributeValue>) -> bool {
        self.with_write(|r| match r.get_atom_by_id_mut(id) {
            Some(atom) => {
                atom.set_attribute(key, value);
                true
            }
            None => false,
        })
    }

    /// Read an attribute by atom id.
    pub fn get_attribute(&self, id: AtomId, key: &str) -> Option<AttributeValue> {
        self.with_read(|r| r.get_atom_by_id(id)?.get_attribute(key).cloned())
    }

    /// Id of the atom at `path`.
    pub fn id_at(&self, path: &str) -> Option<AtomId> {
        self.with_read(|r| r.get_atom_by_path(path).map(|a| a.id()))
    }

    /// Path of `id`.
    pub fn path_of(&self, id: AtomId) -> Option<String> {
        self.with_read(|r| r.get_path(id))
    }

    /// Fresh hierarchy snapshot.
    pub fn snapshot(&self) -> HierarchyInfo {
        self.with_read(AtomRegistry::get_hierarchy_info)
    }
}

impl From<AtomRegistry> for SharedRegistry {
    fn from(registry: AtomRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_concurrent_creation_keeps_indices_consistent() {
        let shared = SharedRegistry::default();
        shared.create_organization("acme-corp").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let project = format!("project-{t}");
                    shared.create_project("acme-corp", &project).unwrap();
                    for i in 0..10 {
                        shared
                            .create_resource("acme-corp", &project, &format!("res-{i}"), "host")
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let registry = shared.read();
        // root + org + 8 projects + 80 resources
        assert_eq!(registry.id_index_len(), 90);
        assert_eq!(registry.path_index_len(), 90);
        assert_eq!(registry.list_projects("acme-corp").len(), 8);
    }

    #[test]
    fn test_attribute_roundtrip_by_id() {
        let shared = SharedRegistry::new(AtomRegistry::new());
        let org = shared.create_organization("acme-corp").unwrap();

        assert!(shared.set_attribute(org, "tier", "gold"));
        assert_eq!(shared.get_attribute(org, "tier"), Some(json!("gold")));
        assert_eq!(shared.get_attribute(org, "missing"), None);
        assert!(!shared.set_attribute(AtomId::generate(), "tier", "gold"));

        assert_eq!(shared.id_at("global/acme-corp"), Some(org));
        assert_eq!(shared.path_of(org).as_deref(), Some("global/acme-corp"));
        assert_eq!(shared.snapshot().organization_count(), 1);
    }
}
