//! Tree-shaped hierarchy snapshot.
//!
//! `HierarchyInfo` is a detached, serializable copy of the whole hierarchy:
//!
//! ```text
//! {global: {name, resources: [{name, type}],
//!           organizations: [{name, resources: [...],
//!                            projects: [{name, resources: [...]}]}]}}
//! ```
//!
//! The structure is the contract; encoding is left to callers. Child lists
//! follow creation order, so two snapshots of the same registry state
//! serialize identically and share a fingerprint.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;

/// Resource entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Resource name.
    pub name: String,
    /// Resource classification, serialized as `type`.
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// Project entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// Resources held by the project.
    pub resources: Vec<ResourceInfo>,
}

/// Organization entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    /// Organization name.
    pub name: String,
    /// Organization-level resources.
    pub resources: Vec<ResourceInfo>,
    /// Projects in the organization.
    pub projects: Vec<ProjectInfo>,
}

/// Root entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    /// Root atom name.
    pub name: String,
    /// Global-level resources.
    pub resources: Vec<ResourceInfo>,
    /// Organizations under the root.
    pub organizations: Vec<OrganizationInfo>,
}

/// Full recursive snapshot of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyInfo {
    /// The root tier.
    pub global: GlobalInfo,
}

impl HierarchyInfo {
    /// Deterministic xxh64 fingerprint of the snapshot (16 hex chars).
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of organizations.
    pub fn organization_count(&self) -> usize {
        self.global.organizations.len()
    }

    /// Number of projects across all organizations.
    pub fn project_count(&self) -> usize {
        self.global
            .organizations
            .iter()
            .map(|org| org.projects.len())
            .sum()
    }

    /// Number of resources at every level.
    pub fn resource_count(&self) -> usize {
        let org_level: usize = self
            .global
            .organizations
            .iter()
            .map(|org| {
                org.resources.len()
                    + org.projects.iter().map(|p| p.resources.len()).sum::<usize>()
            })
            .sum();
        self.global.resources.len() + org_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> HierarchyInfo {
        HierarchyInfo {
            global: GlobalInfo {
                name: "global".into(),
                resources: vec![ResourceInfo {
                    name: "enterprise-dns".into(),
                    resource_type: "service".into(),
                }],
                organizations: vec![OrganizationInfo {
                    name: "acme-corp".into(),
                    resources: vec![],
                    projects: vec![ProjectInfo {
                        name: "web-services".into(),
                        resources: vec![ResourceInfo {
                            name: "web-server-01".into(),
                            resource_type: "host".into(),
                        }],
                    }],
                }],
            },
        }
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "global": {
                    "name": "global",
                    "resources": [{"name": "enterprise-dns", "type": "service"}],
                    "organizations": [{
                        "name": "acme-corp",
                        "resources": [],
                        "projects": [{
                            "name": "web-services",
                            "resources": [{"name": "web-server-01", "type": "host"}]
                        }]
                    }]
                }
            })
        );
    }

    #[test]
    fn test_counts() {
        let info = sample();
        assert_eq!(info.organization_count(), 1);
        assert_eq!(info.project_count(), 1);
        assert_eq!(info.resource_count(), 2);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);

        let mut c = sample();
        c.global.resources[0].resource_type = "dns".into();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
