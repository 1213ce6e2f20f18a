//! Atom node type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::kind::AtomKind;

/// Resource classification used when the caller does not supply one.
pub const DEFAULT_RESOURCE_TYPE: &str = "generic";

/// Attribute value: any scalar or structured JSON value.
pub type AttributeValue = Value;

/// Process-unique identifier of an atom.
///
/// Wraps a v4 UUID; assigned once at construction and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(Uuid);

impl AtomId {
    /// Create an AtomId from a UUID.
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random AtomId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an AtomId from a UUID string.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AtomId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// One node of the hierarchy.
///
/// Atoms are owned by an [`AtomArena`](crate::arena::AtomArena). The parent is
/// held as an id, so walking upward is an arena lookup that degrades to `None`
/// when the parent is gone. Structural fields are read-only from outside the
/// crate; only attributes are caller-mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    id: AtomId,
    name: String,
    kind: AtomKind,
    parent: Option<AtomId>,
    /// Unique membership, creation order.
    children: Vec<AtomId>,
    attributes: BTreeMap<String, AttributeValue>,
    /// Only set for `AtomKind::Resource`.
    resource_type: Option<String>,
}

impl Atom {
    /// Build a detached atom with a fresh id.
    pub(crate) fn new(
        name: String,
        kind: AtomKind,
        parent: Option<AtomId>,
        resource_type: Option<String>,
    ) -> Self {
        let resource_type = match kind {
            AtomKind::Resource => {
                Some(resource_type.unwrap_or_else(|| DEFAULT_RESOURCE_TYPE.to_string()))
            }
            _ => None,
        };
        Self {
            id: AtomId::generate(),
            name,
            kind,
            parent,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            resource_type,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> AtomId {
        self.id
    }

    /// Display label, unique among siblings only.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tier of this atom.
    pub fn kind(&self) -> AtomKind {
        self.kind
    }

    /// Id of the parent, `None` for a root.
    pub fn parent_id(&self) -> Option<AtomId> {
        self.parent
    }

    /// Whether this atom has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Ids of the current children.
    pub fn children(&self) -> &[AtomId] {
        &self.children
    }

    /// Whether `id` is currently in the child set.
    pub fn has_child(&self, id: AtomId) -> bool {
        self.children.contains(&id)
    }

    /// Resource classification (e.g. "host", "database"); `None` unless this is a resource.
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    /// Containment predicate for this atom's kind.
    pub fn can_contain(&self, child: AtomKind) -> bool {
        self.kind.can_contain(child)
    }

    /// Insert into the child set. Returns false if already present.
    pub(crate) fn add_child(&mut self, child: AtomId) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Remove from the child set. No-op when absent.
    pub(crate) fn remove_child(&mut self, child: AtomId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        before != self.children.len()
    }

    /// Set or overwrite an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Read an attribute; `None` marks it absent.
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Read an attribute, falling back to `default` when absent.
    pub fn get_attribute_or(
        &self,
        key: &str,
        default: impl Into<AttributeValue>,
    ) -> AttributeValue {
        self.attributes
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Remove an attribute, returning the previous value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// All attributes, ordered by key.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.name)
    }
}

// Identity is the id; names and attributes do not participate.
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Atom {}
