//! Atom kinds and the containment policy between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tier of an atom in the Global > Organization > Project > Resource hierarchy.
///
/// The kind is fixed at construction and decides which child kinds the atom
/// may accept (see [`AtomKind::can_contain`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomKind {
    /// Root of a hierarchy (`glo/ [ org?/** | res?/** ]`).
    Global,
    /// Organization space (`org/ [ pro?/** | res?/** ]`).
    Organization,
    /// Project space (`pro/ [ res?/** ]`).
    Project,
    /// Leaf resource such as a host, database or service.
    Resource,
}

impl AtomKind {
    /// All kinds, ordered from the root tier down.
    pub const ALL: [AtomKind; 4] = [
        Self::Global,
        Self::Organization,
        Self::Project,
        Self::Resource,
    ];

    /// Parse kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global" | "glo" => Some(Self::Global),
            "organization" | "org" => Some(Self::Organization),
            "project" | "pro" => Some(Self::Project),
            "resource" | "res" => Some(Self::Resource),
            _ => None,
        }
    }

    /// Kinds an atom of this kind may hold as direct children.
    pub fn permitted_children(&self) -> &'static [AtomKind] {
        match self {
            Self::Global => &[Self::Organization, Self::Resource],
            Self::Organization => &[Self::Project, Self::Resource],
            Self::Project => &[Self::Resource],
            Self::Resource => &[],
        }
    }

    /// Containment predicate.
    ///
    /// Resources may hang off any non-resource tier; resources themselves are
    /// always leaves.
    pub fn can_contain(&self, child: AtomKind) -> bool {
        self.permitted_children().contains(&child)
    }

    /// Whether this kind can never hold children.
    pub fn is_leaf(&self) -> bool {
        self.permitted_children().is_empty()
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Organization => write!(f, "organization"),
            Self::Project => write!(f, "project"),
            Self::Resource => write!(f, "resource"),
        }
    }
}
