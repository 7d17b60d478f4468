//! Per-sheet relationship collections
//!
//! Each sheet owns one [`Relationships`] collection (held by the workbook)
//! describing the parts it points at: its drawing and its hyperlink targets.
//! Identifiers (`rId1`, `rId2`, ...) are handed out by the collection.

use std::fmt;

use crate::drawing::DrawingId;

/// Relationship identifier within one collection (e.g. `rId3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipId(String);

impl RelationshipId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of an `rIdN` identifier
    fn number(&self) -> Option<u32> {
        self.0.strip_prefix("rId")?.parse().ok()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a relationship points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationshipKind {
    /// The sheet's drawing part
    Drawing,
    /// An external hyperlink target
    Hyperlink,
}

impl RelationshipKind {
    /// Relationship type URI used by the package format
    pub fn type_uri(&self) -> &'static str {
        match self {
            RelationshipKind::Drawing => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing"
            }
            RelationshipKind::Hyperlink => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink"
            }
        }
    }
}

/// Target of a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationshipTarget {
    /// A drawing owned by the workbook
    Drawing(DrawingId),
    /// An external URL
    External(String),
}

/// A single relationship from a sheet to another part
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    id: RelationshipId,
    kind: RelationshipKind,
    target: RelationshipTarget,
}

impl Relationship {
    /// Relationship identifier
    pub fn id(&self) -> &RelationshipId {
        &self.id
    }

    /// Relationship kind
    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    /// Relationship target
    pub fn target(&self) -> &RelationshipTarget {
        &self.target
    }

    /// Whether the target lives outside the package
    pub fn is_external(&self) -> bool {
        matches!(self.target, RelationshipTarget::External(_))
    }
}

/// A hyperlink relationship handed back to callers.
///
/// The default value is inert: it has no relationship id and cannot be
/// anchored on a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hyperlink {
    rel_id: Option<RelationshipId>,
    url: String,
}

impl Hyperlink {
    /// Relationship id backing the link, if bound
    pub fn rel_id(&self) -> Option<&RelationshipId> {
        self.rel_id.as_ref()
    }

    /// Link target
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if the link was never bound to a relationship
    pub fn is_inert(&self) -> bool {
        self.rel_id.is_none()
    }
}

/// Relationship collection of one sheet
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the next relationship will receive
    pub fn next_id(&self) -> RelationshipId {
        let max = self
            .rels
            .iter()
            .filter_map(|r| r.id.number())
            .max()
            .unwrap_or(0);
        RelationshipId(format!("rId{}", max + 1))
    }

    /// Add a relationship to a workbook part, assigning a fresh id
    pub fn add_auto_relationship(
        &mut self,
        kind: RelationshipKind,
        target: RelationshipTarget,
    ) -> &Relationship {
        let id = self.next_id();
        self.rels.push(Relationship { id, kind, target });
        let last = self.rels.len() - 1;
        &self.rels[last]
    }

    /// Add an external hyperlink relationship
    pub fn add_hyperlink(&mut self, url: &str) -> Hyperlink {
        let rel = self.add_auto_relationship(
            RelationshipKind::Hyperlink,
            RelationshipTarget::External(url.to_string()),
        );
        Hyperlink {
            rel_id: Some(rel.id.clone()),
            url: url.to_string(),
        }
    }

    /// Get a relationship by id
    pub fn get(&self, id: &RelationshipId) -> Option<&Relationship> {
        self.rels.iter().find(|r| &r.id == id)
    }

    /// Remove a relationship by id
    pub fn remove(&mut self, id: &RelationshipId) -> Option<Relationship> {
        let pos = self.rels.iter().position(|r| &r.id == id)?;
        Some(self.rels.remove(pos))
    }

    /// Iterate over relationships in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
