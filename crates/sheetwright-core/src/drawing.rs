//! Drawing parts

use std::fmt;

/// Stable identifier of a drawing within its workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawingId(pub(crate) u32);

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drawing#{}", self.0)
    }
}

/// A drawing part owned by the workbook.
///
/// A drawing can hold many charts or pictures; a sheet may reference at most
/// one drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drawing {
    id: DrawingId,
}

impl Drawing {
    pub(crate) fn new(id: DrawingId) -> Self {
        Self { id }
    }

    /// Drawing identifier
    pub fn id(&self) -> DrawingId {
        self.id
    }
}
