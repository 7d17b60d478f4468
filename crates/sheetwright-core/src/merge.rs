//! Merged cell regions

use std::fmt;

use crate::cell::{CellAddress, CellRange};
use crate::error::Result;

/// Handle of a merged region, assigned by the sheet's [`MergedCells`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergedRegionId(u32);

/// A merged region.
///
/// The corners keep the order they were supplied in (`C5:A1` stays
/// `C5:A1`); references are parsed, so `a1` is rendered as `A1`. Two regions
/// with the same corners are still distinct merges with distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergedRegion {
    id: MergedRegionId,
    from: CellAddress,
    to: CellAddress,
}

impl MergedRegion {
    /// Handle of this merge within its sheet
    pub fn id(&self) -> MergedRegionId {
        self.id
    }

    /// First corner
    pub fn from(&self) -> CellAddress {
        self.from
    }

    /// Second corner
    pub fn to(&self) -> CellAddress {
        self.to
    }

    /// The normalized rectangle covered by the region
    pub fn range(&self) -> CellRange {
        CellRange::new(self.from, self.to)
    }
}

impl fmt::Display for MergedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

/// The merged regions of one sheet plus their stored count.
///
/// The count mirrors the list length after every add/remove. Regions may
/// overlap each other and need not cover existing cells.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergedCells {
    regions: Vec<MergedRegion>,
    count: u32,
    next_id: u32,
}

impl MergedCells {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region spanning `from_ref:to_ref`
    pub fn add(&mut self, from_ref: &str, to_ref: &str) -> Result<MergedRegion> {
        let from = CellAddress::parse(from_ref)?;
        let to = CellAddress::parse(to_ref)?;
        let region = MergedRegion {
            id: MergedRegionId(self.next_id),
            from,
            to,
        };
        self.next_id += 1;
        self.regions.push(region);
        self.sync_count();
        Ok(region)
    }

    /// Remove the merge created as `region`; other merges over the same
    /// cells stay. Unknown handles are ignored.
    pub fn remove(&mut self, region: &MergedRegion) {
        self.regions.retain(|r| r.id != region.id);
        self.sync_count();
    }

    /// All regions in list order
    pub fn regions(&self) -> &[MergedRegion] {
        &self.regions
    }

    /// Stored region count
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Check if any region covers the cell
    pub fn is_merged(&self, addr: &CellAddress) -> bool {
        self.regions.iter().any(|r| r.range().contains(addr))
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if there are no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn sync_count(&mut self) {
        self.count = self.regions.len() as u32;
    }
}
