//! Sheet type

use std::fmt;

use ahash::AHashSet;

use crate::cell::{quote_sheet_name, Cell, CellAddress, CellRange};
use crate::drawing::DrawingId;
use crate::error::{Error, Result};
use crate::merge::{MergedCells, MergedRegion};
use crate::relationships::{Hyperlink, RelationshipId};
use crate::row::Row;
use crate::{MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN};

/// Characters the file format does not allow in sheet names
const INVALID_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Stable identifier of a sheet within its workbook.
///
/// Identifiers survive reordering and removal of other sheets; positions are
/// only computed when the workbook is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetId(pub(crate) u32);

impl SheetId {
    /// Identifier carried by sheets created outside a workbook
    pub const DETACHED: SheetId = SheetId(0);
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet#{}", self.0)
    }
}

/// The sheet's reference to its drawing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawingRef {
    /// Drawing the sheet shows
    pub drawing: DrawingId,
    /// Relationship in the sheet's collection that points at the drawing
    pub rel_id: RelationshipId,
}

/// A hyperlink relationship anchored on one cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HyperlinkAnchor {
    /// Anchored cell
    pub cell: CellAddress,
    /// Hyperlink relationship in the sheet's collection
    pub rel_id: RelationshipId,
}

/// Why a cell lookup fell back to a fabricated cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDiagnostic {
    /// The reference that failed to parse
    pub reference: String,
    /// The parse error
    pub error: Error,
    /// Where the fallback cell was created instead
    pub fallback: CellAddress,
}

impl fmt::Display for AddressDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not parse cell reference '{}' ({}); used {} instead",
            self.reference, self.error, self.fallback
        )
    }
}

/// Result of [`Sheet::cell_or_fallback`]
#[derive(Debug)]
pub struct CellLookup<'a> {
    /// The addressed (or fabricated) cell
    pub cell: &'a mut Cell,
    /// Number of the row holding the cell
    pub row: u32,
    /// Set when the reference was malformed and a fallback cell was created
    pub diagnostic: Option<AddressDiagnostic>,
}

impl CellLookup<'_> {
    /// Check whether the lookup used the fallback path
    pub fn is_fallback(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// A single sheet of a workbook
///
/// Rows are kept sorted by row number after every insertion. Workbook-wide
/// bookkeeping (relationships, drawings, defined names) lives on
/// [`Workbook`](crate::Workbook); the sheet only records the identifiers it
/// was handed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sheet {
    id: SheetId,
    name: String,
    rows: Vec<Row>,
    merged: MergedCells,
    /// Autofilter range, normalized and without `$` markers
    auto_filter: Option<CellRange>,
    drawing: Option<DrawingRef>,
    hyperlinks: Vec<HyperlinkAnchor>,
}

impl Sheet {
    /// Create a detached sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_id(SheetId::DETACHED, name)
    }

    pub(crate) fn with_id<S: Into<String>>(id: SheetId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            rows: Vec::new(),
            merged: MergedCells::new(),
            auto_filter: None,
            drawing: None,
            hyperlinks: Vec::new(),
        }
    }

    /// Stable identifier of the sheet
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name.
    ///
    /// References produced earlier by [`Sheet::range_reference`] keep the old
    /// name.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Rows ===

    /// Return the row numbered `number`, creating and inserting it if needed
    pub fn row(&mut self, number: u32) -> &mut Row {
        let idx = self.rows.partition_point(|r| r.number() < Some(number));
        if self.rows.get(idx).and_then(Row::number) == Some(number) {
            return &mut self.rows[idx];
        }
        self.add_numbered_row(number)
    }

    /// Add a row numbered one past the current maximum (1 on an empty sheet).
    ///
    /// Mixing this with [`Sheet::add_numbered_row`] can later produce a
    /// duplicate number; prefer one numbering style per sheet.
    pub fn add_row(&mut self) -> &mut Row {
        let max = self.rows.iter().filter_map(Row::number).max().unwrap_or(0);
        self.add_numbered_row(max.saturating_add(1))
    }

    /// Insert a new row numbered `number` without checking for an existing
    /// one. A reused number is only reported by [`Sheet::validate`]; use
    /// [`Sheet::row`] unless the number is known to be free.
    pub fn add_numbered_row(&mut self, number: u32) -> &mut Row {
        log::trace!("sheet '{}': inserting row {}", self.name, number);
        self.insert_row(Row::new(number))
    }

    /// Insert a prepared row at its sorted position.
    ///
    /// Unnumbered rows sort first; rows with equal numbers keep insertion
    /// order.
    pub fn insert_row(&mut self, row: Row) -> &mut Row {
        let number = row.number();
        let idx = self.rows.partition_point(|r| r.number() <= number);
        self.rows.insert(idx, row);
        &mut self.rows[idx]
    }

    /// Get a row by number without creating it
    pub fn get_row(&self, number: u32) -> Option<&Row> {
        self.rows.iter().find(|r| r.number() == Some(number))
    }

    /// All rows, sorted by row number
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a mutable row by number without creating it
    pub fn get_row_mut(&mut self, number: u32) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.number() == Some(number))
    }

    /// Iterate over the rows mutably, in order. Rows can be edited in place
    /// but not replaced or reordered.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // === Cells ===

    /// Return the cell at an A1 reference (e.g. `"A10"`), creating the row
    /// and cell as needed. A malformed reference is an error and leaves the
    /// sheet untouched.
    pub fn cell(&mut self, reference: &str) -> Result<&mut Cell> {
        let addr = CellAddress::parse(reference)?;
        Ok(self.row(addr.row).cell(addr.col))
    }

    /// Like [`Sheet::cell`], but never fails: when `reference` is malformed a
    /// new row and cell are appended and returned together with a diagnostic.
    /// The fabricated cell is unrelated to the malformed reference.
    pub fn cell_or_fallback(&mut self, reference: &str) -> CellLookup<'_> {
        match CellAddress::parse(reference) {
            Ok(addr) => CellLookup {
                row: addr.row,
                cell: self.row(addr.row).cell(addr.col),
                diagnostic: None,
            },
            Err(error) => {
                let sheet = self.name.clone();
                let row = self.add_row();
                let number = row.number().unwrap_or_default();
                let cell = row.add_cell();
                let diagnostic = AddressDiagnostic {
                    reference: reference.to_string(),
                    error,
                    fallback: CellAddress::new(number, cell.column()),
                };
                log::debug!("sheet '{}': {}", sheet, diagnostic);
                CellLookup {
                    cell,
                    row: number,
                    diagnostic: Some(diagnostic),
                }
            }
        }
    }

    /// Get a cell by A1 reference without creating it
    pub fn get_cell(&self, reference: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(reference)?;
        Ok(self.get_row(addr.row).and_then(|r| r.get_cell(addr.col)))
    }

    // === Validation ===

    /// Check the sheet against the structural rules of the file format,
    /// returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut used_rows = AHashSet::with_capacity(self.rows.len());
        for row in &self.rows {
            if let Some(number) = row.number() {
                if !used_rows.insert(number) {
                    return Err(Error::DuplicateRow {
                        sheet: self.name.clone(),
                        row: number,
                    });
                }
            }

            let mut used_cells = AHashSet::with_capacity(row.cell_count());
            for cell in row.cells() {
                if !used_cells.insert(cell.column()) {
                    let cell = match row.number() {
                        Some(number) => cell.reference(number),
                        None => cell.column_label(),
                    };
                    return Err(Error::DuplicateCell {
                        sheet: self.name.clone(),
                        cell,
                    });
                }
            }
        }

        let len = self.name.chars().count();
        if len > MAX_SHEET_NAME_LEN {
            return Err(Error::SheetNameTooLong {
                name: self.name.clone(),
                len,
            });
        }

        self.validate_metadata()?;
        self.validate_content()
    }

    /// Rules for the sheet's entry in the workbook part
    fn validate_metadata(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if let Some(c) = self.name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name '{}' cannot contain '{}'",
                self.name, c
            )));
        }
        if self.name.starts_with('\'') || self.name.ends_with('\'') {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name '{}' cannot start or end with an apostrophe",
                self.name
            )));
        }
        Ok(())
    }

    /// Rules for the sheet body
    fn validate_content(&self) -> Result<()> {
        for row in &self.rows {
            if let Some(number) = row.number() {
                if number == 0 || number > MAX_ROWS {
                    return Err(Error::RowOutOfBounds(number, MAX_ROWS));
                }
            }
            if let Some(cell) = row.cells().iter().find(|c| c.column() >= MAX_COLS) {
                return Err(Error::ColumnOutOfBounds(cell.column() as u32, MAX_COLS - 1));
            }
        }

        if self.merged.count() as usize != self.merged.len() {
            return Err(Error::MergeCountMismatch {
                sheet: self.name.clone(),
                stored: self.merged.count(),
                actual: self.merged.len(),
            });
        }
        Ok(())
    }

    // === Merged Cells ===

    /// Merge the rectangle spanned by two corner references.
    ///
    /// The cells need not exist and overlapping merges are not rejected.
    pub fn add_merged_cells(&mut self, from_ref: &str, to_ref: &str) -> Result<MergedRegion> {
        self.merged.add(from_ref, to_ref)
    }

    /// Merged regions in the order they were added
    pub fn merged_cells(&self) -> &[MergedRegion] {
        self.merged.regions()
    }

    /// Stored merge count
    pub fn merged_count(&self) -> u32 {
        self.merged.count()
    }

    /// Unmerge the region created as `region`. Other merges over the same
    /// cells stay, and the cells themselves are left as they are.
    pub fn remove_merged_cell(&mut self, region: &MergedRegion) {
        self.merged.remove(region);
    }

    // === AutoFilter ===

    /// Put an autofilter on `range_ref` (e.g. `"A1:C5"`), replacing any
    /// existing one. The range should cover the whole filtered block, not just
    /// the header row.
    ///
    /// The range is stored normalized: `$` markers are dropped and the
    /// corners are reordered to top-left/bottom-right, so `"$C$5:A1"` is
    /// stored as `A1:C5`.
    pub fn set_auto_filter(&mut self, range_ref: &str) -> Result<()> {
        let range = CellRange::parse(&range_ref.replace('$', ""))?;
        log::trace!("sheet '{}': autofilter set to {}", self.name, range);
        self.auto_filter = Some(range);
        Ok(())
    }

    /// Remove the autofilter, if any
    pub fn clear_auto_filter(&mut self) {
        self.auto_filter = None;
    }

    /// Current autofilter range
    pub fn auto_filter(&self) -> Option<CellRange> {
        self.auto_filter
    }

    /// Content of the derived `_xlnm._FilterDatabase` name for this sheet
    pub fn filter_database_content(&self) -> Option<String> {
        self.auto_filter
            .map(|range| format!("{}!{}", quote_sheet_name(&self.name), range.to_absolute_string()))
    }

    /// Convert `"A1:A5"` to `'Name'!$A$1:$A$5` (or `"A1"` to `'Name'!$A$1`).
    ///
    /// Renaming the sheet afterwards invalidates the returned reference.
    pub fn range_reference(&self, range: &str) -> Result<String> {
        let mut parts = Vec::with_capacity(2);
        for part in range.splitn(2, ':') {
            parts.push(CellAddress::parse(part)?.to_absolute_string());
        }
        Ok(format!("{}!{}", quote_sheet_name(&self.name), parts.join(":")))
    }

    // === Drawing & Hyperlinks ===

    /// The sheet's drawing reference, if any
    pub fn drawing(&self) -> Option<&DrawingRef> {
        self.drawing.as_ref()
    }

    pub(crate) fn replace_drawing(&mut self, drawing: DrawingRef) -> Option<DrawingRef> {
        self.drawing.replace(drawing)
    }

    /// Anchor a hyperlink created by
    /// [`Workbook::add_hyperlink`](crate::Workbook::add_hyperlink) on a cell,
    /// replacing any link already anchored there.
    pub fn link_cell(&mut self, reference: &str, hyperlink: &Hyperlink) -> Result<()> {
        let rel_id = hyperlink
            .rel_id()
            .cloned()
            .ok_or_else(|| Error::InertHyperlink(hyperlink.url().to_string()))?;
        let cell = CellAddress::parse(reference)?.relative();

        self.hyperlinks.retain(|a| a.cell != cell);
        self.hyperlinks.push(HyperlinkAnchor { cell, rel_id });
        Ok(())
    }

    /// Hyperlinks anchored on cells
    pub fn hyperlinks(&self) -> &[HyperlinkAnchor] {
        &self.hyperlinks
    }
}
