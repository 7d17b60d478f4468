//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The payload stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`Cell`] - A cell within a row

mod address;
mod value;

pub use address::{quote_sheet_name, split_sheet_reference, CellAddress, CellRange};
pub use value::CellValue;

/// A cell within a [`Row`](crate::Row)
///
/// The column label is derived from the stored column index; the row number
/// comes from the owning row.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    column: u16,
    value: CellValue,
}

impl Cell {
    /// Create an empty cell in the given column
    pub fn new(column: u16) -> Self {
        Self {
            column,
            value: CellValue::Empty,
        }
    }

    /// Column index (0-based)
    pub fn column(&self) -> u16 {
        self.column
    }

    /// Column letters (`0 → "A"`)
    pub fn column_label(&self) -> String {
        CellAddress::column_to_letters(self.column)
    }

    /// A1 reference of this cell within the given row
    pub fn reference(&self, row: u32) -> String {
        CellAddress::new(row, self.column).to_a1_string()
    }

    /// Get the cell value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Set the cell value
    pub fn set_value<V: Into<CellValue>>(&mut self, value: V) {
        self.value = value.into();
    }
}
