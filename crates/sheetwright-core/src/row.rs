//! Row types

use crate::cell::Cell;

/// A row of cells within a sheet
///
/// Cells are kept in insertion order. Rows built through [`Sheet`](crate::Sheet)
/// always carry a number; unnumbered rows only appear when a caller inserts a
/// prepared row, e.g. while importing data that omitted the attribute.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    number: Option<u32>,
    cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row with the given number (1-based)
    pub fn new(number: u32) -> Self {
        Self {
            number: Some(number),
            cells: Vec::new(),
        }
    }

    /// Create an empty row without a number
    pub fn unnumbered() -> Self {
        Self::default()
    }

    /// Row number, if the row has one
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    /// Return the cell in `column`, appending a new empty one if absent
    pub fn cell(&mut self, column: u16) -> &mut Cell {
        match self.cells.iter().position(|c| c.column() == column) {
            Some(i) => &mut self.cells[i],
            None => {
                self.cells.push(Cell::new(column));
                let last = self.cells.len() - 1;
                &mut self.cells[last]
            }
        }
    }

    /// Get a cell by column index without creating it
    pub fn get_cell(&self, column: u16) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column() == column)
    }

    /// Append a cell in the column after the last cell (column A on an empty row)
    pub fn add_cell(&mut self) -> &mut Cell {
        let column = self
            .cells
            .last()
            .map(|c| c.column().saturating_add(1))
            .unwrap_or(0);
        self.cells.push(Cell::new(column));
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    /// Append a prepared cell as-is, without any uniqueness check
    pub fn push_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Cells in insertion order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to the cells
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_get_or_create() {
        let mut row = Row::new(3);
        row.cell(2).set_value("x");
        row.cell(0);
        row.cell(2);

        assert_eq!(row.cell_count(), 2);
        let columns: Vec<u16> = row.cells().iter().map(|c| c.column()).collect();
        assert_eq!(columns, vec![2, 0]);
        assert_eq!(row.get_cell(2).unwrap().value().as_string(), Some("x"));
        assert!(row.get_cell(1).is_none());
    }

    #[test]
    fn test_add_cell_follows_last_column() {
        let mut row = Row::new(1);
        assert_eq!(row.add_cell().column_label(), "A");
        row.cell(4);
        assert_eq!(row.add_cell().column_label(), "F");
        assert_eq!(row.cells().last().unwrap().reference(1), "F1");
    }

    #[test]
    fn test_unnumbered() {
        let row = Row::unnumbered();
        assert_eq!(row.number(), None);
        assert!(row.is_empty());
    }
}
