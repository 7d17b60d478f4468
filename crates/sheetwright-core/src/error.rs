//! Error types for sheetwright-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetwright-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row number out of bounds
    #[error("Row {0} out of bounds (valid: 1..={1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Two rows of a sheet share a row number
    #[error("'{sheet}' reused row {row}")]
    DuplicateRow { sheet: String, row: u32 },

    /// Two cells of a row share a column label
    #[error("'{sheet}' reused cell {cell}")]
    DuplicateCell { sheet: String, cell: String },

    /// Sheet name exceeds the format limit
    #[error("sheet name '{name}' has {len} characters, max length is {max}", max = crate::MAX_SHEET_NAME_LEN)]
    SheetNameTooLong { name: String, len: usize },

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Sheet not found
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Drawing not found
    #[error("Drawing not found: {0}")]
    DrawingNotFound(String),

    /// Stored merge count disagrees with the merge list
    #[error("'{sheet}' merge count is {stored} but {actual} regions are stored")]
    MergeCountMismatch {
        sheet: String,
        stored: u32,
        actual: usize,
    },

    /// Sheets and relationship collections are out of step
    #[error("Relationship collections out of step with sheets: {0}")]
    RelationshipMismatch(String),

    /// A relationship id does not resolve in the owning collection
    #[error("'{sheet}' references missing relationship {id}")]
    DanglingRelationship { sheet: String, id: String },

    /// Hyperlink without a relationship id
    #[error("Hyperlink to '{0}' is not bound to a relationship")]
    InertHyperlink(String),

    /// Invalid defined name
    #[error("Invalid defined name: {0}")]
    InvalidName(String),

    /// Defined name already exists in the same scope
    #[error("Defined name '{0}' already exists in this scope")]
    DuplicateName(String),

    /// Name is reserved for sheet-level bookkeeping
    #[error("Defined name '{0}' is reserved")]
    ReservedName(String),
}
