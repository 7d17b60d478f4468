//! # sheetwright-core
//!
//! Core data structures for the sheetwright spreadsheet library.
//!
//! This crate provides the in-memory model of a workbook:
//! - [`CellValue`], [`CellAddress`] and [`CellRange`] - values and addressing
//! - [`Row`] and [`Cell`] - sparse, ordered row storage
//! - [`Sheet`] - rows, merged regions, autofilter, drawing and hyperlinks
//! - [`Workbook`] - sheets, per-sheet relationships, drawings and defined names
//! - [`WorkbookExport`] - the positional view handed to a package writer
//!
//! ## Example
//!
//! ```rust
//! use sheetwright_core::{Workbook, CellValue};
//!
//! let mut workbook = Workbook::new();
//! let id = workbook.sheet_ids()[0];
//! let sheet = workbook.sheet_mut(id).unwrap();
//!
//! sheet.cell("A1").unwrap().set_value("Region");
//! sheet.cell("B1").unwrap().set_value(42.0);
//! sheet.set_auto_filter("A1:B10").unwrap();
//!
//! assert_eq!(sheet.get_cell("B1").unwrap().unwrap().value(), &CellValue::Number(42.0));
//! assert!(workbook.validate().is_ok());
//!
//! let filter = workbook.filter_database_name(id).unwrap();
//! assert_eq!(filter.content, "'Sheet1'!$A$1:$B$10");
//! ```

pub mod cell;
pub mod drawing;
pub mod error;
pub mod export;
pub mod merge;
pub mod named_range;
pub mod relationships;
pub mod row;
pub mod sheet;
pub mod workbook;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellRange, CellValue};
pub use drawing::{Drawing, DrawingId};
pub use error::{Error, Result};
pub use export::{ExportedHyperlink, ExportedName, ExportedRelationship, SheetExport, WorkbookExport};
pub use merge::{MergedCells, MergedRegion, MergedRegionId};
pub use named_range::{DefinedName, DefinedNameTable, NameScope, FILTER_DATABASE_NAME};
pub use relationships::{
    Hyperlink, Relationship, RelationshipId, RelationshipKind, RelationshipTarget, Relationships,
};
pub use row::Row;
pub use sheet::{AddressDiagnostic, CellLookup, DrawingRef, HyperlinkAnchor, Sheet, SheetId};
pub use workbook::Workbook;

/// Maximum number of rows in a sheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;
