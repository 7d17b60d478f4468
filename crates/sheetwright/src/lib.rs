//! # sheetwright
//!
//! A Rust library for building spreadsheet sheet models and checking them
//! before they are written out.
//!
//! ## Features
//!
//! - Sparse, ordered rows and cells addressed by A1 references
//! - Structural validation (duplicate rows/cells, sheet names, merge counts)
//! - Merged regions and autofilters
//! - Per-sheet relationships for drawings and hyperlinks
//! - A positional export view, renderable as JSON
//!
//! ## Example
//!
//! ```rust
//! use sheetwright::prelude::*;
//!
//! // Create a new workbook
//! let mut workbook = Workbook::new();
//! let id = workbook.sheet_ids()[0];
//!
//! // Set cell values
//! let sheet = workbook.sheet_mut(id).unwrap();
//! sheet.cell("A1").unwrap().set_value("Hello");
//! sheet.cell("B1").unwrap().set_value(42.0);
//! sheet.cell("C1").unwrap().set_value(CellValue::formula("B1*2"));
//! sheet.add_merged_cells("A2", "C2").unwrap();
//!
//! // Link a cell
//! let link = workbook.add_hyperlink(id, "https://example.com");
//! workbook.sheet_mut(id).unwrap().link_cell("A1", &link).unwrap();
//!
//! workbook.validate().unwrap();
//! let json = workbook.to_json().unwrap();
//! assert!(json.contains("https://example.com"));
//! ```

pub mod prelude;

// Re-export core types
pub use sheetwright_core::{
    AddressDiagnostic,
    // Cell types
    Cell,
    CellAddress,
    CellLookup,
    CellRange,
    CellValue,
    // Names
    DefinedName,
    DefinedNameTable,
    // Drawings
    Drawing,
    DrawingId,
    DrawingRef,
    // Error types
    Error,
    // Export view
    ExportedHyperlink,
    ExportedName,
    ExportedRelationship,
    // Relationships
    Hyperlink,
    HyperlinkAnchor,
    MergedCells,
    MergedRegion,
    MergedRegionId,
    NameScope,
    Relationship,
    RelationshipId,
    RelationshipKind,
    RelationshipTarget,
    Relationships,
    Result,
    Row,
    // Main types
    Sheet,
    SheetExport,
    SheetId,
    Workbook,
    WorkbookExport,

    FILTER_DATABASE_NAME,
    MAX_COLS,
    // Constants
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Errors raised while rendering a workbook
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The model could not be exported
    #[error(transparent)]
    Model(#[from] Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extension trait for Workbook to render the export view
pub trait WorkbookExt {
    /// Render the export view as pretty-printed JSON
    fn to_json(&self) -> std::result::Result<String, ExportError>;

    /// Write the export view as JSON to a writer
    fn write_json<W: Write>(&self, writer: W) -> std::result::Result<(), ExportError>;

    /// Save the export view as JSON to a file
    fn save_json<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ExportError>;
}

impl WorkbookExt for Workbook {
    fn to_json(&self) -> std::result::Result<String, ExportError> {
        let export = self.export()?;
        Ok(serde_json::to_string_pretty(&export)?)
    }

    fn write_json<W: Write>(&self, writer: W) -> std::result::Result<(), ExportError> {
        let export = self.export()?;
        serde_json::to_writer_pretty(writer, &export)?;
        Ok(())
    }

    fn save_json<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ExportError> {
        let path = path.as_ref();
        log::debug!("saving export view to {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
