//! Prelude module - common imports for sheetwright users
//!
//! ```rust
//! use sheetwright::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    CellRange,
    // Cell types
    CellValue,
    DrawingId,

    // Error types
    Error,
    ExportError,
    Hyperlink,
    NameScope,
    Result,

    // Main types
    Sheet,
    SheetId,
    Workbook,
    // Extension traits
    WorkbookExt,
    WorkbookExport,
};
