//! Serialization view of a workbook
//!
//! The model keeps stable ids (sheets, drawings) and sheet-owned autofilters.
//! A package writer needs positions instead: `localSheetId`, drawing part
//! numbers and the `_xlnm._FilterDatabase` entries. [`Workbook::export`]
//! computes all of them in one pass so nothing positional is stored.

use crate::error::{Error, Result};
use crate::relationships::RelationshipTarget;
use crate::workbook::Workbook;

/// Positional view of a whole workbook
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookExport {
    /// Sheets in workbook order
    pub sheets: Vec<SheetExport>,
    /// User names followed by one filter entry per filtered sheet
    pub defined_names: Vec<ExportedName>,
}

/// Positional view of one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetExport {
    /// 0-based position in the workbook
    pub index: u32,
    /// Sheet name
    pub name: String,
    /// Autofilter range, e.g. `A1:C5`
    pub auto_filter: Option<String>,
    /// Relationship id of the sheet's drawing
    pub drawing_rel_id: Option<String>,
    /// Merged regions as `from:to`
    pub merged_cells: Vec<String>,
    /// Hyperlinks anchored on cells
    pub hyperlinks: Vec<ExportedHyperlink>,
    /// Relationships with resolved targets
    pub relationships: Vec<ExportedRelationship>,
}

/// A resolved relationship
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportedRelationship {
    /// Relationship id, e.g. `rId1`
    pub id: String,
    /// Relationship type URI
    pub type_uri: String,
    /// Part path relative to the sheet, or the external URL
    pub target: String,
    /// `TargetMode="External"`
    pub external: bool,
}

/// A hyperlink anchored on a cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportedHyperlink {
    /// Anchored cell, e.g. `B2`
    pub cell: String,
    /// Hyperlink relationship id
    pub rel_id: String,
}

/// A defined name with its scope resolved to a sheet position
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportedName {
    /// The name
    pub name: String,
    /// What the name refers to
    pub content: String,
    /// Position of the owning sheet; `None` for workbook scope
    pub local_sheet_id: Option<u32>,
    /// Hidden from the UI
    pub hidden: bool,
    /// Optional description
    pub comment: Option<String>,
}

impl Workbook {
    /// Build the positional view used for serialization.
    ///
    /// Fails with [`Error::DrawingNotFound`] if a relationship targets a
    /// drawing this workbook does not own.
    pub fn export(&self) -> Result<WorkbookExport> {
        let mut sheets = Vec::with_capacity(self.sheet_count());
        for (index, sheet) in self.sheets().enumerate() {
            let mut relationships = Vec::new();
            if let Some(rels) = self.relationships(sheet.id()) {
                for rel in rels.iter() {
                    let target = match rel.target() {
                        RelationshipTarget::Drawing(id) => {
                            let n = self
                                .drawing_index(*id)
                                .ok_or_else(|| Error::DrawingNotFound(id.to_string()))?;
                            format!("../drawings/drawing{}.xml", n + 1)
                        }
                        RelationshipTarget::External(url) => url.clone(),
                    };
                    relationships.push(ExportedRelationship {
                        id: rel.id().to_string(),
                        type_uri: rel.kind().type_uri().to_string(),
                        target,
                        external: rel.is_external(),
                    });
                }
            }

            sheets.push(SheetExport {
                index: index as u32,
                name: sheet.name().to_string(),
                auto_filter: sheet.auto_filter().map(|r| r.to_a1_string()),
                drawing_rel_id: sheet.drawing().map(|d| d.rel_id.to_string()),
                merged_cells: sheet
                    .merged_cells()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                hyperlinks: sheet
                    .hyperlinks()
                    .iter()
                    .map(|h| ExportedHyperlink {
                        cell: h.cell.to_a1_string(),
                        rel_id: h.rel_id.to_string(),
                    })
                    .collect(),
                relationships,
            });
        }

        let mut defined_names: Vec<ExportedName> = self
            .defined_names()
            .iter()
            .map(|n| ExportedName {
                name: n.name().to_string(),
                content: n.content().to_string(),
                local_sheet_id: self.local_sheet_id(n),
                hidden: n.hidden,
                comment: n.comment.clone(),
            })
            .collect();
        defined_names.extend(
            self.sheet_ids()
                .into_iter()
                .filter_map(|id| self.filter_database_name(id)),
        );

        Ok(WorkbookExport {
            sheets,
            defined_names,
        })
    }
}
