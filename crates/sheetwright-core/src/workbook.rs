//! Workbook type - the document that owns sheets and their shared parts

use std::collections::BTreeMap;

use crate::cell::split_sheet_reference;
use crate::drawing::{Drawing, DrawingId};
use crate::error::{Error, Result};
use crate::export::ExportedName;
use crate::named_range::{
    is_filter_database_name, names_match, DefinedName, DefinedNameTable, NameScope,
    FILTER_DATABASE_NAME,
};
use crate::relationships::{
    Hyperlink, RelationshipId, RelationshipKind, RelationshipTarget, Relationships,
};
use crate::sheet::{DrawingRef, Sheet, SheetId};

/// A workbook (spreadsheet document)
///
/// Owns the sheets, one relationship collection per sheet, the drawings and
/// the defined-name table. Sheets and drawings are addressed by stable ids;
/// their positions are only looked up when a position is actually needed.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    /// Relationship collection of every sheet, keyed by sheet id
    relationships: BTreeMap<SheetId, Relationships>,
    drawings: Vec<Drawing>,
    defined_names: DefinedNameTable,
    next_sheet_id: u32,
    next_drawing_id: u32,
}

impl Workbook {
    /// Create a new workbook with one sheet named `Sheet1`
    pub fn new() -> Self {
        let mut wb = Self::empty();
        let id = wb.allocate_sheet_id();
        wb.push_sheet(Sheet::with_id(id, "Sheet1"));
        wb
    }

    /// Create an empty workbook with no sheets
    pub fn empty() -> Self {
        Self {
            sheets: Vec::new(),
            relationships: BTreeMap::new(),
            drawings: Vec::new(),
            defined_names: DefinedNameTable::new(),
            next_sheet_id: 1,
            next_drawing_id: 1,
        }
    }

    // ==================== Sheets ====================

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get a sheet by id
    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id() == id)
    }

    /// Get a mutable sheet by id
    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id() == id)
    }

    /// Get a sheet by name (case-insensitive)
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| names_match(s.name(), name))
    }

    /// Get a mutable sheet by name (case-insensitive)
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| names_match(s.name(), name))
    }

    /// Current position of a sheet in the sheet sequence
    pub fn sheet_index(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id() == id)
    }

    /// Ids of all sheets, in order
    pub fn sheet_ids(&self) -> Vec<SheetId> {
        self.sheets.iter().map(Sheet::id).collect()
    }

    /// Iterate over all sheets
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Iterate over all sheets mutably
    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.iter_mut()
    }

    /// Add a new sheet with a generated name (`Sheet2`, `Sheet3`, ...)
    pub fn add_sheet(&mut self) -> Result<SheetId> {
        let name = self.generate_sheet_name();
        self.add_sheet_with_name(&name)
    }

    /// Add a new sheet with the given name.
    ///
    /// Empty and duplicate (case-insensitive) names are rejected; the length
    /// limit is left to [`Sheet::validate`].
    pub fn add_sheet_with_name(&mut self, name: &str) -> Result<SheetId> {
        self.check_sheet_name(name, None)?;
        let id = self.allocate_sheet_id();
        self.push_sheet(Sheet::with_id(id, name));
        log::trace!("added sheet '{}' as {}", name, id);
        Ok(id)
    }

    /// Remove a sheet together with its relationships and its local names
    pub fn remove_sheet(&mut self, id: SheetId) -> Result<Sheet> {
        let index = self
            .sheet_index(id)
            .ok_or_else(|| Error::SheetNotFound(id.to_string()))?;
        let sheet = self.sheets.remove(index);
        self.relationships.remove(&id);
        self.defined_names.remove_sheet_scope(id);
        Ok(sheet)
    }

    /// Move a sheet to a new position
    pub fn move_sheet(&mut self, id: SheetId, to: usize) -> Result<()> {
        let from = self
            .sheet_index(id)
            .ok_or_else(|| Error::SheetNotFound(id.to_string()))?;
        if to >= self.sheets.len() {
            return Err(Error::SheetNotFound(format!("position {}", to)));
        }
        let sheet = self.sheets.remove(from);
        self.sheets.insert(to, sheet);
        Ok(())
    }

    /// Rename a sheet
    pub fn rename_sheet(&mut self, id: SheetId, new_name: &str) -> Result<()> {
        self.check_sheet_name(new_name, Some(id))?;
        let sheet = self
            .sheet_mut(id)
            .ok_or_else(|| Error::SheetNotFound(id.to_string()))?;
        sheet.set_name(new_name);
        Ok(())
    }

    /// Relationship collection of a sheet
    pub fn relationships(&self, id: SheetId) -> Option<&Relationships> {
        self.relationships.get(&id)
    }

    // ==================== Drawings & Hyperlinks ====================

    /// Add an empty drawing part
    pub fn add_drawing(&mut self) -> DrawingId {
        let id = DrawingId(self.next_drawing_id);
        self.next_drawing_id += 1;
        self.drawings.push(Drawing::new(id));
        id
    }

    /// All drawings, in order
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    /// Get a drawing by id
    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id() == id)
    }

    /// Current position of a drawing in the drawing sequence
    pub fn drawing_index(&self, id: DrawingId) -> Option<usize> {
        self.drawings.iter().position(|d| d.id() == id)
    }

    /// Point a sheet at a drawing.
    ///
    /// A sheet shows at most one drawing (which may hold many charts);
    /// calling this again replaces the reference and drops the relationship
    /// of the previous drawing.
    pub fn set_drawing(&mut self, sheet_id: SheetId, drawing: DrawingId) -> Result<RelationshipId> {
        if self.drawing(drawing).is_none() {
            return Err(Error::DrawingNotFound(drawing.to_string()));
        }
        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| s.id() == sheet_id)
            .ok_or_else(|| Error::SheetNotFound(sheet_id.to_string()))?;
        let rels = self
            .relationships
            .get_mut(&sheet_id)
            .ok_or_else(|| Error::RelationshipMismatch(sheet_id.to_string()))?;

        let rel_id = rels
            .add_auto_relationship(RelationshipKind::Drawing, RelationshipTarget::Drawing(drawing))
            .id()
            .clone();
        let previous = sheet.replace_drawing(DrawingRef {
            drawing,
            rel_id: rel_id.clone(),
        });
        if let Some(previous) = previous {
            rels.remove(&previous.rel_id);
        }
        Ok(rel_id)
    }

    /// Create a hyperlink relationship on a sheet.
    ///
    /// Creating the link once and anchoring it on cells with
    /// [`Sheet::link_cell`] avoids one relationship per cell. If the sheet is
    /// not part of this workbook an inert [`Hyperlink`] is returned.
    pub fn add_hyperlink(&mut self, sheet_id: SheetId, url: &str) -> Hyperlink {
        match self.relationships.get_mut(&sheet_id) {
            Some(rels) => rels.add_hyperlink(url),
            None => {
                log::warn!("add_hyperlink: {} is not part of this workbook", sheet_id);
                Hyperlink::default()
            }
        }
    }

    // ==================== Defined Names ====================

    /// Define a workbook-scoped name
    ///
    /// # Example
    /// ```
    /// use sheetwright_core::Workbook;
    ///
    /// let mut wb = Workbook::new();
    /// wb.define_name("TaxRate", "'Sheet1'!$B$1").unwrap();
    /// ```
    pub fn define_name(&mut self, name: &str, content: &str) -> Result<()> {
        self.define_name_with_scope(name, content, NameScope::Workbook)
    }

    /// Define a name local to one sheet
    pub fn define_name_for_sheet(&mut self, name: &str, content: &str, sheet: SheetId) -> Result<()> {
        if self.sheet(sheet).is_none() {
            return Err(Error::SheetNotFound(sheet.to_string()));
        }
        self.define_name_with_scope(name, content, NameScope::Sheet(sheet))
    }

    /// Define a name with an explicit scope.
    ///
    /// The built-in autofilter name is accepted here for imported data: its
    /// content must be qualified with one of this workbook's sheets, and the
    /// range becomes that sheet's autofilter (the scope is ignored).
    pub fn define_name_with_scope(
        &mut self,
        name: &str,
        content: &str,
        scope: NameScope,
    ) -> Result<()> {
        if is_filter_database_name(name) {
            return self.import_filter_database(content);
        }
        self.defined_names
            .define(DefinedName::new(name, content, scope))
    }

    /// Remove a name
    pub fn remove_name(&mut self, name: &str, scope: &NameScope) -> Option<DefinedName> {
        self.defined_names.remove(name, scope)
    }

    /// The defined-name table (user names only)
    pub fn defined_names(&self) -> &DefinedNameTable {
        &self.defined_names
    }

    /// The defined-name table (mutable)
    pub fn defined_names_mut(&mut self) -> &mut DefinedNameTable {
        &mut self.defined_names
    }

    /// `localSheetId` of a name: the current position of its sheet, or
    /// `None` for workbook-scoped names and names of removed sheets.
    pub fn local_sheet_id(&self, name: &DefinedName) -> Option<u32> {
        match name.scope() {
            NameScope::Workbook => None,
            NameScope::Sheet(id) => self.sheet_index(id).map(|i| i as u32),
        }
    }

    /// The `_xlnm._FilterDatabase` entry for a sheet, derived from its
    /// autofilter. `None` when the sheet has no autofilter.
    pub fn filter_database_name(&self, sheet_id: SheetId) -> Option<ExportedName> {
        let index = self.sheet_index(sheet_id)?;
        let content = self.sheets[index].filter_database_content()?;
        Some(ExportedName {
            name: FILTER_DATABASE_NAME.to_string(),
            content,
            local_sheet_id: Some(index as u32),
            hidden: true,
            comment: None,
        })
    }

    // ==================== Validation ====================

    /// Validate every sheet and the cross references between sheets,
    /// relationship collections and drawings.
    pub fn validate(&self) -> Result<()> {
        for sheet in &self.sheets {
            sheet.validate()?;
        }

        if self.relationships.len() != self.sheets.len() {
            return Err(Error::RelationshipMismatch(format!(
                "{} sheets but {} relationship collections",
                self.sheets.len(),
                self.relationships.len()
            )));
        }

        for sheet in &self.sheets {
            let rels = self
                .relationships
                .get(&sheet.id())
                .ok_or_else(|| Error::RelationshipMismatch(sheet.id().to_string()))?;
            let dangling = |id: &RelationshipId| Error::DanglingRelationship {
                sheet: sheet.name().to_string(),
                id: id.to_string(),
            };

            if let Some(drawing) = sheet.drawing() {
                let target = rels.get(&drawing.rel_id).map(|r| r.target());
                if target != Some(&RelationshipTarget::Drawing(drawing.drawing)) {
                    return Err(dangling(&drawing.rel_id));
                }
            }
            for anchor in sheet.hyperlinks() {
                match rels.get(&anchor.rel_id) {
                    Some(rel) if rel.kind() == RelationshipKind::Hyperlink => {}
                    _ => return Err(dangling(&anchor.rel_id)),
                }
            }
            for rel in rels.iter() {
                if let RelationshipTarget::Drawing(id) = rel.target() {
                    if self.drawing_index(*id).is_none() {
                        return Err(Error::DrawingNotFound(id.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    // ==================== Internal ====================

    fn allocate_sheet_id(&mut self) -> SheetId {
        let id = SheetId(self.next_sheet_id);
        self.next_sheet_id += 1;
        id
    }

    /// Append a sheet together with its relationship collection
    fn push_sheet(&mut self, sheet: Sheet) {
        self.relationships.insert(sheet.id(), Relationships::new());
        self.sheets.push(sheet);
    }

    fn import_filter_database(&mut self, content: &str) -> Result<()> {
        let (sheet_name, range) = split_sheet_reference(content).ok_or_else(|| {
            Error::InvalidName(format!(
                "{} must refer to a sheet-qualified range, got '{}'",
                FILTER_DATABASE_NAME, content
            ))
        })?;
        let sheet = self.sheet_by_name_mut(&sheet_name).ok_or_else(|| {
            Error::InvalidName(format!(
                "{} refers to unknown sheet '{}'",
                FILTER_DATABASE_NAME, sheet_name
            ))
        })?;
        sheet.set_auto_filter(range)
    }

    /// Check a sheet name for emptiness and duplicates
    fn check_sheet_name(&self, name: &str, exclude: Option<SheetId>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if self
            .sheets
            .iter()
            .any(|s| Some(s.id()) != exclude && names_match(s.name(), name))
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }

    /// Generate a unique sheet name
    fn generate_sheet_name(&self) -> String {
        let mut n = self.sheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.check_sheet_name(&name, None).is_ok() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(wb: &Workbook) -> SheetId {
        wb.sheet_ids()[0]
    }

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.sheet(first(&wb)).unwrap().name(), "Sheet1");
        assert!(wb.relationships(first(&wb)).unwrap().is_empty());
        assert!(wb.validate().is_ok());
    }

    #[test]
    fn test_add_sheets() {
        let mut wb = Workbook::new();
        let second = wb.add_sheet().unwrap();
        assert_eq!(wb.sheet(second).unwrap().name(), "Sheet2");

        let data = wb.add_sheet_with_name("Data").unwrap();
        assert_eq!(wb.sheet_index(data), Some(2));
        assert_ne!(second, data);
    }

    #[test]
    fn test_sheet_name_checks() {
        let mut wb = Workbook::new();
        assert!(matches!(
            wb.add_sheet_with_name("SHEET1"),
            Err(Error::DuplicateSheetName(_))
        ));
        wb.add_sheet_with_name("Übersicht").unwrap();
        assert!(matches!(
            wb.add_sheet_with_name("übersicht"),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(wb.sheet_by_name("ÜBERSICHT").is_some());
        assert!(wb.add_sheet_with_name("").is_err());

        // Length is reported by validation, not on insertion
        let long = wb.add_sheet_with_name(&"L".repeat(32)).unwrap();
        assert!(matches!(
            wb.validate(),
            Err(Error::SheetNameTooLong { len: 32, .. })
        ));
        wb.remove_sheet(long).unwrap();
        assert!(wb.validate().is_ok());
    }

    #[test]
    fn test_move_and_rename() {
        let mut wb = Workbook::new();
        let a = wb.add_sheet_with_name("A").unwrap();
        let b = wb.add_sheet_with_name("B").unwrap();

        wb.move_sheet(b, 0).unwrap();
        assert_eq!(wb.sheet_index(b), Some(0));
        assert_eq!(wb.sheet_index(a), Some(2));
        assert!(wb.move_sheet(b, 3).is_err());

        wb.rename_sheet(a, "Alpha").unwrap();
        assert!(wb.sheet_by_name("alpha").is_some());
        assert!(wb.rename_sheet(a, "b").is_err());
        wb.rename_sheet(a, "ALPHA").unwrap();
    }

    #[test]
    fn test_remove_sheet_drops_relationships_and_names() {
        let mut wb = Workbook::new();
        let data = wb.add_sheet_with_name("Data").unwrap();
        wb.add_hyperlink(data, "https://example.com");
        wb.define_name_for_sheet("Local", "'Data'!$A$1", data).unwrap();
        wb.define_name("Global", "1").unwrap();

        let removed = wb.remove_sheet(data).unwrap();
        assert_eq!(removed.name(), "Data");
        assert!(wb.relationships(data).is_none());
        assert_eq!(wb.defined_names().len(), 1);
        assert!(wb.remove_sheet(data).is_err());
        assert!(wb.validate().is_ok());
    }

    #[test]
    fn test_set_drawing_replaces_previous() {
        let mut wb = Workbook::new();
        let sheet = first(&wb);
        let d1 = wb.add_drawing();
        let d2 = wb.add_drawing();

        let r1 = wb.set_drawing(sheet, d1).unwrap();
        assert_eq!(r1.as_str(), "rId1");
        let r2 = wb.set_drawing(sheet, d2).unwrap();

        let drawing = wb.sheet(sheet).unwrap().drawing().unwrap();
        assert_eq!(drawing.drawing, d2);
        assert_eq!(drawing.rel_id, r2);

        let rels = wb.relationships(sheet).unwrap();
        assert_eq!(rels.len(), 1);
        assert!(rels.get(&r1).is_none());
        assert!(wb.validate().is_ok());
    }

    #[test]
    fn test_set_drawing_errors() {
        let mut wb = Workbook::new();
        let sheet = first(&wb);

        assert!(matches!(
            wb.set_drawing(sheet, DrawingId(99)),
            Err(Error::DrawingNotFound(_))
        ));
        let drawing = wb.add_drawing();
        assert!(matches!(
            wb.set_drawing(SheetId(42), drawing),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_add_hyperlink() {
        let mut wb = Workbook::new();
        let sheet = first(&wb);
        let link = wb.add_hyperlink(sheet, "https://example.com");
        assert_eq!(link.rel_id().unwrap().as_str(), "rId1");
        assert_eq!(link.url(), "https://example.com");

        wb.sheet_mut(sheet).unwrap().link_cell("B2", &link).unwrap();
        assert!(wb.validate().is_ok());

        let stray = wb.add_hyperlink(SheetId(77), "https://example.com");
        assert!(stray.is_inert());
    }

    #[test]
    fn test_hyperlink_from_other_sheet_is_dangling() {
        let mut wb = Workbook::new();
        let a = first(&wb);
        let b = wb.add_sheet_with_name("B").unwrap();
        wb.add_hyperlink(a, "https://a.example");
        wb.add_hyperlink(a, "https://a2.example");
        let link = wb.add_hyperlink(a, "https://a3.example");

        wb.sheet_mut(b).unwrap().link_cell("A1", &link).unwrap();
        assert!(matches!(
            wb.validate(),
            Err(Error::DanglingRelationship { .. })
        ));
    }

    #[test]
    fn test_filter_database_name_is_derived() {
        let mut wb = Workbook::new();
        let sheet = first(&wb);
        assert!(wb.filter_database_name(sheet).is_none());

        wb.sheet_mut(sheet).unwrap().set_auto_filter("A1:C5").unwrap();
        let entry = wb.filter_database_name(sheet).unwrap();
        assert_eq!(entry.name, FILTER_DATABASE_NAME);
        assert_eq!(entry.content, "'Sheet1'!$A$1:$C$5");
        assert_eq!(entry.local_sheet_id, Some(0));
        assert!(entry.hidden);

        wb.sheet_mut(sheet).unwrap().clear_auto_filter();
        assert!(wb.filter_database_name(sheet).is_none());
        assert!(wb.defined_names().is_empty());
    }

    #[test]
    fn test_import_filter_database_name() {
        let mut wb = Workbook::new();
        let data = wb.add_sheet_with_name("My Data").unwrap();

        wb.define_name("_xlnm._FilterDatabase", "'My Data'!$B$2:$D$8")
            .unwrap();
        assert_eq!(
            wb.sheet(data).unwrap().auto_filter().unwrap().to_a1_string(),
            "B2:D8"
        );
        assert!(wb.defined_names().is_empty());

        assert!(matches!(
            wb.define_name("_xlnm._FilterDatabase", "$A$1:$B$2"),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(
            wb.define_name("_xlnm._FilterDatabase", "'Nope'!$A$1"),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn test_local_sheet_id_follows_position() {
        let mut wb = Workbook::new();
        let data = wb.add_sheet_with_name("Data").unwrap();
        wb.define_name_for_sheet("Local", "'Data'!$A$1", data).unwrap();
        wb.define_name("Global", "1").unwrap();

        let local = wb
            .defined_names()
            .get_exact("Local", &NameScope::Sheet(data))
            .unwrap()
            .clone();
        assert_eq!(wb.local_sheet_id(&local), Some(1));

        wb.move_sheet(data, 0).unwrap();
        assert_eq!(wb.local_sheet_id(&local), Some(0));

        let global = wb.defined_names().get("Global", data).unwrap().clone();
        assert_eq!(wb.local_sheet_id(&global), None);
    }
}
