//! Defined names (named ranges)
//!
//! Defined names assign a workbook-wide or sheet-local name to a cell, range,
//! constant or formula. The table keeps entries in insertion order and treats
//! names case-insensitively within a scope.
//!
//! The autofilter name [`FILTER_DATABASE_NAME`] is not stored here: each
//! sheet keeps its autofilter range itself and the workbook derives that entry
//! on demand (see [`Workbook::filter_database_name`](crate::Workbook::filter_database_name)).

use crate::error::{Error, Result};
use crate::sheet::SheetId;

/// Built-in name under which a sheet's autofilter range is persisted
pub const FILTER_DATABASE_NAME: &str = "_xlnm._FilterDatabase";

/// Scope of a defined name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NameScope {
    /// Available throughout the workbook (global)
    Workbook,
    /// Local to one sheet
    Sheet(SheetId),
}

/// A defined name
///
/// `content` is kept as text that can be parsed as a formula/reference:
/// - `'Sheet1'!$A$1` - single cell
/// - `'Sheet1'!$A$1:$D$10` - range
/// - `0.0725` - constant
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinedName {
    name: String,
    content: String,
    scope: NameScope,
    /// Optional comment/description for documentation
    pub comment: Option<String>,
    /// Whether this name is hidden from the UI
    pub hidden: bool,
}

impl DefinedName {
    /// Create a new defined name
    pub fn new(name: impl Into<String>, content: impl Into<String>, scope: NameScope) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            scope,
            comment: None,
            hidden: false,
        }
    }

    /// Create a workbook-scoped name
    pub fn workbook_scope(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, content, NameScope::Workbook)
    }

    /// Create a sheet-scoped name
    pub fn sheet_scope(
        name: impl Into<String>,
        content: impl Into<String>,
        sheet: SheetId,
    ) -> Self {
        Self::new(name, content, NameScope::Sheet(sheet))
    }

    /// Set a comment for this name
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Mark this name as hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the name refers to
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace what the name refers to
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Scope of the name
    pub fn scope(&self) -> NameScope {
        self.scope
    }

    /// Change the scope of the name.
    ///
    /// This bypasses the duplicate check; use
    /// [`DefinedNameTable::set_scope`] to keep names unique per scope.
    pub(crate) fn set_scope(&mut self, scope: NameScope) {
        self.scope = scope;
    }

    /// Check if this is the built-in autofilter name
    pub fn is_filter_database(&self) -> bool {
        is_filter_database_name(&self.name)
    }

    fn matches(&self, name: &str, scope: &NameScope) -> bool {
        self.scope == *scope && names_match(&self.name, name)
    }
}

/// Check whether `name` is the built-in autofilter name (case-insensitive)
pub fn is_filter_database_name(name: &str) -> bool {
    names_match(name, FILTER_DATABASE_NAME)
}

/// Case-insensitive comparison used for defined names and sheet names
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Workbook-owned table of defined names
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinedNameTable {
    names: Vec<DefinedName>,
}

impl DefinedNameTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new name.
    ///
    /// Fails if the name is empty, reserved, or already present in the same
    /// scope.
    pub fn define(&mut self, name: DefinedName) -> Result<()> {
        Self::check_name(name.name())?;
        if self.contains(name.name(), &name.scope) {
            return Err(Error::DuplicateName(name.name));
        }
        self.names.push(name);
        Ok(())
    }

    /// Add a name, replacing the content of an existing one in the same scope
    pub fn define_or_update(&mut self, name: DefinedName) -> Result<()> {
        Self::check_name(name.name())?;
        match self
            .names
            .iter_mut()
            .find(|n| n.matches(name.name(), &name.scope))
        {
            Some(existing) => *existing = name,
            None => self.names.push(name),
        }
        Ok(())
    }

    /// Look a name up following the usual scoping rules: a name local to
    /// `current_sheet` wins over a workbook-wide one.
    pub fn get(&self, name: &str, current_sheet: SheetId) -> Option<&DefinedName> {
        self.get_exact(name, &NameScope::Sheet(current_sheet))
            .or_else(|| self.get_exact(name, &NameScope::Workbook))
    }

    /// Get a name by exact scope
    pub fn get_exact(&self, name: &str, scope: &NameScope) -> Option<&DefinedName> {
        self.names.iter().find(|n| n.matches(name, scope))
    }

    /// Get a mutable name by exact scope
    pub fn get_mut(&mut self, name: &str, scope: &NameScope) -> Option<&mut DefinedName> {
        self.names.iter_mut().find(|n| n.matches(name, scope))
    }

    /// Move a name to another scope
    pub fn set_scope(&mut self, name: &str, from: &NameScope, to: NameScope) -> Result<()> {
        if from != &to && self.contains(name, &to) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let entry = self
            .get_mut(name, from)
            .ok_or_else(|| Error::InvalidName(format!("'{}' is not defined", name)))?;
        entry.set_scope(to);
        Ok(())
    }

    /// Remove a name
    pub fn remove(&mut self, name: &str, scope: &NameScope) -> Option<DefinedName> {
        let pos = self.names.iter().position(|n| n.matches(name, scope))?;
        Some(self.names.remove(pos))
    }

    /// Drop every name local to `sheet`, returning how many were removed
    pub fn remove_sheet_scope(&mut self, sheet: SheetId) -> usize {
        let before = self.names.len();
        self.names.retain(|n| n.scope != NameScope::Sheet(sheet));
        before - self.names.len()
    }

    /// Check if a name exists in the given scope
    pub fn contains(&self, name: &str, scope: &NameScope) -> bool {
        self.get_exact(name, scope).is_some()
    }

    /// Iterate over all names in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DefinedName> {
        self.names.iter()
    }

    /// Get the number of names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn check_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidName("name cannot be empty".into()));
        }
        if is_filter_database_name(name) {
            return Err(Error::ReservedName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined_name_creation() {
        let name = DefinedName::workbook_scope("TaxRate", "'Sheet1'!$B$1").with_comment("VAT");
        assert_eq!(name.name(), "TaxRate");
        assert_eq!(name.content(), "'Sheet1'!$B$1");
        assert_eq!(name.scope(), NameScope::Workbook);
        assert_eq!(name.comment.as_deref(), Some("VAT"));
        assert!(!name.is_filter_database());
    }

    #[test]
    fn test_scope_lookup() {
        let mut table = DefinedNameTable::new();
        table.define(DefinedName::workbook_scope("Rate", "0.05")).unwrap();
        table
            .define(DefinedName::sheet_scope("Rate", "0.08", SheetId(1)))
            .unwrap();

        assert_eq!(table.get("Rate", SheetId(1)).unwrap().content(), "0.08");
        assert_eq!(table.get("Rate", SheetId(2)).unwrap().content(), "0.05");
    }

    #[test]
    fn test_case_insensitive_duplicates() {
        let mut table = DefinedNameTable::new();
        table.define(DefinedName::workbook_scope("TaxRate", "0.05")).unwrap();

        assert!(table.get("TAXRATE", SheetId(1)).is_some());
        assert_eq!(
            table.define(DefinedName::workbook_scope("taxrate", "0.10")),
            Err(Error::DuplicateName("taxrate".into()))
        );

        table
            .define_or_update(DefinedName::workbook_scope("taxrate", "0.10"))
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().content(), "0.10");
    }

    #[test]
    fn test_non_ascii_names_fold_case() {
        let mut table = DefinedNameTable::new();
        table.define(DefinedName::workbook_scope("Ärger", "1")).unwrap();
        assert!(table.get("ÄRGER", SheetId(1)).is_some());
        assert!(matches!(
            table.define(DefinedName::workbook_scope("ärger", "2")),
            Err(Error::DuplicateName(_))
        ));
    }

    #[test]
    fn test_reserved_and_empty_names() {
        let mut table = DefinedNameTable::new();
        assert!(matches!(
            table.define(DefinedName::workbook_scope("_xlnm._filterdatabase", "'S'!$A$1")),
            Err(Error::ReservedName(_))
        ));
        assert!(matches!(
            table.define(DefinedName::workbook_scope("  ", "1")),
            Err(Error::InvalidName(_))
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_content_and_scope() {
        let mut table = DefinedNameTable::new();
        table.define(DefinedName::workbook_scope("Total", "1")).unwrap();
        table
            .get_mut("Total", &NameScope::Workbook)
            .unwrap()
            .set_content("2");
        table
            .set_scope("Total", &NameScope::Workbook, NameScope::Sheet(SheetId(4)))
            .unwrap();

        let entry = table.get_exact("total", &NameScope::Sheet(SheetId(4))).unwrap();
        assert_eq!(entry.content(), "2");
        assert!(table.get_exact("Total", &NameScope::Workbook).is_none());
    }

    #[test]
    fn test_remove_sheet_scope() {
        let mut table = DefinedNameTable::new();
        table.define(DefinedName::sheet_scope("A", "1", SheetId(1))).unwrap();
        table.define(DefinedName::sheet_scope("B", "2", SheetId(1))).unwrap();
        table.define(DefinedName::sheet_scope("A", "3", SheetId(2))).unwrap();

        assert_eq!(table.remove_sheet_scope(SheetId(1)), 2);
        assert_eq!(table.len(), 1);
        assert!(table.remove("A", &NameScope::Sheet(SheetId(2))).is_some());
        assert!(table.remove("A", &NameScope::Sheet(SheetId(2))).is_none());
    }
}
