//! End-to-end tests for drawing and hyperlink relationships

use sheetwright::prelude::*;
use sheetwright::{RelationshipKind, RelationshipTarget};

#[test]
fn test_relationship_ids_per_sheet() {
    let mut wb = Workbook::new();
    let first = wb.sheet_ids()[0];
    let second = wb.add_sheet().unwrap();

    let a = wb.add_hyperlink(first, "https://a.example");
    let b = wb.add_hyperlink(first, "https://b.example");
    let c = wb.add_hyperlink(second, "https://c.example");

    assert_eq!(a.rel_id().unwrap().as_str(), "rId1");
    assert_eq!(b.rel_id().unwrap().as_str(), "rId2");
    assert_eq!(c.rel_id().unwrap().as_str(), "rId1");
    assert_eq!(wb.relationships(first).unwrap().len(), 2);
    assert_eq!(wb.relationships(second).unwrap().len(), 1);
}

#[test]
fn test_set_drawing_twice_keeps_one_relationship() {
    let mut wb = Workbook::new();
    let sheet = wb.sheet_ids()[0];
    let link = wb.add_hyperlink(sheet, "https://example.com");
    let first = wb.add_drawing();
    let second = wb.add_drawing();

    wb.set_drawing(sheet, first).unwrap();
    let rel_id = wb.set_drawing(sheet, second).unwrap();

    let rels = wb.relationships(sheet).unwrap();
    let drawings: Vec<_> = rels
        .iter()
        .filter(|r| r.kind() == RelationshipKind::Drawing)
        .collect();
    assert_eq!(drawings.len(), 1);
    assert_eq!(drawings[0].id(), &rel_id);
    assert_eq!(drawings[0].target(), &RelationshipTarget::Drawing(second));
    assert!(rels.get(link.rel_id().unwrap()).is_some());
    assert!(wb.validate().is_ok());
}

#[test]
fn test_drawing_survives_sheet_reordering() {
    let mut wb = Workbook::new();
    let charts = wb.add_sheet_with_name("Charts").unwrap();
    let drawing = wb.add_drawing();
    wb.set_drawing(charts, drawing).unwrap();

    wb.move_sheet(charts, 0).unwrap();
    let removed = wb.sheet_ids()[1];
    wb.remove_sheet(removed).unwrap();

    let sheet = wb.sheet(charts).unwrap();
    assert_eq!(sheet.drawing().unwrap().drawing, drawing);
    assert_eq!(wb.relationships(charts).unwrap().len(), 1);
    assert!(wb.validate().is_ok());

    let export = wb.export().unwrap();
    assert_eq!(export.sheets[0].name, "Charts");
    assert_eq!(
        export.sheets[0].relationships[0].target,
        "../drawings/drawing1.xml"
    );
}

#[test]
fn test_hyperlink_on_unknown_sheet_is_inert() {
    let mut wb = Workbook::new();
    let gone = wb.add_sheet_with_name("Gone").unwrap();
    wb.remove_sheet(gone).unwrap();

    let link = wb.add_hyperlink(gone, "https://example.com");
    assert!(link.is_inert());
    assert!(link.rel_id().is_none());

    let id = wb.sheet_ids()[0];
    let err = wb.sheet_mut(id).unwrap().link_cell("A1", &link).unwrap_err();
    assert!(matches!(err, Error::InertHyperlink(_)));
}

#[test]
fn test_link_cell_replaces_anchor() {
    let mut wb = Workbook::new();
    let id = wb.sheet_ids()[0];
    let a = wb.add_hyperlink(id, "https://a.example");
    let b = wb.add_hyperlink(id, "https://b.example");

    let sheet = wb.sheet_mut(id).unwrap();
    sheet.link_cell("B2", &a).unwrap();
    sheet.link_cell("C2", &a).unwrap();
    sheet.link_cell("$B$2", &b).unwrap();

    let anchors = sheet.hyperlinks();
    assert_eq!(anchors.len(), 2);
    let b2 = anchors
        .iter()
        .find(|h| h.cell == CellAddress::new(2, 1))
        .unwrap();
    assert_eq!(Some(&b2.rel_id), b.rel_id());
}
