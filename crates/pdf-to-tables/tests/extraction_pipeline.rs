mod common;

use pdf_to_tables::{
    ChartTable, ExtractError, ExtractOptions, WarningCode, extract_tables, table_to_csv,
};

#[test]
fn extracts_a_single_labeled_table() {
    let pdf = common::build_test_pdf(&[vec!["Name  Age  Score", "Alice  30  98", "Bob  22  87"]])
        .expect("PDF fixture should build");

    let result = extract_tables(&pdf, &ExtractOptions::default()).expect("extraction should succeed");

    assert_eq!(result.table_count(), 1);
    let table = &result.tables[0];
    assert_eq!(table.label(), "Page 1 - Table 1");
    assert_eq!(table.columns, vec!["Name", "Age", "Score"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0], vec!["Alice", "30", "98"]);
}

#[test]
fn numbers_tables_per_page_in_document_order() {
    let pdf = common::build_test_pdf(&[
        vec!["City  Pop", "A  10", "B  20"],
        vec!["Product  Qty", "Pen  3", "Book  1"],
    ])
    .expect("PDF fixture should build");

    let result = extract_tables(&pdf, &ExtractOptions::default()).expect("extraction should succeed");

    assert_eq!(result.table_count(), 2);
    assert_eq!(result.tables[0].label(), "Page 1 - Table 1");
    assert_eq!(result.tables[1].label(), "Page 2 - Table 1");
    assert!(result.find(2, 1).is_some());
}

#[test]
fn separates_two_tables_on_one_page() {
    let pdf = common::build_test_pdf(&[vec![
        "City  Pop",
        "A  10",
        "B  20",
        "Totals are reported separately below.",
        "Item  Qty",
        "Pen  3",
        "Book  1",
    ]])
    .expect("PDF fixture should build");

    let result = extract_tables(&pdf, &ExtractOptions::default()).expect("extraction should succeed");

    assert_eq!(result.table_count(), 2);
    assert_eq!(result.tables[0].label(), "Page 1 - Table 1");
    assert_eq!(result.tables[1].label(), "Page 1 - Table 2");
    assert_eq!(result.tables[1].columns, vec!["Item", "Qty"]);
}

#[test]
fn reports_zero_tables_for_narrative_text() {
    let pdf = common::build_test_pdf(&[vec!["This is plain narrative text without columns."]])
        .expect("PDF fixture should build");

    let result = extract_tables(&pdf, &ExtractOptions::default()).expect("extraction should succeed");

    assert_eq!(result.table_count(), 0);
    assert!(
        result
            .warnings
            .iter()
            .any(|warning| warning.code == WarningCode::NoTablesDetected)
    );
}

#[test]
fn coerces_currency_column_end_to_end() {
    let pdf = common::build_test_pdf(&[vec![
        "Item  Cost",
        "Widget  $1,200",
        "Gadget  $950",
        "Sprocket  N/A",
    ]])
    .expect("PDF fixture should build");

    let result = extract_tables(&pdf, &ExtractOptions::default()).expect("extraction should succeed");
    let derived = ChartTable::from_normalized(&result.tables[0]);

    assert!(derived.coerced);
    assert_eq!(derived.numeric_columns(), vec![1]);
    assert_eq!(derived.rows[0][1].as_number(), Some(1200.0));
    assert_eq!(derived.rows[1][1].as_number(), Some(950.0));
    assert_eq!(derived.rows[2][1].as_number(), None);

    let csv = table_to_csv(&derived).expect("csv should serialize");
    assert!(csv.contains("Widget,1200"));
    assert!(csv.contains("Sprocket,N/A"));
}

#[test]
fn rejects_min_cols_below_two() {
    let pdf = common::build_test_pdf(&[vec!["A  B", "1  2"]]).expect("PDF fixture should build");

    let error = extract_tables(&pdf, &ExtractOptions { min_cols: 1 })
        .expect_err("min_cols of 1 should be rejected");
    assert!(matches!(error, ExtractError::InvalidOption(_)));
}

#[test]
fn unreadable_bytes_are_a_load_error() {
    let error = extract_tables(b"not a pdf at all", &ExtractOptions::default())
        .expect_err("garbage input should fail to load");
    assert!(matches!(error, ExtractError::PdfLoad(_)));
}
