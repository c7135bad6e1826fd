use std::collections::HashMap;

use pretty_assertions::assert_eq;

use pdf_to_tables::{NormalizedTable, TableSet};
use tablechart_worker::chart::ChartKind;
use tablechart_worker::error::ApiError;
use tablechart_worker::models::{table_summaries, tables_cache_key};
use tablechart_worker::routes::{content_digest, is_hex_digest, parse_chart_request};

fn sample_set() -> TableSet {
    TableSet {
        tables: vec![
            NormalizedTable {
                page: 1,
                table_index: 1,
                columns: vec!["Item".to_string(), "Cost".to_string()],
                rows: vec![vec!["Widget".to_string(), "$1,200".to_string()]],
            },
            NormalizedTable {
                page: 2,
                table_index: 1,
                columns: vec!["City".to_string(), "Pop".to_string()],
                rows: vec![
                    vec!["Paris".to_string(), "2100000".to_string()],
                    vec!["Oslo".to_string(), "700000".to_string()],
                ],
            },
        ],
        warnings: Vec::new(),
    }
}

fn query(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn content_digest_is_stable_sha256_hex() {
    let digest = content_digest(b"hello");
    assert_eq!(
        digest,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert!(is_hex_digest(&digest));
}

#[test]
fn hex_digest_check_rejects_other_strings() {
    assert!(!is_hex_digest("short"));
    assert!(!is_hex_digest(&"z".repeat(64)));
}

#[test]
fn cache_key_embeds_digest_and_version() {
    assert_eq!(tables_cache_key("abc"), "tables:v1:abc");
}

#[test]
fn summaries_keep_document_order_and_labels() {
    let summaries = table_summaries(&sample_set());

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].label, "Page 1 - Table 1");
    assert_eq!(summaries[1].label, "Page 2 - Table 1");
    assert_eq!(summaries[1].row_count, 2);
    assert_eq!(summaries[1].column_count, 2);
}

#[test]
fn chart_request_parses_axes_and_kind() {
    let request = parse_chart_request(&query(&[("x", "0"), ("y", "1"), ("kind", "pie")]))
        .expect("request should parse");

    assert_eq!(request.x, 0);
    assert_eq!(request.y, 1);
    assert_eq!(request.kind, ChartKind::Pie);
}

#[test]
fn chart_request_requires_a_kind() {
    let error = parse_chart_request(&query(&[("x", "0"), ("y", "1")]))
        .expect_err("missing kind should fail");
    assert_eq!(error.code(), "bad_request");
}

#[test]
fn chart_request_rejects_unknown_kind() {
    let error = parse_chart_request(&query(&[("x", "0"), ("y", "1"), ("kind", "scatter")]))
        .expect_err("unknown kind should fail");
    assert_eq!(error.status_code(), 400);
}

#[test]
fn chart_request_rejects_non_numeric_axis() {
    let error = parse_chart_request(&query(&[("x", "first"), ("y", "1"), ("kind", "bar")]))
        .expect_err("non-numeric axis should fail");
    assert_eq!(error.code(), "bad_request");
}

#[test]
fn api_error_codes_map_to_statuses() {
    assert_eq!(ApiError::BadRequest(String::new()).status_code(), 400);
    assert_eq!(ApiError::NotFound(String::new()).status_code(), 404);
    assert_eq!(ApiError::Parse(String::new()).status_code(), 422);
    assert_eq!(ApiError::Validation(String::new()).status_code(), 422);
    assert_eq!(ApiError::Internal(String::new()).status_code(), 500);
}
