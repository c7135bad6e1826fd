use std::collections::BTreeMap;

use encoding_rs::UTF_16BE;
use lopdf::Document;
use lopdf::Object;
use lopdf::content::Content;
use tracing::debug;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::table_parse::{soft_split_line_into_cells, split_line_into_cells};

/// pdf-extract separates pages with form feeds.
fn split_document_text(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_garbled(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

/// Decode a content-stream string object, falling back to UTF-16BE when the
/// font encoding produced garbage.
fn decode_string_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_garbled(&decoded) {
        return decoded;
    }

    if bytes.starts_with(&[0xFE, 0xFF]) || bytes.starts_with(&[0xFF, 0xFE]) {
        let payload = if bytes.len() > 2 { &bytes[2..] } else { bytes };
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(payload);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();
        if lower.contains("utf16")
            || lower.contains("ucs2")
            || lower.contains("identity-h")
            || lower.contains("unicode")
        {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

/// How table-shaped a page text candidate is. Multi-cell lines dominate the
/// score; numeric cells nudge it; garbled decodes are heavily penalized.
fn tabularity_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut multi_cell_lines = 0_i64;
    let mut numeric_lines = 0_i64;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        non_empty_lines += 1;

        if split_line_into_cells(line).len() >= 2 || soft_split_line_into_cells(line).len() >= 3 {
            multi_cell_lines += 1;
        }
        if line.chars().any(|ch| ch.is_ascii_digit()) {
            numeric_lines += 1;
        }
    }

    let garbled_penalty = if looks_garbled(text) { 800 } else { 0 };
    multi_cell_lines * 50 + numeric_lines * 10 + non_empty_lines - garbled_penalty
}

fn best_candidate(candidates: &[String]) -> String {
    candidates
        .iter()
        .max_by_key(|text| tabularity_score(text))
        .cloned()
        .unwrap_or_default()
}

/// Walk a page's content stream and collect shown text, line-broken at text
/// positioning operators.
fn page_content_text(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    text.push_str(&decode_string_bytes(encoding, bytes));
                }
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                Object::Integer(value) => {
                    // Large negative TJ offsets are inter-cell gaps.
                    if *value < -100 {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                if let Some(font_name) = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Read every page of the document as text, choosing per page among the
/// pdf-extract rendition, a direct content-stream walk, and lopdf's own
/// extractor, whichever scores most table-shaped.
pub(crate) fn read_pages(pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load_mem(pdf)?;
    let pages_map = document.get_pages();
    if pages_map.is_empty() {
        return Err(ExtractError::NoPages);
    }

    let rendered_pages = match pdf_extract::extract_text_from_mem(pdf) {
        Ok(text) => {
            let pages = split_document_text(&text);
            // Only trust the per-page split when it matches the page count.
            (pages.len() == pages_map.len()).then_some(pages)
        }
        Err(_) => None,
    };

    let mut pages = Vec::new();
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        let mut candidates = Vec::new();
        if let Some(text) = rendered_pages
            .as_ref()
            .and_then(|rendered| rendered.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = page_content_text(&document, *page_id) {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        debug!(
            page = *page_no,
            candidates = candidates.len(),
            "scored page text candidates"
        );

        pages.push(PageText {
            page_number: *page_no,
            text: best_candidate(&candidates),
        });
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::{decode_string_bytes, split_document_text, tabularity_score};

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_document_text("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn prefers_multi_cell_candidates() {
        let tabular = "City  Pop\nParis  2100000";
        let prose = "A paragraph about cities and their population.";
        assert!(tabularity_score(tabular) > tabularity_score(prose));
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Total".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        // Pass a hint that makes the primary decode unusable.
        let decoded = decode_string_bytes(Some("Identity-H"), &bytes);
        assert_eq!(decoded, "Total");
    }
}
