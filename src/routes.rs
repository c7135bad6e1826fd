use std::collections::HashMap;
use std::fmt::Write as _;

use pdf_to_tables::{
    ChartTable, ExtractOptions, TableSet, chart_availability, extract_tables, table_to_csv,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::cache;
use crate::chart::{ChartKind, ChartRequest, render_chart};
use crate::error::ApiError;
use crate::models::{
    TABLES_CACHE_TTL_SECONDS, TableDetailResponse, UploadResponse, table_summaries,
    tables_cache_key,
};
use crate::page;

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    Router::new()
        .get("/", |_req, _ctx| page::render())
        .post_async("/api/v1/tables", upload_route)
        .get_async("/api/v1/tables/:digest/:page/:index", table_detail_route)
        .get_async("/api/v1/chart/:digest/:page/:index", chart_route)
        .get_async("/api/v1/csv/:digest/:page/:index", csv_route)
        .run(req, env)
        .await
}

async fn upload_route(mut req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    let bytes = req.bytes().await?;
    match upload_response(&bytes).await {
        Ok(response) => json_response(&response),
        Err(error) => error.into_response(),
    }
}

async fn table_detail_route(_req: Request, ctx: RouteContext<()>) -> Result<Response> {
    match table_detail_response(&ctx).await {
        Ok(response) => json_response(&response),
        Err(error) => error.into_response(),
    }
}

async fn chart_route(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    match chart_response(&req, &ctx).await {
        Ok(response) => Ok(response),
        Err(error) => error.into_response(),
    }
}

async fn csv_route(_req: Request, ctx: RouteContext<()>) -> Result<Response> {
    match csv_response(&ctx).await {
        Ok(response) => Ok(response),
        Err(error) => error.into_response(),
    }
}

async fn upload_response(bytes: &[u8]) -> Result<UploadResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(ApiError::BadRequest(
            "uploaded file does not look like a PDF".to_string(),
        ));
    }

    let digest = content_digest(bytes);
    let cache_key = tables_cache_key(&digest);

    if let Some(set) = cache::get_json::<TableSet>(&cache_key).await? {
        return Ok(upload_payload(digest, &set, true));
    }

    let set = extract_tables(bytes, &ExtractOptions::default())?;
    cache::put_json(&cache_key, &set, TABLES_CACHE_TTL_SECONDS).await?;

    worker::console_log!(
        "extraction completed: digest={}, tables={}, warnings={}",
        digest,
        set.table_count(),
        set.warnings.len()
    );

    Ok(upload_payload(digest, &set, false))
}

fn upload_payload(digest: String, set: &TableSet, cached: bool) -> UploadResponse {
    UploadResponse {
        table_count: set.table_count(),
        items: table_summaries(set),
        warnings: set.warnings.clone(),
        cached,
        digest,
    }
}

async fn table_detail_response(ctx: &RouteContext<()>) -> Result<TableDetailResponse, ApiError> {
    let (digest, page, index) = table_ref(ctx)?;
    let (table, label) = load_table(&digest, page, index).await?;

    let chart_warning = chart_availability(&table);
    Ok(TableDetailResponse {
        label,
        numeric_columns: table.numeric_columns(),
        columns: table.columns,
        rows: table.rows,
        coerced: table.coerced,
        chart_warning,
    })
}

async fn chart_response(req: &Request, ctx: &RouteContext<()>) -> Result<Response, ApiError> {
    let (digest, page, index) = table_ref(ctx)?;
    let request = parse_chart_request(&parse_query(req)?)?;
    let (table, _) = load_table(&digest, page, index).await?;

    let svg = render_chart(&table, &request)
        .map_err(|error| ApiError::Validation(error.to_string()))?;

    let mut response = Response::ok(svg)?;
    response
        .headers_mut()
        .set("Content-Type", "image/svg+xml; charset=utf-8")?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

async fn csv_response(ctx: &RouteContext<()>) -> Result<Response, ApiError> {
    let (digest, page, index) = table_ref(ctx)?;
    let (table, _) = load_table(&digest, page, index).await?;

    let csv = table_to_csv(&table)?;
    let mut response = Response::ok(csv)?;
    response
        .headers_mut()
        .set("Content-Type", "text/csv; charset=utf-8")?;
    response.headers_mut().set(
        "Content-Disposition",
        &format!("inline; filename=\"table-page{page}-{index}.csv\""),
    )?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

/// Load the referenced table in its derived, chart-ready form.
async fn load_table(
    digest: &str,
    page: u32,
    index: u32,
) -> Result<(ChartTable, String), ApiError> {
    let set = cache::get_json::<TableSet>(&tables_cache_key(digest))
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("no cached extraction for this document; upload it again".to_string())
        })?;

    let table = set.find(page, index).ok_or_else(|| {
        ApiError::NotFound(format!("no table {index} on page {page}"))
    })?;

    Ok((ChartTable::from_normalized(table), table.label()))
}

fn table_ref(ctx: &RouteContext<()>) -> Result<(String, u32, u32), ApiError> {
    let digest = ctx
        .param("digest")
        .ok_or_else(|| ApiError::BadRequest("missing document digest".to_string()))?
        .to_string();
    if !is_hex_digest(&digest) {
        return Err(ApiError::BadRequest(
            "document digest must be a sha-256 hex string".to_string(),
        ));
    }

    let page = ctx
        .param("page")
        .ok_or_else(|| ApiError::BadRequest("missing page number".to_string()))?
        .parse::<u32>()?;
    let index = ctx
        .param("index")
        .ok_or_else(|| ApiError::BadRequest("missing table index".to_string()))?
        .parse::<u32>()?;
    if page == 0 || index == 0 {
        return Err(ApiError::BadRequest(
            "page and table numbers are 1-based".to_string(),
        ));
    }

    Ok((digest, page, index))
}

#[must_use]
pub fn is_hex_digest(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|ch| ch.is_ascii_hexdigit())
}

#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub fn parse_chart_request(query: &HashMap<String, String>) -> Result<ChartRequest, ApiError> {
    let x = query
        .get("x")
        .ok_or_else(|| ApiError::BadRequest("missing x axis column".to_string()))?
        .parse::<usize>()
        .map_err(|error| ApiError::BadRequest(format!("invalid x axis column: {error}")))?;
    let y = query
        .get("y")
        .ok_or_else(|| ApiError::BadRequest("missing y axis column".to_string()))?
        .parse::<usize>()
        .map_err(|error| ApiError::BadRequest(format!("invalid y axis column: {error}")))?;
    let kind = query
        .get("kind")
        .ok_or_else(|| ApiError::BadRequest("missing chart kind".to_string()))?
        .parse::<ChartKind>()
        .map_err(ApiError::BadRequest)?;

    Ok(ChartRequest { x, y, kind })
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}
