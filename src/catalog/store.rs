// src/catalog/store.rs
//! Catalog table load/render.
//!
//! The table is header-first CSV with keyword, channel, date and url columns.
//! Files in the wild come from several generations of the harvester and from
//! spreadsheet edits, so header names are matched loosely: case and
//! surrounding whitespace are ignored and the channel column may also be
//! labelled `Name`. A header without a channel or url column is fatal.

use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use super::{Catalog, CatalogEntry};
use crate::dates::{format_date, normalize, EPOCH_SENTINEL};
use crate::error::{CatalogError, Result};

const KEYWORD_NAMES: &[&str] = &["keyword"];
const CHANNEL_NAMES: &[&str] = &["channel", "name"];
const DATE_NAMES: &[&str] = &["date"];
const URL_NAMES: &[&str] = &["url"];

/// Header written on save.
pub const CATALOG_HEADER: [&str; 4] = ["Keyword", "Channel", "Date", "URL"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub keyword: Option<usize>,
    pub channel: usize,
    pub date: Option<usize>,
    pub url: usize,
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Resolve the four catalog columns. Channel and url are essential.
pub fn resolve_columns(headers: &StringRecord, path: &Path) -> Result<Columns> {
    let header_error = |missing| CatalogError::Header {
        path: path.to_path_buf(),
        missing,
        found: headers.iter().map(str::to_string).collect(),
    };
    let channel = find_column(headers, CHANNEL_NAMES).ok_or_else(|| header_error("channel"))?;
    let url = find_column(headers, URL_NAMES).ok_or_else(|| header_error("url"))?;

    Ok(Columns {
        keyword: find_column(headers, KEYWORD_NAMES),
        channel,
        date: find_column(headers, DATE_NAMES),
        url,
    })
}

/// Load the persisted catalog.
///
/// A missing or blank file is a first run and yields an empty catalog.
/// Rows without a usable date get [`EPOCH_SENTINEL`]; rows without a url are
/// skipped; a url listed twice keeps its newest date.
pub fn load(path: &Path) -> Result<Catalog> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                target: "catalog",
                path = %path.display(),
                "no catalog yet, starting empty"
            );
            return Ok(Catalog::new());
        }
        Err(e) => return Err(CatalogError::io(path, e)),
    };
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Catalog::new());
    }
    parse(body, path)
}

fn parse(body: &[u8], path: &Path) -> Result<Catalog> {
    let csv_error = |source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let cols = resolve_columns(&headers, path)?;

    let mut catalog = Catalog::new();
    let mut undated = 0usize;
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let field = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or_default();

        let url = field(Some(cols.url));
        if url.is_empty() {
            continue;
        }
        let last_seen = normalize(field(cols.date)).unwrap_or_else(|| {
            undated += 1;
            EPOCH_SENTINEL
        });
        let entry = CatalogEntry {
            url: url.to_string(),
            channel: field(Some(cols.channel)).to_string(),
            keyword: field(cols.keyword).to_string(),
            last_seen,
        };

        let newer = catalog
            .get(url)
            .map_or(true, |prev| entry.last_seen > prev.last_seen);
        if newer {
            catalog.insert(entry.url.clone(), entry);
        }
    }

    tracing::debug!(
        target: "catalog",
        path = %path.display(),
        entries = catalog.len(),
        undated,
        "catalog loaded"
    );
    Ok(catalog)
}

/// Render the catalog table with the canonical header, rows in url order.
pub fn render(catalog: &Catalog) -> std::io::Result<String> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CATALOG_HEADER)?;
    for e in catalog.values() {
        let date = format_date(e.last_seen);
        wtr.write_record([e.keyword.as_str(), e.channel.as_str(), date.as_str(), e.url.as_str()])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
