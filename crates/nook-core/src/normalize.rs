//! Conversion of raw search results into uniform [`PageRecord`]s.
//!
//! Pages and databases carry their titles in different places and icons come in
//! several shapes (external, uploaded file, emoji). Everything is reduced here to
//! one record type; anything that cannot be reduced is skipped with a warning so
//! one odd result never sinks a refresh.

use crate::{
    Error, IconRef, PageRecord, PageTitleFragment, RawDatabase, RawPage, RawResult, Result,
    UNTITLED,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Icon file extensions accepted into the cache (compared case-insensitively).
pub const ICON_EXTENSIONS: [&str; 4] = ["ico", "png", "jpg", "jpeg"];

/// Records produced from one batch of raw results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Successfully normalized records, in input order.
    pub records: Vec<PageRecord>,
    /// Results skipped because they could not be normalized.
    pub skipped: usize,
}

/// Normalizes every raw result, skipping empty entries silently and malformed
/// ones with a warning.
pub fn normalize_all(raw: Vec<Value>) -> Normalized {
    let mut out = Normalized {
        records: Vec::with_capacity(raw.len()),
        skipped: 0,
    };

    for value in raw {
        if is_empty_result(&value) {
            debug!("Skipping empty search result");
            continue;
        }

        match normalize(value) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                warn!("Skipping search result: {}", e);
                out.skipped += 1;
            },
        }
    }

    out
}

/// Normalizes a single raw result.
pub fn normalize(value: Value) -> Result<PageRecord> {
    let hint = describe(&value);
    let raw: RawResult = serde_json::from_value(value)
        .map_err(|e| Error::Normalize(format!("{hint}: {e}")))?;

    match raw {
        RawResult::Page(page) => normalize_page(page),
        RawResult::Database(database) => Ok(normalize_database(database)),
    }
}

fn normalize_page(page: RawPage) -> Result<PageRecord> {
    let name = page_title(&page.properties)
        .map_err(|e| Error::Normalize(format!("page {}: malformed title: {e}", page.id)))?;

    Ok(PageRecord {
        name: display_name(name),
        parent: String::new(),
        parent_id: parent_id(page.parent.as_ref()),
        icon: icon_ref(page.icon.as_ref()),
        id: page.id,
        url: page.url,
    })
}

fn normalize_database(database: RawDatabase) -> PageRecord {
    let name: String = database
        .title
        .into_iter()
        .filter_map(|fragment| fragment.text)
        .map(|text| text.content.into_text())
        .collect();

    PageRecord {
        name: display_name(name),
        parent: String::new(),
        parent_id: parent_id(database.parent.as_ref()),
        icon: icon_ref(database.icon.as_ref()),
        id: database.id,
        url: database.url,
    }
}

/// Concatenated plain text of the page's title property. A page without a
/// title property has an empty title.
fn page_title(properties: &Map<String, Value>) -> serde_json::Result<String> {
    let Some(property) = properties
        .values()
        .find(|property| property.get("type").and_then(Value::as_str) == Some("title"))
    else {
        return Ok(String::new());
    };

    let fragments = match property.get("title") {
        Some(title) => Vec::<PageTitleFragment>::deserialize(title)?,
        None => Vec::new(),
    };

    Ok(fragments
        .into_iter()
        .map(|fragment| fragment.plain_text.into_text())
        .collect())
}

fn display_name(name: String) -> String {
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// Raw parent id: `database_id`, else `page_id`, else empty.
fn parent_id(parent: Option<&Value>) -> String {
    parent
        .and_then(|parent| {
            parent
                .get("database_id")
                .and_then(Value::as_str)
                .or_else(|| parent.get("page_id").and_then(Value::as_str))
        })
        .unwrap_or_default()
        .to_string()
}

/// Icon URL from `icon.external.url`, else `icon.file.url`.
pub fn icon_url(icon: Option<&Value>) -> Option<&str> {
    let icon = icon?;
    icon.pointer("/external/url")
        .and_then(Value::as_str)
        .or_else(|| icon.pointer("/file/url").and_then(Value::as_str))
        .filter(|url| !url.is_empty())
}

fn icon_ref(icon: Option<&Value>) -> Option<IconRef> {
    let url = icon_url(icon)?;
    let file_name = icon_file_name(url);
    if has_icon_extension(&file_name) {
        Some(IconRef {
            url: url.to_string(),
            file_name,
        })
    } else {
        debug!("Ignoring icon with unsupported extension: {}", url);
        None
    }
}

/// Cache filename for an icon URL: scheme stripped, `/` replaced with `-`.
///
/// ```rust
/// use nook_core::normalize::icon_file_name;
///
/// assert_eq!(
///     icon_file_name("https://example.com/a/b/icon.png"),
///     "example.com-a-b-icon.png"
/// );
/// ```
#[must_use]
pub fn icon_file_name(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.replace('/', "-")
}

/// Whether a derived icon filename ends in an accepted image extension.
#[must_use]
pub fn has_icon_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ICON_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn describe(value: &Value) -> String {
    let object = value.get("object").and_then(Value::as_str).unwrap_or("result");
    value.get("id").and_then(Value::as_str).map_or_else(
        || format!("{object} without id"),
        |id| format!("{object} {id}"),
    )
}
