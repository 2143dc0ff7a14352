use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display name used when a page or database carries no title text.
pub const UNTITLED: &str = "Untitled";

/// A remote icon that passed extension gating, paired with its cache filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef {
    /// Remote URL the icon is downloaded from.
    pub url: String,
    /// Filesystem-safe name of the icon inside the cache directory.
    pub file_name: String,
}

/// Uniform record produced for every page or database returned by a search.
///
/// Serialized with the wire names `iconURL`/`iconName`; both are `null` together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRecordWire", into = "PageRecordWire")]
pub struct PageRecord {
    /// Source identifier, stable across refreshes.
    pub id: String,
    /// Display title, never empty.
    pub name: String,
    /// Resolved parent display name, empty when unresolved.
    pub parent: String,
    /// Raw id of the parent page or database, empty when absent.
    pub parent_id: String,
    /// Canonical web URL.
    pub url: String,
    /// Cached icon, if the source supplied an accepted one.
    pub icon: Option<IconRef>,
}

impl PageRecord {
    /// Remote icon URL, if any.
    #[must_use]
    pub fn icon_url(&self) -> Option<&str> {
        self.icon.as_ref().map(|icon| icon.url.as_str())
    }

    /// Icon filename inside the cache directory, if any.
    #[must_use]
    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_ref().map(|icon| icon.file_name.as_str())
    }

    /// Whether this record fell back to the untitled placeholder.
    #[must_use]
    pub fn is_untitled(&self) -> bool {
        self.name == UNTITLED
    }

    /// Launcher-style label: `name (parent)` when a parent was resolved.
    #[must_use]
    pub fn label(&self) -> String {
        if self.parent.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.parent)
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PageRecordWire {
    id: String,
    name: String,
    #[serde(default)]
    parent: String,
    #[serde(default)]
    parent_id: String,
    url: String,
    #[serde(rename = "iconURL")]
    icon_url: Option<String>,
    #[serde(rename = "iconName")]
    icon_name: Option<String>,
}

impl From<PageRecordWire> for PageRecord {
    fn from(wire: PageRecordWire) -> Self {
        let icon = match (wire.icon_url, wire.icon_name) {
            (Some(url), Some(file_name)) => Some(IconRef { url, file_name }),
            _ => None,
        };
        Self {
            id: wire.id,
            name: wire.name,
            parent: wire.parent,
            parent_id: wire.parent_id,
            url: wire.url,
            icon,
        }
    }
}

impl From<PageRecord> for PageRecordWire {
    fn from(record: PageRecord) -> Self {
        let (icon_url, icon_name) = record
            .icon
            .map_or((None, None), |icon| (Some(icon.url), Some(icon.file_name)));
        Self {
            id: record.id,
            name: record.name,
            parent: record.parent,
            parent_id: record.parent_id,
            url: record.url,
            icon_url,
            icon_name,
        }
    }
}

/// One page of results from the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Raw result objects, kept untyped until normalization.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor for the next page, present when `has_more` is true.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A search result, discriminated by its `object` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum RawResult {
    /// A regular page; its title lives in the title property.
    Page(RawPage),
    /// A database; its title is a top-level rich text array.
    Database(RawDatabase),
}

/// Page-shaped search result.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    /// Page id.
    pub id: String,
    /// Page URL.
    pub url: String,
    /// Property name to property value; exactly one has `type == "title"`.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Icon object (`external`, `file` or `emoji`), left untyped.
    #[serde(default)]
    pub icon: Option<Value>,
    /// Parent object, left untyped.
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Database-shaped search result.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDatabase {
    /// Database id.
    pub id: String,
    /// Database URL.
    pub url: String,
    /// Title rich text fragments.
    #[serde(default)]
    pub title: Vec<DatabaseTitleFragment>,
    /// Icon object (`external`, `file` or `emoji`), left untyped.
    #[serde(default)]
    pub icon: Option<Value>,
    /// Parent object, left untyped.
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Rich text fragment of a database title.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseTitleFragment {
    /// Text payload; absent for mentions and equations.
    #[serde(default)]
    pub text: Option<TextContent>,
}

/// `text` member of a rich text fragment.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    /// Literal content.
    pub content: TitleText,
}

/// Rich text fragment of a page title property.
#[derive(Debug, Clone, Deserialize)]
pub struct PageTitleFragment {
    /// Plain rendering of the fragment.
    pub plain_text: TitleText,
}

/// Title text as it appears on the wire.
///
/// Some upstream payloads wrap the text in a one-element sequence instead of a
/// plain string; see [`TitleText::into_text`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TitleText {
    /// Regular string.
    Plain(String),
    /// Sequence-wrapped text.
    Wrapped(Vec<String>),
}

impl TitleText {
    /// Flatten to a string.
    ///
    /// A wrapped sequence whose first element is longer than one character is
    /// unwrapped to that element; any other sequence is concatenated. Plain
    /// strings are returned unchanged.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Plain(text) => text,
            Self::Wrapped(mut parts) => {
                if parts.first().is_some_and(|first| first.chars().count() > 1) {
                    parts.swap_remove(0)
                } else {
                    parts.concat()
                }
            },
        }
    }
}

/// Persisted record set from the last successful live search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the search that produced `pages` finished.
    pub fetched_at: DateTime<Utc>,
    /// Normalized, resolved and filtered records.
    pub pages: Vec<PageRecord>,
}
