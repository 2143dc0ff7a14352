use crate::normalize::normalize_all;
use crate::parents::{drop_untitled, resolve_parents};
use crate::{NotionClient, PageRecord, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Post-processing switches for [`search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Drop records whose name fell back to "Untitled".
    pub skip_untitled: bool,
    /// Resolve each record's parent display name.
    pub match_parents: bool,
}

/// Runs the full pipeline: paginate the search endpoint, normalize every result,
/// optionally resolve parent names and optionally drop untitled records.
///
/// Parent resolution sees the full record set, so an untitled page still lends
/// its name to its children before it is filtered out. A failed request aborts
/// the call; individual malformed results are skipped.
pub async fn search(client: &NotionClient, options: SearchOptions) -> Result<Vec<PageRecord>> {
    let raw = client.search_all().await?;
    let total = raw.len();

    let normalized = normalize_all(raw);
    let mut records = normalized.records;

    let resolved = if options.match_parents {
        resolve_parents(&mut records)
    } else {
        0
    };

    let dropped = if options.skip_untitled {
        drop_untitled(&mut records)
    } else {
        0
    };

    info!(
        "Search produced {} record(s) from {} result(s): {} skipped, {} parent(s) resolved, {} untitled dropped",
        records.len(),
        total,
        normalized.skipped,
        resolved,
        dropped
    );
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::UNTITLED;
    use serde_json::{Value, json};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn results() -> Value {
        json!({
            "results": [
                {
                    "object": "database",
                    "id": "A",
                    "url": "https://www.notion.so/A",
                    "title": [{"text": {"content": "Proj"}}],
                    "icon": {"type": "external", "external": {"url": "https://example.com/proj.png"}},
                },
                {
                    "object": "page",
                    "id": "B",
                    "url": "https://www.notion.so/B",
                    "parent": {"type": "database_id", "database_id": "A"},
                    "properties": {"Name": {"type": "title", "title": [{"plain_text": "Task"}]}},
                    "icon": {"type": "external", "external": {"url": "https://example.com/task.svg"}},
                },
                {
                    "object": "page",
                    "id": "C",
                    "url": "https://www.notion.so/C",
                    "properties": {"title": {"type": "title", "title": []}},
                },
                {
                    "object": "page",
                    "id": "D",
                    "url": "https://www.notion.so/D",
                    "parent": {"type": "page_id", "page_id": "C"},
                    "properties": {"title": {"type": "title", "title": [{"plain_text": "Notes"}]}},
                },
                null,
            ],
            "has_more": false,
            "next_cursor": null,
        })
    }

    async fn run(options: SearchOptions) -> Vec<PageRecord> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results()))
            .mount(&server)
            .await;
        let client = NotionClient::new("secret_test")
            .unwrap()
            .with_endpoint(format!("{}/v1/search", server.uri()));
        search(&client, options).await.unwrap()
    }

    fn by_id<'a>(records: &'a [PageRecord], id: &str) -> &'a PageRecord {
        records.iter().find(|r| r.id == id).unwrap()
    }

    #[tokio::test]
    async fn test_search_resolves_parents_when_enabled() {
        let records = run(SearchOptions {
            skip_untitled: false,
            match_parents: true,
        })
        .await;

        assert_eq!(records.len(), 4);
        assert_eq!(by_id(&records, "B").parent, "Proj");
        assert_eq!(by_id(&records, "D").parent, UNTITLED);
        assert_eq!(by_id(&records, "A").icon_name(), Some("example.com-proj.png"));
        assert!(by_id(&records, "B").icon.is_none());
    }

    #[tokio::test]
    async fn test_search_leaves_parents_empty_when_disabled() {
        let records = run(SearchOptions::default()).await;
        assert!(records.iter().all(|r| r.parent.is_empty()));
        assert_eq!(by_id(&records, "B").parent_id, "A");
    }

    #[tokio::test]
    async fn test_search_skips_untitled_after_resolution() {
        let records = run(SearchOptions {
            skip_untitled: true,
            match_parents: true,
        })
        .await;

        assert!(records.iter().all(|r| r.name != UNTITLED));
        assert_eq!(records.len(), 3);
        assert_eq!(by_id(&records, "D").parent, UNTITLED);
    }
}
