use crate::{Error, Result, SearchResponse};
use reqwest::header::HeaderValue;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Notion search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.notion.com/v1/search";
/// API version sent with every search request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-02-22";
/// Per-request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const NOTION_VERSION_HEADER: &str = "Notion-Version";

/// HTTP client for the workspace search endpoint, carrying the integration secret.
pub struct NotionClient {
    client: Client,
    endpoint: String,
    notion_version: String,
    secret: String,
}

impl NotionClient {
    /// Creates a client for the public search endpoint
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        Self::with_timeout(secret, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout
    pub fn with_timeout(secret: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nook/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            secret: secret.into(),
        })
    }

    /// Points the client at a different search URL (proxies, tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the `Notion-Version` header value
    #[must_use]
    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    /// Search URL this client posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retrieves every search result visible to the secret, following cursors
    /// until the endpoint reports no more pages.
    ///
    /// Results are returned untyped and in response order. Any failed page
    /// aborts the whole call; no partial list is returned. An empty first
    /// response means an empty workspace, but an empty continuation page or a
    /// `has_more` page without a cursor is an [`Error::Pagination`].
    pub async fn search_all(&self) -> Result<Vec<Value>> {
        let mut results = Vec::new();
        let Some(mut page) = self.search_page(None).await? else {
            debug!("Search endpoint returned an empty response");
            return Ok(results);
        };
        let mut requests = 1_usize;

        loop {
            results.append(&mut page.results);
            if !page.has_more {
                break;
            }

            let Some(cursor) = page.next_cursor.take() else {
                warn!(
                    "Search response has more results but no next_cursor after {} result(s)",
                    results.len()
                );
                return Err(Error::Pagination(
                    "has_more without next_cursor".to_string(),
                ));
            };

            requests += 1;
            page = self.search_page(Some(&cursor)).await?.ok_or_else(|| {
                warn!("Empty search response for cursor {}", cursor);
                Error::Pagination(format!("empty continuation page at request {requests}"))
            })?;
        }

        info!(
            "Fetched {} search results in {} request(s)",
            results.len(),
            requests
        );
        Ok(results)
    }

    /// Issues one search request; `None` means the endpoint sent an empty payload.
    async fn search_page(&self, cursor: Option<&str>) -> Result<Option<SearchResponse>> {
        let mut body = json!({
            "sort": {
                "direction": "descending",
                "timestamp": "last_edited_time",
            }
        });
        if let Some(cursor) = cursor {
            debug!("Requesting search page at cursor {}", cursor);
            body["start_cursor"] = Value::String(cursor.to_string());
        } else {
            debug!("Requesting first search page from {}", self.endpoint);
        }

        let version = HeaderValue::from_str(&self.notion_version)
            .map_err(|e| Error::Config(format!("Invalid Notion-Version header: {e}")))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.secret)
            .header(NOTION_VERSION_HEADER, version)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let text = response.text().await?;
        parse_search_page(&text)
    }

    /// Downloads raw icon bytes. Icon URLs are public or pre-signed, so no
    /// credential is attached.
    pub async fn fetch_icon(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!("Fetched {} byte icon from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

fn parse_search_page(text: &str) -> Result<Option<SearchResponse>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text)?;
    if is_falsy(&value) {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(value)?))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
