use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Typed failure reasons for the search boundary. Retrieval converts these
/// to an in-band failure marker; they never cross the pipeline boundary.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("search not configured: {0}")]
    NotConfigured(String),
    #[error("search request failed: {0}")]
    Request(String),
    #[error("search returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("search payload invalid: {0}")]
    Payload(String),
}

/// Web-search boundary: bounded snippet list per query, typed errors,
/// `backend` is a best-effort engine hint.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        backend: Option<&str>,
    ) -> Result<Vec<String>, SearchError>;
}

/// SearxNG-style JSON search client.
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
    backend: Option<String>,
}

impl SearchClient {
    pub fn from_env() -> Result<Self> {
        let endpoint = dotenv::var("SEARCH_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8888/search".to_string());
        let backend = dotenv::var("SEARCH_BACKEND").ok().filter(|v| !v.is_empty());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            backend,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: Option<String>,
    title: Option<String>,
    // SearXNG uses `content` for snippets in JSON format.
    content: Option<String>,
}

impl SearchResult {
    fn render(&self) -> String {
        let title = self.title.as_deref().unwrap_or("(untitled)");
        let snippet = self.content.as_deref().unwrap_or("");
        match self.url.as_deref() {
            Some(url) => format!("{} — {} ({})", title, snippet, url),
            None => format!("{} — {}", title, snippet),
        }
    }
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        backend: Option<&str>,
    ) -> Result<Vec<String>, SearchError> {
        if self.endpoint.is_empty() {
            return Err(SearchError::NotConfigured(
                "missing SEARCH_ENDPOINT".to_string(),
            ));
        }

        let mut req = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")]);
        // Hint which engines to use when the caller or env asks for one.
        if let Some(engines) = backend.or(self.backend.as_deref()) {
            req = req.query(&[("engines", engines)]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Payload(e.to_string()))?;

        let snippets = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .take(max_results.clamp(1, 20))
            .map(|r| r.render())
            .collect();

        Ok(snippets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_response_shape() {
        let js = r#"{"results":[{"url":"https://e.x/a","title":"A","content":"s"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(js).unwrap();
        assert_eq!(parsed.results.unwrap().len(), 1);
    }

    #[test]
    fn render_tolerates_missing_fields() {
        let r = SearchResult {
            url: None,
            title: None,
            content: None,
        };
        assert_eq!(r.render(), "(untitled) — ");
    }
}
