//! HTTP boundary to the flow-event search service.

use crate::config::Config;
use crate::error::ClientError;
use crate::model::{SearchParams, SearchResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Search service seam. The controller only talks to this trait, which
/// keeps fetch orchestration testable without a live service.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetch one page of results for the given raw search parameters.
    async fn search(
        &self,
        params: &SearchParams,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResponse, ClientError>;
}

/// Error payload the service attaches to rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Live implementation over reqwest. One attempt per call, no retries;
/// a failed page fetch is surfaced to the user instead.
pub struct HttpSearchApi {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchApi {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let endpoint = config
            .api
            .base_url
            .join(&config.api.search_path)
            .context("Invalid search endpoint URL")?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(
        &self,
        params: &SearchParams,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResponse, ClientError> {
        if params.is_blank() {
            return Err(ClientError::EmptyQuery);
        }

        // Empty fields stay out of the query string; the service treats a
        // missing key and an empty value differently in its logs.
        let mut query: Vec<(&str, String)> = Vec::with_capacity(5);
        if !params.search_term.is_empty() {
            query.push(("search", params.search_term.clone()));
        }
        if !params.start_time.is_empty() {
            query.push(("start", params.start_time.clone()));
        }
        if !params.end_time.is_empty() {
            query.push(("end", params.end_time.clone()));
        }
        query.push(("page", page.to_string()));
        query.push(("page_size", page_size.to_string()));

        debug!(page, page_size, "requesting search page");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string(),
            };
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let body: SearchResponse = serde_json::from_slice(&bytes)?;
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.api.base_url = Url::parse(&server.uri()).unwrap();
        config
    }

    fn params(search: &str, start: &str, end: &str) -> SearchParams {
        SearchParams {
            search_term: search.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[tokio::test]
    async fn blank_params_never_reach_the_wire() {
        let server = MockServer::start().await;
        let api = HttpSearchApi::new(&config_for(&server)).unwrap();

        let err = api.search(&SearchParams::default(), 1, 12).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyQuery));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_decodes_results_and_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"status": "ACCEPT", "source_ip": "10.0.0.5", "packets": "14"},
                    {"status": "REJECT", "destination_ip": "24.57.123.131"}
                ],
                "summary": {
                    "files_scanned": 3,
                    "lines_checked": 1200,
                    "matches": 2,
                    "page": 1,
                    "page_size": 12,
                    "total_pages": 1,
                    "duration_seconds": 0.02
                }
            })))
            .mount(&server)
            .await;

        let api = HttpSearchApi::new(&config_for(&server)).unwrap();
        let response = api
            .search(&params("dstaddr=24.57.123.131", "", ""), 1, 12)
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.summary.matches, 2);
        assert_eq!(response.summary.total_pages, 1);
    }

    #[tokio::test]
    async fn empty_fields_are_omitted_from_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "summary": {"matches": 0, "page_size": 12, "total_pages": 0}
            })))
            .mount(&server)
            .await;

        let api = HttpSearchApi::new(&config_for(&server)).unwrap();
        api.search(&params("10.0.0.5", "", "1725000000"), 2, 12)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert!(pairs.contains(&("search".to_string(), "10.0.0.5".to_string())));
        assert!(pairs.contains(&("end".to_string(), "1725000000".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "12".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "start"));
    }

    #[tokio::test]
    async fn rejection_surfaces_the_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Start time cannot be later than end time"
            })))
            .mount(&server)
            .await;

        let api = HttpSearchApi::new(&config_for(&server)).unwrap();
        let err = api
            .search(&params("", "1725000090", "1725000000"), 1, 12)
            .await
            .unwrap_err();

        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Start time cannot be later than end time");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejection_without_body_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = HttpSearchApi::new(&config_for(&server)).unwrap();
        let err = api.search(&params("x", "", ""), 1, 12).await.unwrap_err();

        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = HttpSearchApi::new(&config_for(&server)).unwrap();
        let err = api.search(&params("x", "", ""), 1, 12).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
