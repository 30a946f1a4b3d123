//! HTTP client for the prioritisation service.
//!
//! Two operations share one error-extraction path:
//! - `analyze` posts a task array to `/api/tasks/analyze/`;
//! - `suggest` asks `/api/tasks/suggest/` to rank the tasks the server holds.
//!
//! Both pass the strategy through as a URL-encoded `strategy` query parameter
//! and make exactly one round trip per call. There is no retry and no timeout.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::task::ScoredTask;

pub const ANALYZE_PATH: &str = "/api/tasks/analyze/";
pub const SUGGEST_PATH: &str = "/api/tasks/suggest/";

/// Message used when an error response carries no usable `error` member.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Client for the remote scoring service.
#[derive(Debug, Clone)]
pub struct PriorityClient {
    base_url: String,
    client: reqwest::Client,
}

impl PriorityClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse task JSON text and submit it for analysis.
    ///
    /// Local failures (`MalformedInput`, `EmptyInput`) are reported before any
    /// network traffic.
    pub async fn analyze(
        &self,
        raw_text: &str,
        strategy: &str,
    ) -> Result<Vec<ScoredTask>, ClientError> {
        let tasks = parse_task_payload(raw_text)?;
        self.submit_analysis(&tasks, strategy).await
    }

    /// Post an already validated task array for analysis.
    pub async fn submit_analysis(
        &self,
        tasks: &[Value],
        strategy: &str,
    ) -> Result<Vec<ScoredTask>, ClientError> {
        let url = self.endpoint(ANALYZE_PATH);
        debug!(%url, strategy, tasks = tasks.len(), "calling analyze endpoint");

        let response = self
            .client
            .post(&url)
            .query(&[("strategy", strategy)])
            .json(tasks)
            .send()
            .await?;

        read_scored_tasks(response).await
    }

    /// Fetch the server-ranked suggestions for the tasks the service holds.
    pub async fn suggest(&self, strategy: &str) -> Result<Vec<ScoredTask>, ClientError> {
        let url = self.endpoint(SUGGEST_PATH);
        debug!(%url, strategy, "calling suggest endpoint");

        let response = self
            .client
            .get(&url)
            .query(&[("strategy", strategy)])
            .send()
            .await?;

        read_scored_tasks(response).await
    }
}

/// Validate task JSON text locally.
///
/// Blank text counts as an empty list. The value must be a non-empty array;
/// its elements are passed through untouched.
pub fn parse_task_payload(raw_text: &str) -> Result<Vec<Value>, ClientError> {
    let text = raw_text.trim();
    if text.is_empty() {
        return Err(ClientError::EmptyInput);
    }
    match serde_json::from_str::<Value>(text).map_err(ClientError::MalformedInput)? {
        Value::Array(items) if !items.is_empty() => Ok(items),
        _ => Err(ClientError::EmptyInput),
    }
}

/// Pull the `error` message out of an error response body.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}

async fn read_scored_tasks(response: reqwest::Response) -> Result<Vec<ScoredTask>, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = extract_error_message(&body);
        warn!(status = %status, %message, "service request failed");
        return Err(ClientError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    let tasks: Vec<ScoredTask> = serde_json::from_str(&body)
        .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))?;
    debug!(status = %status, results = tasks.len(), "service request succeeded");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_payload_must_be_json() {
        let err = parse_task_payload("not json").unwrap_err();
        assert!(matches!(err, ClientError::MalformedInput(_)));
    }

    #[test]
    fn test_payload_must_be_non_empty_array() {
        assert!(matches!(parse_task_payload("[]"), Err(ClientError::EmptyInput)));
        assert!(matches!(parse_task_payload("   "), Err(ClientError::EmptyInput)));
        assert!(matches!(parse_task_payload("{\"a\":1}"), Err(ClientError::EmptyInput)));
        assert!(matches!(parse_task_payload("3"), Err(ClientError::EmptyInput)));
        assert_eq!(parse_task_payload(" [1, {\"a\":2}] ").unwrap().len(), 2);
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(extract_error_message(r#"{"error":"boom"}"#), "boom");
        assert_eq!(extract_error_message(r#"{"error":""}"#), GENERIC_SERVER_ERROR);
        assert_eq!(extract_error_message(r#"{"detail":"x"}"#), GENERIC_SERVER_ERROR);
        assert_eq!(extract_error_message("<html>500</html>"), GENERIC_SERVER_ERROR);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PriorityClient::new("http://localhost:8000/");
        assert_eq!(client.endpoint(ANALYZE_PATH), "http://localhost:8000/api/tasks/analyze/");
    }

    #[tokio::test]
    async fn test_analyze_malformed_input_sends_nothing() {
        let server = MockServer::start().await;
        let client = PriorityClient::new(server.uri());

        let err = client.analyze("not json", "smart").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_empty_input_sends_nothing() {
        let server = MockServer::start().await;
        let client = PriorityClient::new(server.uri());

        let err = client.analyze("[]", "smart").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_posts_tasks_and_returns_scores_in_order() {
        let server = MockServer::start().await;
        let tasks = json!([
            {"id": 1, "title": "A", "due_date": "2024-01-01", "estimated_hours": 2, "importance": 9, "dependencies": []},
            {"id": 2, "title": "B", "due_date": "2024-02-01", "estimated_hours": 8, "importance": 1, "dependencies": [1]}
        ]);
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .and(query_param("strategy", "deadline"))
            .and(header("content-type", "application/json"))
            .and(body_json(&tasks))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "title": "B", "score": 40, "explanation": "later"},
                {"id": 1, "title": "A", "score": 150, "explanation": "overdue"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        let scored = client.analyze(&tasks.to_string(), "deadline").await.unwrap();

        let titles: Vec<_> = scored.iter().map(|t| t.title.clone().unwrap()).collect();
        assert_eq!(titles, vec![json!("B"), json!("A")]);
        assert_eq!(scored[1].score_value(), Some(150.0));
    }

    #[tokio::test]
    async fn test_strategy_is_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .and(query_param("strategy", "a b&c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        client.suggest("a b&c").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("strategy=a+b%26c"));
    }

    #[tokio::test]
    async fn test_analyze_server_error_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        let err = client.analyze(r#"[{"title":"A"}]"#, "smart").await.unwrap_err();
        match err {
            ClientError::ServerError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        let err = client.suggest("smart").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ServerError { status: 502, ref message } if message == GENERIC_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_suggest_sends_get_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .and(query_param("strategy", "impact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "title": "Stored", "score": 95.5, "explanation": ""}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        let scored = client.suggest("impact").await.unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score_value(), Some(95.5));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_success_body_that_is_not_an_array_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
            .mount(&server)
            .await;

        let client = PriorityClient::new(server.uri());
        let err = client.suggest("smart").await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_failure() {
        // Port 9 on localhost: nothing listens there in test environments.
        let client = PriorityClient::new("http://127.0.0.1:9");
        let err = client.suggest("smart").await.unwrap_err();
        assert!(matches!(err, ClientError::NetworkFailure(_)));
    }
}
