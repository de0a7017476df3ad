//! Elasticsearch document sink.
//!
//! Talks to the cluster over its REST API: `HEAD`/`PUT /<index>` for index
//! management, `POST /_bulk` (NDJSON) for writes and `POST /<index>/_search`
//! for lookups.

use super::mapping::index_definition;
use async_trait::async_trait;
use chatlog_application::{BulkWriteReport, DocumentSink, SinkError};
use chatlog_domain::IngestDocument;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Connection and index settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchConfig {
    pub host: String,
    pub port: u16,
    pub use_ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    pub index_name: String,
    pub shards: u32,
    pub replicas: u32,
    pub max_result_window: u32,
}

impl ElasticsearchConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// [`DocumentSink`] backed by an Elasticsearch cluster.
pub struct ElasticsearchSink {
    client: reqwest::Client,
    config: ElasticsearchConfig,
    base_url: String,
}

impl ElasticsearchSink {
    pub fn new(config: ElasticsearchConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SinkError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        match &self.config.username {
            Some(user) => builder.basic_auth(user, self.config.password.as_ref()),
            None => builder,
        }
    }

    /// Check that the cluster answers.
    pub async fn ping(&self) -> Result<(), SinkError> {
        let response = self
            .request(Method::GET, "")
            .send()
            .await
            .map_err(transport_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(SinkError::Unavailable(format!(
                "{} answered HTTP {}",
                self.base_url,
                response.status()
            )))
        }
    }

    pub async fn index_exists(&self) -> Result<bool, SinkError> {
        let response = self
            .request(Method::HEAD, &self.config.index_name)
            .send()
            .await
            .map_err(transport_error)?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SinkError::UnexpectedResponse(format!(
                "HEAD /{} returned HTTP {}",
                self.config.index_name, status
            ))),
        }
    }

    /// Create the index. `Ok(false)` when another writer created it first.
    pub async fn create_index(&self) -> Result<bool, SinkError> {
        let body = index_definition(
            self.config.shards,
            self.config.replicas,
            self.config.max_result_window,
        );
        let response = self
            .request(Method::PUT, &self.config.index_name)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            info!("Created index {}", self.config.index_name);
            return Ok(true);
        }

        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && text.contains(ALREADY_EXISTS) {
            debug!("Index {} already exists", self.config.index_name);
            return Ok(false);
        }
        Err(SinkError::IndexCreation {
            index: self.config.index_name.clone(),
            message: format!("HTTP {}: {}", status, text),
        })
    }
}

#[async_trait]
impl DocumentSink for ElasticsearchSink {
    fn index_name(&self) -> &str {
        &self.config.index_name
    }

    async fn ensure_index(&self) -> Result<bool, SinkError> {
        if self.index_exists().await? {
            return Ok(false);
        }
        self.create_index().await
    }

    async fn bulk_write(
        &self,
        documents: Vec<IngestDocument>,
    ) -> Result<BulkWriteReport, SinkError> {
        if documents.is_empty() {
            return Ok(BulkWriteReport::default());
        }

        let submitted = documents.len();
        let body = bulk_body(&self.config.index_name, &documents)?;
        let response = self
            .request(Method::POST, "_bulk")
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(SinkError::BulkWrite(format!("HTTP {}: {}", status, text)));
        }

        let report = parse_bulk_response(&text, submitted)?;
        debug!(
            "Bulk write to {}: {} accepted, {} rejected",
            self.config.index_name, report.success_count, report.failed_count
        );
        Ok(report)
    }

    async fn search_by_user(
        &self,
        user_id: &str,
        size: usize,
    ) -> Result<Vec<IngestDocument>, SinkError> {
        let query = json!({
            "query": {"match": {"user_id": user_id}},
            "sort": [{"timestamp": {"order": "desc"}}],
            "size": size
        });
        let response = self
            .request(Method::POST, &format!("{}/_search", self.config.index_name))
            .json(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(SinkError::Search(format!("HTTP {}: {}", status, text)));
        }
        parse_search_hits(&text)
    }
}

fn transport_error(e: reqwest::Error) -> SinkError {
    if e.is_timeout() {
        SinkError::Timeout
    } else {
        SinkError::Unavailable(e.to_string())
    }
}

/// NDJSON body: an action line and a source line per document.
fn bulk_body(index: &str, documents: &[IngestDocument]) -> Result<String, SinkError> {
    let action = json!({"index": {"_index": index}}).to_string();
    let mut body = String::new();
    for document in documents {
        let source = serde_json::to_string(document)
            .map_err(|e| SinkError::BulkWrite(format!("Failed to serialize document: {}", e)))?;
        body.push_str(&action);
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

impl BulkItem {
    fn rejection(&self) -> Option<String> {
        if (200..300).contains(&self.status) && self.error.is_none() {
            return None;
        }
        let reason = self.error.as_ref().map(|error| {
            let kind = error.get("type").and_then(Value::as_str).unwrap_or("error");
            match error.get("reason").and_then(Value::as_str) {
                Some(reason) => format!("{}: {}", kind, reason),
                None => kind.to_string(),
            }
        });
        Some(reason.unwrap_or_else(|| format!("HTTP {}", self.status)))
    }
}

/// Per-item outcomes of a `_bulk` response, in submission order.
fn parse_bulk_response(text: &str, submitted: usize) -> Result<BulkWriteReport, SinkError> {
    let response: BulkResponse = serde_json::from_str(text)
        .map_err(|e| SinkError::UnexpectedResponse(format!("Invalid bulk response: {}", e)))?;

    if response.items.len() != submitted {
        warn!(
            "Bulk response lists {} items for {} documents",
            response.items.len(),
            submitted
        );
    }

    let outcomes = (0..submitted).map(|i| match response.items.get(i) {
        Some(item) => item
            .values()
            .next()
            .map_or_else(|| Some("empty bulk item".to_string()), BulkItem::rejection),
        None => Some("no status reported".to_string()),
    });
    Ok(BulkWriteReport::from_outcomes(outcomes))
}

fn parse_search_hits(text: &str) -> Result<Vec<IngestDocument>, SinkError> {
    let body: Value = serde_json::from_str(text)
        .map_err(|e| SinkError::UnexpectedResponse(format!("Invalid search response: {}", e)))?;
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SinkError::UnexpectedResponse("Search response has no hits".to_string()))?;

    Ok(hits
        .iter()
        .filter_map(|hit| {
            let source = hit.get("_source")?.clone();
            serde_json::from_value(source)
                .inspect_err(|e| warn!("Skipping unreadable hit: {}", e))
                .ok()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlog_domain::{ConversationTurn, Metadata};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn config() -> ElasticsearchConfig {
        ElasticsearchConfig {
            host: "localhost".to_string(),
            port: 9200,
            use_ssl: false,
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
            index_name: "copilot-chat-logs".to_string(),
            shards: 1,
            replicas: 0,
            max_result_window: 10000,
        }
    }

    fn document(file_name: &str) -> IngestDocument {
        IngestDocument {
            timestamp: "2025-03-26T06:16:09".to_string(),
            file_name: file_name.to_string(),
            user_id: "alice".to_string(),
            conversation: vec![ConversationTurn::assistant("hi", None)],
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(config().base_url(), "http://localhost:9200");
        let secure = ElasticsearchConfig {
            use_ssl: true,
            port: 443,
            ..config()
        };
        assert_eq!(secure.base_url(), "https://localhost:443");
    }

    #[test]
    fn test_new_sink() {
        let sink = ElasticsearchSink::new(config()).unwrap();
        assert_eq!(sink.base_url(), "http://localhost:9200");
        assert_eq!(sink.index_name(), "copilot-chat-logs");
    }

    #[test]
    fn test_bulk_body_is_ndjson() {
        let body = bulk_body("logs", &[document("a.json"), document("b.json")]).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(body.ends_with('\n'));
        assert_eq!(lines[0], r#"{"index":{"_index":"logs"}}"#);
        let source: Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(source["file_name"], "b.json");
        assert_eq!(source["conversation"][0]["role"], "assistant");
    }

    #[test]
    fn test_parse_bulk_partial_success() {
        let text = json!({
            "took": 3,
            "errors": true,
            "items": [
                {"index": {"status": 201, "result": "created"}},
                {"index": {"status": 400, "error": {
                    "type": "mapper_parsing_exception",
                    "reason": "failed to parse field [metadata.ip_address]"
                }}},
                {"index": {"status": 201, "result": "created"}}
            ]
        })
        .to_string();

        let report = parse_bulk_response(&text, 3).unwrap();
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.accepted, vec![true, false, true]);
        assert!(report.errors[0].starts_with("mapper_parsing_exception"));
    }

    #[test]
    fn test_parse_bulk_missing_items_count_as_rejected() {
        let text = json!({"errors": false, "items": [{"index": {"status": 200}}]}).to_string();
        let report = parse_bulk_response(&text, 2).unwrap();
        assert_eq!(report.accepted, vec![true, false]);
    }

    #[test]
    fn test_parse_bulk_garbage() {
        assert!(matches!(
            parse_bulk_response("<html>", 1),
            Err(SinkError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_search_hits() {
        let text = json!({
            "hits": {"total": {"value": 2}, "hits": [
                {"_id": "1", "_source": serde_json::to_value(document("a.json")).unwrap()},
                {"_id": "2", "_source": {"unexpected": true}}
            ]}
        })
        .to_string();

        let hits = parse_search_hits(&text).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_name, "a.json");
    }

    #[tokio::test]
    async fn test_unreachable_cluster_is_unavailable() {
        // Port 9 (discard) on localhost is closed on test hosts
        let sink = ElasticsearchSink::new(ElasticsearchConfig {
            port: 9,
            timeout: Duration::from_secs(2),
            ..config()
        })
        .unwrap();

        let result = sink.bulk_write(vec![document("a.json")]).await;
        assert!(matches!(
            result,
            Err(SinkError::Unavailable(_)) | Err(SinkError::Timeout)
        ));
    }

    // ==================== Canned HTTP server ====================

    /// Answer one connection per canned `(status, body)` pair and return the
    /// request lines seen, in order.
    async fn canned_server(
        responses: Vec<(u16, &'static str)>,
    ) -> (ElasticsearchSink, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let mut request_lines = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                request_lines.push(request.lines().next().unwrap_or_default().to_string());

                let reply = format!(
                    "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            request_lines
        });

        let sink = ElasticsearchSink::new(ElasticsearchConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(5),
            ..config()
        })
        .unwrap();
        (sink, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_index_exists_unexpected_status() {
        let (sink, server) = canned_server(vec![(500, "")]).await;

        let result = sink.index_exists().await;
        assert!(matches!(
            &result,
            Err(SinkError::UnexpectedResponse(message)) if message.contains("500")
        ));
        assert_eq!(server.await.unwrap(), vec!["HEAD /copilot-chat-logs HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_create_index_already_exists_is_not_an_error() {
        let body = r#"{"error":{"type":"resource_already_exists_exception","reason":"index [copilot-chat-logs/x] already exists"},"status":400}"#;
        let (sink, server) = canned_server(vec![(400, body)]).await;

        assert!(!sink.create_index().await.unwrap());
        assert_eq!(server.await.unwrap(), vec!["PUT /copilot-chat-logs HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_create_index_other_rejection() {
        let body = r#"{"error":{"type":"illegal_argument_exception"},"status":400}"#;
        let (sink, server) = canned_server(vec![(400, body)]).await;

        let result = sink.create_index().await;
        assert!(matches!(
            &result,
            Err(SinkError::IndexCreation { index, message })
                if index == "copilot-chat-logs" && message.contains("illegal_argument_exception")
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_index_creates_when_missing() {
        let (sink, server) =
            canned_server(vec![(404, ""), (200, r#"{"acknowledged":true}"#)]).await;

        assert!(sink.ensure_index().await.unwrap());
        assert_eq!(
            server.await.unwrap(),
            vec![
                "HEAD /copilot-chat-logs HTTP/1.1",
                "PUT /copilot-chat-logs HTTP/1.1"
            ]
        );
    }
}
