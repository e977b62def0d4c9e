// Optional injury/status feed.
//
// A single GET against a JSON endpoint, bounded by a short timeout. Any
// failure degrades to an empty report so every player reads as fit/unknown.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::InjuryConfig;
use crate::error::FeedError;

// ---------------------------------------------------------------------------
// Health data
// ---------------------------------------------------------------------------

/// Coarse availability category shown in the "Health" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Fit,
    Test,
    Managed,
    Out,
    Unknown,
}

impl HealthStatus {
    /// Map the feed's free-text status onto a category.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() || lower == "fit" || lower == "available" || lower == "healthy" {
            HealthStatus::Fit
        } else if lower.contains("test") {
            HealthStatus::Test
        } else if lower.contains("managed") {
            HealthStatus::Managed
        } else if lower.contains("out")
            || lower.contains("season")
            || lower.contains("indefinite")
            || lower.contains("week")
        {
            HealthStatus::Out
        } else {
            HealthStatus::Unknown
        }
    }

    /// Rating multiplier used when the feed does not supply one.
    pub fn default_penalty(&self) -> f64 {
        match self {
            HealthStatus::Fit => 1.0,
            HealthStatus::Test => 0.9,
            HealthStatus::Managed => 0.95,
            HealthStatus::Out => 0.0,
            HealthStatus::Unknown => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Fit => "Fit",
            HealthStatus::Test => "Test",
            HealthStatus::Managed => "Managed",
            HealthStatus::Out => "Out",
            HealthStatus::Unknown => "?",
        }
    }
}

/// One player's reported status and scoring multiplier in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub status: HealthStatus,
    pub penalty: f64,
}

/// Injury data keyed by player full name. Empty means "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryReport {
    by_name: HashMap<String, Injury>,
}

impl InjuryReport {
    pub fn new(by_name: HashMap<String, Injury>) -> Self {
        InjuryReport { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Injury> {
        self.by_name.get(name)
    }

    /// Status for display; players missing from the report are `Unknown`.
    pub fn status_for(&self, name: &str) -> HealthStatus {
        self.get(name)
            .map(|i| i.status)
            .unwrap_or(HealthStatus::Unknown)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawInjury {
    #[serde(alias = "player")]
    name: String,
    #[serde(default, alias = "injury")]
    status: String,
    #[serde(default)]
    penalty: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayload {
    List(Vec<RawInjury>),
    Wrapped { injuries: Vec<RawInjury> },
}

/// Parse a feed response body into a report.
pub fn parse_injury_payload(body: &str) -> Result<InjuryReport, FeedError> {
    let payload: RawPayload =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;
    let rows = match payload {
        RawPayload::List(rows) => rows,
        RawPayload::Wrapped { injuries } => injuries,
    };

    let mut by_name = HashMap::new();
    for raw in rows {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let status = HealthStatus::from_label(&raw.status);
        let penalty = raw
            .penalty
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(0.0, 1.0))
            .unwrap_or_else(|| status.default_penalty());
        by_name.insert(name, Injury { status, penalty });
    }
    Ok(InjuryReport::new(by_name))
}

// ---------------------------------------------------------------------------
// Feed implementations
// ---------------------------------------------------------------------------

/// Source of injury data.
#[async_trait]
pub trait InjuryFeed: Send + Sync {
    async fn fetch(&self) -> Result<InjuryReport, FeedError>;
}

/// HTTP-backed feed with a hard request timeout.
pub struct HttpInjuryFeed {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpInjuryFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpInjuryFeed {
            http,
            url: url.into(),
            timeout,
        })
    }

    fn map_err(&self, err: reqwest::Error) -> FeedError {
        if err.is_timeout() {
            FeedError::Timeout(self.timeout)
        } else {
            FeedError::Http(err)
        }
    }
}

#[async_trait]
impl InjuryFeed for HttpInjuryFeed {
    async fn fetch(&self) -> Result<InjuryReport, FeedError> {
        debug!(url = %self.url, "fetching injury feed");
        let request = async {
            let response = self.http.get(&self.url).send().await.map_err(|e| self.map_err(e))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Status {
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(|e| self.map_err(e))
        };
        let body = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FeedError::Timeout(self.timeout))??;
        parse_injury_payload(&body)
    }
}

/// Either a configured HTTP feed or nothing at all.
pub enum InjuryClient {
    Active(HttpInjuryFeed),
    Disabled,
}

impl InjuryClient {
    /// Build from `[injury]` config. A feed that cannot be constructed is
    /// treated as disabled.
    pub fn from_config(config: &InjuryConfig) -> Self {
        if !config.enabled || config.url.trim().is_empty() {
            return InjuryClient::Disabled;
        }
        match HttpInjuryFeed::new(config.url.clone(), Duration::from_secs(config.timeout_secs)) {
            Ok(feed) => InjuryClient::Active(feed),
            Err(e) => {
                warn!("injury feed disabled: {}", e);
                InjuryClient::Disabled
            }
        }
    }
}

#[async_trait]
impl InjuryFeed for InjuryClient {
    async fn fetch(&self) -> Result<InjuryReport, FeedError> {
        match self {
            InjuryClient::Active(feed) => feed.fetch().await,
            InjuryClient::Disabled => Err(FeedError::Disabled),
        }
    }
}

/// Fetch from `feed`, recovering from every failure with an empty report.
pub async fn fetch_or_default<F: InjuryFeed + ?Sized>(feed: &F) -> InjuryReport {
    match feed.fetch().await {
        Ok(report) => {
            info!("Injury feed returned {} entries", report.len());
            report
        }
        Err(FeedError::Disabled) => {
            debug!("injury feed disabled; no health data");
            InjuryReport::default()
        }
        Err(e) => {
            warn!("injury feed unavailable ({}); treating all players as fit", e);
            InjuryReport::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/injuries")
    }

    /// Accept a connection and never answer.
    async fn serve_stalled() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });
        format!("http://{addr}/injuries")
    }

    #[test]
    fn status_labels_map_to_categories() {
        assert_eq!(HealthStatus::from_label("Test"), HealthStatus::Test);
        assert_eq!(HealthStatus::from_label("Managed"), HealthStatus::Managed);
        assert_eq!(HealthStatus::from_label("Season"), HealthStatus::Out);
        assert_eq!(HealthStatus::from_label("3-4 weeks"), HealthStatus::Out);
        assert_eq!(HealthStatus::from_label(""), HealthStatus::Fit);
        assert_eq!(HealthStatus::from_label("mystery"), HealthStatus::Unknown);
    }

    #[test]
    fn parse_list_payload_with_defaults() {
        let body = r#"[
            {"name": "Jack Macrae", "status": "Test"},
            {"player": "Tom Green", "injury": "Season", "penalty": 0.1},
            {"name": "Sam Walsh", "status": "Managed", "penalty": 4.0}
        ]"#;
        let report = parse_injury_payload(body).unwrap();
        assert_eq!(report.len(), 3);
        let macrae = report.get("Jack Macrae").unwrap();
        assert_eq!(macrae.status, HealthStatus::Test);
        assert!((macrae.penalty - 0.9).abs() < f64::EPSILON);
        assert!((report.get("Tom Green").unwrap().penalty - 0.1).abs() < f64::EPSILON);
        assert!((report.get("Sam Walsh").unwrap().penalty - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_wrapped_payload() {
        let body = r#"{"injuries": [{"name": "A", "status": "Out"}]}"#;
        let report = parse_injury_payload(body).unwrap();
        assert_eq!(report.status_for("A"), HealthStatus::Out);
        assert_eq!(report.status_for("B"), HealthStatus::Unknown);
    }

    #[test]
    fn parse_malformed_payload_is_error() {
        assert!(matches!(
            parse_injury_payload("<html>nope</html>"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn http_feed_parses_response() {
        let url = serve_once("HTTP/1.1 200 OK", r#"[{"name": "A", "status": "Test"}]"#).await;
        let feed = HttpInjuryFeed::new(url, Duration::from_secs(5)).unwrap();
        let report = feed.fetch().await.unwrap();
        assert_eq!(report.status_for("A"), HealthStatus::Test);
    }

    #[tokio::test]
    async fn http_feed_error_status() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "").await;
        let feed = HttpInjuryFeed::new(url, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            feed.fetch().await,
            Err(FeedError::Status { status: 503 })
        ));
    }

    #[tokio::test]
    async fn stalled_feed_times_out_and_degrades() {
        let url = serve_stalled().await;
        let feed = HttpInjuryFeed::new(url, Duration::from_millis(200)).unwrap();
        assert!(matches!(feed.fetch().await, Err(FeedError::Timeout(_))));
        let report = fetch_or_default(&feed).await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn unreachable_feed_degrades_to_empty() {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let feed = HttpInjuryFeed::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
        let report = fetch_or_default(&feed).await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn disabled_client_returns_empty_report() {
        let client = InjuryClient::from_config(&InjuryConfig::default());
        assert!(matches!(client, InjuryClient::Disabled));
        assert!(fetch_or_default(&client).await.is_empty());
    }
}
