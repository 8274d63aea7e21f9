//! HTTP client for the classification service.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use mailguard_core::{ClassificationRequest, ClassificationResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Every variant's `Display` is what the result area shows, verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Network unreachable, DNS failure, connection reset, ...
    #[error("{0}")]
    Transport(String),
    /// Non-success status. The body is never read.
    #[error("HTTP {0}")]
    Status(u16),
    /// Success status but the body is not the expected JSON.
    #[error("{0}")]
    Decode(String),
    #[error("timeout")]
    Timeout,
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for ClassifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prefix the endpoints hang off, e.g. `http://localhost:5173/api`.
    pub api_base: String,
    /// Sent as `x-api-key`. Not validated client-side.
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5173/api".into(),
            api_key: "DEMO_KEY".into(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// `GET /health` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub num_labels: Option<u32>,
    #[serde(default)]
    pub id2label: BTreeMap<String, String>,
    #[serde(default)]
    pub sensitive_idx: Option<u32>,
}

#[derive(Serialize)]
struct PolicyRequest {
    score: f64,
}

#[derive(Deserialize)]
struct PolicyResponse {
    action: String,
}

/// The seam the controller drives; [`ClassifyClient`] is the HTTP implementation.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifyError>;
}

pub struct ClassifyClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl ClassifyClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifyError::Build(e.to_string()))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Service liveness and model metadata.
    pub async fn health(&self) -> Result<HealthReport, ClassifyError> {
        let url = format!("{}/health", self.api_base);
        info!(url = %url, "checking classifier health");
        let resp = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await?;
        decode(resp).await
    }

    /// Ask the service which action its policy assigns to `score`.
    pub async fn apply_policy(&self, score: f64) -> Result<String, ClassifyError> {
        let url = format!("{}/policy/apply", self.api_base);
        info!(url = %url, score, "applying policy");
        let resp = self.post(&url, &PolicyRequest { score }).await?;
        let policy: PolicyResponse = decode(resp).await?;
        Ok(policy.action)
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, ClassifyError> {
        Ok(self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
            .send()
            .await?)
    }
}

#[async_trait]
impl Classify for ClassifyClient {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifyError> {
        let url = format!("{}/classify", self.api_base);
        info!(
            url = %url,
            attachments = request.attachments.len(),
            "submitting email for classification"
        );
        let resp = self.post(&url, request).await?;
        let result: ClassificationResponse = decode(resp).await?;
        info!(label = %result.label, action = %result.action, score = result.score, "classified");
        Ok(result)
    }
}

/// Reject non-success statuses without touching the body, then parse JSON.
async fn decode<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ClassifyError> {
    let status = resp.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "classifier returned an error status");
        return Err(ClassifyError::Status(status.as_u16()));
    }
    let body = resp.text().await?;
    debug!(bytes = body.len(), "response body received");
    Ok(serde_json::from_str(&body)?)
}
