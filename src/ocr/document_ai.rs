//! Google Cloud Document AI client.
//!
//! Uses the REST API of an OCR processor:
//! - `:process` for synchronous requests (inline bytes or a GCS object)
//! - `:batchProcess` for long documents, returning a long-running operation
//! - `GET /v1/{operation}` to poll that operation
//!
//! Requests are authenticated with a bearer token when one is configured and
//! retried with exponential backoff on 429 responses.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::{BatchOperation, BatchRequest, OcrError, OcrInput, OcrService, OperationStatus};
use crate::config::Config;

/// Maximum retry attempts on rate limit (429) errors.
const MAX_RETRIES: u32 = 5;

/// Request timeout for a single synchronous call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct DocumentAiClient {
    client: reqwest::Client,
    endpoint: String,
    project_id: Option<String>,
    location: String,
    processor_id: Option<String>,
    access_token: Option<String>,
    max_sync_bytes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_document: Option<RawDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gcs_document: Option<GcsDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    content: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GcsDocument {
    gcs_uri: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchProcessRequest {
    input_documents: BatchInputConfig,
    document_output_config: DocumentOutputConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchInputConfig {
    gcs_documents: GcsDocuments,
}

#[derive(Debug, Serialize)]
struct GcsDocuments {
    documents: Vec<GcsDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentOutputConfig {
    gcs_output_config: GcsOutputConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GcsOutputConfig {
    gcs_uri: String,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Deserialize)]
struct ProcessedDocument {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: RpcStatus,
}

impl DocumentAiClient {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.document_ai.endpoint().trim_end_matches('/').to_string(),
            project_id: config.document_ai.project_id.clone(),
            location: config.document_ai.location.clone(),
            processor_id: config.document_ai.processor_id.clone(),
            access_token: config.access_token.clone(),
            max_sync_bytes: config.document_ai.max_sync_bytes,
        }
    }

    /// Whether a project and processor are configured.
    pub fn is_configured(&self) -> bool {
        self.project_id.is_some() && self.processor_id.is_some()
    }

    fn processor_url(&self, verb: &str) -> Result<String, OcrError> {
        let (Some(project), Some(processor)) = (&self.project_id, &self.processor_id) else {
            return Err(OcrError::NotConfigured(
                "set GOOGLE_CLOUD_PROJECT and DOCUMENT_AI_PROCESSOR_ID".to_string(),
            ));
        };
        Ok(format!(
            "{}/v1/projects/{}/locations/{}/processors/{}:{}",
            self.endpoint, project, self.location, processor, verb
        ))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, retrying on 429 with exponential backoff.
    ///
    /// Returns the first non-429 response; non-success statuses are mapped
    /// through [`classify_failure`].
    async fn send<F>(&self, make_request: F) -> Result<reqwest::Response, OcrError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let response = self
                .authorize(make_request())
                .send()
                .await
                .map_err(|e| OcrError::Request(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status != StatusCode::TOO_MANY_REQUESTS || attempt >= MAX_RETRIES {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_failure(status, &body));
            }

            let wait = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or_else(|| Duration::from_millis(1000 * 2u64.pow(attempt)));

            warn!(
                "Document AI rate limited (attempt {}), waiting {:?}",
                attempt + 1,
                wait
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

/// Map an HTTP failure to an OCR error, separating capacity refusals.
pub fn classify_failure(status: StatusCode, body: &str) -> OcrError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return OcrError::CapacityExceeded(message);
    }

    if status == StatusCode::BAD_REQUEST {
        let lower = message.to_lowercase();
        if lower.contains("exceed") || lower.contains("limit") || lower.contains("too large") {
            return OcrError::CapacityExceeded(message);
        }
    }

    OcrError::Request(format!("HTTP {}: {}", status, message))
}

#[async_trait]
impl OcrService for DocumentAiClient {
    fn name(&self) -> &str {
        "document-ai"
    }

    async fn process(&self, input: OcrInput) -> Result<String, OcrError> {
        let url = self.processor_url("process")?;

        let mime_type = input.mime_type().to_string();
        let request = match input {
            OcrInput::Raw { content, .. } => {
                if content.len() as u64 > self.max_sync_bytes {
                    return Err(OcrError::CapacityExceeded(format!(
                        "{} bytes exceeds the {} byte inline limit",
                        content.len(),
                        self.max_sync_bytes
                    )));
                }
                ProcessRequest {
                    raw_document: Some(RawDocument {
                        content: base64::engine::general_purpose::STANDARD.encode(&content),
                        mime_type,
                    }),
                    gcs_document: None,
                }
            }
            OcrInput::Stored { uri, .. } => ProcessRequest {
                raw_document: None,
                gcs_document: Some(GcsDocument {
                    gcs_uri: uri.to_string(),
                    mime_type,
                }),
            },
        };

        debug!("Document AI process request to {}", url);
        let response = self.send(|| self.client.post(&url).json(&request)).await?;
        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Request(format!("Failed to parse response: {}", e)))?;

        Ok(body.document.map(|d| d.text).unwrap_or_default())
    }

    async fn batch_process(&self, request: &BatchRequest) -> Result<BatchOperation, OcrError> {
        let url = self.processor_url("batchProcess")?;
        let body = BatchProcessRequest {
            input_documents: BatchInputConfig {
                gcs_documents: GcsDocuments {
                    documents: vec![GcsDocument {
                        gcs_uri: request.input.to_string(),
                        mime_type: request.mime_type.clone(),
                    }],
                },
            },
            document_output_config: DocumentOutputConfig {
                gcs_output_config: GcsOutputConfig {
                    gcs_uri: request.output.to_string(),
                },
            },
        };

        let response = self.send(|| self.client.post(&url).json(&body)).await?;
        let operation: Operation = response
            .json()
            .await
            .map_err(|e| OcrError::Request(format!("Failed to parse operation: {}", e)))?;

        debug!("Submitted batch operation {}", operation.name);
        Ok(BatchOperation {
            name: operation.name,
        })
    }

    async fn operation_status(
        &self,
        operation: &BatchOperation,
    ) -> Result<OperationStatus, OcrError> {
        let url = format!("{}/v1/{}", self.endpoint, operation.name);
        let response = self.send(|| self.client.get(&url)).await?;
        let operation: Operation = response
            .json()
            .await
            .map_err(|e| OcrError::Request(format!("Failed to parse operation: {}", e)))?;

        Ok(match (operation.done, operation.error) {
            (_, Some(status)) => OperationStatus::Failed(status.message),
            (true, None) => OperationStatus::Done,
            (false, None) => OperationStatus::Running,
        })
    }
}
