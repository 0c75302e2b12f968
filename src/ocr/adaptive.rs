//! Adaptive OCR execution: synchronous first, batch on capacity refusal.
//!
//! ```text
//! Pending -> SyncAttempt -> Success
//!                 |
//!                 +-> BatchFallback -> BatchSubmitted -> Polling -> BatchComplete -> ResultFetched
//!                                                           |
//!                                                           +-> BatchTimeout
//! ```
//!
//! Only `OcrError::CapacityExceeded` from the synchronous call leads to the
//! batch path. Any other failure is returned unchanged.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::backend::{BatchOperation, BatchRequest, OcrError, OcrInput, OcrService, OperationStatus};
use crate::models::ObjectUri;
use crate::storage::ObjectStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Pending,
    SyncAttempt,
    Success,
    BatchFallback,
    BatchSubmitted,
    Polling,
    BatchComplete,
    BatchTimeout,
    ResultFetched,
}

/// Which processing mode produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    Sync,
    Batch,
}

#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub text: String,
    pub mode: OcrMode,
    /// States visited, in order.
    pub states: Vec<ExecutorState>,
}

/// Document content as the executor receives it.
#[derive(Debug, Clone)]
pub enum OcrContent {
    Bytes(Vec<u8>),
    Stored(ObjectUri),
}

#[derive(Debug, Clone)]
pub struct OcrJob {
    pub content: OcrContent,
    pub mime_type: String,
    /// Original filename, used to name staged batch objects.
    pub filename: String,
}

impl OcrJob {
    fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Staging bucket for locally held content.
    pub bucket: Option<String>,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

pub struct AdaptiveOcrExecutor {
    service: Arc<dyn OcrService>,
    store: Arc<dyn ObjectStore>,
    settings: BatchSettings,
}

struct StateTrace(Vec<ExecutorState>);

impl StateTrace {
    fn enter(&mut self, state: ExecutorState) {
        debug!("OCR executor -> {:?}", state);
        self.0.push(state);
    }
}

impl AdaptiveOcrExecutor {
    pub fn new(
        service: Arc<dyn OcrService>,
        store: Arc<dyn ObjectStore>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            service,
            store,
            settings,
        }
    }

    /// Run OCR on one document, falling back to batch processing when the
    /// synchronous endpoint reports the document is too large.
    pub async fn run(&self, job: OcrJob) -> Result<OcrOutcome, OcrError> {
        let mut trace = StateTrace(Vec::new());
        trace.enter(ExecutorState::Pending);

        let input = match &job.content {
            OcrContent::Bytes(content) => OcrInput::Raw {
                content: content.clone(),
                mime_type: job.mime_type.clone(),
            },
            OcrContent::Stored(uri) => OcrInput::Stored {
                uri: uri.clone(),
                mime_type: job.mime_type.clone(),
            },
        };

        let service = self.service.name();
        trace.enter(ExecutorState::SyncAttempt);
        debug!("Sending {} to {} synchronously", job.filename, service);
        match self.service.process(input).await {
            Ok(text) => {
                trace.enter(ExecutorState::Success);
                return Ok(OcrOutcome {
                    text,
                    mode: OcrMode::Sync,
                    states: trace.0,
                });
            }
            Err(OcrError::CapacityExceeded(reason)) => {
                info!(
                    "{} too large for synchronous {} OCR ({}), switching to batch",
                    job.filename, service, reason
                );
                trace.enter(ExecutorState::BatchFallback);
            }
            Err(e) => {
                warn!("{} OCR of {} failed: {}", service, job.filename, e);
                return Err(e);
            }
        }

        let request = self.stage_batch(&job).await?;
        let operation = self.service.batch_process(&request).await?;
        trace.enter(ExecutorState::BatchSubmitted);
        info!("Submitted {} batch operation {}", service, operation.name);

        trace.enter(ExecutorState::Polling);
        let poll = self.poll_until_complete(&operation);
        match tokio::time::timeout(self.settings.timeout, poll).await {
            Ok(Ok(())) => trace.enter(ExecutorState::BatchComplete),
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                trace.enter(ExecutorState::BatchTimeout);
                warn!(
                    "Batch operation {} exceeded {:?}",
                    operation.name, self.settings.timeout
                );
                return Err(OcrError::BatchTimeout {
                    seconds: self.settings.timeout.as_secs(),
                });
            }
        }

        let text = self.fetch_result(&request.output).await?;
        trace.enter(ExecutorState::ResultFetched);

        Ok(OcrOutcome {
            text,
            mode: OcrMode::Batch,
            states: trace.0,
        })
    }

    /// Decide batch input and output locations, uploading local content.
    async fn stage_batch(&self, job: &OcrJob) -> Result<BatchRequest, OcrError> {
        match &job.content {
            OcrContent::Stored(uri) => Ok(BatchRequest {
                input: uri.clone(),
                mime_type: job.mime_type.clone(),
                output: ObjectUri::new(
                    uri.bucket.clone(),
                    format!("{}output/{}/", uri.parent_prefix(), job.stem()),
                ),
            }),
            OcrContent::Bytes(content) => {
                let bucket = self.settings.bucket.clone().ok_or_else(|| {
                    OcrError::NotConfigured("no batch staging bucket configured".to_string())
                })?;
                self.store.ensure_bucket(&bucket).await?;

                let input = ObjectUri::new(bucket.clone(), format!("input/{}", job.filename));
                self.store
                    .upload(&input, content.clone(), &job.mime_type)
                    .await?;
                debug!("Uploaded batch input to {}", input);

                Ok(BatchRequest {
                    input,
                    mime_type: job.mime_type.clone(),
                    output: ObjectUri::new(bucket, format!("output/{}/", job.stem())),
                })
            }
        }
    }

    async fn poll_until_complete(&self, operation: &BatchOperation) -> Result<(), OcrError> {
        let mut polls = 0u32;
        loop {
            polls += 1;
            match self.service.operation_status(operation).await? {
                OperationStatus::Done => {
                    debug!("Batch operation {} done after {} polls", operation.name, polls);
                    return Ok(());
                }
                OperationStatus::Failed(message) => return Err(OcrError::BatchFailed(message)),
                OperationStatus::Running => {
                    debug!("Batch operation {} still running", operation.name);
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
            }
        }
    }

    /// Read text from the first JSON artifact under the output prefix.
    async fn fetch_result(&self, output: &ObjectUri) -> Result<String, OcrError> {
        let mut artifacts: Vec<String> = self
            .store
            .list(&output.bucket, &output.name)
            .await?
            .into_iter()
            .filter(|name| name.ends_with(".json"))
            .collect();
        artifacts.sort();

        let Some(first) = artifacts.first() else {
            warn!("No result artifact under {}", output);
            return Ok(String::new());
        };

        let raw = self
            .store
            .download(&ObjectUri::new(output.bucket.clone(), first.clone()))
            .await?;
        let value: serde_json::Value = serde_json::from_slice(&raw)
            .map_err(|e| OcrError::BatchFailed(format!("unreadable result {}: {}", first, e)))?;

        Ok(value
            .pointer("/document/text")
            .or_else(|| value.get("text"))
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
