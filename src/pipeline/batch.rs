//! Batch coordination: fan out one pipeline per document, fan in outcomes
//! in submission order, then synthesize the cross-document summary.
//!
//! The coordinator owns all batch state. Uploaded documents live only for
//! the duration of one submission; `reset_batch` is the only other
//! mutator. Resubmission bumps the batch identity, so results of a batch
//! that was reset mid-flight are discarded instead of stored.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::gateway::types::{TextClient, VisionClient};
use crate::models::document::UploadedDocument;
use crate::models::record::ExtractedRecord;
use crate::pipeline::classify::DocumentClassifier;
use crate::pipeline::document::{DocumentOutcome, DocumentPipeline};
use crate::pipeline::extract::{ExtractError, FieldExtractor};
use crate::pipeline::summary::SummarySynthesizer;

/// The resolved result of one batch: outcomes in input submission order,
/// the optional summary narrative, and a non-fatal warning when synthesis
/// failed. Always well-formed and renderable, even when every document
/// failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub outcomes: Vec<DocumentOutcome>,
    pub summary: Option<String>,
    pub synthesis_warning: Option<String>,
}

impl BatchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Records of the successful outcomes, in submission order.
    pub fn successful_records(&self) -> Vec<&ExtractedRecord> {
        self.outcomes.iter().filter_map(|o| o.record()).collect()
    }
}

struct CoordinatorState {
    current_batch: Option<Uuid>,
    last_result: Option<BatchResult>,
}

/// Runs document pipelines concurrently over a submitted batch.
pub struct BatchCoordinator {
    pipeline: Arc<DocumentPipeline>,
    synthesizer: Arc<SummarySynthesizer>,
    max_concurrent: usize,
    state: Mutex<CoordinatorState>,
}

impl BatchCoordinator {
    /// Wire the full pipeline onto the two capability ports.
    pub fn new(
        vision: Arc<dyn VisionClient>,
        text: Arc<dyn TextClient>,
        config: &PipelineConfig,
    ) -> Self {
        let classifier = Arc::new(DocumentClassifier::new(Arc::clone(&vision)));
        let extractor = Arc::new(FieldExtractor::new(vision));
        let pipeline = Arc::new(DocumentPipeline::new(classifier, extractor));
        let synthesizer = Arc::new(SummarySynthesizer::new(text));
        Self::with_pipeline(pipeline, synthesizer, config.max_concurrent_documents)
    }

    /// Assembly seam for tests and custom wiring.
    pub fn with_pipeline(
        pipeline: Arc<DocumentPipeline>,
        synthesizer: Arc<SummarySynthesizer>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            pipeline,
            synthesizer,
            max_concurrent: max_concurrent.max(1),
            state: Mutex::new(CoordinatorState {
                current_batch: None,
                last_result: None,
            }),
        }
    }

    /// Process a batch of documents and resolve once every pipeline has.
    ///
    /// Pipelines run concurrently, bounded by the configured permit count.
    /// The returned outcomes match input submission order regardless of
    /// completion order, and a single failing document never short-circuits
    /// the rest. Synthesis failure leaves the summary absent and the
    /// warning set; it does not invalidate the outcomes.
    pub async fn submit_batch(&self, documents: Vec<UploadedDocument>) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let start = Instant::now();
        if let Ok(mut state) = self.state.lock() {
            state.current_batch = Some(batch_id);
        }

        tracing::info!(
            batch_id = %batch_id,
            documents = documents.len(),
            "Batch submitted"
        );

        let names: Vec<String> = documents.iter().map(|d| d.name.clone()).collect();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let handles: Vec<_> = documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| {
                let pipeline = Arc::clone(&self.pipeline);
                let semaphore = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    (index, pipeline.run(&document).await)
                })
            })
            .collect();

        // Outcomes are indexed by original position, not completion order.
        let mut slots: Vec<Option<DocumentOutcome>> = names.iter().map(|_| None).collect();
        for joined in join_all(handles).await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "Document pipeline task aborted"),
            }
        }
        let outcomes: Vec<DocumentOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| DocumentOutcome::Failure {
                    document_name: names[index].clone(),
                    error: ExtractError::ServiceError("document task aborted".to_string()),
                })
            })
            .collect();

        let successes: Vec<ExtractedRecord> = outcomes
            .iter()
            .filter_map(|o| o.record().cloned())
            .collect();

        let (summary, synthesis_warning) = match self.synthesizer.synthesize(&successes).await {
            Ok(summary) => (summary, None),
            Err(e) => {
                tracing::warn!(batch_id = %batch_id, error = %e, "Summary synthesis failed");
                (None, Some(e.to_string()))
            }
        };

        let result = BatchResult {
            outcomes,
            summary,
            synthesis_warning,
        };

        tracing::info!(
            batch_id = %batch_id,
            succeeded = result.success_count(),
            failed = result.failure_count(),
            elapsed_ms = %start.elapsed().as_millis(),
            "Batch complete"
        );

        if let Ok(mut state) = self.state.lock() {
            if state.current_batch == Some(batch_id) {
                state.last_result = Some(result.clone());
            } else {
                tracing::debug!(batch_id = %batch_id, "Discarding stale batch result");
            }
        }
        result
    }

    /// Discard all in-memory batch state. In-flight submissions become
    /// stale: their results are still returned to their caller but are not
    /// retained here.
    pub fn reset_batch(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.current_batch = None;
            state.last_result = None;
        }
    }

    /// The most recently retained batch result, if any.
    pub fn last_result(&self) -> Option<BatchResult> {
        self.state.lock().ok()?.last_result.clone()
    }
}
