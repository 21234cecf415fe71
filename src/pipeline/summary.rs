//! Cross-document summary synthesis via the text port.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::gateway::types::TextClient;
use crate::models::record::ExtractedRecord;
use crate::pipeline::prompts::build_summary_prompt;

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisError {
    #[error("inference service error: {0}")]
    ServiceError(String),

    #[error("summary response carried no text")]
    NoContent,
}

pub struct SummarySynthesizer {
    text: Arc<dyn TextClient>,
}

impl SummarySynthesizer {
    pub fn new(text: Arc<dyn TextClient>) -> Self {
        Self { text }
    }

    /// Produce the anomalies/summary narrative over successful records.
    /// An empty record set is not an error — there is simply nothing to
    /// summarize, so no request is issued.
    pub async fn synthesize(
        &self,
        records: &[ExtractedRecord],
    ) -> Result<Option<String>, SynthesisError> {
        if records.is_empty() {
            return Ok(None);
        }

        let prompt = build_summary_prompt(records);
        let response = self
            .text
            .complete(&prompt)
            .await
            .map_err(|e| SynthesisError::ServiceError(e.to_string()))?;

        let narrative = response.trim();
        if narrative.is_empty() {
            return Err(SynthesisError::NoContent);
        }

        tracing::info!(
            records = records.len(),
            narrative_len = narrative.len(),
            "Summary synthesis complete"
        );
        Ok(Some(narrative.to_string()))
    }
}
