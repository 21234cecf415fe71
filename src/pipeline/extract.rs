//! Structured field extraction for one document via the vision port.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::gateway::types::VisionClient;
use crate::models::document::UploadedDocument;
use crate::models::record::ExtractedRecord;
use crate::models::schema::SchemaHint;
use crate::pipeline::prompts::build_extraction_prompt;
use crate::pipeline::repair::{self, ParseError};

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ExtractError {
    #[error("inference service error: {0}")]
    ServiceError(String),

    #[error("no data could be extracted from the document")]
    NoContent,

    #[error("extraction response could not be parsed: {0}")]
    ParseFailed(ParseError),

    #[error("no fields were present in the extracted data")]
    Empty,
}

pub struct FieldExtractor {
    vision: Arc<dyn VisionClient>,
}

impl FieldExtractor {
    pub fn new(vision: Arc<dyn VisionClient>) -> Self {
        Self { vision }
    }

    /// Extract a structured record from one document.
    ///
    /// The schema hint comes from the already-computed type label; the
    /// emptiness check runs before `Document_Name` is injected, so a
    /// response of `{}` is `Empty` rather than a one-field record.
    pub async fn extract(
        &self,
        document: &UploadedDocument,
        type_label: &str,
    ) -> Result<ExtractedRecord, ExtractError> {
        let start = Instant::now();
        let hint = SchemaHint::from_type_label(type_label);
        let prompt = build_extraction_prompt(hint);

        let raw = self
            .vision
            .generate(&prompt, &document.bytes, &document.media_type)
            .await
            .map_err(|e| ExtractError::ServiceError(e.to_string()))?;

        if raw.trim().is_empty() {
            return Err(ExtractError::NoContent);
        }

        let object = repair::parse(&raw).map_err(|e| match e {
            ParseError::Empty => ExtractError::Empty,
            malformed => ExtractError::ParseFailed(malformed),
        })?;

        let mut record = ExtractedRecord::from_json_object(object);
        record.set_document_name(&document.name);

        tracing::info!(
            document = %document.name,
            schema_hint = ?hint,
            fields = record.data_field_count(),
            elapsed_ms = %start.elapsed().as_millis(),
            "Field extraction complete"
        );
        Ok(record)
    }
}
