//! Document type classification via the vision port.
//!
//! Classification is cosmetic — the label feeds the result heading and the
//! extraction schema hint — so every failure here is soft: the label falls
//! back to `"Document"` and extraction proceeds regardless. The label is
//! produced at most once per document per batch and cached on the outcome;
//! rendering reads it from there instead of re-requesting.

use std::sync::Arc;

use crate::gateway::types::VisionClient;
use crate::models::document::UploadedDocument;
use crate::pipeline::prompts::CLASSIFY_INSTRUCTION;

/// Label used when classification fails or returns nothing.
pub const FALLBACK_TYPE_LABEL: &str = "Document";

pub struct DocumentClassifier {
    vision: Arc<dyn VisionClient>,
}

impl DocumentClassifier {
    pub fn new(vision: Arc<dyn VisionClient>) -> Self {
        Self { vision }
    }

    /// Classify one document. Never fails: gateway errors and empty
    /// responses both yield the fallback label.
    pub async fn classify(&self, document: &UploadedDocument) -> String {
        match self
            .vision
            .generate(CLASSIFY_INSTRUCTION, &document.bytes, &document.media_type)
            .await
        {
            Ok(response) => {
                let label = response.trim();
                if label.is_empty() {
                    FALLBACK_TYPE_LABEL.to_string()
                } else {
                    label.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(
                    document = %document.name,
                    error = %e,
                    "Classification failed, using fallback label"
                );
                FALLBACK_TYPE_LABEL.to_string()
            }
        }
    }
}
