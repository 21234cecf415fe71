//! Per-document orchestration: classify, then extract, with failure
//! isolation so one bad document never aborts its siblings.

use std::sync::Arc;

use serde::Serialize;

use crate::models::document::UploadedDocument;
use crate::models::record::ExtractedRecord;
use crate::pipeline::classify::DocumentClassifier;
use crate::pipeline::extract::{ExtractError, FieldExtractor};

/// The resolved result for one document. Created here, never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Success {
        record: ExtractedRecord,
        type_label: String,
    },
    Failure {
        document_name: String,
        error: ExtractError,
    },
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn document_name(&self) -> &str {
        match self {
            Self::Success { record, .. } => record.document_name().unwrap_or_default(),
            Self::Failure { document_name, .. } => document_name,
        }
    }

    pub fn record(&self) -> Option<&ExtractedRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure { .. } => None,
        }
    }
}

/// Runs one document through classification and extraction.
///
/// The two calls are sequenced per document: the label informs the
/// extraction schema hint, and sequencing bounds the per-document request
/// fan-out at one in-flight call.
pub struct DocumentPipeline {
    classifier: Arc<DocumentClassifier>,
    extractor: Arc<FieldExtractor>,
}

impl DocumentPipeline {
    pub fn new(classifier: Arc<DocumentClassifier>, extractor: Arc<FieldExtractor>) -> Self {
        Self {
            classifier,
            extractor,
        }
    }

    /// Process one document to a resolved outcome. Never returns an error
    /// past this boundary: a classifier soft-failure defaults the label,
    /// an extractor failure becomes `Failure` with the document's name.
    pub async fn run(&self, document: &UploadedDocument) -> DocumentOutcome {
        let type_label = self.classifier.classify(document).await;

        match self.extractor.extract(document, &type_label).await {
            Ok(record) => DocumentOutcome::Success { record, type_label },
            Err(error) => {
                tracing::warn!(
                    document = %document.name,
                    error = %error,
                    "Document extraction failed"
                );
                DocumentOutcome::Failure {
                    document_name: document.name.clone(),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::client::MockVisionClient;
    use crate::gateway::GatewayError;

    fn doc(name: &str) -> UploadedDocument {
        UploadedDocument::new(name, name.as_bytes().to_vec(), "image/png")
    }

    fn pipeline(
        classify_response: Arc<MockVisionClient>,
        extract_response: Arc<MockVisionClient>,
    ) -> DocumentPipeline {
        DocumentPipeline::new(
            Arc::new(DocumentClassifier::new(classify_response)),
            Arc::new(FieldExtractor::new(extract_response)),
        )
    }

    #[tokio::test]
    async fn successful_run_carries_record_and_label() {
        let classify = Arc::new(MockVisionClient::new("Passport"));
        let extract = Arc::new(MockVisionClient::new(r#"{"country": "US"}"#));
        let outcome = pipeline(classify, extract).run(&doc("a.png")).await;

        match outcome {
            DocumentOutcome::Success { record, type_label } => {
                assert_eq!(type_label, "Passport");
                assert_eq!(record.get("country"), Some("US"));
                assert_eq!(record.document_name(), Some("a.png"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn classifier_failure_is_soft_extraction_still_runs() {
        let classify = Arc::new(MockVisionClient::failing(GatewayError::Timeout(120)));
        let extract = Arc::new(MockVisionClient::new(r#"{"total_due": "42.10"}"#));
        let outcome = pipeline(classify, extract).run(&doc("bill.png")).await;

        match outcome {
            DocumentOutcome::Success { type_label, record } => {
                assert_eq!(type_label, "Document");
                assert_eq!(record.get("total_due"), Some("42.10"));
            }
            other => panic!("expected success with fallback label, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extractor_failure_becomes_failure_outcome() {
        let classify = Arc::new(MockVisionClient::new("Passport"));
        let extract = Arc::new(MockVisionClient::failing(GatewayError::ErrorPayload(
            "bad image".into(),
        )));
        let outcome = pipeline(classify, extract).run(&doc("blurry.png")).await;

        match outcome {
            DocumentOutcome::Failure {
                document_name,
                error,
            } => {
                assert_eq!(document_name, "blurry.png");
                assert!(matches!(error, ExtractError::ServiceError(_)));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn classification_requested_once_per_run() {
        let classify = Arc::new(MockVisionClient::new("Passport"));
        let extract = Arc::new(MockVisionClient::new(r#"{"country": "US"}"#));
        let pipeline = pipeline(
            Arc::clone(&classify),
            Arc::clone(&extract),
        );

        pipeline.run(&doc("a.png")).await;
        assert_eq!(classify.call_count(), 1);
        assert_eq!(extract.call_count(), 1);
    }

    #[tokio::test]
    async fn outcome_document_name_accessor() {
        let success = DocumentOutcome::Success {
            record: {
                let mut r = ExtractedRecord::default();
                r.set_document_name("x.png");
                r
            },
            type_label: "Passport".into(),
        };
        assert_eq!(success.document_name(), "x.png");
        assert!(success.record().is_some());

        let failure = DocumentOutcome::Failure {
            document_name: "y.png".into(),
            error: ExtractError::NoContent,
        };
        assert_eq!(failure.document_name(), "y.png");
        assert!(failure.record().is_none());
    }
}
