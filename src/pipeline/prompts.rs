//! Prompt templates for the three gateway calls.

use crate::models::record::ExtractedRecord;
use crate::models::schema::SchemaHint;

/// Fixed classification instruction — the response is used verbatim as the
/// document's type label.
pub const CLASSIFY_INSTRUCTION: &str = "\
Analyze this document image and determine its exact type (e.g., CFPB Complaint, \
BBB Complaint, Consumer Letter, Attorney General, Gas Bill, Passport, Driver License, \
Social Security Card, National ID Card, etc.).
Return ONLY the document type as a simple string without any additional text or formatting.";

const EXTRACTION_PREAMBLE: &str = "\
You are a document analysis expert. Analyze this document image and extract the \
following information in JSON format:";

/// Catch-all instruction, always present so unrecognized documents still
/// yield whatever fields are visible.
const GENERIC_SECTION: &str = "\
For other documents:
Extract all visible data points except Document Type.";

const NORMALIZATION_RULES: &str = "\
Important:
1. Convert all text to English if in another language
2. Return ONLY valid JSON
3. Use null for missing fields
4. Format dates as YYYY-MM-DD
5. Clean and standardize all field values";

/// Build the extraction prompt for one document. The schema-specific field
/// list is included when the hint carries one; the generic catch-all and
/// the normalization rules are always present.
pub fn build_extraction_prompt(hint: SchemaHint) -> String {
    let mut prompt = String::from(EXTRACTION_PREAMBLE);
    prompt.push_str("\n\n");

    if let Some(fields) = hint.field_names() {
        let heading = if hint == SchemaHint::Passport {
            "For passports:"
        } else {
            "For national ID cards:"
        };
        prompt.push_str(heading);
        for field in fields {
            prompt.push_str("\n- ");
            prompt.push_str(field);
        }
        prompt.push_str("\n\n");
    }

    prompt.push_str(GENERIC_SECTION);
    prompt.push_str("\n\n");
    prompt.push_str(NORMALIZATION_RULES);
    prompt
}

/// Build the cross-document summary instruction over successful records.
pub fn build_summary_prompt(records: &[ExtractedRecord]) -> String {
    let records_json =
        serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"));

    format!(
        "Analyze the given documents information and provide all the **anomalies** present \
along with detailed **summary** highlighting key patterns, inconsistencies, or notable \
observations. Format the response as follows:
1. Each sentence should be on a new line with bullet points
2. Separate different sections with blank lines
3. Provide headings like **Summary** and **Anomalies**
4. Don't consider Document Name for summary and anomalies
Document information:
{records_json}"
    )
}
