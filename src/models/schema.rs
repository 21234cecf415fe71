use serde::{Deserialize, Serialize};

/// Field set requested from the extraction model for passports.
pub const PASSPORT_FIELDS: &[&str] = &[
    "country",
    "passport_number",
    "name",
    "nationality",
    "date_of_birth",
    "place_of_birth",
    "issuing_authority",
    "id_number",
    "sex",
    "date_of_issue",
    "date_of_expiry",
];

/// Field set requested from the extraction model for national ID cards.
pub const NATIONAL_ID_FIELDS: &[&str] = &["country", "name", "nationality", "id_number"];

/// Which named field schema the extraction prompt requests.
///
/// `Generic` carries no fixed field list — the record accepts whatever
/// keys the extraction model returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaHint {
    Passport,
    NationalId,
    Generic,
}

impl SchemaHint {
    /// Best-effort selection from free-text classifier output. Matching is
    /// case-insensitive containment, approximate by design — `Generic` is
    /// the always-available fallback.
    pub fn from_type_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("passport") {
            Self::Passport
        } else if lower.contains("national id")
            || lower.contains("identity card")
            || lower.contains("id card")
        {
            Self::NationalId
        } else {
            Self::Generic
        }
    }

    /// The fixed field list for this hint, if it has one.
    pub fn field_names(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Passport => Some(PASSPORT_FIELDS),
            Self::NationalId => Some(NATIONAL_ID_FIELDS),
            Self::Generic => None,
        }
    }
}
