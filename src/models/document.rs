use serde::{Deserialize, Serialize};

/// Fallback media type when nothing can be inferred from the file name.
const OCTET_STREAM: &str = "application/octet-stream";

/// One user-submitted document: stable name, binary content, and the
/// declared media type sent to the vision model alongside the payload.
/// Immutable once accepted; owned by the batch for its duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    #[serde(with = "serde_bytes_b64")]
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl UploadedDocument {
    pub fn new(name: &str, bytes: Vec<u8>, media_type: &str) -> Self {
        Self {
            name: name.to_string(),
            bytes,
            media_type: media_type.to_string(),
        }
    }

    /// Accept a document whose caller did not declare a media type,
    /// inferring it from the file name extension.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Self {
        let media_type = mime_guess::from_path(name)
            .first_raw()
            .unwrap_or(OCTET_STREAM);
        Self::new(name, bytes, media_type)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == "application/pdf"
    }
}

/// Base64 (de)serialization for the binary payload, so a serialized
/// document stays line-oriented and diffable in fixtures.
mod serde_bytes_b64 {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}
