use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{format::format_bytes, models::preview::PreviewKind};

pub type FileId = i64;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A stored file as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    #[serde(rename = "size_bytes")]
    pub size: u64,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

impl FileRecord {
    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::from_mime(&self.mime_type)
    }

    /// Upper-cased mime subtype, e.g. `PDF` for `application/pdf`.
    pub fn type_badge(&self) -> String {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty())
            .map(|subtype| subtype.to_uppercase())
            .unwrap_or_else(|| "FILE".to_string())
    }

    pub fn display_size(&self) -> String {
        format_bytes(self.size)
    }

    pub fn display_created_at(&self) -> String {
        self.created_at.format("%b %-d, %Y %H:%M").to_string()
    }
}

/// Binary payload handed to the upload controller.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Vec<u8>, filename: String, mime_type: Option<String>) -> Self {
        Self {
            content,
            filename,
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(mime_type: &str) -> FileRecord {
        FileRecord {
            id: 7,
            filename: "report.pdf".to_string(),
            size: 1536,
            mime_type: mime_type.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap(),
        }
    }

    #[test]
    fn deserializes_backend_listing_entry() {
        let json = r#"{"id":3,"filename":"a.txt","size_bytes":0,"mime_type":"text/plain","created_at":"2024-01-02T03:04:05+02:00"}"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.size, 0);
        assert_eq!(record.created_at, Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap());
    }

    #[test]
    fn type_badge_falls_back_for_unknown_mime() {
        assert_eq!(record("application/pdf").type_badge(), "PDF");
        assert_eq!(record("").type_badge(), "FILE");
        assert_eq!(record("weird").type_badge(), "FILE");
    }

    #[test]
    fn display_helpers() {
        let r = record("application/pdf");
        assert_eq!(r.display_size(), "1.5 KB");
        assert_eq!(r.display_created_at(), "Mar 5, 2024 14:07");
    }

    #[test]
    fn file_data_defaults_mime_type() {
        let data = FileData::new(vec![1, 2, 3], "x.bin".into(), Some("  ".into()));
        assert_eq!(data.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(data.size(), 3);
    }
}
