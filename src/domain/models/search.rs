use serde::{Deserialize, Serialize};

/// Canonical search criteria. A field that is `Some` always carries a
/// non-empty value; absent criteria are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self == &SearchFilters::default()
    }

    /// Query-string pairs for the present criteria, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filename) = &self.filename {
            pairs.push(("filename", filename.clone()));
        }
        if let Some(mime_type) = &self.mime_type {
            pairs.push(("mime_type", mime_type.clone()));
        }
        if let Some(min) = self.min_size_bytes {
            pairs.push(("min_size_bytes", min.to_string()));
        }
        if let Some(max) = self.max_size_bytes {
            pairs.push(("max_size_bytes", max.to_string()));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("start_date", start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("end_date", end.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePreset {
    pub token: &'static str,
    pub label: &'static str,
    pub min_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
}

pub static SIZE_PRESETS: [SizePreset; 4] = [
    SizePreset {
        token: "0-1024",
        label: "Small (< 1KB)",
        min_size_bytes: Some(0),
        max_size_bytes: Some(1024),
    },
    SizePreset {
        token: "1024-102400",
        label: "Medium (1KB - 100KB)",
        min_size_bytes: Some(1024),
        max_size_bytes: Some(102_400),
    },
    SizePreset {
        token: "102400-1048576",
        label: "Large (100KB - 1MB)",
        min_size_bytes: Some(102_400),
        max_size_bytes: Some(1_048_576),
    },
    SizePreset {
        token: "1048576-",
        label: "Very Large (> 1MB)",
        min_size_bytes: Some(1_048_576),
        max_size_bytes: None,
    },
];

pub const ANY_SIZE_TOKEN: &str = "";
pub const CUSTOM_SIZE_TOKEN: &str = "custom";

/// Mime types offered by the type selector, `""` meaning any type.
pub const MIME_TYPE_OPTIONS: [(&str, &str); 9] = [
    ("", "All Types"),
    ("image/jpeg", "JPEG Images"),
    ("image/png", "PNG Images"),
    ("image/gif", "GIF Images"),
    ("application/pdf", "PDF Documents"),
    ("text/plain", "Text Files"),
    ("application/zip", "ZIP Archives"),
    ("video/mp4", "MP4 Videos"),
    ("audio/mpeg", "MP3 Audio"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_are_not_serialized() {
        let filters = SearchFilters {
            filename: Some("report".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            serde_json::json!({ "filename": "report" })
        );
        assert_eq!(filters.to_query_pairs(), vec![("filename", "report".to_string())]);
    }

    #[test]
    fn empty_filters() {
        assert!(SearchFilters::default().is_empty());
        assert!(SearchFilters::default().to_query_pairs().is_empty());
    }
}
