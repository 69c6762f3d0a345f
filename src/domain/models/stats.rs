use serde::{Deserialize, Serialize};

/// Deduplication and quota figures as computed by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageStats {
    pub total_storage_used_bytes: u64,
    pub original_storage_used_bytes: u64,
    pub storage_savings_bytes: u64,
    pub storage_savings_percentage: f64,
    pub storage_quota_mb: u64,
    pub quota_used_percentage: f64,
}
