use serde::{Deserialize, Serialize};

use crate::domain::models::file::FileRecord;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalFiles")]
    pub total_files: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_files: 0,
        }
    }
}

impl Pagination {
    /// Enforces `total_pages >= 1` and `1 <= current_page <= total_pages`.
    /// The backend reports zero pages for an empty result set.
    pub fn normalized(self) -> Self {
        let total_pages = self.total_pages.max(1);
        Self {
            current_page: self.current_page.clamp(1, total_pages),
            total_pages,
            total_files: self.total_files,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }
}

/// One page of a listing or search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePage {
    pub files: Vec<FileRecord>,
    pub pagination: Pagination,
}
