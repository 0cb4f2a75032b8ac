//! Page envelope returned by the list endpoint.

use super::profile::ProfileRecord;
use serde::{Deserialize, Serialize};

/// One page of profiles plus the backend's pagination counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfilePage {
    #[serde(default)]
    pub data: Vec<ProfileRecord>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub num_pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

impl ProfilePage {
    /// Locate a record on this page by its identifier
    pub fn find(&self, id: i64) -> Option<&ProfileRecord> {
        self.data.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.find(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Values the pagination control reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PaginationInfo {
    /// Number of pages implied by `total` and `page_size` (at least one)
    pub fn page_count(&self) -> u32 {
        if self.page_size == 0 || self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
