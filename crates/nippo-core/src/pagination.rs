//! Page arithmetic for list screens.

use serde::Serialize;

/// A one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Build a request, clamping `page` and `per_page` to at least 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// Page position handed to list views for rendering the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            last_page: total.div_ceil(request.per_page).max(1),
        }
    }
}
