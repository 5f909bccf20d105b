// File: src/query.rs
// Purpose: Filters and pagination for project and task listings

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Priority, Status};

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// One page of a listing, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Page 0 is treated as page 1, and a zero page size as 1
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.page_size)
    }

    /// Rows to return
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size.max(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Rows of one page plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            rows,
            total_count,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// `ceil(total_count / page_size)`, 0 for an empty listing
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        u32::try_from(self.total_count.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// Total pages for "Page x of y" labels, never 0
    pub fn display_total_pages(&self) -> u32 {
        self.total_pages().max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Request for the following page, clamped to the last page
    pub fn next(&self) -> PageRequest {
        let last = self.display_total_pages();
        PageRequest::new(self.page.saturating_add(1).min(last), self.page_size)
    }

    /// Request for the preceding page, clamped to the first page
    pub fn previous(&self) -> PageRequest {
        PageRequest::new(self.page.saturating_sub(1), self.page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Trimmed search text, `None` when blank
fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Project listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = normalize_search(Some(text.into()));
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Task listing filter; every set criterion must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    pub project_id: Option<i64>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Only tasks assigned to this user
    pub assignee: Option<Uuid>,
}

impl TaskFilter {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = normalize_search(Some(text.into()));
        self
    }

    pub fn project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assignee(mut self, user_id: Uuid) -> Self {
        self.assignee = Some(user_id);
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.project_id.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }
}

/// Project id and title, for pickers and filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOption {
    pub id: i64,
    pub title: Option<String>,
}
