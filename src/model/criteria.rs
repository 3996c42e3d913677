use serde::Serialize;

use super::sheet::Sheet;
use super::status::StatusFilter;

/// What the user asked to see. Replaced wholesale on every input change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub text_query: String,
    pub status_filter: StatusFilter,
}

impl FilterCriteria {
    pub fn new(text_query: impl Into<String>, status_filter: StatusFilter) -> Self {
        FilterCriteria {
            text_query: text_query.into(),
            status_filter,
        }
    }

    pub fn with_query(&self, text_query: impl Into<String>) -> Self {
        FilterCriteria {
            text_query: text_query.into(),
            status_filter: self.status_filter,
        }
    }

    pub fn with_status(&self, status_filter: StatusFilter) -> Self {
        FilterCriteria {
            text_query: self.text_query.clone(),
            status_filter,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text_query.trim().is_empty() && self.status_filter == StatusFilter::All
    }
}

/// A titled run of sheets produced by the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayGroup {
    pub key: String,
    pub items: Vec<Sheet>,
}
