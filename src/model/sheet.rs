use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::Status;

/// Stable external identifier of a sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(pub String);

impl SheetId {
    pub fn new(id: impl Into<String>) -> Self {
        SheetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(s: &str) -> Self {
        SheetId(s.to_string())
    }
}

/// Raw facts about one sheet as returned by a workbook batch read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSheet {
    pub id: SheetId,
    pub name: String,
    pub tab_color: Option<String>,
    pub position: usize,
}

/// Date implied by a trailing `day.month` suffix.
///
/// All fields are zero when the name has no suffix. `year` is zero whenever the
/// month is out of range, even though day and month are still recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SheetDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl SheetDate {
    /// Whether the date resolved to a concrete month and year
    pub fn is_resolved(&self) -> bool {
        self.year != 0 && (1..=12).contains(&self.month)
    }

    /// Key for ascending (year, month, day) ordering
    pub fn sort_key(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

/// One worksheet as perceived by the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    pub status: Status,
    /// Tab color as last read (or written through `set_status`)
    pub tab_color: Option<String>,
    #[serde(flatten)]
    pub date: SheetDate,
    pub position: usize,
}

/// All sheet records taken at one refresh instant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Sheets in workbook position order
    pub sheets: Vec<Sheet>,
    /// Pivot used for year inference
    pub reference: Option<NaiveDate>,
}

impl Snapshot {
    pub fn get(&self, id: &SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_dates() {
        assert!(!SheetDate::default().is_resolved());
        let bad_month = SheetDate {
            day: 3,
            month: 14,
            year: 0,
        };
        assert!(!bad_month.is_resolved());
        let ok = SheetDate {
            day: 3,
            month: 4,
            year: 2025,
        };
        assert!(ok.is_resolved());
    }

    #[test]
    fn zero_year_sorts_first() {
        let undated = SheetDate::default();
        let dated = SheetDate {
            day: 1,
            month: 1,
            year: 2024,
        };
        assert!(undated.sort_key() < dated.sort_key());
    }
}
