use std::collections::HashSet;

use chrono::NaiveDate;

use crate::io::workbook::{Workbook, WorkbookError};
use crate::model::sheet::{RawSheet, Sheet, SheetId, Snapshot};
use crate::model::status::StatusPalette;
use crate::parse::name_parser::parse_date_on;

/// Normalize one raw sheet: decode the color, parse the name's date
pub fn build_sheet(raw: RawSheet, palette: &StatusPalette, reference: NaiveDate) -> Sheet {
    let status = palette.status_of(raw.tab_color.as_deref());
    let date = parse_date_on(&raw.name, reference);
    Sheet {
        id: raw.id,
        name: raw.name,
        status,
        tab_color: raw.tab_color,
        date,
        position: raw.position,
    }
}

/// Build a snapshot from a batch read. Sheets are kept in position order.
pub fn build_snapshot(raw: Vec<RawSheet>, palette: &StatusPalette, reference: NaiveDate) -> Snapshot {
    let mut sheets: Vec<Sheet> = raw
        .into_iter()
        .map(|r| build_sheet(r, palette, reference))
        .collect();
    sheets.sort_by_key(|s| s.position);
    Snapshot {
        sheets,
        reference: Some(reference),
    }
}

/// Fresh batch read of the workbook
pub fn read_snapshot<W: Workbook + ?Sized>(
    workbook: &mut W,
    palette: &StatusPalette,
    reference: NaiveDate,
) -> Result<Snapshot, WorkbookError> {
    let raw = workbook.list_sheets()?;
    Ok(build_snapshot(raw, palette, reference))
}

/// Sheets that appeared or disappeared between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare by id; names are reported in position order
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let old_ids: HashSet<&SheetId> = old.sheets.iter().map(|s| &s.id).collect();
    let new_ids: HashSet<&SheetId> = new.sheets.iter().map(|s| &s.id).collect();
    SnapshotDiff {
        added: new
            .sheets
            .iter()
            .filter(|s| !old_ids.contains(&s.id))
            .map(|s| s.name.clone())
            .collect(),
        removed: old
            .sheets
            .iter()
            .filter(|s| !new_ids.contains(&s.id))
            .map(|s| s.name.clone())
            .collect(),
    }
}
