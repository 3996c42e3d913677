use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::io::workbook::{Workbook, WorkbookError};
use crate::model::sheet::SheetId;

/// Which side of the target the dragged sheet is dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Before,
    After,
}

impl Edge {
    /// Edge for a pointer at `pointer_y` over an item spanning
    /// `top..top + height`: above the midpoint is `Before`, otherwise `After`.
    pub fn from_pointer(pointer_y: f64, top: f64, height: f64) -> Edge {
        if pointer_y - (top + height / 2.0) > 0.0 {
            Edge::After
        } else {
            Edge::Before
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Before => f.write_str("Before"),
            Edge::After => f.write_str("After"),
        }
    }
}

/// What a reorder did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReorderOutcome {
    Moved { from: usize, to: usize },
    /// Already in place; nothing was written
    Unchanged,
}

/// Final index for `source` when dropped at `edge` of `target`, or `None`
/// when the drop would leave the order unchanged.
///
/// Positions are final indices: once the source is lifted out, every sheet
/// after it moves up by one, so a drop past the source lands one lower.
pub fn plan_position(source: usize, target: usize, edge: Edge, count: usize) -> Option<usize> {
    if count == 0 || source == target {
        return None;
    }
    let mut desired = target + usize::from(edge == Edge::After);
    if source == desired || (edge == Edge::Before && source + 1 == target) {
        return None;
    }
    if source < target {
        desired -= 1;
    }
    let desired = desired.min(count - 1);
    (desired != source).then_some(desired)
}

/// Move `source` next to `target`.
///
/// Positions are re-read right before planning; positions from an earlier
/// snapshot are never trusted. At most one position write is issued. The
/// caller must refresh afterwards whatever the result, since a move renumbers
/// siblings that only a fresh read can reveal.
pub fn reorder<W: Workbook + ?Sized>(
    workbook: &mut W,
    source: &SheetId,
    target: &SheetId,
    edge: Edge,
) -> Result<ReorderOutcome, PanelError> {
    let sheets = workbook.list_sheets().map_err(PanelError::Read)?;
    let position_of = |id: &SheetId| {
        sheets
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.position)
            .ok_or_else(|| PanelError::Read(WorkbookError::NotFound(id.clone())))
    };
    let from = position_of(source)?;
    let target_position = position_of(target)?;

    let Some(to) = plan_position(from, target_position, edge, sheets.len()) else {
        tracing::debug!(sheet = %source, target = %target, %edge, "reorder is a no-op");
        return Ok(ReorderOutcome::Unchanged);
    };

    workbook.set_position(source, to).map_err(PanelError::Write)?;
    workbook.sync().map_err(PanelError::Write)?;
    tracing::info!(sheet = %source, from, to, "sheet moved");
    Ok(ReorderOutcome::Moved { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::MemoryWorkbook;
    use pretty_assertions::assert_eq;

    fn workbook() -> MemoryWorkbook {
        MemoryWorkbook::with_sheets(&[("A", None), ("B", None), ("C", None), ("D", None)])
    }

    fn order(wb: &mut MemoryWorkbook) -> Vec<String> {
        wb.list_sheets().unwrap().into_iter().map(|s| s.name).collect()
    }

    fn id(n: usize) -> SheetId {
        SheetId(format!("sheet-{}", n))
    }

    #[test]
    fn pointer_above_midpoint_is_before() {
        assert_eq!(Edge::from_pointer(10.0, 10.0, 20.0), Edge::Before);
        assert_eq!(Edge::from_pointer(20.0, 10.0, 20.0), Edge::Before);
        assert_eq!(Edge::from_pointer(20.5, 10.0, 20.0), Edge::After);
        assert_eq!(Edge::from_pointer(29.0, 10.0, 20.0), Edge::After);
    }

    #[test]
    fn plan_noops() {
        // Already right after the target
        assert_eq!(plan_position(3, 2, Edge::After, 4), None);
        // Already right before the target
        assert_eq!(plan_position(1, 2, Edge::Before, 4), None);
        // Onto itself
        assert_eq!(plan_position(2, 2, Edge::After, 4), None);
        assert_eq!(plan_position(0, 0, Edge::Before, 4), None);
        assert_eq!(plan_position(0, 0, Edge::Before, 0), None);
    }

    #[test]
    fn plan_moves_up_and_down() {
        assert_eq!(plan_position(3, 0, Edge::Before, 4), Some(0));
        assert_eq!(plan_position(3, 0, Edge::After, 4), Some(1));
        assert_eq!(plan_position(0, 2, Edge::Before, 4), Some(1));
        assert_eq!(plan_position(0, 2, Edge::After, 4), Some(2));
        assert_eq!(plan_position(0, 3, Edge::After, 4), Some(3));
    }

    #[test]
    fn moves_up_before_target() {
        let mut wb = workbook();
        let outcome = reorder(&mut wb, &id(4), &id(2), Edge::Before).unwrap();
        assert_eq!(outcome, ReorderOutcome::Moved { from: 3, to: 1 });
        assert_eq!(order(&mut wb), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn moves_down_after_target() {
        let mut wb = workbook();
        reorder(&mut wb, &id(1), &id(3), Edge::After).unwrap();
        assert_eq!(order(&mut wb), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn moves_down_before_target() {
        let mut wb = workbook();
        reorder(&mut wb, &id(1), &id(4), Edge::Before).unwrap();
        assert_eq!(order(&mut wb), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn adjacent_after_issues_no_write() {
        let mut wb = workbook();
        // B sits at position 1 == A.position + 1
        let outcome = reorder(&mut wb, &id(2), &id(1), Edge::After).unwrap();
        assert_eq!(outcome, ReorderOutcome::Unchanged);
        assert_eq!(wb.write_calls(), 0);
        assert!(wb.committed().is_empty());
    }

    #[test]
    fn first_before_first_stays_at_zero() {
        let mut wb = workbook();
        let outcome = reorder(&mut wb, &id(1), &id(1), Edge::Before).unwrap();
        assert_eq!(outcome, ReorderOutcome::Unchanged);
        assert_eq!(order(&mut wb)[0], "A");
    }

    #[test]
    fn last_after_last_clamps_to_end() {
        let mut wb = workbook();
        let outcome = reorder(&mut wb, &id(1), &id(4), Edge::After).unwrap();
        assert_eq!(outcome, ReorderOutcome::Moved { from: 0, to: 3 });
        assert_eq!(order(&mut wb), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn uses_fresh_positions() {
        let mut wb = workbook();
        // Someone else moved D to the front since our last look
        wb.external_edit(|book| {
            let d = book.sheets.remove(3);
            book.sheets.insert(0, d);
        });
        // D is now right before A: dropping it before A is a no-op
        let outcome = reorder(&mut wb, &id(4), &id(1), Edge::Before).unwrap();
        assert_eq!(outcome, ReorderOutcome::Unchanged);
    }

    #[test]
    fn read_failure_is_reported_without_writing() {
        let mut wb = workbook();
        wb.fail_next_read("offline");
        let err = reorder(&mut wb, &id(4), &id(1), Edge::Before).unwrap_err();
        assert!(matches!(err, PanelError::Read(_)));
        assert_eq!(wb.write_calls(), 0);
    }

    #[test]
    fn vanished_sheet_is_a_read_failure() {
        let mut wb = workbook();
        let err = reorder(&mut wb, &SheetId::new("gone"), &id(1), Edge::Before).unwrap_err();
        assert!(matches!(err, PanelError::Read(WorkbookError::NotFound(_))));
    }

    #[test]
    fn rejected_write_is_a_write_failure() {
        let mut wb = workbook();
        wb.fail_next_sync("host rejected");
        let err = reorder(&mut wb, &id(4), &id(1), Edge::Before).unwrap_err();
        assert!(matches!(err, PanelError::Write(_)));
        assert_eq!(order(&mut wb), vec!["A", "B", "C", "D"]);
    }
}
