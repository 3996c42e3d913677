use crate::io::workbook::{Workbook, WorkbookError};
use crate::model::sheet::{SheetId, Snapshot};
use crate::model::status::{Status, StatusPalette};

/// Write a sheet's status through to its tab color, then patch the snapshot.
///
/// The in-memory record changes only after the workbook confirms the write;
/// on failure the snapshot is left exactly as it was. No refresh happens
/// here: the change is local to one record.
pub fn set_status<W: Workbook + ?Sized>(
    workbook: &mut W,
    snapshot: &mut Snapshot,
    palette: &StatusPalette,
    id: &SheetId,
    status: Status,
) -> Result<(), WorkbookError> {
    let color = palette.color_of(status);
    workbook.set_tab_color(id, color)?;
    workbook.sync()?;

    if let Some(sheet) = snapshot.get_mut(id) {
        sheet.status = status;
        sheet.tab_color = color.map(str::to_string);
    }
    tracing::debug!(sheet = %id, status = %status, "status written");
    Ok(())
}
