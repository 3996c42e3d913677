use crate::error::PanelError;
use crate::io::workbook::Workbook;

/// Push the headings flag to every sheet in one batch. Returns how many
/// sheets were touched.
pub fn apply_headings<W: Workbook + ?Sized>(workbook: &mut W, show: bool) -> Result<usize, PanelError> {
    let sheets = workbook.list_sheets().map_err(PanelError::Read)?;
    for sheet in &sheets {
        workbook
            .set_show_headings(&sheet.id, show)
            .map_err(PanelError::Write)?;
    }
    workbook.sync().map_err(PanelError::Write)?;
    tracing::info!(show, sheets = sheets.len(), "headings applied");
    Ok(sheets.len())
}
