use chrono::NaiveDate;

use crate::error::{PanelError, ValidationError};
use crate::io::workbook::{Workbook, WorkbookError};
use crate::model::sheet::{RawSheet, Sheet, SheetId};
use crate::model::status::{Status, StatusPalette};
use crate::ops::snapshot::build_sheet;
use crate::parse::name_parser::tour_name;
use crate::util::unicode::names_eq_case_insensitive;

/// Raw create-form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    pub base_name: String,
    /// Template picked by the user (sheet id or name). A selection that
    /// matches no sheet means "start from a blank sheet".
    pub template: Option<String>,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`
    pub date: String,
}

/// Input that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCreate {
    pub base_name: String,
    pub template: String,
    pub date: NaiveDate,
}

impl ValidCreate {
    /// Name of the new sheet, e.g. `"Samaná 05.03"`
    pub fn sheet_name(&self) -> String {
        tour_name(&self.base_name, self.date)
    }
}

/// Parse a form date
pub fn parse_form_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))
}

/// Check the form without touching the workbook
pub fn validate(request: &CreateRequest) -> Result<ValidCreate, ValidationError> {
    let base_name = request.base_name.trim();
    if base_name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    let template = request
        .template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingTemplate)?;
    let date = parse_form_date(&request.date)?;
    Ok(ValidCreate {
        base_name: base_name.to_string(),
        template: template.to_string(),
        date,
    })
}

/// Find the sheet a template selection refers to: exact id first, then name
pub fn resolve_template<'a>(sheets: &'a [RawSheet], selection: &str) -> Option<&'a RawSheet> {
    sheets
        .iter()
        .find(|s| s.id.as_str() == selection)
        .or_else(|| sheets.iter().find(|s| names_eq_case_insensitive(&s.name, selection)))
}

/// Create a tour sheet named `"<base> DD.MM"` with status open.
///
/// A template that resolves is copied (appended at the end) and renamed;
/// otherwise a blank sheet is added. Everything is committed in one batch.
pub fn create_sheet<W: Workbook + ?Sized>(
    workbook: &mut W,
    palette: &StatusPalette,
    reference: NaiveDate,
    request: &CreateRequest,
) -> Result<Sheet, PanelError> {
    let valid = validate(request)?;
    let name = valid.sheet_name();

    let sheets = workbook.list_sheets().map_err(PanelError::Read)?;
    let template = resolve_template(&sheets, &valid.template).map(|s| s.id.clone());

    let id: SheetId = match &template {
        Some(template_id) => {
            let id = workbook.copy_sheet(template_id).map_err(PanelError::Write)?;
            workbook.rename(&id, &name).map_err(PanelError::Write)?;
            id
        }
        None => workbook.add_sheet(&name).map_err(PanelError::Write)?,
    };
    workbook
        .set_tab_color(&id, palette.color_of(Status::Open))
        .map_err(PanelError::Write)?;
    workbook.sync().map_err(PanelError::Write)?;

    // The id can change at commit if another writer took it; names are unique
    let raw = workbook
        .list_sheets()
        .map_err(PanelError::Read)?
        .into_iter()
        .find(|s| names_eq_case_insensitive(&s.name, &name))
        .ok_or_else(|| PanelError::Read(WorkbookError::NotFound(id.clone())))?;
    tracing::info!(sheet = %raw.id, name = %name, from_template = template.is_some(), "sheet created");
    Ok(build_sheet(raw, palette, reference))
}
