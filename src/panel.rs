use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use toml_edit::DocumentMut;

use crate::error::PanelError;
use crate::io::config_io::{self, ConfigError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::watcher::WorkbookEvent;
use crate::io::workbook::Workbook;
use crate::model::config::PanelConfig;
use crate::model::criteria::{DisplayGroup, FilterCriteria};
use crate::model::sheet::{Sheet, SheetId, Snapshot};
use crate::model::status::{Status, StatusPalette};
use crate::ops::create::{self, CreateRequest};
use crate::ops::headings::apply_headings;
use crate::ops::reorder::{self, Edge, ReorderOutcome};
use crate::ops::snapshot::{SnapshotDiff, diff_snapshots, read_snapshot};
use crate::ops::status_ops;
use crate::ops::view;

pub const LOADING: &str = "Cargando hojas...";
pub const LOADED: &str = "Hojas cargadas.";
pub const REORDER_BLOCKED: &str = "Reordenamiento bloqueado por configuración.";

fn system_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The panel: current snapshot, current criteria and the operations that
/// mutate the workbook.
///
/// Every operation takes `&mut self`, so two workbook mutations can never
/// overlap. Mutations end with a full refresh, except a successful status
/// change which only patches its own record.
pub struct Panel<W: Workbook> {
    workbook: W,
    snapshot: Snapshot,
    criteria: FilterCriteria,
    config: PanelConfig,
    config_doc: DocumentMut,
    config_path: Option<PathBuf>,
    palette: StatusPalette,
    status_line: String,
    today: fn() -> NaiveDate,
}

impl<W: Workbook> Panel<W> {
    /// Panel with an in-memory config that is never persisted
    pub fn new(workbook: W, config: PanelConfig) -> Self {
        let palette = config.status_colors.palette();
        Panel {
            workbook,
            snapshot: Snapshot::default(),
            criteria: FilterCriteria::default(),
            config,
            config_doc: DocumentMut::new(),
            config_path: None,
            palette,
            status_line: String::new(),
            today: system_today,
        }
    }

    /// Panel whose settings are read from (and toggles written back to) `path`
    pub fn with_config_file(workbook: W, path: &Path) -> Result<Self, ConfigError> {
        let (config, doc) = config_io::read_config(path)?;
        let mut panel = Panel::new(workbook, config);
        panel.config_doc = doc;
        panel.config_path = Some(path.to_path_buf());
        Ok(panel)
    }

    /// Replace the reference-date source used for year inference
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn workbook(&self) -> &W {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut W {
        &mut self.workbook
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn palette(&self) -> &StatusPalette {
        &self.palette
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn reference_date(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn sheet(&self, id: &SheetId) -> Option<&Sheet> {
        self.snapshot.get(id)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Current snapshot through the current criteria, grouped
    pub fn groups(&self) -> Vec<DisplayGroup> {
        view::view(&self.snapshot.sheets, &self.criteria)
    }

    /// Current snapshot through the current criteria, in workbook order
    pub fn workbook_order(&self) -> Vec<Sheet> {
        view::workbook_order(&self.snapshot.sheets, &self.criteria)
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    // -----------------------------------------------------------------------
    // Workbook operations
    // -----------------------------------------------------------------------

    /// Replace the snapshot with a fresh read. On failure the previous
    /// snapshot stays on display.
    pub fn refresh(&mut self) -> Result<(), PanelError> {
        self.status_line = LOADING.to_string();
        let reference = self.reference_date();
        match read_snapshot(&mut self.workbook, &self.palette, reference) {
            Ok(snapshot) => {
                tracing::debug!(sheets = snapshot.len(), "snapshot refreshed");
                self.snapshot = snapshot;
                self.status_line = LOADED.to_string();
                Ok(())
            }
            Err(e) => Err(self.fail(PanelError::Read(e))),
        }
    }

    /// Write a status through to the sheet's tab color.
    ///
    /// Success patches the record in place without a refresh. Failure leaves
    /// the record as it was and resynchronizes.
    pub fn set_status(&mut self, id: &SheetId, status: Status) -> Result<(), PanelError> {
        match status_ops::set_status(&mut self.workbook, &mut self.snapshot, &self.palette, id, status) {
            Ok(()) => {
                self.status_line = format!("Estado actualizado: {}", status.label());
                Ok(())
            }
            Err(e) => {
                let _ = self.refresh();
                Err(self.fail(PanelError::Write(e)))
            }
        }
    }

    /// Move `source` to the `edge` side of `target`, then refresh whatever
    /// happened.
    pub fn reorder(
        &mut self,
        source: &SheetId,
        target: &SheetId,
        edge: Edge,
    ) -> Result<ReorderOutcome, PanelError> {
        if !self.config.settings.auto_reorder {
            tracing::debug!(sheet = %source, "reorder refused by settings");
            self.status_line = REORDER_BLOCKED.to_string();
            return Ok(ReorderOutcome::Unchanged);
        }

        self.status_line = format!(
            "Moviendo {} {} {}...",
            self.display_name(source),
            edge,
            self.display_name(target)
        );
        let result = reorder::reorder(&mut self.workbook, source, target, edge);
        let refreshed = self.refresh();
        match result {
            Ok(outcome) => {
                refreshed?;
                Ok(outcome)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Bring a sheet to the front in the host
    pub fn activate(&mut self, id: &SheetId) -> Result<(), PanelError> {
        let result = self
            .workbook
            .activate(id)
            .and_then(|()| self.workbook.sync());
        match result {
            Ok(()) => {
                self.status_line = format!("Hoja activa: {}", self.display_name(id));
                Ok(())
            }
            Err(e) => Err(self.fail(PanelError::Write(e))),
        }
    }

    /// Create a tour sheet, then refresh. Validation failures never reach
    /// the workbook.
    pub fn create_sheet(&mut self, request: &CreateRequest) -> Result<Sheet, PanelError> {
        let reference = self.reference_date();
        match create::create_sheet(&mut self.workbook, &self.palette, reference, request) {
            Ok(sheet) => {
                self.refresh()?;
                self.status_line = format!("Hoja creada: {}", sheet.name);
                Ok(sheet)
            }
            Err(e) if e.is_validation() => Err(self.fail(e)),
            Err(e) => {
                let _ = self.refresh();
                Err(self.fail(e))
            }
        }
    }

    /// Flip the headings setting, push it to every sheet and persist it
    pub fn toggle_headings(&mut self) -> Result<bool, PanelError> {
        let show = !self.config.settings.show_headings;
        let result = apply_headings(&mut self.workbook, show);
        let _ = self.refresh();
        if let Err(e) = result {
            return Err(self.fail(e));
        }
        self.config.settings.show_headings = show;
        self.persist_setting("show_headings", show);
        self.status_line = if show {
            "Encabezados visibles.".to_string()
        } else {
            "Encabezados ocultos.".to_string()
        };
        Ok(show)
    }

    /// Flip the auto-reorder guard and persist it
    pub fn toggle_auto_reorder(&mut self) -> bool {
        let enabled = !self.config.settings.auto_reorder;
        self.config.settings.auto_reorder = enabled;
        self.persist_setting("auto_reorder", enabled);
        self.status_line = if enabled {
            "Reordenamiento automático activado.".to_string()
        } else {
            "Reordenamiento automático desactivado.".to_string()
        };
        enabled
    }

    /// React to an outside change: full refresh, then report which sheets
    /// appeared or disappeared.
    pub fn handle_event(&mut self, event: &WorkbookEvent) -> Result<SnapshotDiff, PanelError> {
        match event {
            WorkbookEvent::Changed => {
                let before = self.snapshot.clone();
                let message = self.status_line.clone();
                self.refresh()?;
                let diff = diff_snapshots(&before, &self.snapshot);
                if diff.is_empty() {
                    // Our own writes echo back through the watcher
                    self.status_line = message;
                } else {
                    tracing::info!(added = ?diff.added, removed = ?diff.removed, "workbook changed");
                    self.status_line = describe_diff(&diff);
                }
                Ok(diff)
            }
        }
    }

    fn display_name(&self, id: &SheetId) -> String {
        self.snapshot
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn persist_setting(&mut self, key: &str, value: bool) {
        config_io::set_setting(&mut self.config_doc, key, value);
        if let Some(path) = &self.config_path {
            if let Err(e) = config_io::write_config(path, &self.config_doc) {
                tracing::warn!(error = %e, key, "could not save setting");
                // The log sits beside panel.toml, same as beside the workbook
                recovery::log_recovery(
                    path,
                    RecoveryEntry {
                        timestamp: chrono::Utc::now(),
                        category: RecoveryCategory::Config,
                        description: format!("setting {} not saved", key),
                        fields: vec![("Error".to_string(), e.to_string())],
                        body: self.config_doc.to_string(),
                    },
                );
            }
        }
    }

    fn fail(&mut self, error: PanelError) -> PanelError {
        tracing::warn!(error = %error, "panel operation failed");
        self.status_line = format!("Error: {}", error);
        error
    }
}

fn describe_diff(diff: &SnapshotDiff) -> String {
    let mut parts = Vec::new();
    if !diff.added.is_empty() {
        parts.push(format!("Hojas agregadas: {}", diff.added.join(", ")));
    }
    if !diff.removed.is_empty() {
        parts.push(format!("Hojas eliminadas: {}", diff.removed.join(", ")));
    }
    parts.join(". ")
}
