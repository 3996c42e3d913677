use crate::io::workbook::WorkbookError;

/// Create-form input problems, reported before any workbook call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("falta el nombre del tour")]
    MissingName,
    #[error("falta seleccionar la plantilla")]
    MissingTemplate,
    #[error("falta la fecha")]
    MissingDate,
    #[error("fecha no válida: {0}")]
    InvalidDate(String),
}

/// Every failure the panel can surface. None is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// A batch read failed; the snapshot was left as it was
    #[error("no se pudieron leer las hojas: {0}")]
    Read(#[source] WorkbookError),
    /// A status, position or create mutation failed
    #[error("no se pudo guardar el cambio: {0}")]
    Write(#[source] WorkbookError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl PanelError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PanelError::Validation(_))
    }
}
