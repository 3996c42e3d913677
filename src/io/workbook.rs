use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::io::lock::LockError;
use crate::model::sheet::{RawSheet, SheetId};

/// Error type for workbook reads and writes
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("no workbook.toml found")]
    NotAWorkbook,
    #[error("sheet not found: {0}")]
    NotFound(SheetId),
    #[error("a sheet named '{0}' already exists")]
    DuplicateName(String),
    #[error("sheet name must not be empty")]
    EmptyName,
    #[error("invalid position {position}: workbook has {count} sheets")]
    InvalidPosition { position: usize, count: usize },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse workbook: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize workbook: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error(transparent)]
    LockError(#[from] LockError),
    #[error("workbook rejected the request: {0}")]
    Rejected(String),
}

/// A queued workbook mutation. Nothing is visible to reads until `sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Activate { id: SheetId },
    SetTabColor { id: SheetId, color: Option<String> },
    SetPosition { id: SheetId, position: usize },
    Rename { id: SheetId, name: String },
    SetShowHeadings { id: SheetId, show: bool },
    Add { id: SheetId, name: String },
    Copy { id: SheetId, template: SheetId },
}

impl Mutation {
    /// The sheet this mutation targets (the new sheet for add/copy)
    pub fn sheet_id(&self) -> &SheetId {
        match self {
            Mutation::Activate { id }
            | Mutation::SetTabColor { id, .. }
            | Mutation::SetPosition { id, .. }
            | Mutation::Rename { id, .. }
            | Mutation::SetShowHeadings { id, .. }
            | Mutation::Add { id, .. }
            | Mutation::Copy { id, .. } => id,
        }
    }

    pub fn sheet_id_mut(&mut self) -> &mut SheetId {
        match self {
            Mutation::Activate { id }
            | Mutation::SetTabColor { id, .. }
            | Mutation::SetPosition { id, .. }
            | Mutation::Rename { id, .. }
            | Mutation::SetShowHeadings { id, .. }
            | Mutation::Add { id, .. }
            | Mutation::Copy { id, .. } => id,
        }
    }

    /// True for mutations that create a sheet
    pub fn creates_sheet(&self) -> bool {
        matches!(self, Mutation::Add { .. } | Mutation::Copy { .. })
    }
}

/// The host workbook as the panel sees it.
///
/// Setters queue work; `sync` commits the queued batch all-or-nothing. Reads
/// always reflect committed state, so a read issued after a successful
/// `sync` sees every queued change.
pub trait Workbook {
    /// Batch read of every sheet, in position order
    fn list_sheets(&mut self) -> Result<Vec<RawSheet>, WorkbookError>;

    fn activate(&mut self, id: &SheetId) -> Result<(), WorkbookError>;

    /// `None` clears the tab color
    fn set_tab_color(&mut self, id: &SheetId, color: Option<&str>) -> Result<(), WorkbookError>;

    /// Move a sheet so that it ends up at zero-based index `position`.
    /// Every sheet between the old and new index shifts by one.
    fn set_position(&mut self, id: &SheetId, position: usize) -> Result<(), WorkbookError>;

    fn rename(&mut self, id: &SheetId, name: &str) -> Result<(), WorkbookError>;

    fn set_show_headings(&mut self, id: &SheetId, show: bool) -> Result<(), WorkbookError>;

    /// Append a blank sheet; returns its id
    fn add_sheet(&mut self, name: &str) -> Result<SheetId, WorkbookError>;

    /// Append a copy of `template` under a generated unique name; returns its id
    fn copy_sheet(&mut self, template: &SheetId) -> Result<SheetId, WorkbookError>;

    /// Commit queued mutations
    fn sync(&mut self) -> Result<(), WorkbookError>;
}

impl<W: Workbook + ?Sized> Workbook for Box<W> {
    fn list_sheets(&mut self) -> Result<Vec<RawSheet>, WorkbookError> {
        (**self).list_sheets()
    }

    fn activate(&mut self, id: &SheetId) -> Result<(), WorkbookError> {
        (**self).activate(id)
    }

    fn set_tab_color(&mut self, id: &SheetId, color: Option<&str>) -> Result<(), WorkbookError> {
        (**self).set_tab_color(id, color)
    }

    fn set_position(&mut self, id: &SheetId, position: usize) -> Result<(), WorkbookError> {
        (**self).set_position(id, position)
    }

    fn rename(&mut self, id: &SheetId, name: &str) -> Result<(), WorkbookError> {
        (**self).rename(id, name)
    }

    fn set_show_headings(&mut self, id: &SheetId, show: bool) -> Result<(), WorkbookError> {
        (**self).set_show_headings(id, show)
    }

    fn add_sheet(&mut self, name: &str) -> Result<SheetId, WorkbookError> {
        (**self).add_sheet(name)
    }

    fn copy_sheet(&mut self, template: &SheetId) -> Result<SheetId, WorkbookError> {
        (**self).copy_sheet(template)
    }

    fn sync(&mut self) -> Result<(), WorkbookError> {
        (**self).sync()
    }
}
