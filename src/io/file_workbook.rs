use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::io::book::SheetBook;
use crate::io::lock::{FileLock, lock_path_for};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::workbook::{Mutation, Workbook, WorkbookError};
use crate::model::sheet::{RawSheet, SheetId};
use crate::model::status::SYSTEM_COLOR;

/// File name looked for by [`discover_workbook`]
pub const WORKBOOK_FILE: &str = "workbook.toml";

/// Workbook stored as a TOML document on disk.
///
/// Setters only queue. `sync` locks the file, re-reads it so edits made by
/// other processes are kept, applies the batch and writes the result
/// atomically. A batch that can't be committed is appended to the recovery
/// log and dropped.
#[derive(Debug)]
pub struct FileWorkbook {
    path: PathBuf,
    pending: Vec<Mutation>,
    /// Next id suffix handed out locally; ids stay unique across batches
    next_id: Option<u64>,
}

/// Walk up from `start` looking for a `workbook.toml`.
pub fn discover_workbook(start: &Path) -> Result<PathBuf, WorkbookError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(WORKBOOK_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(WorkbookError::NotAWorkbook);
        }
    }
}

/// Starter book: the two system templates tours are copied from
pub fn starter_book() -> SheetBook {
    SheetBook::from_names(&[
        ("Plantilla Nacional", Some(SYSTEM_COLOR)),
        ("Plantilla Internacional", Some(SYSTEM_COLOR)),
    ])
}

/// Write a new workbook file. Refuses to overwrite unless `force`.
pub fn init_workbook(path: &Path, book: &SheetBook, force: bool) -> Result<(), WorkbookError> {
    if path.exists() && !force {
        return Err(WorkbookError::Rejected(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    write_book(path, book)
}

fn read_book(path: &Path) -> Result<SheetBook, WorkbookError> {
    let text = fs::read_to_string(path).map_err(|e| WorkbookError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

fn write_book(path: &Path, book: &SheetBook) -> Result<(), WorkbookError> {
    let text = toml::to_string(book)?;
    recovery::atomic_write(path, text.as_bytes()).map_err(|e| WorkbookError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl FileWorkbook {
    /// Open an existing workbook file
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        if !path.is_file() {
            return Err(WorkbookError::NotAWorkbook);
        }
        Ok(FileWorkbook {
            path: path.to_path_buf(),
            pending: Vec::new(),
            next_id: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full committed contents, including fields the panel doesn't model
    pub fn load(&self) -> Result<SheetBook, WorkbookError> {
        read_book(&self.path)
    }

    /// Reserve an id past both the committed counter and our own reservations
    fn allocate_id(&mut self) -> Result<SheetId, WorkbookError> {
        let committed = self.load()?.workbook.next_id.max(1);
        let next = committed.max(self.next_id.unwrap_or(1));
        self.next_id = Some(next + 1);
        Ok(SheetId(format!("sheet-{}", next)))
    }

    fn commit(&mut self, batch: &mut [Mutation]) -> Result<(), WorkbookError> {
        let _lock = FileLock::acquire_default(&lock_path_for(&self.path))?;
        let book = self.load()?;
        let mut counter = book.workbook.next_id.max(self.next_id.unwrap_or(1));
        for (from, to) in remap_taken_ids(&book, batch, &mut counter) {
            tracing::info!(from = %from, to = %to, "sheet id taken by another writer, remapped");
        }
        let mut next = book.apply_batch(batch)?;
        next.workbook.next_id = next.workbook.next_id.max(counter);
        write_book(&self.path, &next)?;
        self.next_id = Some(counter);
        Ok(())
    }
}

/// Give every sheet created by `batch` whose id is already in `book` (or
/// created earlier in the batch) a fresh id from `counter`, and rewrite the
/// later mutations that refer to it. Returns the `(old, new)` pairs.
fn remap_taken_ids(
    book: &SheetBook,
    batch: &mut [Mutation],
    counter: &mut u64,
) -> Vec<(SheetId, SheetId)> {
    let mut created: HashSet<SheetId> = HashSet::new();
    let mut remapped: HashMap<SheetId, SheetId> = HashMap::new();
    let mut pairs = Vec::new();

    for mutation in batch.iter_mut() {
        if let Mutation::Copy { template, .. } = mutation {
            if let Some(to) = remapped.get(&*template) {
                *template = to.clone();
            }
        }
        let creates = mutation.creates_sheet();
        let id = mutation.sheet_id_mut();
        if creates {
            if book.index_of(id).is_some() || created.contains(&*id) {
                let fresh = loop {
                    let candidate = SheetId(format!("sheet-{}", *counter));
                    *counter += 1;
                    if book.index_of(&candidate).is_none() && !created.contains(&candidate) {
                        break candidate;
                    }
                };
                pairs.push((id.clone(), fresh.clone()));
                remapped.insert(id.clone(), fresh.clone());
                *id = fresh;
            }
            created.insert(id.clone());
        } else if let Some(to) = remapped.get(&*id) {
            *id = to.clone();
        }
    }
    pairs
}

impl Workbook for FileWorkbook {
    fn list_sheets(&mut self) -> Result<Vec<RawSheet>, WorkbookError> {
        Ok(self.load()?.raw_sheets())
    }

    fn activate(&mut self, id: &SheetId) -> Result<(), WorkbookError> {
        self.pending.push(Mutation::Activate { id: id.clone() });
        Ok(())
    }

    fn set_tab_color(&mut self, id: &SheetId, color: Option<&str>) -> Result<(), WorkbookError> {
        self.pending.push(Mutation::SetTabColor {
            id: id.clone(),
            color: color.map(str::to_string),
        });
        Ok(())
    }

    fn set_position(&mut self, id: &SheetId, position: usize) -> Result<(), WorkbookError> {
        self.pending.push(Mutation::SetPosition {
            id: id.clone(),
            position,
        });
        Ok(())
    }

    fn rename(&mut self, id: &SheetId, name: &str) -> Result<(), WorkbookError> {
        self.pending.push(Mutation::Rename {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_show_headings(&mut self, id: &SheetId, show: bool) -> Result<(), WorkbookError> {
        self.pending.push(Mutation::SetShowHeadings {
            id: id.clone(),
            show,
        });
        Ok(())
    }

    fn add_sheet(&mut self, name: &str) -> Result<SheetId, WorkbookError> {
        let id = self.allocate_id()?;
        self.pending.push(Mutation::Add {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn copy_sheet(&mut self, template: &SheetId) -> Result<SheetId, WorkbookError> {
        let id = self.allocate_id()?;
        self.pending.push(Mutation::Copy {
            id: id.clone(),
            template: template.clone(),
        });
        Ok(id)
    }

    fn sync(&mut self) -> Result<(), WorkbookError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut batch = std::mem::take(&mut self.pending);
        match self.commit(&mut batch) {
            Ok(()) => {
                tracing::debug!(mutations = batch.len(), path = %self.path.display(), "workbook synced");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, mutations = batch.len(), "workbook sync failed");
                let sheets: IndexSet<&str> = batch.iter().map(|m| m.sheet_id().as_str()).collect();
                let sheets: Vec<&str> = sheets.into_iter().collect();
                recovery::log_recovery(
                    &self.path,
                    RecoveryEntry {
                        timestamp: chrono::Utc::now(),
                        category: RecoveryCategory::Sync,
                        description: "batch not committed".to_string(),
                        fields: vec![
                            ("Workbook".to_string(), self.path.display().to_string()),
                            ("Sheets".to_string(), sheets.join(", ")),
                            ("Error".to_string(), e.to_string()),
                        ],
                        body: serde_json::to_string_pretty(&batch).unwrap_or_default(),
                    },
                );
                Err(e)
            }
        }
    }
}
