use serde::{Deserialize, Serialize};

use crate::io::workbook::{Mutation, WorkbookError};
use crate::model::sheet::{RawSheet, SheetId};
use crate::util::unicode::names_eq_case_insensitive;

/// Committed workbook contents: the shape of workbook.toml.
///
/// `sheets` order is position order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetBook {
    #[serde(default)]
    pub workbook: BookMeta,
    #[serde(default)]
    pub sheets: Vec<BookSheet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<SheetId>,
    /// Next numeric suffix for generated sheet ids
    #[serde(default = "default_next_id")]
    pub next_id: u64,
}

fn default_next_id() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSheet {
    pub id: SheetId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_color: Option<String>,
    #[serde(default = "default_true")]
    pub show_headings: bool,
}

fn default_true() -> bool {
    true
}

impl SheetBook {
    /// Build a book from `(name, tab_color)` pairs, ids `sheet-1`, `sheet-2`, ...
    pub fn from_names(sheets: &[(&str, Option<&str>)]) -> Self {
        let mut book = SheetBook {
            workbook: BookMeta {
                active: None,
                next_id: 1,
            },
            sheets: Vec::new(),
        };
        for (name, color) in sheets {
            let id = book.allocate_id();
            book.sheets.push(BookSheet {
                id,
                name: name.to_string(),
                tab_color: color.map(str::to_string),
                show_headings: true,
            });
        }
        book
    }

    /// Reserve a fresh sheet id
    pub fn allocate_id(&mut self) -> SheetId {
        let next = self.workbook.next_id.max(1);
        self.workbook.next_id = next + 1;
        SheetId(format!("sheet-{}", next))
    }

    /// Snapshot of raw facts, positions from array order
    pub fn raw_sheets(&self) -> Vec<RawSheet> {
        self.sheets
            .iter()
            .enumerate()
            .map(|(position, s)| RawSheet {
                id: s.id.clone(),
                name: s.name.clone(),
                tab_color: s.tab_color.clone(),
                position,
            })
            .collect()
    }

    pub fn index_of(&self, id: &SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| &s.id == id)
    }

    /// Apply a batch to a copy of this book. Either every mutation applies
    /// or the error of the first failing one is returned and `self` is untouched.
    pub fn apply_batch(&self, batch: &[Mutation]) -> Result<SheetBook, WorkbookError> {
        let mut next = self.clone();
        for mutation in batch {
            next.apply(mutation)?;
        }
        Ok(next)
    }

    /// Apply a single mutation in place
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), WorkbookError> {
        match mutation {
            Mutation::Activate { id } => {
                self.require(id)?;
                self.workbook.active = Some(id.clone());
            }
            Mutation::SetTabColor { id, color } => {
                let idx = self.require(id)?;
                self.sheets[idx].tab_color = color
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string);
            }
            Mutation::SetPosition { id, position } => {
                let idx = self.require(id)?;
                let count = self.sheets.len();
                if *position >= count {
                    return Err(WorkbookError::InvalidPosition {
                        position: *position,
                        count,
                    });
                }
                let sheet = self.sheets.remove(idx);
                self.sheets.insert(*position, sheet);
            }
            Mutation::Rename { id, name } => {
                let idx = self.require(id)?;
                let name = self.check_name(name, Some(id))?;
                self.sheets[idx].name = name;
            }
            Mutation::SetShowHeadings { id, show } => {
                let idx = self.require(id)?;
                self.sheets[idx].show_headings = *show;
            }
            Mutation::Add { id, name } => {
                if self.index_of(id).is_some() {
                    return Err(WorkbookError::Rejected(format!("sheet id {} already in use", id)));
                }
                let name = self.check_name(name, None)?;
                self.sheets.push(BookSheet {
                    id: id.clone(),
                    name,
                    tab_color: None,
                    show_headings: true,
                });
            }
            Mutation::Copy { id, template } => {
                if self.index_of(id).is_some() {
                    return Err(WorkbookError::Rejected(format!("sheet id {} already in use", id)));
                }
                let idx = self.require(template)?;
                let source = self.sheets[idx].clone();
                let name = self.unique_copy_name(&source.name);
                self.sheets.push(BookSheet {
                    id: id.clone(),
                    name,
                    tab_color: source.tab_color,
                    show_headings: source.show_headings,
                });
            }
        }
        Ok(())
    }

    fn require(&self, id: &SheetId) -> Result<usize, WorkbookError> {
        self.index_of(id)
            .ok_or_else(|| WorkbookError::NotFound(id.clone()))
    }

    fn name_taken(&self, name: &str, except: Option<&SheetId>) -> bool {
        self.sheets
            .iter()
            .any(|s| Some(&s.id) != except && names_eq_case_insensitive(&s.name, name))
    }

    fn check_name(&self, name: &str, except: Option<&SheetId>) -> Result<String, WorkbookError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        if self.name_taken(name, except) {
            return Err(WorkbookError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// `"<base> (2)"`, `"<base> (3)"`, ... whichever is free first
    fn unique_copy_name(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{} ({})", base, n))
            .find(|candidate| !self.name_taken(candidate, None))
            .unwrap_or_else(|| base.to_string())
    }
}
