use crate::io::book::SheetBook;
use crate::io::workbook::{Mutation, Workbook, WorkbookError};
use crate::model::sheet::{RawSheet, SheetId};

/// In-process workbook with fault injection.
///
/// Used by the test suites and `tp demo`. Failures are one-shot: a failed
/// sync discards its batch, exactly as a host rejecting a batch would.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    book: SheetBook,
    pending: Vec<Mutation>,
    committed: Vec<Mutation>,
    fail_next_read: Option<String>,
    fail_next_sync: Option<String>,
    reads: usize,
    queued: usize,
}

impl MemoryWorkbook {
    pub fn new(book: SheetBook) -> Self {
        MemoryWorkbook {
            book,
            ..Default::default()
        }
    }

    /// Workbook with `(name, tab_color)` sheets in order
    pub fn with_sheets(sheets: &[(&str, Option<&str>)]) -> Self {
        Self::new(SheetBook::from_names(sheets))
    }

    pub fn book(&self) -> &SheetBook {
        &self.book
    }

    /// Make the next `list_sheets` call fail
    pub fn fail_next_read(&mut self, message: &str) {
        self.fail_next_read = Some(message.to_string());
    }

    /// Make the next `sync` call reject its batch
    pub fn fail_next_sync(&mut self, message: &str) {
        self.fail_next_sync = Some(message.to_string());
    }

    /// Every mutation committed so far, in order
    pub fn committed(&self) -> &[Mutation] {
        &self.committed
    }

    /// Number of batch reads served (including failed ones)
    pub fn read_count(&self) -> usize {
        self.reads
    }

    /// Number of mutation calls ever issued (queued, committed or not)
    pub fn write_calls(&self) -> usize {
        self.queued
    }

    /// Replace committed state behind the panel's back
    pub fn external_edit(&mut self, edit: impl FnOnce(&mut SheetBook)) {
        edit(&mut self.book);
    }

    fn queue(&mut self, mutation: Mutation) {
        self.queued += 1;
        self.pending.push(mutation);
    }
}

impl Workbook for MemoryWorkbook {
    fn list_sheets(&mut self) -> Result<Vec<RawSheet>, WorkbookError> {
        self.reads += 1;
        if let Some(message) = self.fail_next_read.take() {
            return Err(WorkbookError::Rejected(message));
        }
        Ok(self.book.raw_sheets())
    }

    fn activate(&mut self, id: &SheetId) -> Result<(), WorkbookError> {
        self.queue(Mutation::Activate { id: id.clone() });
        Ok(())
    }

    fn set_tab_color(&mut self, id: &SheetId, color: Option<&str>) -> Result<(), WorkbookError> {
        self.queue(Mutation::SetTabColor {
            id: id.clone(),
            color: color.map(str::to_string),
        });
        Ok(())
    }

    fn set_position(&mut self, id: &SheetId, position: usize) -> Result<(), WorkbookError> {
        self.queue(Mutation::SetPosition {
            id: id.clone(),
            position,
        });
        Ok(())
    }

    fn rename(&mut self, id: &SheetId, name: &str) -> Result<(), WorkbookError> {
        self.queue(Mutation::Rename {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_show_headings(&mut self, id: &SheetId, show: bool) -> Result<(), WorkbookError> {
        self.queue(Mutation::SetShowHeadings {
            id: id.clone(),
            show,
        });
        Ok(())
    }

    fn add_sheet(&mut self, name: &str) -> Result<SheetId, WorkbookError> {
        let id = self.book.allocate_id();
        self.queue(Mutation::Add {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn copy_sheet(&mut self, template: &SheetId) -> Result<SheetId, WorkbookError> {
        let id = self.book.allocate_id();
        self.queue(Mutation::Copy {
            id: id.clone(),
            template: template.clone(),
        });
        Ok(id)
    }

    fn sync(&mut self) -> Result<(), WorkbookError> {
        let batch = std::mem::take(&mut self.pending);
        if let Some(message) = self.fail_next_sync.take() {
            return Err(WorkbookError::Rejected(message));
        }
        let next = self.book.apply_batch(&batch)?;
        self.book = next;
        self.committed.extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_invisible_until_sync() {
        let mut wb = MemoryWorkbook::with_sheets(&[("A", None), ("B", None)]);
        wb.set_tab_color(&"sheet-1".into(), Some("#FF0000")).unwrap();
        assert_eq!(wb.list_sheets().unwrap()[0].tab_color, None);
        wb.sync().unwrap();
        assert_eq!(wb.list_sheets().unwrap()[0].tab_color.as_deref(), Some("#FF0000"));
    }

    #[test]
    fn injected_sync_failure_discards_batch() {
        let mut wb = MemoryWorkbook::with_sheets(&[("A", None), ("B", None)]);
        wb.fail_next_sync("host busy");
        wb.set_position(&"sheet-1".into(), 1).unwrap();
        assert!(wb.sync().is_err());
        assert!(wb.committed().is_empty());
        // Nothing left over for the next sync
        wb.sync().unwrap();
        assert_eq!(wb.list_sheets().unwrap()[0].name, "A");
    }

    #[test]
    fn injected_read_failure_is_one_shot() {
        let mut wb = MemoryWorkbook::with_sheets(&[("A", None)]);
        wb.fail_next_read("offline");
        assert!(wb.list_sheets().is_err());
        assert!(wb.list_sheets().is_ok());
        assert_eq!(wb.read_count(), 2);
    }
}
