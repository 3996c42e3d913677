use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the panel event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookEvent {
    /// The workbook file was created, modified or replaced on disk.
    /// Sheets may have been added, removed or reordered.
    Changed,
}

/// Watches a workbook file for outside changes.
pub struct WorkbookWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<WorkbookEvent>,
}

/// Whether an event path refers to the watched workbook file itself
fn is_workbook_path(path: &Path, workbook: &Path) -> bool {
    path.file_name() == workbook.file_name()
}

impl WorkbookWatcher {
    /// Start watching the directory holding `workbook`. Editors usually
    /// replace files by rename, so the directory is watched, not the file.
    pub fn start(workbook: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target: PathBuf = workbook.to_path_buf();
        let dir = match workbook.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if event.paths.iter().any(|p| is_workbook_path(p, &target)) {
                    let _ = tx.send(WorkbookEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(WorkbookWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Bursts of events collapse into one.
    pub fn poll(&self) -> Option<WorkbookEvent> {
        let mut changed = None;
        while let Ok(evt) = self.rx.try_recv() {
            changed = Some(evt);
        }
        changed
    }
}
