pub mod book;
pub mod config_io;
pub mod file_workbook;
pub mod lock;
pub mod memory;
pub mod recovery;
pub mod watcher;
pub mod workbook;
