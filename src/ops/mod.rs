pub mod create;
pub mod headings;
pub mod reorder;
pub mod snapshot;
pub mod status_ops;
pub mod view;
