pub mod config;
pub mod criteria;
pub mod sheet;
pub mod status;

pub use config::*;
pub use criteria::*;
pub use sheet::*;
pub use status::*;
