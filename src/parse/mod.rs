pub mod name_parser;

pub use name_parser::{month_label, parse_date, parse_date_on, tour_name};
