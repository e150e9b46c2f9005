//! Report module - printing and exporting conversion results

pub mod csv_export;
pub mod printer;

pub use csv_export::*;
pub use printer::*;
