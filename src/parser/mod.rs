// Parser module: turns raw dataset text into order records.

pub mod orders_csv;

pub use orders_csv::{OrdersCsvParser, Parser};
