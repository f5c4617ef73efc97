//! Customer retention scoring over batch order tables.
//!
//! Orders are loaded from a file or URL, grouped per customer into
//! recency / frequency / lifetime value, scored against a churn threshold and
//! classified as Active, At Risk or Churned.

pub mod analyzer;
pub mod config;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod report;
pub mod source;
pub mod utils;
pub mod winback;

pub use analyzer::{analyze, Analyzer, AnalyzerImpl, RetentionIndicators, RetentionKpis};
pub use config::{load_config, AppConfig};
pub use loader::{Dataset, DatasetLoader};
pub use model::{AnalyzeError, CustomerSummary, OrderRecord, Status};
pub use report::{SegmentReport, StyleToken};
