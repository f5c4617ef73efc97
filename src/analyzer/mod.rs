// Analyzer module: customer grouping, retention scoring and headline indicators.

pub mod indicators;
pub mod lifecycle;
pub mod retention;

// Re-export the main Analyzer implementation for ease of use.
pub use indicators::{RetentionIndicators, RetentionKpis, StatusCount};
pub use retention::{analyze, Analyzer, AnalyzerImpl};
