// Core structs: OrderRecord, CustomerSummary, Status and the error enums
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One row of the order table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub customer_id: String,
    pub order_id: String,
    pub date: NaiveDateTime,
    pub revenue: f64,
    pub region: String,
}

/// Health classification of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    #[serde(rename = "At Risk")]
    AtRisk,
    Churned,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::AtRisk, Status::Churned];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::AtRisk => "At Risk",
            Status::Churned => "Churned",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-customer retention metrics derived from the in-scope orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    /// Whole days between the batch reference date and the last order.
    pub recency: i64,
    pub frequency: usize,
    pub ltv: f64,
    /// Region of the first order seen for this customer.
    pub region: String,
    pub risk_score: f64,
    pub status: Status,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no order records left to analyze")]
    EmptyInput,
    #[error("churn threshold must be a positive number of days, got {0}")]
    InvalidThreshold(i64),
    #[error("malformed order record {order_id:?}: {reason}")]
    MalformedRecord { order_id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),
    #[error("line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to parse dataset {identity}: {source}")]
    Parse {
        identity: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}
