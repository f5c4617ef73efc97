//! Terminal presentation of a retention segment.
//!
//! Nothing in here feeds back into scoring; it only maps analyzer output to
//! text, tables and style tokens.

use crate::analyzer::{RetentionIndicators, RetentionKpis, StatusCount};
use crate::model::{CustomerSummary, Status};
use crate::winback::win_back_list;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use serde::Serialize;

/// Presentation-layer style for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleToken {
    Positive,
    Warning,
    Critical,
}

impl StyleToken {
    pub fn for_status(status: Status) -> Self {
        match status {
            Status::Active => StyleToken::Positive,
            Status::AtRisk => StyleToken::Warning,
            Status::Churned => StyleToken::Critical,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            StyleToken::Positive => "#2ECC71",
            StyleToken::Warning => "#F1C40F",
            StyleToken::Critical => "#E74C3C",
        }
    }

    fn color(&self) -> Color {
        match self {
            StyleToken::Positive => Color::Rgb { r: 0x2e, g: 0xcc, b: 0x71 },
            StyleToken::Warning => Color::Rgb { r: 0xf1, g: 0xc4, b: 0x0f },
            StyleToken::Critical => Color::Rgb { r: 0xe7, g: 0x4c, b: 0x3c },
        }
    }
}

/// Everything shown for one region selection.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub region: String,
    pub churn_threshold_days: i64,
    pub kpis: RetentionKpis,
    pub breakdown: Vec<StatusCount>,
    pub win_back: Vec<CustomerSummary>,
}

impl SegmentReport {
    pub fn build(
        region: &str,
        churn_threshold_days: i64,
        summaries: &[CustomerSummary],
        min_orders_for_loyal: usize,
        top_n: usize,
    ) -> Self {
        Self {
            region: region.to_string(),
            churn_threshold_days,
            kpis: RetentionIndicators::compute(summaries, min_orders_for_loyal),
            breakdown: RetentionIndicators::status_breakdown(summaries),
            win_back: win_back_list(summaries, Some(top_n)).into_iter().cloned().collect(),
        }
    }

    pub fn win_back_refs(&self) -> Vec<&CustomerSummary> {
        self.win_back.iter().collect()
    }

    pub fn render(&self) -> String {
        let k = &self.kpis;
        let mut out = format!(
            "Region: {} | churn after {} days\n\
             Total customers: {} | At risk: {} ({:.1}% of base) | Churn rate: {:.1}%\n\
             Retention signal confidence: {:.1}% | Loyal customers: {}\n",
            self.region,
            self.churn_threshold_days,
            k.total_customers,
            k.at_risk_count,
            k.at_risk_share * 100.0,
            k.churn_rate * 100.0,
            k.confidence_score,
            k.loyal_count,
        );

        let composition: Vec<String> = self
            .breakdown
            .iter()
            .map(|b| format!("{}: {}", b.status, b.count))
            .collect();
        out.push_str(&format!("Health composition: {}\n", composition.join(", ")));

        if self.win_back.is_empty() {
            out.push_str("Win-back list is empty.\n");
        } else {
            out.push_str(&win_back_table(&self.win_back).to_string());
            out.push('\n');
        }
        out
    }
}

fn win_back_table(entries: &[CustomerSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Customer", "Region", "Recency", "Frequency", "LTV", "Risk Score", "Status",
    ]);

    for e in entries {
        let token = StyleToken::for_status(e.status);
        table.add_row(vec![
            Cell::new(&e.customer_id),
            Cell::new(&e.region),
            Cell::new(e.recency),
            Cell::new(e.frequency),
            Cell::new(format!("{:.2}", e.ltv)),
            Cell::new(format!("{:.2}", e.risk_score)),
            Cell::new(e.status.label()).fg(token.color()),
        ]);
    }
    table
}
