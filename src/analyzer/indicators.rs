use crate::model::{CustomerSummary, Status};
use serde::Serialize;

/// Floor of the deterministic confidence figure.
pub const MIN_CONFIDENCE: f64 = 60.0;

/// Headline figures derived from one set of customer summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionKpis {
    pub total_customers: usize,
    pub active_count: usize,
    pub at_risk_count: usize,
    pub churned_count: usize,
    /// Churned customers over all customers, 0..=1.
    pub churn_rate: f64,
    /// At-risk customers over all customers, 0..=1.
    pub at_risk_share: f64,
    /// `max(60, 100 - churn_rate * 100)`. A formula, not a model output.
    pub confidence_score: f64,
    /// Customers with at least `min_orders_for_loyal` orders. Does not affect status.
    pub loyal_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

pub struct RetentionIndicators;

impl RetentionIndicators {
    pub fn compute(summaries: &[CustomerSummary], min_orders_for_loyal: usize) -> RetentionKpis {
        let total = summaries.len();
        let count = |status: Status| summaries.iter().filter(|s| s.status == status).count();

        let active_count = count(Status::Active);
        let at_risk_count = count(Status::AtRisk);
        let churned_count = count(Status::Churned);

        let churn_rate = Self::share(churned_count, total);

        RetentionKpis {
            total_customers: total,
            active_count,
            at_risk_count,
            churned_count,
            churn_rate,
            at_risk_share: Self::share(at_risk_count, total),
            confidence_score: Self::confidence_score(churn_rate),
            loyal_count: summaries
                .iter()
                .filter(|s| s.frequency >= min_orders_for_loyal)
                .count(),
        }
    }

    /// Count per status in Active, At Risk, Churned order. Statuses with no customers are kept.
    pub fn status_breakdown(summaries: &[CustomerSummary]) -> Vec<StatusCount> {
        Status::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: summaries.iter().filter(|s| s.status == status).count(),
            })
            .collect()
    }

    pub fn confidence_score(churn_rate: f64) -> f64 {
        (100.0 - churn_rate * 100.0).max(MIN_CONFIDENCE)
    }

    fn share(part: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        part as f64 / total as f64
    }
}
