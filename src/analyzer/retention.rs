use crate::analyzer::lifecycle::{build_lifecycle_data, CustomerLifecycle};
use crate::model::{AnalyzeError, CustomerSummary, OrderRecord, Status};
use crate::normalizer::normalize_region_filter;
use crate::utils::round2;

/// Risk score above which a not-yet-churned customer is flagged as at risk.
pub const AT_RISK_SCORE: f64 = 70.0;

/// Upper bound of the risk score.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Trait defining the interface for a retention analyzer.
pub trait Analyzer {
    fn analyze(
        &self,
        orders: &[OrderRecord],
        churn_threshold_days: i64,
        region_filter: Option<&str>,
    ) -> Result<Vec<CustomerSummary>, AnalyzeError>;
}

/// Stateless implementation of the retention analyzer.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(
        &self,
        orders: &[OrderRecord],
        churn_threshold_days: i64,
        region_filter: Option<&str>,
    ) -> Result<Vec<CustomerSummary>, AnalyzeError> {
        analyze(orders, churn_threshold_days, region_filter)
    }
}

/// Scores every customer present in `orders` after the region filter.
///
/// Recency is measured against the latest order date in scope, not the
/// wall clock. Summaries come back in first-seen customer order.
pub fn analyze(
    orders: &[OrderRecord],
    churn_threshold_days: i64,
    region_filter: Option<&str>,
) -> Result<Vec<CustomerSummary>, AnalyzeError> {
    if churn_threshold_days <= 0 {
        return Err(AnalyzeError::InvalidThreshold(churn_threshold_days));
    }

    for order in orders {
        validate_record(order)?;
    }

    let region = normalize_region_filter(region_filter);
    let in_scope: Vec<&OrderRecord> = orders
        .iter()
        .filter(|o| region.is_none_or(|r| o.region == r))
        .collect();

    let reference_date = in_scope
        .iter()
        .map(|o| o.date)
        .max()
        .ok_or(AnalyzeError::EmptyInput)?;

    let summaries = build_lifecycle_data(&in_scope)
        .into_iter()
        .map(|lifecycle| summarize(lifecycle, reference_date, churn_threshold_days))
        .collect();

    Ok(summaries)
}

fn validate_record(order: &OrderRecord) -> Result<(), AnalyzeError> {
    let malformed = |reason: &str| AnalyzeError::MalformedRecord {
        order_id: order.order_id.clone(),
        reason: reason.to_string(),
    };

    if order.customer_id.is_empty() {
        return Err(malformed("empty customer id"));
    }
    if order.order_id.is_empty() {
        return Err(malformed("empty order id"));
    }
    if order.region.is_empty() {
        return Err(malformed("empty region"));
    }
    if !order.revenue.is_finite() || order.revenue < 0.0 {
        return Err(malformed("revenue must be a non-negative amount"));
    }
    Ok(())
}

fn summarize(
    lifecycle: CustomerLifecycle,
    reference_date: chrono::NaiveDateTime,
    churn_threshold_days: i64,
) -> CustomerSummary {
    let recency = (reference_date - lifecycle.last_order).num_days();
    let risk_score = risk_score(recency, churn_threshold_days);

    CustomerSummary {
        customer_id: lifecycle.customer_id,
        recency,
        frequency: lifecycle.order_count,
        ltv: lifecycle.revenue,
        region: lifecycle.region,
        risk_score,
        status: classify(recency, risk_score, churn_threshold_days),
    }
}

/// Recency as a percentage of the churn threshold, capped at 100 and rounded to 2 decimals.
pub fn risk_score(recency: i64, churn_threshold_days: i64) -> f64 {
    let ratio = recency as f64 / churn_threshold_days as f64 * 100.0;
    round2(ratio.min(MAX_RISK_SCORE))
}

/// Churn is decided on recency first; the score only separates at-risk from active.
pub fn classify(recency: i64, risk_score: f64, churn_threshold_days: i64) -> Status {
    if recency > churn_threshold_days {
        Status::Churned
    } else if risk_score > AT_RISK_SCORE {
        Status::AtRisk
    } else {
        Status::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_order_date;
    use chrono::Duration;
    use std::collections::HashSet;

    fn order(customer: &str, id: &str, date: &str, revenue: f64, region: &str) -> OrderRecord {
        OrderRecord {
            customer_id: customer.to_string(),
            order_id: id.to_string(),
            date: parse_order_date(date).unwrap(),
            revenue,
            region: region.to_string(),
        }
    }

    fn sample_orders() -> Vec<OrderRecord> {
        vec![
            order("C1", "O1", "2024-01-01", 100.0, "North"),
            order("C1", "O2", "2024-01-10", 50.0, "North"),
            order("C2", "O3", "2023-06-01", 200.0, "South"),
        ]
    }

    /// Customers spread over a range of recencies and regions.
    fn mixed_orders() -> Vec<OrderRecord> {
        let base = parse_order_date("2024-06-30").unwrap();
        let regions = ["North", "South", "East"];
        let mut orders = Vec::new();
        for i in 0..40i64 {
            let customer = format!("C{}", i % 17);
            orders.push(OrderRecord {
                customer_id: customer,
                order_id: format!("O{}", i),
                date: base - Duration::days(i * 7 % 200),
                revenue: (i * 13 % 90) as f64 + 0.5,
                region: regions[(i % 3) as usize].to_string(),
            });
        }
        orders
    }

    #[test]
    fn test_worked_example() {
        let summaries = analyze(&sample_orders(), 90, None).unwrap();
        assert_eq!(summaries.len(), 2);

        let c1 = &summaries[0];
        assert_eq!(c1.customer_id, "C1");
        assert_eq!(c1.recency, 0);
        assert_eq!(c1.frequency, 2);
        assert_eq!(c1.ltv, 150.0);
        assert_eq!(c1.risk_score, 0.0);
        assert_eq!(c1.status, Status::Active);

        let c2 = &summaries[1];
        assert_eq!(c2.customer_id, "C2");
        assert_eq!(c2.recency, 223);
        assert_eq!(c2.frequency, 1);
        assert_eq!(c2.ltv, 200.0);
        assert_eq!(c2.risk_score, 100.0);
        assert_eq!(c2.status, Status::Churned);
    }

    #[test]
    fn test_at_risk_below_threshold() {
        // The second customer only pins the reference date 25 days later.
        let orders = vec![
            order("C1", "O1", "2024-03-01", 40.0, "North"),
            order("C2", "O2", "2024-03-26", 10.0, "North"),
        ];
        let summaries = analyze(&orders, 30, None).unwrap();

        assert_eq!(summaries[0].recency, 25);
        assert_eq!(summaries[0].risk_score, 83.33);
        assert_eq!(summaries[0].status, Status::AtRisk);
    }

    #[test]
    fn test_single_order_is_its_own_reference() {
        let orders = vec![order("C1", "O1", "2024-03-01", 40.0, "North")];
        let summaries = analyze(&orders, 30, None).unwrap();
        assert_eq!(summaries[0].recency, 0);
        assert_eq!(summaries[0].status, Status::Active);
    }

    #[test]
    fn test_region_filter_restricts_scope_and_reference_date() {
        let summaries = analyze(&sample_orders(), 90, Some("South")).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].customer_id, "C2");
        // Only South orders are in scope, so C2 is its own reference date.
        assert_eq!(summaries[0].recency, 0);
        assert_eq!(summaries[0].status, Status::Active);
    }

    #[test]
    fn test_all_sentinel_means_no_filter() {
        let everything = analyze(&sample_orders(), 90, None).unwrap();
        assert_eq!(analyze(&sample_orders(), 90, Some("All")).unwrap(), everything);
        assert!(matches!(analyze(&sample_orders(), 90, Some("all")), Err(AnalyzeError::EmptyInput)));
    }

    #[test]
    fn test_lowercase_all_is_a_real_region() {
        let orders = vec![
            order("C1", "O1", "2024-01-01", 10.0, "all"),
            order("C2", "O2", "2024-01-05", 20.0, "North"),
        ];
        let summaries = analyze(&orders, 90, Some("all")).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].customer_id, "C1");
    }

    #[test]
    fn test_empty_filter_result() {
        let err = analyze(&sample_orders(), 90, Some("Atlantis")).unwrap_err();
        assert!(matches!(err, AnalyzeError::EmptyInput));
        assert!(matches!(analyze(&[], 90, None), Err(AnalyzeError::EmptyInput)));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            analyze(&sample_orders(), 0, None),
            Err(AnalyzeError::InvalidThreshold(0))
        ));
        assert!(matches!(
            analyze(&sample_orders(), -5, None),
            Err(AnalyzeError::InvalidThreshold(-5))
        ));
    }

    #[test]
    fn test_malformed_records() {
        let mut orders = sample_orders();
        orders[1].revenue = -1.0;
        assert!(matches!(
            analyze(&orders, 90, None),
            Err(AnalyzeError::MalformedRecord { ref order_id, .. }) if order_id == "O2"
        ));

        let mut orders = sample_orders();
        orders[0].customer_id.clear();
        assert!(matches!(analyze(&orders, 90, None), Err(AnalyzeError::MalformedRecord { .. })));

        let mut orders = sample_orders();
        orders[2].revenue = f64::NAN;
        assert!(matches!(analyze(&orders, 90, None), Err(AnalyzeError::MalformedRecord { .. })));
    }

    #[test]
    fn test_first_seen_region_kept() {
        let orders = vec![
            order("C1", "O1", "2024-01-01", 1.0, "West"),
            order("C1", "O2", "2024-01-02", 1.0, "East"),
            order("C1", "O3", "2024-01-03", 1.0, "East"),
        ];
        let summaries = analyze(&orders, 90, None).unwrap();
        assert_eq!(summaries[0].region, "West");
    }

    #[test]
    fn test_partition_and_bounds() {
        let orders = mixed_orders();
        for threshold in [1, 7, 30, 90, 180, 365] {
            let summaries = analyze(&orders, threshold, None).unwrap();

            let ids: HashSet<&str> = summaries.iter().map(|s| s.customer_id.as_str()).collect();
            assert_eq!(ids.len(), summaries.len());
            assert_eq!(ids.len(), 17);

            for s in &summaries {
                assert!(s.recency >= 0);
                assert!(s.frequency >= 1);
                assert!(s.ltv >= 0.0);
                assert!((0.0..=MAX_RISK_SCORE).contains(&s.risk_score));
                assert!(Status::ALL.contains(&s.status));
            }
        }
    }

    #[test]
    fn test_threshold_monotonicity() {
        let orders = mixed_orders();
        let rank = |s: Status| match s {
            Status::Active => 0,
            Status::AtRisk => 1,
            Status::Churned => 2,
        };

        let thresholds = [5, 10, 30, 45, 90, 120, 180, 400];
        for pair in thresholds.windows(2) {
            let low = analyze(&orders, pair[0], None).unwrap();
            let high = analyze(&orders, pair[1], None).unwrap();

            for (a, b) in low.iter().zip(high.iter()) {
                assert_eq!(a.customer_id, b.customer_id);
                assert!(b.risk_score <= a.risk_score);
                if a.status != Status::Churned {
                    assert_ne!(b.status, Status::Churned);
                }
                assert!(rank(b.status) <= rank(a.status));
            }
        }
    }

    #[test]
    fn test_churn_dominates_score() {
        let orders = mixed_orders();
        for threshold in [3, 30, 60] {
            for s in analyze(&orders, threshold, None).unwrap() {
                if s.recency > threshold {
                    assert_eq!(s.status, Status::Churned);
                }
            }
        }
    }

    #[test]
    fn test_score_at_threshold_is_capped_but_not_churned() {
        assert_eq!(risk_score(90, 90), 100.0);
        assert_eq!(classify(90, 100.0, 90), Status::AtRisk);
        assert_eq!(classify(91, 100.0, 90), Status::Churned);
        assert_eq!(classify(63, risk_score(63, 90), 90), Status::Active);
        assert_eq!(classify(64, risk_score(64, 90), 90), Status::AtRisk);
    }

    #[test]
    fn test_risk_score_ties_round_to_even() {
        assert_eq!(risk_score(1, 32), 3.12);
        assert_eq!(risk_score(5, 32), 15.62);
        assert_eq!(risk_score(3, 32), 9.38);
    }

    #[test]
    fn test_trait_delegates() {
        let analyzer = AnalyzerImpl::new();
        assert_eq!(
            analyzer.analyze(&sample_orders(), 90, None).unwrap(),
            analyze(&sample_orders(), 90, None).unwrap()
        );
    }
}
