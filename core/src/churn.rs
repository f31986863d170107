//! Rule-based churn classification.
//!
//! An account is churned when ANY of three independent rules fires:
//!   - time:      days since last purchase > `dias_sin_compra`
//!   - amount:    average amount          < `monto_minimo`
//!   - frequency: transaction count       < `frecuencia_minima`
//!
//! "Now" is one day past the latest purchase across all accounts, not
//! wall-clock time, so the labels are a pure function of the input.

use crate::{config::ChurnParams, store::AccountActivity};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Columns of the classifier's input, as read from the store.
pub const SOURCE_COLUMNS: [&str; 4] = ["account_id", "last_purchase", "transactions", "avg_amount"];

/// Columns the classifier adds.
pub const DERIVED_COLUMNS: [&str; 5] = [
    "days_since_last_purchase",
    "churn_by_time",
    "churn_by_amount",
    "churn_by_frequency",
    "churned",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChurnFlags {
    pub by_time:      bool,
    pub by_amount:    bool,
    pub by_frequency: bool,
}

impl ChurnFlags {
    pub fn evaluate(
        days_since_last_purchase: i64,
        avg_amount: f64,
        transactions: i64,
        params: &ChurnParams,
    ) -> Self {
        Self {
            by_time:      days_since_last_purchase > params.days_without_purchase,
            by_amount:    avg_amount < params.min_avg_amount,
            by_frequency: transactions < params.min_transactions,
        }
    }

    pub fn churned(&self) -> bool {
        self.by_time || self.by_amount || self.by_frequency
    }
}

/// One input row plus the derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnAssessment {
    pub activity:                 AccountActivity,
    pub days_since_last_purchase: i64,
    pub flags:                    ChurnFlags,
    pub churned:                  bool,
}

/// Latest purchase + 1 day. `None` for an empty input.
pub fn reference_time(activity: &[AccountActivity]) -> Option<NaiveDateTime> {
    activity
        .iter()
        .map(|a| a.last_purchase)
        .max()
        .map(|latest| latest + Duration::days(1))
}

pub fn classify(activity: &[AccountActivity], params: &ChurnParams) -> Vec<ChurnAssessment> {
    let Some(now) = reference_time(activity) else {
        return Vec::new();
    };

    activity
        .iter()
        .map(|a| {
            let days = (now - a.last_purchase).num_days();
            let flags = ChurnFlags::evaluate(days, a.avg_amount, a.transactions, params);
            ChurnAssessment {
                activity: a.clone(),
                days_since_last_purchase: days,
                flags,
                churned: flags.churned(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChurnReasons {
    pub time:      usize,
    pub amount:    usize,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnSummary {
    pub accounts:   usize,
    pub churned:    usize,
    /// Fraction of accounts churned, 0.0 for no accounts.
    pub churn_rate: f64,
    pub reasons:    ChurnReasons,
}

pub fn summarize(assessments: &[ChurnAssessment]) -> ChurnSummary {
    let mut reasons = ChurnReasons::default();
    let mut churned = 0usize;
    for a in assessments {
        reasons.time += usize::from(a.flags.by_time);
        reasons.amount += usize::from(a.flags.by_amount);
        reasons.frequency += usize::from(a.flags.by_frequency);
        churned += usize::from(a.churned);
    }
    let churn_rate = if assessments.is_empty() {
        0.0
    } else {
        churned as f64 / assessments.len() as f64
    };
    ChurnSummary {
        accounts: assessments.len(),
        churned,
        churn_rate,
        reasons,
    }
}

/// Means of the numeric columns for one value of the churned flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnSegment {
    pub churned:           bool,
    pub accounts:          usize,
    pub mean_avg_amount:   f64,
    pub mean_transactions: f64,
    pub mean_days_since:   f64,
}

/// Group by the churned flag. Retained accounts first; empty groups are
/// left out.
pub fn segment(assessments: &[ChurnAssessment]) -> Vec<ChurnSegment> {
    [false, true]
        .into_iter()
        .filter_map(|flag| {
            let group: Vec<&ChurnAssessment> =
                assessments.iter().filter(|a| a.churned == flag).collect();
            if group.is_empty() {
                return None;
            }
            let n = group.len() as f64;
            Some(ChurnSegment {
                churned: flag,
                accounts: group.len(),
                mean_avg_amount: group.iter().map(|a| a.activity.avg_amount).sum::<f64>() / n,
                mean_transactions: group.iter().map(|a| a.activity.transactions as f64).sum::<f64>() / n,
                mean_days_since: group.iter().map(|a| a.days_since_last_purchase as f64).sum::<f64>() / n,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap()
    }

    #[test]
    fn rules_fire_independently() {
        let p = ChurnParams::default();
        assert_eq!(
            ChurnFlags::evaluate(11, 300_000.0, 90, &p),
            ChurnFlags { by_time: true, by_amount: false, by_frequency: false }
        );
        assert_eq!(
            ChurnFlags::evaluate(1, 224_999.0, 90, &p),
            ChurnFlags { by_time: false, by_amount: true, by_frequency: false }
        );
        assert_eq!(
            ChurnFlags::evaluate(1, 300_000.0, 84, &p),
            ChurnFlags { by_time: false, by_amount: false, by_frequency: true }
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let p = ChurnParams::default();
        let flags = ChurnFlags::evaluate(10, 225_000.0, 85, &p);
        assert!(!flags.churned(), "values equal to the thresholds do not churn");
    }

    #[test]
    fn reference_time_is_one_day_past_latest() {
        let activity = vec![
            AccountActivity { account_id: 1, last_purchase: day(3), transactions: 1, avg_amount: 1.0 },
            AccountActivity { account_id: 2, last_purchase: day(9), transactions: 1, avg_amount: 1.0 },
        ];
        assert_eq!(reference_time(&activity), Some(day(10)));
        assert_eq!(reference_time(&[]), None);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let s = summarize(&[]);
        assert_eq!(s.accounts, 0);
        assert_eq!(s.churn_rate, 0.0);
        assert!(segment(&[]).is_empty());
    }
}
