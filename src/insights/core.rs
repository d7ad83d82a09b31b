//! Derives ranked, human-readable signals from the ledger history.
//!
//! Every insight is an independent, tolerant computation: a failure or
//! empty result in one metric never blocks the others. Thresholds are
//! fixed constants for a heuristic dashboard, not a statistical model.

use std::collections::HashMap;

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Duration};

use crate::{
    Error,
    category::AccountCategory,
    dates::{month_end, month_start, months_before, previous_month_end, previous_month_start},
    money::{self, parse_stored_amount, sum_amount_rows},
};

/// Maximum number of insights returned to the dashboard.
const MAX_INSIGHTS: usize = 6;
/// A tithe at or above this amount counts as a notable contribution.
const NOTABLE_TITHE_THRESHOLD: i64 = 1_000;
/// A withdrawal at or above this amount within the recent window is flagged.
const LARGE_WITHDRAWAL_THRESHOLD: i64 = 2_000;
/// How far back the large-withdrawal check looks, in days.
const LARGE_WITHDRAWAL_WINDOW_DAYS: i64 = 7;
/// The consistent-giver insight is suppressed at or below this count.
const CONSISTENT_GIVER_MINIMUM: i64 = 5;
/// How far back the consistent-giver check looks, in months.
const CONSISTENT_GIVER_MONTHS: i32 = 6;
/// An offering decline is only worth a warning beyond this percentage.
const DECLINE_WARNING_PERCENT: i64 = -10;

/// The tone of an insight, used by the dashboard for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// A positive signal.
    Success,
    /// A signal that needs attention.
    Warning,
    /// A neutral observation.
    Info,
}

/// One ranked, human-readable signal derived from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// The tone of the signal.
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// The dashboard icon name.
    pub icon: &'static str,
    /// The display text.
    pub text: String,
    /// Rank, lower is more important. Fixed per insight kind.
    pub priority: u8,
}

type Metric = fn(Date, &Connection) -> Result<Option<Insight>, Error>;

/// Generate up to [MAX_INSIGHTS] insights for the dashboard, ordered by
/// ascending priority with ties broken by insertion order.
///
/// A metric that fails is logged and skipped; the remaining insights are
/// still returned.
pub fn generate_insights(today: Date, connection: &Connection) -> Vec<Insight> {
    let metrics: [(&str, Metric); 6] = [
        ("total income", total_income_this_month),
        ("offering trend", offering_trend),
        ("notable contributions", notable_contributions),
        ("largest expense category", largest_expense_category),
        ("large recent withdrawal", large_recent_withdrawal),
        ("consistent givers", consistent_givers),
    ];

    let mut insights = Vec::new();
    for (name, metric) in metrics {
        match metric(today, connection) {
            Ok(Some(insight)) => insights.push(insight),
            Ok(None) => {}
            Err(error) => tracing::error!("Skipping {name} insight: {error}"),
        }
    }

    insights.sort_by_key(|insight| insight.priority);
    insights.truncate(MAX_INSIGHTS);

    insights
}

/// Sum one category's income within `[start, end]`.
///
/// Member-linked categories only count records marked `Paid`; the offering
/// tables record a per-service total and have no payment status.
fn monthly_income(
    category: AccountCategory,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE date BETWEEN ?1 AND ?2",
        category.amount_column(),
        category.table()
    );
    if matches!(
        category,
        AccountCategory::Tithe | AccountCategory::Welfare
    ) {
        sql.push_str(" AND status = 'Paid'");
    }

    sum_amount_rows(connection, &sql, params![start, end])
}

fn total_income_this_month(
    today: Date,
    connection: &Connection,
) -> Result<Option<Insight>, Error> {
    let start = month_start(today);
    let end = month_end(today);

    let mut total = Decimal::ZERO;
    for category in AccountCategory::ALL {
        total += monthly_income(category, start, end, connection)?;
    }

    if total <= Decimal::ZERO {
        return Ok(None);
    }

    Ok(Some(Insight {
        kind: InsightKind::Success,
        icon: "dollar",
        text: format!("Total income this month: {}", money::currency(total)),
        priority: 1,
    }))
}

fn offering_trend(today: Date, connection: &Connection) -> Result<Option<Insight>, Error> {
    let current = monthly_income(
        AccountCategory::Offering,
        month_start(today),
        month_end(today),
        connection,
    )?;
    let previous = monthly_income(
        AccountCategory::Offering,
        previous_month_start(today),
        previous_month_end(today),
        connection,
    )?;

    if previous <= Decimal::ZERO {
        return Ok(None);
    }

    let change = (current - previous) * Decimal::ONE_HUNDRED / previous;

    if change > Decimal::ZERO {
        Ok(Some(Insight {
            kind: InsightKind::Success,
            icon: "trending-up",
            text: format!("Offerings increased by {change:.1}% this month"),
            priority: 2,
        }))
    } else if change < Decimal::from(DECLINE_WARNING_PERCENT) {
        Ok(Some(Insight {
            kind: InsightKind::Warning,
            icon: "trending-down",
            text: format!("Offerings decreased by {:.1}% this month", change.abs()),
            priority: 2,
        }))
    } else {
        Ok(None)
    }
}

fn notable_contributions(
    today: Date,
    connection: &Connection,
) -> Result<Option<Insight>, Error> {
    let threshold = Decimal::from(NOTABLE_TITHE_THRESHOLD);

    let mut statement = connection.prepare(
        "SELECT amount FROM tithe WHERE date BETWEEN ?1 AND ?2 AND status = 'Paid'",
    )?;
    let rows = statement.query_map(params![month_start(today), month_end(today)], |row| {
        row.get::<_, String>(0)
    })?;

    let mut count = 0;
    for amount in rows {
        if parse_stored_amount(&amount?)? >= threshold {
            count += 1;
        }
    }

    if count == 0 {
        return Ok(None);
    }

    Ok(Some(Insight {
        kind: InsightKind::Success,
        icon: "users",
        text: format!("{count} members contributed ₵1,000+ this month - send thank you notes"),
        priority: 3,
    }))
}

fn largest_expense_category(
    today: Date,
    connection: &Connection,
) -> Result<Option<Insight>, Error> {
    let mut statement = connection.prepare(
        "SELECT category, amount FROM expense
         WHERE date BETWEEN ?1 AND ?2 AND status = 'Approved'",
    )?;
    let rows = statement.query_map(params![month_start(today), month_end(today)], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for row in rows {
        let (category, amount) = row?;
        *totals.entry(category).or_insert(Decimal::ZERO) += parse_stored_amount(&amount)?;
    }

    // Ties break towards the lexicographically smaller category name.
    let top = totals
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

    Ok(top.map(|(category, total)| Insight {
        kind: InsightKind::Info,
        icon: "alert",
        text: format!(
            "{category} is the largest expense category this month ({})",
            money::currency(total)
        ),
        priority: 4,
    }))
}

fn large_recent_withdrawal(
    today: Date,
    connection: &Connection,
) -> Result<Option<Insight>, Error> {
    let threshold = Decimal::from(LARGE_WITHDRAWAL_THRESHOLD);
    let window_start = today - Duration::days(LARGE_WITHDRAWAL_WINDOW_DAYS);

    let mut statement = connection.prepare(
        "SELECT amount, purpose FROM withdrawal
         WHERE date >= ?1 ORDER BY date DESC, created_at DESC",
    )?;
    let rows = statement.query_map(params![window_start], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    for row in rows {
        let (amount, purpose) = row?;
        let amount = parse_stored_amount(&amount)?;
        if amount >= threshold {
            return Ok(Some(Insight {
                kind: InsightKind::Warning,
                icon: "alert",
                text: format!(
                    "Recent large withdrawal: {} for \"{purpose}\"",
                    money::currency(amount)
                ),
                priority: 2,
            }));
        }
    }

    Ok(None)
}

fn consistent_givers(today: Date, connection: &Connection) -> Result<Option<Insight>, Error> {
    let since = months_before(today, CONSISTENT_GIVER_MONTHS);

    let count: i64 = connection.query_row(
        "SELECT COUNT(DISTINCT member_id) FROM tithe
         WHERE date >= ?1 AND member_id IS NOT NULL",
        params![since],
        |row| row.get(0),
    )?;

    if count <= CONSISTENT_GIVER_MINIMUM {
        return Ok(None);
    }

    Ok(Some(Insight {
        kind: InsightKind::Success,
        icon: "users",
        text: format!("{count} members have been consistent donors recently - appreciate them"),
        priority: 5,
    }))
}
