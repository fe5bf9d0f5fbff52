//! Temporal scope resolver.
//!
//! Maps a recognized relative-time kind onto an inclusive calendar window and
//! narrows a receipt set to that window. Whatever answers a question downstream
//! only ever gets `ScopedReceipts::matched`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::month::MonthKey;
use crate::receipt::Receipt;

/// The closed set of time expressions an interpreter may hand over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeExpressionKind {
    ThisMonth,
    LastMonth,
    ThisWeek,
    LastWeek,
    Unbounded,
}

impl TimeExpressionKind {
    pub const ALL: [TimeExpressionKind; 5] = [
        TimeExpressionKind::ThisMonth,
        TimeExpressionKind::LastMonth,
        TimeExpressionKind::ThisWeek,
        TimeExpressionKind::LastWeek,
        TimeExpressionKind::Unbounded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeExpressionKind::ThisMonth => "this_month",
            TimeExpressionKind::LastMonth => "last_month",
            TimeExpressionKind::ThisWeek => "this_week",
            TimeExpressionKind::LastWeek => "last_week",
            TimeExpressionKind::Unbounded => "unbounded",
        }
    }

    /// How the period reads inside a sentence ("for last month").
    pub fn period_phrase(&self) -> &'static str {
        match self {
            TimeExpressionKind::ThisMonth => "this month",
            TimeExpressionKind::LastMonth => "last month",
            TimeExpressionKind::ThisWeek => "this week",
            TimeExpressionKind::LastWeek => "last week",
            TimeExpressionKind::Unbounded => "any period",
        }
    }
}

impl fmt::Display for TimeExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeExpressionKind {
    type Err = CoreError;

    /// Accepts `this_month`, `this-month`, `ThisMonth`, `this month`, ...
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "thismonth" => Ok(TimeExpressionKind::ThisMonth),
            "lastmonth" => Ok(TimeExpressionKind::LastMonth),
            "thisweek" => Ok(TimeExpressionKind::ThisWeek),
            "lastweek" => Ok(TimeExpressionKind::LastWeek),
            "unbounded" => Ok(TimeExpressionKind::Unbounded),
            _ => Err(CoreError::UnrecognizedTimeExpression(s.to_string())),
        }
    }
}

/// An inclusive calendar window, or no restriction at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Window {
    Bounded { start: NaiveDate, end: NaiveDate },
    Unbounded,
}

impl Window {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Window::Bounded { start, end } => *start <= date && date <= *end,
            Window::Unbounded => true,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Window::Bounded { .. })
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Bounded { start, end } => write!(f, "{start} .. {end}"),
            Window::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Receipts narrowed to a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedReceipts {
    pub matched: Vec<Receipt>,
    /// True only when a bounded window matched nothing
    pub is_empty: bool,
    /// Receipts with unparseable dates (bounded windows only)
    pub skipped: usize,
}

fn month_window(month: MonthKey) -> Result<Window> {
    match (month.first_day(), month.last_day()) {
        (Some(start), Some(end)) => Ok(Window::Bounded { start, end }),
        _ => Err(CoreError::invalid_date(&month.label(), "month outside the supported date range")),
    }
}

fn shift(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| CoreError::invalid_date(&date.to_string(), "week outside the supported date range"))
}

fn week_window(monday: NaiveDate) -> Result<Window> {
    Ok(Window::Bounded {
        start: monday,
        end: shift(monday, 6)?,
    })
}

/// Resolve a time-expression kind relative to the local calendar date `reference`.
///
/// Weeks run Monday through Sunday. A window that would leave chrono's date
/// range is an `InvalidDate`, never a wider scope.
pub fn resolve_window(kind: TimeExpressionKind, reference: NaiveDate) -> Result<Window> {
    let this_monday = || shift(reference, -(reference.weekday().num_days_from_monday() as i64));
    match kind {
        TimeExpressionKind::ThisMonth => month_window(MonthKey::of(reference)),
        TimeExpressionKind::LastMonth => month_window(MonthKey::of(reference).minus_months(1)),
        TimeExpressionKind::ThisWeek => week_window(this_monday()?),
        TimeExpressionKind::LastWeek => week_window(shift(this_monday()?, -7)?),
        TimeExpressionKind::Unbounded => Ok(Window::Unbounded),
    }
}

/// Keep the receipts whose date falls inside `window`.
pub fn filter_by_window(receipts: &[Receipt], window: Window) -> ScopedReceipts {
    if !window.is_bounded() {
        return ScopedReceipts {
            matched: receipts.to_vec(),
            is_empty: false,
            skipped: 0,
        };
    }

    let mut matched = Vec::new();
    let mut skipped = 0usize;
    for r in receipts {
        match r.calendar_date() {
            Ok(date) if window.contains(date) => matched.push(r.clone()),
            Ok(_) => {}
            Err(e) => {
                skipped += 1;
                tracing::debug!(store = %r.store_name, error = %e, "receipt excluded from window");
            }
        }
    }

    let is_empty = matched.is_empty();
    tracing::debug!(%window, matched = matched.len(), skipped, "scoped receipts");
    ScopedReceipts {
        matched,
        is_empty,
        skipped,
    }
}

/// Resolve `kind` and filter in one step.
pub fn scope_receipts(
    receipts: &[Receipt],
    kind: TimeExpressionKind,
    reference: NaiveDate,
) -> Result<(Window, ScopedReceipts)> {
    let window = resolve_window(kind, reference)?;
    Ok((window, filter_by_window(receipts, window)))
}
