//! Whole-calendar-month arithmetic.
//!
//! Distances are `(y2 - y1) * 12 + (m2 - m1)`; day counts never enter into it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A (year, month) bucket key. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whole calendar months from `self` forward to `later` (negative if `later` is earlier).
    pub fn months_until(&self, later: MonthKey) -> i64 {
        (later.year as i64 - self.year as i64) * 12 + (later.month as i64 - self.month as i64)
    }

    /// The month `n` calendar months before this one.
    pub fn minus_months(&self, n: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human label such as `Jun 2025`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbr = MONTH_ABBR
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        write!(f, "{} {}", abbr, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_months_until_ignores_day_of_month() {
        let jan31 = MonthKey::of(d(2025, 1, 31));
        let feb1 = MonthKey::of(d(2025, 2, 1));
        assert_eq!(jan31.months_until(feb1), 1);
        assert_eq!(feb1.months_until(jan31), -1);
    }

    #[test]
    fn test_minus_months_crosses_year_boundary() {
        let jan = MonthKey { year: 2026, month: 1 };
        assert_eq!(jan.minus_months(1), MonthKey { year: 2025, month: 12 });
        assert_eq!(jan.minus_months(2), MonthKey { year: 2025, month: 11 });
        assert_eq!(jan.minus_months(13), MonthKey { year: 2024, month: 12 });
        assert_eq!(jan.minus_months(0), jan);
    }

    #[test]
    fn test_last_day_handles_short_months() {
        assert_eq!(MonthKey { year: 2024, month: 2 }.last_day(), Some(d(2024, 2, 29)));
        assert_eq!(MonthKey { year: 2025, month: 2 }.last_day(), Some(d(2025, 2, 28)));
        assert_eq!(MonthKey { year: 2025, month: 12 }.last_day(), Some(d(2025, 12, 31)));
    }

    #[test]
    fn test_label() {
        assert_eq!(MonthKey { year: 2025, month: 6 }.label(), "Jun 2025");
    }
}
