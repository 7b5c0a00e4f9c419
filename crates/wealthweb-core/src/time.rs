//! Calendar-month arithmetic and trend bucketing

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` away from the month containing `date`
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Calendar months from `from` to `to`, ignoring the day of month
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// `YYYY-MM` key for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Trend bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Semiannual,
}

impl Granularity {
    /// Pick the width for a span of `months`
    pub fn for_span(months: u32) -> Self {
        match months {
            0..=10 => Granularity::Monthly,
            11..=40 => Granularity::Quarterly,
            _ => Granularity::Semiannual,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Granularity::Monthly => 1,
            Granularity::Quarterly => 3,
            Granularity::Semiannual => 6,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Quarterly => write!(f, "quarterly"),
            Granularity::Semiannual => write!(f, "semiannual"),
        }
    }
}

/// A half-open date range `[start, end)` aligned to month starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
    pub label: String,
}

impl Bucket {
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date < self.end
    }

    pub fn contains_instant(&self, instant: &DateTime<Utc>) -> bool {
        self.contains(&instant.date_naive())
    }
}

/// Contiguous buckets covering `span_months`, the last one ending with the month of `today`
///
/// The span is rounded up to a whole number of buckets, so the first bucket
/// may start before the requested span.
pub fn buckets(today: NaiveDate, span_months: u32, granularity: Granularity) -> Vec<Bucket> {
    let width = granularity.months();
    let count = (span_months.max(1) + width - 1) / width;
    let end = add_months(today, 1);
    let first = add_months(end, -((count * width) as i32));

    (0..count)
        .map(|i| {
            let start = add_months(first, (i * width) as i32);
            let end = add_months(start, width as i32);
            let label = match granularity {
                Granularity::Monthly => start.format("%b %Y").to_string(),
                Granularity::Quarterly | Granularity::Semiannual => {
                    let last = add_months(end, -1);
                    format!("{} - {}", start.format("%b %Y"), last.format("%b %Y"))
                }
            };
            Bucket { start, end, label }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_crosses_years() {
        assert_eq!(add_months(date(2025, 1, 31), -1), date(2024, 12, 1));
        assert_eq!(add_months(date(2025, 11, 5), 3), date(2026, 2, 1));
        assert_eq!(add_months(date(2025, 6, 15), 0), date(2025, 6, 1));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2025, 1, 15), date(2026, 1, 15)), 12);
        assert_eq!(months_between(date(2025, 1, 31), date(2025, 2, 1)), 1);
        assert_eq!(months_between(date(2025, 5, 1), date(2025, 3, 1)), -2);
    }

    #[test]
    fn test_granularity_thresholds() {
        assert_eq!(Granularity::for_span(3), Granularity::Monthly);
        assert_eq!(Granularity::for_span(10), Granularity::Monthly);
        assert_eq!(Granularity::for_span(12), Granularity::Quarterly);
        assert_eq!(Granularity::for_span(40), Granularity::Quarterly);
        assert_eq!(Granularity::for_span(41), Granularity::Semiannual);
    }

    #[test]
    fn test_monthly_buckets_end_with_current_month() {
        let list = buckets(date(2025, 3, 14), 6, Granularity::Monthly);
        assert_eq!(list.len(), 6);
        assert_eq!(list[0].start, date(2024, 10, 1));
        assert_eq!(list[5].start, date(2025, 3, 1));
        assert_eq!(list[5].end, date(2025, 4, 1));
        assert_eq!(list[5].label, "Mar 2025");
        assert!(list.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn test_quarterly_buckets_round_up() {
        let list = buckets(date(2025, 3, 14), 12, Granularity::Quarterly);
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].start, date(2024, 4, 1));
        assert_eq!(list[0].label, "Apr 2024 - Jun 2024");
        assert!(list[3].contains(&date(2025, 3, 31)));
        assert!(!list[3].contains(&date(2025, 4, 1)));

        let list = buckets(date(2025, 3, 14), 13, Granularity::Quarterly);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_semiannual_label() {
        let list = buckets(date(2025, 6, 1), 48, Granularity::Semiannual);
        assert_eq!(list.len(), 8);
        assert_eq!(list[7].label, "Jan 2025 - Jun 2025");
    }
}
