//! Bucket keys, granularities, and the period filters built on top of them.
//!
//! Keys are produced by formatting a [`NaiveDate`] with a zero-padded pattern,
//! so comparing the rendered strings orders buckets chronologically.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::common::Dated;
use crate::errors::{LedgerError, Result};

/// Bucketing resolution. Variants are ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    fn pattern(self) -> &'static str {
        match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        }
    }

    /// First calendar day of the bucket containing `date`.
    fn anchor(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date.with_day(1).and_then(|d| d.with_month(1)).unwrap_or(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(LedgerError::InvalidPeriodSelection(format!(
                "unknown granularity `{other}`"
            ))),
        }
    }
}

/// Grouping key for a day (`YYYY-MM-DD`), month (`YYYY-MM`) or year (`YYYY`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    value: String,
    granularity: Granularity,
    anchor: NaiveDate,
}

impl BucketKey {
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        let anchor = granularity.anchor(date);
        Self {
            value: anchor.format(granularity.pattern()).to_string(),
            granularity,
            anchor,
        }
    }

    /// Parses a key at a known granularity. Non-padded input such as
    /// `2024-3` is accepted and normalized to `2024-03`.
    pub fn parse(value: &str, granularity: Granularity) -> Result<Self> {
        let raw = value.trim();
        let invalid = || {
            LedgerError::InvalidPeriodSelection(format!(
                "`{raw}` is not a valid {granularity} (expected {})",
                granularity.pattern()
            ))
        };
        let date = match granularity {
            Granularity::Day => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?,
            Granularity::Month => {
                NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").map_err(|_| invalid())?
            }
            Granularity::Year => {
                if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let year: i32 = raw.parse().map_err(|_| invalid())?;
                NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?
            }
        };
        Ok(Self::from_date(date, granularity))
    }

    /// Parses a key whose granularity follows from its shape.
    pub fn infer(value: &str) -> Result<Self> {
        let granularity = match value.trim().matches('-').count() {
            0 => Granularity::Year,
            1 => Granularity::Month,
            2 => Granularity::Day,
            _ => {
                return Err(LedgerError::InvalidPeriodSelection(format!(
                    "`{}` is not a day, month or year",
                    value.trim()
                )))
            }
        };
        Self::parse(value, granularity)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Re-keys this bucket at a coarser (or equal) granularity.
    pub fn coarsen(&self, target: Granularity) -> Option<BucketKey> {
        if target < self.granularity {
            return None;
        }
        Some(Self::from_date(self.anchor, target))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Restricts transactions or summaries to a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodFilter {
    All,
    Day(BucketKey),
    Month(BucketKey),
    Year(BucketKey),
    /// Inclusive on both ends. Bounds always share a granularity.
    Range { start: BucketKey, end: BucketKey },
}

impl PeriodFilter {
    pub fn day(date: NaiveDate) -> Self {
        PeriodFilter::Day(BucketKey::from_date(date, Granularity::Day))
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            LedgerError::InvalidPeriodSelection(format!("{year}-{month} is not a valid month"))
        })?;
        Ok(PeriodFilter::Month(BucketKey::from_date(date, Granularity::Month)))
    }

    pub fn year(year: i32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            LedgerError::InvalidPeriodSelection(format!("{year} is not a valid year"))
        })?;
        Ok(PeriodFilter::Year(BucketKey::from_date(date, Granularity::Year)))
    }

    pub fn range(start: BucketKey, end: BucketKey) -> Result<Self> {
        if start.granularity() != end.granularity() {
            return Err(LedgerError::InvalidPeriodSelection(format!(
                "range bounds `{start}` and `{end}` use different granularities"
            )));
        }
        Ok(PeriodFilter::Range { start, end })
    }

    /// Builds a filter from a mode name and its textual arguments, e.g.
    /// `("month", ["2024-03"])` or `("range", ["2024-01", "2024-03"])`.
    pub fn parse(mode: &str, args: &[&str]) -> Result<Self> {
        let arg = |index: usize| {
            args.get(index).copied().ok_or_else(|| {
                LedgerError::InvalidPeriodSelection(format!(
                    "`{}` expects {} value(s)",
                    mode.trim(),
                    index + 1
                ))
            })
        };
        match mode.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PeriodFilter::All),
            "day" => Ok(PeriodFilter::Day(BucketKey::parse(arg(0)?, Granularity::Day)?)),
            "month" => Ok(PeriodFilter::Month(BucketKey::parse(
                arg(0)?,
                Granularity::Month,
            )?)),
            "year" => Ok(PeriodFilter::Year(BucketKey::parse(arg(0)?, Granularity::Year)?)),
            "range" => {
                let start = BucketKey::infer(arg(0)?)?;
                let end = BucketKey::infer(arg(1)?)?;
                Self::range(start, end)
            }
            other => Err(LedgerError::InvalidPeriodSelection(format!(
                "unknown filter mode `{other}`"
            ))),
        }
    }

    /// The single bucket this filter pins, if it pins exactly one.
    pub fn fixed_key(&self) -> Option<&BucketKey> {
        match self {
            PeriodFilter::Day(key) | PeriodFilter::Month(key) | PeriodFilter::Year(key) => Some(key),
            PeriodFilter::All | PeriodFilter::Range { .. } => None,
        }
    }

    /// Tests a bucket key. Keys finer than the filter are re-keyed at the
    /// filter's granularity first; keys coarser than it never match.
    pub fn matches_key(&self, key: &BucketKey) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Day(target) | PeriodFilter::Month(target) | PeriodFilter::Year(target) => {
                key.coarsen(target.granularity()).as_ref() == Some(target)
            }
            PeriodFilter::Range { start, end } => match key.coarsen(start.granularity()) {
                Some(rekeyed) => start.as_str() <= rekeyed.as_str() && rekeyed.as_str() <= end.as_str(),
                None => false,
            },
        }
    }

    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.matches_key(&BucketKey::from_date(date, Granularity::Day))
    }

    pub fn apply<'a, T: Dated>(&self, entries: &'a [T]) -> Vec<&'a T> {
        entries
            .iter()
            .filter(|entry| self.matches_date(entry.date()))
            .collect()
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::All => f.write_str("all"),
            PeriodFilter::Day(key) | PeriodFilter::Month(key) | PeriodFilter::Year(key) => {
                write!(f, "{} {}", key.granularity(), key)
            }
            PeriodFilter::Range { start, end } => write!(f, "{start}..={end}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(value: &str) -> BucketKey {
        BucketKey::parse(value, Granularity::Month).unwrap()
    }

    #[test]
    fn keys_are_zero_padded() {
        let day = date(2024, 3, 9);
        assert_eq!(BucketKey::from_date(day, Granularity::Day).as_str(), "2024-03-09");
        assert_eq!(BucketKey::from_date(day, Granularity::Month).as_str(), "2024-03");
        assert_eq!(BucketKey::from_date(day, Granularity::Year).as_str(), "2024");
        assert_eq!(BucketKey::from_date(date(987, 1, 2), Granularity::Year).as_str(), "0987");
    }

    #[test]
    fn key_order_is_chronological() {
        let mut keys = vec![month("2024-10"), month("2024-02"), month("2023-12")];
        keys.sort();
        let rendered: Vec<_> = keys.iter().map(BucketKey::as_str).collect();
        assert_eq!(rendered, vec!["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn parse_normalizes_unpadded_months() {
        assert_eq!(month("2024-3").as_str(), "2024-03");
    }

    #[test]
    fn malformed_values_are_invalid_selections() {
        for (value, granularity) in [
            ("2024-13", Granularity::Month),
            ("March", Granularity::Month),
            ("24x", Granularity::Year),
            ("2024-02-30", Granularity::Day),
        ] {
            let err = BucketKey::parse(value, granularity).expect_err(value);
            assert!(matches!(err, LedgerError::InvalidPeriodSelection(_)));
        }
    }

    #[test]
    fn granularity_rejects_unknown_names() {
        assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!(matches!(
            "week".parse::<Granularity>(),
            Err(LedgerError::InvalidPeriodSelection(_))
        ));
    }

    #[test]
    fn range_is_inclusive_at_both_ends() {
        let filter = PeriodFilter::parse("range", &["2024-01", "2024-03"]).unwrap();
        for inside in ["2024-01", "2024-02", "2024-03"] {
            assert!(filter.matches_key(&month(inside)), "{inside} should match");
        }
        for outside in ["2023-12", "2024-04"] {
            assert!(!filter.matches_key(&month(outside)), "{outside} should not match");
        }
        assert!(filter.matches_date(date(2024, 3, 31)));
        assert!(!filter.matches_date(date(2024, 4, 1)));
    }

    #[test]
    fn range_bounds_must_share_granularity() {
        let err = PeriodFilter::parse("range", &["2024-01", "2024-03-01"]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPeriodSelection(_)));
    }

    #[test]
    fn month_filter_matches_day_keys_by_prefix() {
        let filter = PeriodFilter::parse("month", &["2024-03"]).unwrap();
        let day = BucketKey::from_date(date(2024, 3, 15), Granularity::Day);
        let year = BucketKey::from_date(date(2024, 3, 15), Granularity::Year);
        assert!(filter.matches_key(&day));
        assert!(!filter.matches_key(&year));
        assert!(!filter.matches_date(date(2024, 4, 1)));
    }

    #[test]
    fn day_filter_is_exact() {
        let filter = PeriodFilter::day(date(2024, 3, 10));
        assert!(filter.matches_date(date(2024, 3, 10)));
        assert!(!filter.matches_date(date(2024, 3, 11)));
        assert!(!filter.matches_key(&month("2024-03")));
    }

    #[test]
    fn unknown_mode_and_missing_values_are_errors() {
        assert!(matches!(
            PeriodFilter::parse("week", &["2024-01"]),
            Err(LedgerError::InvalidPeriodSelection(_))
        ));
        assert!(matches!(
            PeriodFilter::parse("day", &[]),
            Err(LedgerError::InvalidPeriodSelection(_))
        ));
        assert_eq!(PeriodFilter::parse("ALL", &[]).unwrap(), PeriodFilter::All);
    }
}
