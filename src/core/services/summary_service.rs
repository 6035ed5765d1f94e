use crate::domain::{
    common::Dated,
    ledger::Ledger,
    period::{BucketKey, Granularity, PeriodFilter},
    summary::Summary,
};

use super::ServiceResult;

/// Groups dated entries into day, month or year buckets.
pub struct SummaryService;

impl SummaryService {
    pub fn summarize<'a, T, I>(entries: I, granularity: Granularity) -> Summary
    where
        T: Dated + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut summary = Summary::new(granularity);
        for entry in entries {
            summary.add(BucketKey::from_date(entry.date(), granularity), entry.amount());
        }
        summary
    }

    /// Same as [`SummaryService::summarize`] with a textual granularity such as `"month"`.
    pub fn summarize_by<'a, T, I>(entries: I, granularity: &str) -> ServiceResult<Summary>
    where
        T: Dated + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Ok(Self::summarize(entries, granularity.parse()?))
    }

    pub fn expenses(ledger: &Ledger, granularity: Granularity) -> Summary {
        Self::summarize(&ledger.expenses, granularity)
    }

    pub fn income(ledger: &Ledger, granularity: Granularity) -> Summary {
        Self::summarize(&ledger.income, granularity)
    }

    /// Buckets only the entries accepted by `filter`.
    pub fn summarize_within<T: Dated>(
        entries: &[T],
        granularity: Granularity,
        filter: &PeriodFilter,
    ) -> Summary {
        Self::summarize(filter.apply(entries), granularity)
    }
}
