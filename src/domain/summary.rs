use std::collections::BTreeMap;

use crate::domain::period::{BucketKey, Granularity, PeriodFilter};

/// Summed amounts per bucket for one transaction kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    granularity: Granularity,
    totals: BTreeMap<BucketKey, f64>,
}

impl Summary {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            totals: BTreeMap::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn add(&mut self, key: BucketKey, amount: f64) {
        *self.totals.entry(key).or_insert(0.0) += amount;
    }

    pub fn get(&self, key: &BucketKey) -> Option<f64> {
        self.totals.get(key).copied()
    }

    /// Looks up a bucket by its rendered key, e.g. `"2024-03"`.
    pub fn amount_for(&self, key: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|(bucket, _)| bucket.as_str() == key)
            .map(|(_, amount)| *amount)
    }

    pub fn keys(&self) -> impl Iterator<Item = &BucketKey> {
        self.totals.keys()
    }

    /// Buckets in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, f64)> {
        self.totals.iter().map(|(key, amount)| (key, *amount))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Keeps only the buckets accepted by `filter`.
    pub fn restrict(&self, filter: &PeriodFilter) -> Summary {
        Summary {
            granularity: self.granularity,
            totals: self
                .totals
                .iter()
                .filter(|(key, _)| filter.matches_key(key))
                .map(|(key, amount)| (key.clone(), *amount))
                .collect(),
        }
    }

    /// Plain `key -> amount` view for callers that do not need typed keys.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.totals
            .iter()
            .map(|(key, amount)| (key.to_string(), *amount))
            .collect()
    }
}
