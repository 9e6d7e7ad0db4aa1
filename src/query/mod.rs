//! Query pipeline: filter, then sort, then limit
//!
//! A [`Select`] carries the three pipeline parameters as per-call values.
//! The predicate and comparator are plain closures whose captured state is
//! scoped to the call; the store keeps no reference to either once
//! `select` returns.

use std::cmp::Ordering;

/// Parameters for one `select` call over records of type `R`.
///
/// Defaults: accept every record, no sort, no limit.
///
/// ```
/// use std::cmp::Ordering;
/// use femtodb::query::Select;
///
/// let query = Select::<u32>::all()
///     .filter(|n| *n >= 18)
///     .order_by(|a, b| a.cmp(b))
///     .limit(3);
/// # let _ = query;
/// ```
pub struct Select<'a, R> {
    filter: Option<Box<dyn Fn(&R) -> bool + 'a>>,
    order: Option<Box<dyn Fn(&R, &R) -> Ordering + 'a>>,
    limit: usize,
}

impl<'a, R> Select<'a, R> {
    /// Matches every record, unsorted, unlimited
    pub fn all() -> Self {
        Self {
            filter: None,
            order: None,
            limit: 0,
        }
    }

    /// Keep only records the predicate accepts
    pub fn filter(mut self, predicate: impl Fn(&R) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Order results by the comparator's three-way result (stable)
    pub fn order_by(mut self, comparator: impl Fn(&R, &R) -> Ordering + 'a) -> Self {
        self.order = Some(Box::new(comparator));
        self
    }

    /// Truncate results after sorting; zero means unlimited
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Filter phase decision for one decoded record
    pub(crate) fn matches(&self, record: &R) -> bool {
        self.filter.as_ref().map_or(true, |predicate| predicate(record))
    }

    /// Sort and limit phases over the filtered set
    pub(crate) fn finish(&self, mut records: Vec<R>) -> Vec<R> {
        if let Some(comparator) = &self.order {
            records.sort_by(|a, b| comparator(a, b));
        }
        if self.limit > 0 && records.len() > self.limit {
            records.truncate(self.limit);
        }
        records
    }
}

impl<'a, R> Default for Select<'a, R> {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_everything() {
        let query = Select::<u32>::all();
        assert!(query.matches(&0));
        assert!(query.matches(&u32::MAX));
        assert_eq!(query.finish(vec![3, 1, 2]), vec![3, 1, 2]);
    }

    #[test]
    fn test_filter_rejects() {
        let query = Select::<u32>::all().filter(|n| *n >= 18);
        assert!(query.matches(&18));
        assert!(!query.matches(&17));
    }

    #[test]
    fn test_sort_uses_three_way_result() {
        let query = Select::<u32>::all().order_by(|a, b| b.cmp(a));
        assert_eq!(query.finish(vec![1, 3, 2]), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_is_stable() {
        // Equal keys keep their scan order
        let query = Select::<(u32, char)>::all().order_by(|a, b| a.0.cmp(&b.0));
        let sorted = query.finish(vec![(1, 'a'), (0, 'x'), (1, 'b')]);
        assert_eq!(sorted, vec![(0, 'x'), (1, 'a'), (1, 'b')]);
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let query = Select::<u32>::all().order_by(|a, b| a.cmp(b)).limit(2);
        assert_eq!(query.finish(vec![30, 10, 20]), vec![10, 20]);
    }

    #[test]
    fn test_limit_zero_is_unlimited() {
        let query = Select::<u32>::all().limit(0);
        assert_eq!(query.finish(vec![1, 2, 3]).len(), 3);
    }

    #[test]
    fn test_limit_beyond_len_is_noop() {
        let query = Select::<u32>::all().limit(10);
        assert_eq!(query.finish(vec![1, 2]), vec![1, 2]);
    }
}
