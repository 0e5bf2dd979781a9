use std::ops::{Bound, RangeBounds};

use chrono::NaiveDateTime;

/// A single observation: local wall-clock time and a numeric reading.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    derive_more::Constructor,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Point {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// An ordered series of observations in local wall-clock time.
///
/// Timestamps are expected to be strictly increasing. Providers deliver their
/// points in order, so the normalizers keep that order instead of re-sorting,
/// and the derivations treat it as a precondition.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    derive_more::Index,
    derive_more::IntoIterator,
    serde::Deserialize,
    serde::Serialize,
)]
#[into_iterator(owned, ref)]
pub struct TimeSeries(Vec<Point>);

impl TimeSeries {
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    /// Observations whose timestamps fall within the bounds.
    ///
    /// Binary searches both edges, relying on the ordering precondition.
    #[must_use]
    pub fn range(&self, bounds: impl RangeBounds<NaiveDateTime>) -> &[Point] {
        let start = match bounds.start_bound() {
            Bound::Included(time) => self.0.partition_point(|point| point.time < *time),
            Bound::Excluded(time) => self.0.partition_point(|point| point.time <= *time),
            Bound::Unbounded => 0,
        };
        let end = match bounds.end_bound() {
            Bound::Included(time) => self.0.partition_point(|point| point.time <= *time),
            Bound::Excluded(time) => self.0.partition_point(|point| point.time < *time),
            Bound::Unbounded => self.0.len(),
        };
        &self.0[start..end.max(start)]
    }
}

impl FromIterator<Point> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Point>>(points: I) -> Self {
        Self(points.into_iter().collect())
    }
}
