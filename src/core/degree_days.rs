use crate::core::series::{Point, TimeSeries};

/// Balance-point temperature for degree-day features, in °F.
pub const BASE_TEMPERATURE: f64 = 65.0;

/// Pointwise heating and cooling demand proxies derived from one
/// temperature series.
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeDays {
    pub heating: TimeSeries,
    pub cooling: TimeSeries,
}

/// Derive degree-day features from a Fahrenheit temperature series.
///
/// Each output keeps the input timestamps. Heating is how far the reading
/// falls below [`BASE_TEMPERATURE`], cooling how far it rises above, both
/// clamped at zero, so at most one of the two is positive per point.
#[must_use]
pub fn degree_days(temperatures: &TimeSeries) -> DegreeDays {
    let heating = temperatures
        .iter()
        .map(|point| Point::new(point.time, (BASE_TEMPERATURE - point.value).max(0.0)))
        .collect();
    let cooling = temperatures
        .iter()
        .map(|point| Point::new(point.time, (point.value - BASE_TEMPERATURE).max(0.0)))
        .collect();
    DegreeDays { heating, cooling }
}
