//! Natural cubic spline interpolation of 3-hourly forecasts to hourly
//! resolution.

use chrono::TimeDelta;
use itertools::Itertools;

use crate::{
    core::series::{Point, TimeSeries},
    error::{Error, Result},
};

/// Resample a 3-hourly series to hourly resolution with a cubic spline.
///
/// The points are treated as spline knots at positions `1..=N` on a synthetic
/// axis and the spline is evaluated at `3N - 2` evenly spaced positions, two
/// new samples inside every 3-hour interval. Knots are reproduced exactly,
/// output timestamps advance in real 1-hour steps from the first input
/// timestamp.
///
/// Requires at least two points and exact 3-hour spacing throughout; with
/// uneven spacing the hourly timeline would no longer line up with the
/// synthetic axis, so it fails instead of mislabeling samples.
pub fn interpolate_hourly(series: &TimeSeries) -> Result<TimeSeries> {
    let n = series.len();
    if n < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    for (left, right) in series.iter().tuple_windows() {
        if right.time - left.time != TimeDelta::hours(3) {
            return Err(Error::IrregularSpacing {
                left: left.time,
                right: right.time,
            });
        }
    }

    let values: Vec<f64> = series.iter().map(|point| point.value).collect();
    let moments = natural_spline_moments(&values);
    let start = series[0].time;

    let points = (0..3 * n - 2)
        .map(|sample| {
            let time = start + TimeDelta::hours(sample as i64);
            let knot = sample / 3;
            let value = if sample % 3 == 0 {
                // On a knot: pass the input through untouched rather than
                // re-deriving it from the segment polynomial.
                values[knot]
            } else {
                let offset = (sample % 3) as f64 / 3.0;
                segment_value(
                    values[knot],
                    values[knot + 1],
                    moments[knot],
                    moments[knot + 1],
                    offset,
                )
            };
            Point::new(time, value)
        })
        .collect();
    Ok(points)
}

/// Second derivatives of the natural cubic spline at the knots, for values
/// sampled on a unit grid.
///
/// Natural boundary conditions pin the end moments to zero; the interior
/// moments solve the tridiagonal system `m[i-1] + 4 m[i] + m[i+1] =
/// 6 (y[i+1] - 2 y[i] + y[i-1])`, eliminated by a single Thomas sweep. The
/// diagonal dominates its unit off-diagonals, so the sweep is stable without
/// pivoting.
fn natural_spline_moments(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut moments = vec![0.0; n];
    if n < 3 {
        // A two-point spline is the chord: both moments vanish.
        return moments;
    }

    let interior = n - 2;
    let mut diagonal = vec![4.0; interior];
    let mut rhs: Vec<f64> = (1..=interior)
        .map(|i| 6.0 * (values[i + 1] - 2.0 * values[i] + values[i - 1]))
        .collect();

    for i in 1..interior {
        let factor = 1.0 / diagonal[i - 1];
        diagonal[i] -= factor;
        rhs[i] -= factor * rhs[i - 1];
    }

    moments[interior] = rhs[interior - 1] / diagonal[interior - 1];
    for i in (1..interior).rev() {
        moments[i] = (rhs[i - 1] - moments[i + 1]) / diagonal[i - 1];
    }
    moments
}

/// Evaluate one unit-grid spline segment at `offset` within `0..1`.
fn segment_value(left: f64, right: f64, left_moment: f64, right_moment: f64, offset: f64) -> f64 {
    let remainder = 1.0 - offset;
    left_moment * remainder.powi(3) / 6.0
        + right_moment * offset.powi(3) / 6.0
        + (left - left_moment / 6.0) * remainder
        + (right - right_moment / 6.0) * offset
}
