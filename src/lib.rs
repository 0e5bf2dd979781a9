//! Energy and weather time series preparation for load-forecasting features.
//!
//! Provider payloads normalize into one shape: a [`TimeSeries`] of local
//! wall-clock timestamps and numeric readings.
//!
//! - [`api::eia`]: EIA energy series, timestamped per publication frequency.
//! - [`api::openweather`]: OpenWeatherMap 3-hourly temperature forecasts.
//! - [`api::noaa`]: NCDC ISD hourly surface observations.
//!
//! On top of that shape sit the derivations: [`degree_days`] turns any
//! Fahrenheit series into heating and cooling demand proxies, and
//! [`interpolate_hourly`] resamples a 3-hourly forecast to hourly resolution.
//! The normalizers are pure and usable offline; the clients in [`api`] fetch
//! and normalize in one call.
//!
//! ```
//! use gridwx::{
//!     api::openweather::{ForecastResponse, TemperatureField},
//!     degree_days, interpolate_hourly,
//! };
//!
//! let payload = r#"{"list": [
//!     {"dt_txt": "2024-01-05 00:00:00", "main": {"temp": 41.0, "temp_max": 43.0, "temp_min": 40.0}},
//!     {"dt_txt": "2024-01-05 03:00:00", "main": {"temp": 38.0, "temp_max": 39.0, "temp_min": 36.0}},
//!     {"dt_txt": "2024-01-05 06:00:00", "main": {"temp": 35.0, "temp_max": 36.0, "temp_min": 33.0}}
//! ]}"#;
//! let forecast = serde_json::from_str::<ForecastResponse>(payload)?
//!     .into_series(&chrono_tz::America::New_York, TemperatureField::Temp)?;
//!
//! let hourly = interpolate_hourly(&forecast)?;
//! assert_eq!(hourly.len(), 7);
//!
//! let features = degree_days(&hourly);
//! assert!(features.heating.iter().all(|point| point.value > 0.0));
//! # Ok::<(), gridwx::Error>(())
//! ```

pub mod api;
mod core;
mod error;

pub use self::{
    core::{
        BASE_TEMPERATURE, DegreeDays, Frequency, Point, TimeSeries, degree_days,
        interpolate_hourly, to_local, to_utc,
    },
    error::{Error, Result},
};
