mod degree_days;
mod frequency;
mod interpolate;
mod series;
mod zone;

pub use self::{
    degree_days::{BASE_TEMPERATURE, DegreeDays, degree_days},
    frequency::Frequency,
    interpolate::interpolate_hourly,
    series::{Point, TimeSeries},
    zone::{to_local, to_utc},
};
