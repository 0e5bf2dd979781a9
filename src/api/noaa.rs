//! NOAA NCDC hourly surface observations (ISD) API.

use chrono::{NaiveDateTime, TimeZone};
use csv::ReaderBuilder;
use reqwest::Url;
use tracing::{info, instrument};

use crate::{
    api::fetch::Fetcher,
    core::{Point, TimeSeries, to_local, to_utc},
    error::{Error, Result},
};

const DEFAULT_BASE_URL: &str = "https://www7.ncdc.noaa.gov/rest/services/values/isd/";

/// Report-type code of routine hourly (METAR) observations.
const HOURLY_REPORT: &str = "FM-15";

/// Positions of the observation fields within a headerless ISD row.
mod field {
    pub const DATE: usize = 2;
    pub const TIME: usize = 3;
    pub const TEMPERATURE: usize = 5;
    pub const REPORT_TYPE: usize = 19;
}

/// NCDC ISD API client.
#[derive(bon::Builder)]
pub struct Ncdc {
    fetcher: Fetcher,

    #[builder(into)]
    token: String,

    /// Endpoint override, mainly for tests.
    #[builder(default = DEFAULT_BASE_URL.parse().unwrap())]
    base_url: Url,
}

impl Ncdc {
    /// Fetch hourly station observations over a wall-clock window in the
    /// zone, normalized to a Fahrenheit series in the same wall clock.
    #[instrument(
        skip_all,
        name = "Fetching weather history…",
        fields(station_id = station_id, variable = variable),
    )]
    pub async fn history<Tz: TimeZone>(
        &self,
        station_id: &str,
        variable: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        zone: &Tz,
    ) -> Result<TimeSeries> {
        let start = request_time(zone, start)?;
        let end = request_time(zone, end)?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Parse {
                raw: self.base_url.to_string(),
                expected: "an HTTP base URL",
            })?
            .pop_if_empty()
            // The trailing empty segment produces the trailing slash.
            .extend([station_id, variable, start.as_str(), end.as_str(), ""]);
        url.query_pairs_mut()
            .append_pair("output", "csv")
            .append_pair("token", &self.token);
        let body = self.fetcher.get_text(url).await?;
        let series = parse_history(&body, zone)?;
        info!(n_points = series.len(), "fetched");
        Ok(series)
    }
}

/// The service takes its window bounds as UTC `YYYYMMDDHHMM` path segments.
fn request_time<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Result<String> {
    Ok(to_utc(zone, local)?.format("%Y%m%d%H%M").to_string())
}

/// Normalize raw ISD rows into a Fahrenheit series in wall-clock time of
/// the zone.
///
/// Rows are headerless and positional. Only `FM-15` rows are routine hourly
/// observations and survive the filter; rows whose temperature is empty or
/// `null` are missing observations and are dropped. Observation times arrive
/// as a `YYYYMMDD` date field plus an `HHMM` time-of-day field that loses
/// its leading zeros on the wire, re-padded to 4 digits before parsing as
/// UTC. Temperatures arrive in tenths of °C.
pub fn parse_history<Tz: TimeZone>(text: &str, zone: &Tz) -> Result<TimeSeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.get(field::REPORT_TYPE) != Some(HOURLY_REPORT) {
            continue;
        }
        let (Some(date), Some(time), Some(temperature)) = (
            record.get(field::DATE),
            record.get(field::TIME),
            record.get(field::TEMPERATURE),
        ) else {
            continue;
        };
        if temperature.is_empty() || temperature == "null" {
            continue;
        }
        let utc = parse_observation_time(date, time)?;
        let tenths_celsius: f64 = temperature.trim().parse().map_err(|_| Error::Parse {
            raw: temperature.to_owned(),
            expected: "tenths of °C",
        })?;
        points.push(Point::new(
            to_local(zone, utc),
            fahrenheit_from_tenths_celsius(tenths_celsius),
        ));
    }
    Ok(TimeSeries::new(points))
}

fn parse_observation_time(date: &str, time: &str) -> Result<NaiveDateTime> {
    let time_of_day: u32 = time.trim().parse().map_err(|_| Error::Parse {
        raw: time.to_owned(),
        expected: "HHMM",
    })?;
    let stamp = format!("{date}{time_of_day:04}");
    NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M").map_err(|_| Error::Parse {
        raw: stamp,
        expected: "YYYYMMDDHHMM",
    })
}

fn fahrenheit_from_tenths_celsius(raw: f64) -> f64 {
    raw / 10.0 * 9.0 / 5.0 + 32.0
}
