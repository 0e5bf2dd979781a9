//! [OpenWeatherMap](https://openweathermap.org/forecast5) 5-day / 3-hour
//! forecast API.

use chrono::{NaiveDateTime, TimeZone};
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    api::fetch::Fetcher,
    core::{Point, TimeSeries, to_local},
    error::{Error, Result},
};

const PROVIDER: &str = "OpenWeatherMap";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const TIMESTAMP_PATTERN: &str = "YYYY-MM-DD HH:MM:SS";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forecast API client.
#[derive(bon::Builder)]
pub struct OpenWeather {
    fetcher: Fetcher,

    #[builder(into)]
    api_key: String,

    /// Endpoint override, mainly for tests.
    #[builder(default = DEFAULT_BASE_URL.parse().unwrap())]
    base_url: Url,
}

/// Measurement system the provider reports temperatures in.
///
/// Standard is the provider default (Kelvin) and sends no `units` parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Units {
    Standard,
    Metric,
    Imperial,
}

impl Units {
    const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Metric => Some("metric"),
            Self::Imperial => Some("imperial"),
        }
    }
}

/// Which temperature reading to take from each 3-hour record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TemperatureField {
    #[default]
    Temp,
    TempMax,
    TempMin,
}

impl OpenWeather {
    /// Fetch the 3-hourly temperature forecast for a city ID, as wall-clock
    /// time in the zone.
    #[instrument(skip_all, name = "Fetching the forecast…", fields(city_id = city_id))]
    pub async fn forecast<Tz: TimeZone>(
        &self,
        city_id: u32,
        units: Units,
        zone: &Tz,
        field: TemperatureField,
    ) -> Result<TimeSeries> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &city_id.to_string())
            .append_pair("APPID", &self.api_key);
        if let Some(units) = units.query_value() {
            url.query_pairs_mut().append_pair("units", units);
        }
        let body = self.fetcher.get_text(url).await?;
        let series = serde_json::from_str::<ForecastResponse>(&body)?.into_series(zone, field)?;
        info!(n_points = series.len(), "fetched");
        Ok(series)
    }
}

/// Raw `/forecast` response document.
#[derive(Deserialize)]
pub struct ForecastResponse {
    list: Option<Vec<ForecastRecord>>,
}

#[derive(Deserialize)]
struct ForecastRecord {
    /// UTC wall-clock text, `YYYY-MM-DD HH:MM:SS`.
    dt_txt: String,
    main: Reading,
}

#[derive(Clone, Copy, Deserialize)]
struct Reading {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
}

impl ForecastResponse {
    /// Normalize into a temperature series in wall-clock time of the zone.
    ///
    /// Values pass through in whatever units the forecast was requested in.
    /// Record order is preserved as delivered (the provider sends 3-hourly
    /// ascending records).
    pub fn into_series<Tz: TimeZone>(
        self,
        zone: &Tz,
        field: TemperatureField,
    ) -> Result<TimeSeries> {
        let records = self.list.ok_or(Error::MissingData {
            provider: PROVIDER,
            field: "list",
        })?;
        records
            .into_iter()
            .map(|record| {
                let utc = NaiveDateTime::parse_from_str(&record.dt_txt, TIMESTAMP_FORMAT)
                    .map_err(|_| Error::Parse {
                        raw: record.dt_txt,
                        expected: TIMESTAMP_PATTERN,
                    })?;
                let value = match field {
                    TemperatureField::Temp => record.main.temp,
                    TemperatureField::TempMax => record.main.temp_max,
                    TemperatureField::TempMin => record.main.temp_min,
                };
                Ok(Point::new(to_local(zone, utc), value))
            })
            .collect()
    }
}
