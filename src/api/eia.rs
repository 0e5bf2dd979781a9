//! [EIA Open Data](https://www.eia.gov/opendata/) series API.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use reqwest::Url;
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use tracing::{info, instrument};

use crate::{
    api::fetch::Fetcher,
    core::{Frequency, Point, TimeSeries},
    error::{Error, Result},
};

const PROVIDER: &str = "EIA";
const DEFAULT_BASE_URL: &str = "https://api.eia.gov/series/";

/// EIA series API client.
#[derive(bon::Builder)]
pub struct Eia {
    fetcher: Fetcher,

    #[builder(into)]
    api_key: String,

    /// Endpoint override, mainly for tests.
    #[builder(default = DEFAULT_BASE_URL.parse().unwrap())]
    base_url: Url,
}

/// Date filter for a series request.
///
/// The bounds are formatted in the wire format of the series frequency, so
/// the frequency here must match the series being requested.
#[derive(Clone, Copy, Debug)]
pub struct SeriesWindow {
    pub frequency: Frequency,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl Eia {
    /// Fetch one series ID and normalize every series in the response.
    #[instrument(skip_all, name = "Fetching energy series…", fields(series_id = series_id))]
    pub async fn series(
        &self,
        series_id: &str,
        window: Option<SeriesWindow>,
    ) -> Result<HashMap<String, EnergySeries>> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("series_id", series_id);
        if let Some(window) = window {
            if let Some(start) = window.start {
                url.query_pairs_mut()
                    .append_pair("start", &window.frequency.format_timestamp(start));
            }
            if let Some(end) = window.end {
                url.query_pairs_mut()
                    .append_pair("end", &window.frequency.format_timestamp(end));
            }
        }
        let body = self.fetcher.get_text(url).await?;
        let series = serde_json::from_str::<SeriesResponse>(&body)?.into_series()?;
        info!(n_series = series.len(), "fetched");
        Ok(series)
    }
}

/// One normalized series together with the frequency it is published at.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergySeries {
    pub frequency: Frequency,
    pub series: TimeSeries,
}

/// Raw `/series/` response document.
#[derive(Deserialize)]
pub struct SeriesResponse {
    series: Option<Vec<RawSeries>>,
}

#[serde_as]
#[derive(Deserialize)]
struct RawSeries {
    series_id: String,

    f: Frequency,

    /// Rows of `[timestamp, value]`. Values arrive as JSON numbers or as
    /// numeric strings depending on the series; missing observations are
    /// `null`.
    #[serde_as(as = "Option<Vec<(_, Option<PickFirst<(_, DisplayFromStr)>>)>>")]
    data: Option<Vec<(String, Option<f64>)>>,
}

impl SeriesResponse {
    /// Normalize every series in the response, keyed by series ID.
    ///
    /// Timestamps are parsed per the frequency code of each series and values
    /// are taken verbatim. Rows with `null` values are missing observations
    /// and are dropped. Point order is preserved as delivered.
    pub fn into_series(self) -> Result<HashMap<String, EnergySeries>> {
        let series = self.series.ok_or(Error::MissingData {
            provider: PROVIDER,
            field: "series",
        })?;
        series
            .into_iter()
            .map(|raw| {
                let data = raw.data.ok_or(Error::MissingData {
                    provider: PROVIDER,
                    field: "data",
                })?;
                let points = data
                    .into_iter()
                    .filter_map(|(stamp, value)| Some((stamp, value?)))
                    .map(|(stamp, value)| Ok(Point::new(raw.f.parse_timestamp(&stamp)?, value)))
                    .collect::<Result<TimeSeries>>()?;
                Ok((
                    raw.series_id,
                    EnergySeries {
                        frequency: raw.f,
                        series: points,
                    },
                ))
            })
            .collect()
    }
}
