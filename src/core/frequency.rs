use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Publication frequency of an energy series.
///
/// The frequency code governs the wire format of the series timestamps, both
/// when parsing response data and when formatting request date filters.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    derive_more::Display,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum Frequency {
    #[display("A")]
    #[serde(rename = "A")]
    Annual,

    #[display("M")]
    #[serde(rename = "M")]
    Monthly,

    #[display("W")]
    #[serde(rename = "W")]
    Weekly,

    #[display("D")]
    #[serde(rename = "D")]
    Daily,

    #[display("H")]
    #[serde(rename = "H")]
    Hourly,
}

impl Frequency {
    /// Parse a provider timestamp in this frequency's wire format.
    ///
    /// Coarser-than-daily stamps resolve to the first day of their period,
    /// and date-only stamps to midnight, so every series carries uniform
    /// [`NaiveDateTime`] keys.
    pub fn parse_timestamp(self, raw: &str) -> Result<NaiveDateTime> {
        let date = match self {
            Self::Annual => {
                if raw.len() != 4 {
                    return Err(malformed(raw, "YYYY"));
                }
                parse_date(&format!("{raw}0101"), raw, "YYYY")?
            }
            Self::Monthly => {
                if raw.len() != 6 {
                    return Err(malformed(raw, "YYYYMM"));
                }
                parse_date(&format!("{raw}01"), raw, "YYYYMM")?
            }
            Self::Weekly | Self::Daily => parse_date(raw, raw, "YYYYMMDD")?,
            Self::Hourly => return parse_hourly(raw),
        };
        Ok(date.and_time(NaiveTime::MIN))
    }

    /// Format a timestamp the way this frequency's request filters expect.
    #[must_use]
    pub fn format_timestamp(self, time: NaiveDateTime) -> String {
        match self {
            Self::Annual => time.format("%Y"),
            Self::Monthly => time.format("%Y%m"),
            Self::Weekly | Self::Daily => time.format("%Y%m%d"),
            Self::Hourly => time.format("%Y%m%dT%HZ"),
        }
        .to_string()
    }
}

const HOURLY_PATTERN: &str = "YYYYMMDD HH";

/// Hourly stamps arrive as either `YYYYMMDD HH` or `YYYYMMDD'T'HH'Z'`, so the
/// literal separators are stripped before parsing.
fn parse_hourly(raw: &str) -> Result<NaiveDateTime> {
    let cleaned = raw.replace('T', " ").replace('Z', "");
    let Some((date, hour)) = cleaned.split_once(' ') else {
        return Err(malformed(raw, HOURLY_PATTERN));
    };
    let date = parse_date(date, raw, HOURLY_PATTERN)?;
    let time = hour
        .parse()
        .ok()
        .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .ok_or_else(|| malformed(raw, HOURLY_PATTERN))?;
    Ok(date.and_time(time))
}

fn parse_date(padded: &str, raw: &str, expected: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(padded, "%Y%m%d").map_err(|_| malformed(raw, expected))
}

fn malformed(raw: &str, expected: &'static str) -> Error {
    Error::Parse {
        raw: raw.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_annual() -> Result {
        assert_eq!(Frequency::Annual.parse_timestamp("2020")?, at(2020, 1, 1, 0));
        Ok(())
    }

    #[test]
    fn parse_monthly() -> Result {
        assert_eq!(Frequency::Monthly.parse_timestamp("202007")?, at(2020, 7, 1, 0));
        Ok(())
    }

    #[test]
    fn parse_daily() -> Result {
        assert_eq!(Frequency::Daily.parse_timestamp("20200229")?, at(2020, 2, 29, 0));
        Ok(())
    }

    #[test]
    fn parse_hourly_with_space() -> Result {
        assert_eq!(Frequency::Hourly.parse_timestamp("20200101 05")?, at(2020, 1, 1, 5));
        Ok(())
    }

    #[test]
    fn parse_hourly_with_separators() -> Result {
        assert_eq!(Frequency::Hourly.parse_timestamp("20200101T05Z")?, at(2020, 1, 1, 5));
        Ok(())
    }

    #[test]
    fn rejects_malformed() {
        for (frequency, raw) in [
            (Frequency::Annual, "20"),
            (Frequency::Annual, "2O20"),
            (Frequency::Monthly, "202013"),
            (Frequency::Daily, "20200132"),
            (Frequency::Daily, "2020-01-01"),
            (Frequency::Hourly, "20200101"),
            (Frequency::Hourly, "20200101T25Z"),
        ] {
            let result = frequency.parse_timestamp(raw);
            assert!(matches!(result, Err(Error::Parse { .. })), "accepted {raw:?}");
        }
    }

    #[test]
    fn format_round_trips() -> Result {
        let time = at(2021, 3, 7, 14);
        for (frequency, expected) in [
            (Frequency::Annual, "2021"),
            (Frequency::Monthly, "202103"),
            (Frequency::Weekly, "20210307"),
            (Frequency::Daily, "20210307"),
            (Frequency::Hourly, "20210307T14Z"),
        ] {
            let formatted = frequency.format_timestamp(time);
            assert_eq!(formatted, expected);
            let round_tripped = frequency.parse_timestamp(&formatted)?;
            assert_eq!(frequency.format_timestamp(round_tripped), expected);
        }
        Ok(())
    }

    #[test]
    fn deserializes_from_code() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::from_str::<Frequency>("\"D\"")?, Frequency::Daily);
        assert_eq!(serde_json::from_str::<Frequency>("\"H\"")?, Frequency::Hourly);
        Ok(())
    }

    #[test]
    fn displays_the_wire_code() {
        assert_eq!(Frequency::Annual.to_string(), "A");
        assert_eq!(Frequency::Hourly.to_string(), "H");
    }
}
