//! Conversions between naive UTC timestamps and naive wall-clock time.
//!
//! The zone is always an explicit parameter. Pass [`chrono::Local`] to follow
//! the host configuration, or a [`chrono_tz`] zone to pin the station or
//! region the data belongs to regardless of where the process runs.
//!
//! [`chrono_tz`]: https://docs.rs/chrono-tz

use chrono::{MappedLocalTime, NaiveDateTime, TimeZone};

use crate::error::{Error, Result};

/// Convert a naive UTC timestamp to wall-clock time in the zone.
///
/// Total: every instant has exactly one wall-clock reading.
pub fn to_local<Tz: TimeZone>(zone: &Tz, utc: NaiveDateTime) -> NaiveDateTime {
    zone.from_utc_datetime(&utc).naive_local()
}

/// Convert a wall-clock time in the zone back to naive UTC.
///
/// A reading repeated by a fall-back transition maps to the earlier of the
/// two instants. A reading skipped by a spring-forward transition has no
/// instant at all and fails with [`Error::AmbiguousLocalTime`].
pub fn to_utc<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Result<NaiveDateTime> {
    match zone.from_local_datetime(&local) {
        MappedLocalTime::Single(instant) => Ok(instant.naive_utc()),
        MappedLocalTime::Ambiguous(earliest, _) => Ok(earliest.naive_utc()),
        MappedLocalTime::None => Err(Error::AmbiguousLocalTime { local }),
    }
}
