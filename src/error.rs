use chrono::NaiveDateTime;
use thiserror::Error;

/// Unified error type for fetching, normalization, and derivation.
///
/// Provider payloads fail as a whole: one malformed timestamp or value fails
/// the entire normalization rather than yielding a partial series.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw field does not match the pattern its provider declares for it.
    #[error("malformed `{raw}`, expected `{expected}`")]
    Parse {
        /// The raw text as it arrived on the wire.
        raw: String,
        /// Human-readable pattern the text was checked against.
        expected: &'static str,
    },

    /// A field the normalizer relies on is absent from the payload.
    #[error("no `{field}` in the {provider} payload")]
    MissingData {
        /// Provider tag, e.g. `"EIA"`.
        provider: &'static str,
        /// Payload field that was expected.
        field: &'static str,
    },

    /// Too few points for the requested derivation.
    #[error("at least {required} points required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A wall time skipped by a spring-forward transition has no instant in
    /// the requested zone.
    #[error("local time {local} does not exist in the target zone")]
    AmbiguousLocalTime { local: NaiveDateTime },

    /// Consecutive points are not spaced the way the derivation requires.
    #[error("expected a 3-hour step between {left} and {right}")]
    IrregularSpacing {
        left: NaiveDateTime,
        right: NaiveDateTime,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
