use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

/// Converts an exact decimal price into the `f64` space scales work in.
pub fn decimal_to_f64(value: Decimal, field: &str) -> ChartResult<f64> {
    value
        .to_f64()
        .filter(|converted| converted.is_finite())
        .ok_or_else(|| ChartError::InvalidData(format!("`{field}` does not fit in f64")))
}

/// Unix timestamp in seconds with millisecond resolution.
#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}
