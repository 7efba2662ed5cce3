use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two corners in any order.
    #[must_use]
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (b.0 - a.0).abs(),
            height: (b.1 - a.1).abs(),
        }
    }

    #[must_use]
    pub fn contains(self, point: (f64, f64)) -> bool {
        point.0 >= self.x
            && point.0 <= self.x + self.width
            && point.1 >= self.y
            && point.1 <= self.y + self.height
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// OHLC record with a unix-seconds timestamp.
///
/// Deserialized candles go through [`Candle::new`], so a parsed feed never
/// yields a bar with `low > high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandleFields")]
pub struct Candle {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Deserialize)]
struct CandleFields {
    time: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl TryFrom<CandleFields> for Candle {
    type Error = ChartError;

    fn try_from(fields: CandleFields) -> ChartResult<Self> {
        Self::new(fields.time, fields.open, fields.high, fields.low, fields.close)
    }
}

impl Candle {
    pub fn new(time: f64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if [time, open, high, low, close].iter().any(|v| !v.is_finite()) {
            return Err(ChartError::InvalidData(
                "candle fields must be finite".to_owned(),
            ));
        }
        if low > high || open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "candle must satisfy low <= open/close <= high".to_owned(),
            ));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }

    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    #[must_use]
    pub fn time_of(candle: &Self) -> f64 {
        candle.time
    }

    #[must_use]
    pub fn close_of(candle: &Self) -> f64 {
        candle.close
    }

    #[must_use]
    pub fn high_of(candle: &Self) -> f64 {
        candle.high
    }

    #[must_use]
    pub fn low_of(candle: &Self) -> f64 {
        candle.low
    }
}
