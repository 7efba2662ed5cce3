use serde::{Deserialize, Serialize};

use crate::core::ticks::{log_ladder_ticks, nice_tick_step, nice_ticks};
use crate::error::{ChartError, ChartResult};

fn validate_interval(name: &str, start: f64, end: f64) -> ChartResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidScale(format!(
            "{name} bounds must be finite, got [{start}, {end}]"
        )));
    }
    if start == end {
        return Err(ChartError::InvalidScale(format!(
            "{name} must not be degenerate, got [{start}, {end}]"
        )));
    }
    Ok(())
}

/// Wire form of the continuous scales; parsed values are rebuilt through the
/// validating constructors.
#[derive(Deserialize)]
struct IntervalFields {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

#[derive(Deserialize)]
struct PointFields {
    len: usize,
    range_start: f64,
    range_end: f64,
    #[serde(default)]
    padding: f64,
}

/// Continuous linear mapping from a data domain to a pixel range.
///
/// Either interval may be decreasing; Y axes usually map the domain onto
/// `[height, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalFields")]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        validate_interval("linear scale domain", domain.0, domain.1)?;
        validate_interval("linear scale range", range.0, range.1)?;

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    pub fn with_domain(self, domain: (f64, f64)) -> ChartResult<Self> {
        Self::new(domain, self.range())
    }

    pub fn with_range(self, range: (f64, f64)) -> ChartResult<Self> {
        Self::new(self.domain(), range)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain_start, self.domain_end, count)
    }

    #[must_use]
    pub fn tick_step(self, count: usize) -> Option<f64> {
        nice_tick_step(self.domain_start, self.domain_end, count)
    }
}

impl TryFrom<IntervalFields> for LinearScale {
    type Error = ChartError;

    fn try_from(fields: IntervalFields) -> ChartResult<Self> {
        Self::new(
            (fields.domain_start, fields.domain_end),
            (fields.range_start, fields.range_end),
        )
    }
}

/// Natural-log mapping; both domain bounds must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalFields")]
pub struct LogScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        validate_interval("log scale domain", domain.0, domain.1)?;
        validate_interval("log scale range", range.0, range.1)?;
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(ChartError::InvalidScale(format!(
                "log scale domain must be > 0, got [{}, {}]",
                domain.0, domain.1
            )));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        let log_start = self.domain_start.ln();
        let normalized = (value.ln() - log_start) / (self.domain_end.ln() - log_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let log_start = self.domain_start.ln();
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        (log_start + normalized * (self.domain_end.ln() - log_start)).exp()
    }

    pub fn with_domain(self, domain: (f64, f64)) -> ChartResult<Self> {
        Self::new(domain, self.range())
    }

    pub fn with_range(self, range: (f64, f64)) -> ChartResult<Self> {
        Self::new(self.domain(), range)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        log_ladder_ticks(self.domain_start, self.domain_end, count)
    }
}

impl TryFrom<IntervalFields> for LogScale {
    type Error = ChartError;

    fn try_from(fields: IntervalFields) -> ChartResult<Self> {
        Self::new(
            (fields.domain_start, fields.domain_end),
            (fields.range_start, fields.range_end),
        )
    }
}

/// Ordinal scale placing `len` evenly spaced points across the range.
///
/// Values are element indices. There is no inverse mapping, so axes built on
/// a point scale never flip and brushes cannot anchor on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointFields")]
pub struct PointScale {
    len: usize,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl PointScale {
    pub fn new(len: usize, range: (f64, f64)) -> ChartResult<Self> {
        Self::with_padding(len, range, 0.0)
    }

    pub fn with_padding(len: usize, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        if len == 0 {
            return Err(ChartError::InvalidScale(
                "point scale needs at least one element".to_owned(),
            ));
        }
        validate_interval("point scale range", range.0, range.1)?;
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidScale(
                "point scale padding must be finite and >= 0".to_owned(),
            ));
        }

        Ok(Self {
            len,
            range_start: range.0,
            range_end: range.1,
            padding,
        })
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (0.0, self.len.saturating_sub(1) as f64)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn step(self) -> f64 {
        let slots = (self.len.saturating_sub(1) as f64 + 2.0 * self.padding).max(1.0);
        (self.range_end - self.range_start) / slots
    }

    #[must_use]
    pub fn scale(self, index: f64) -> f64 {
        if self.len == 1 && self.padding == 0.0 {
            return (self.range_start + self.range_end) / 2.0;
        }
        self.range_start + self.step() * (self.padding + index)
    }

    pub fn with_range(self, range: (f64, f64)) -> ChartResult<Self> {
        Self::with_padding(self.len, range, self.padding)
    }

    #[must_use]
    pub fn ticks(self) -> Vec<f64> {
        (0..self.len).map(|index| index as f64).collect()
    }
}

impl TryFrom<PointFields> for PointScale {
    type Error = ChartError;

    fn try_from(fields: PointFields) -> ChartResult<Self> {
        Self::with_padding(
            fields.len,
            (fields.range_start, fields.range_end),
            fields.padding,
        )
    }
}

/// Scale handed to axes, brushes and annotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartScale {
    Linear(LinearScale),
    Log(LogScale),
    Point(PointScale),
}

impl ChartScale {
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        LinearScale::new(domain, range).map(Self::Linear)
    }

    pub fn log(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        LogScale::new(domain, range).map(Self::Log)
    }

    pub fn point(len: usize, range: (f64, f64)) -> ChartResult<Self> {
        PointScale::new(len, range).map(Self::Point)
    }

    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.scale(value),
            Self::Log(scale) => scale.scale(value),
            Self::Point(scale) => scale.scale(value),
        }
    }

    /// Maps a pixel back to the domain, or `None` for ordinal scales.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<f64> {
        match self {
            Self::Linear(scale) => Some(scale.invert(pixel)),
            Self::Log(scale) => Some(scale.invert(pixel)),
            Self::Point(_) => None,
        }
    }

    #[must_use]
    pub fn is_invertible(&self) -> bool {
        !matches!(self, Self::Point(_))
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.domain(),
            Self::Log(scale) => scale.domain(),
            Self::Point(scale) => scale.domain(),
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Log(scale) => scale.range(),
            Self::Point(scale) => scale.range(),
        }
    }

    /// Returns a copy with a new domain; ordinal scales keep their elements.
    pub fn with_domain(&self, domain: (f64, f64)) -> ChartResult<Self> {
        match self {
            Self::Linear(scale) => scale.with_domain(domain).map(Self::Linear),
            Self::Log(scale) => scale.with_domain(domain).map(Self::Log),
            Self::Point(_) => Err(ChartError::InvalidScale(
                "point scale domain is fixed by its element count".to_owned(),
            )),
        }
    }

    pub fn with_range(&self, range: (f64, f64)) -> ChartResult<Self> {
        match self {
            Self::Linear(scale) => scale.with_range(range).map(Self::Linear),
            Self::Log(scale) => scale.with_range(range).map(Self::Log),
            Self::Point(scale) => scale.with_range(range).map(Self::Point),
        }
    }

    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(scale) => scale.ticks(count),
            Self::Log(scale) => scale.ticks(count),
            Self::Point(scale) => scale.ticks(),
        }
    }

    /// Spacing between generated ticks, used to pick label precision.
    #[must_use]
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        match self {
            Self::Linear(scale) => scale.tick_step(count),
            Self::Log(_) => None,
            Self::Point(_) => Some(1.0),
        }
    }
}

impl From<LinearScale> for ChartScale {
    fn from(scale: LinearScale) -> Self {
        Self::Linear(scale)
    }
}

impl From<LogScale> for ChartScale {
    fn from(scale: LogScale) -> Self {
        Self::Log(scale)
    }
}

impl From<PointScale> for ChartScale {
    fn from(scale: PointScale) -> Self {
        Self::Point(scale)
    }
}
