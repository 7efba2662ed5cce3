use serde::{Deserialize, Serialize};

use crate::core::ChartScale;
use crate::error::{ChartError, ChartResult};

/// Identifier of one chart (pane) inside a host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChartId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Immutable per-pass snapshot of one chart's plot area and Y mapping.
///
/// `width`/`height` describe the plot area inside the margin. Updates
/// (resize, Y zoom) return a new snapshot so every reader within one event
/// pass observes the same geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryFields")]
pub struct ChartGeometry {
    chart_id: ChartId,
    width: f64,
    height: f64,
    margin: Margin,
    y_scale: ChartScale,
    flip_y_scale: bool,
    y_pan: bool,
}

impl ChartGeometry {
    pub fn new(chart_id: ChartId, width: f64, height: f64, y_scale: ChartScale) -> ChartResult<Self> {
        validate_size(width, height)?;
        Ok(Self {
            chart_id,
            width,
            height,
            margin: Margin::default(),
            y_scale,
            flip_y_scale: false,
            y_pan: true,
        })
    }

    pub fn with_margin(mut self, margin: Margin) -> ChartResult<Self> {
        self.margin = margin.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_flip_y_scale(mut self, flip: bool) -> Self {
        self.flip_y_scale = flip;
        self
    }

    #[must_use]
    pub fn with_y_pan(mut self, y_pan: bool) -> Self {
        self.y_pan = y_pan;
        self
    }

    #[must_use]
    pub fn with_y_scale(mut self, y_scale: ChartScale) -> Self {
        self.y_scale = y_scale;
        self
    }

    /// Snapshot with a new Y domain and the same Y range.
    pub fn with_y_domain(self, domain: (f64, f64)) -> ChartResult<Self> {
        let y_scale = self.y_scale.with_domain(domain)?;
        Ok(self.with_y_scale(y_scale))
    }

    /// Snapshot for a new plot size; the Y range is rescaled to `[height, 0]`
    /// keeping its orientation.
    pub fn resized(self, width: f64, height: f64) -> ChartResult<Self> {
        validate_size(width, height)?;
        let (start, end) = self.y_scale.range();
        let range = if start > end {
            (height, 0.0)
        } else {
            (0.0, height)
        };
        Ok(Self {
            width,
            height,
            y_scale: self.y_scale.with_range(range)?,
            ..self
        })
    }

    #[must_use]
    pub fn chart_id(&self) -> ChartId {
        self.chart_id
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    #[must_use]
    pub fn y_scale(&self) -> &ChartScale {
        &self.y_scale
    }

    #[must_use]
    pub fn flip_y_scale(&self) -> bool {
        self.flip_y_scale
    }

    #[must_use]
    pub fn y_pan(&self) -> bool {
        self.y_pan
    }

    /// Canvas size including the margin.
    #[must_use]
    pub fn outer_size(&self) -> (f64, f64) {
        (
            self.width + self.margin.left + self.margin.right,
            self.height + self.margin.top + self.margin.bottom,
        )
    }

    /// Converts a canvas point to plot-area coordinates.
    #[must_use]
    pub fn to_plot(&self, canvas_xy: (f64, f64)) -> (f64, f64) {
        (canvas_xy.0 - self.margin.left, canvas_xy.1 - self.margin.top)
    }
}

#[derive(Deserialize)]
struct GeometryFields {
    chart_id: ChartId,
    width: f64,
    height: f64,
    #[serde(default)]
    margin: Margin,
    y_scale: ChartScale,
    #[serde(default)]
    flip_y_scale: bool,
    #[serde(default = "default_y_pan")]
    y_pan: bool,
}

fn default_y_pan() -> bool {
    true
}

impl TryFrom<GeometryFields> for ChartGeometry {
    type Error = ChartError;

    fn try_from(fields: GeometryFields) -> ChartResult<Self> {
        Ok(Self::new(fields.chart_id, fields.width, fields.height, fields.y_scale)?
            .with_margin(fields.margin)?
            .with_flip_y_scale(fields.flip_y_scale)
            .with_y_pan(fields.y_pan))
    }
}

fn validate_size(width: f64, height: f64) -> ChartResult<()> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ChartError::InvalidViewport { width, height });
    }
    Ok(())
}
