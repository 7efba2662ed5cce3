use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DEFAULT_FONT_FAMILY, Stroke, StrokeDash, TextFont};

/// Horizontal placement of the axis line inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AxisAt {
    Left,
    #[default]
    Right,
    Middle,
    /// Absolute x offset in plot pixels.
    Offset(f64),
}

/// Side of the axis line that ticks, labels and the zoom hitbox extend to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisOrientation {
    Left,
    #[default]
    Right,
}

impl AxisOrientation {
    /// `+1` when ticks point right, `-1` when they point left.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

pub const DEFAULT_Y_ZOOM_WIDTH: f64 = 40.0;

/// Placement, tick and zoom settings of one Y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    #[serde(default)]
    pub axis_at: AxisAt,
    #[serde(default)]
    pub orient: AxisOrientation,
    /// Explicit tick count; derived from the chart height when `None`.
    #[serde(default)]
    pub tick_count: Option<usize>,
    /// Explicit tick values; bypass generated ticks when set.
    #[serde(default)]
    pub tick_values: Option<Vec<f64>>,
    #[serde(default = "default_zoom_width")]
    pub zoom_width: f64,
    #[serde(default = "default_zoom_enabled")]
    pub zoom_enabled: bool,
}

fn default_zoom_width() -> f64 {
    DEFAULT_Y_ZOOM_WIDTH
}

fn default_zoom_enabled() -> bool {
    true
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            axis_at: AxisAt::default(),
            orient: AxisOrientation::default(),
            tick_count: None,
            tick_values: None,
            zoom_width: default_zoom_width(),
            zoom_enabled: default_zoom_enabled(),
        }
    }
}

impl AxisSpec {
    #[must_use]
    pub fn left() -> Self {
        Self {
            axis_at: AxisAt::Left,
            orient: AxisOrientation::Left,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn right() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_axis_at(mut self, axis_at: AxisAt) -> Self {
        self.axis_at = axis_at;
        self
    }

    #[must_use]
    pub fn with_orient(mut self, orient: AxisOrientation) -> Self {
        self.orient = orient;
        self
    }

    #[must_use]
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = Some(tick_count);
        self
    }

    #[must_use]
    pub fn with_tick_values(mut self, tick_values: Vec<f64>) -> Self {
        self.tick_values = Some(tick_values);
        self
    }

    #[must_use]
    pub fn with_zoom_width(mut self, zoom_width: f64) -> Self {
        self.zoom_width = zoom_width;
        self
    }

    #[must_use]
    pub fn with_zoom_enabled(mut self, zoom_enabled: bool) -> Self {
        self.zoom_enabled = zoom_enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let AxisAt::Offset(offset) = self.axis_at {
            if !offset.is_finite() {
                return Err(ChartError::InvalidConfig(
                    "axis offset must be finite".to_owned(),
                ));
            }
        }
        if !self.zoom_width.is_finite() || self.zoom_width < 0.0 {
            return Err(ChartError::InvalidConfig(
                "axis zoom width must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(values) = &self.tick_values {
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidConfig(
                    "axis tick values must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Visual styling for axis lines, ticks, labels and grid lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    pub stroke: Color,
    pub stroke_width: f64,
    pub tick_stroke: Color,
    pub tick_stroke_opacity: f64,
    pub tick_stroke_width: f64,
    pub tick_dash: StrokeDash,
    pub tick_label_fill: Color,
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: u16,
    pub inner_tick_size: f64,
    pub outer_tick_size: f64,
    pub tick_padding: f64,
    pub show_domain: bool,
    pub show_ticks: bool,
    pub show_tick_label: bool,
    pub show_grid_lines: bool,
    pub grid_lines_stroke: Color,
    pub grid_lines_stroke_width: f64,
    pub grid_lines_dash: StrokeDash,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            stroke_width: 1.0,
            tick_stroke: Color::BLACK,
            tick_stroke_opacity: 1.0,
            tick_stroke_width: 1.0,
            tick_dash: StrokeDash::Solid,
            tick_label_fill: Color::BLACK,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size_px: 12.0,
            font_weight: 400,
            inner_tick_size: 4.0,
            outer_tick_size: 0.0,
            tick_padding: 4.0,
            show_domain: true,
            show_ticks: true,
            show_tick_label: true,
            show_grid_lines: false,
            // #E2E4EC
            grid_lines_stroke: Color::rgb(226.0 / 255.0, 228.0 / 255.0, 236.0 / 255.0),
            grid_lines_stroke_width: 1.0,
            grid_lines_dash: StrokeDash::Solid,
        }
    }
}

impl AxisStyle {
    #[must_use]
    pub fn domain_stroke(&self) -> Stroke {
        Stroke::solid(self.stroke, self.stroke_width)
    }

    #[must_use]
    pub fn tick_line_stroke(&self) -> Stroke {
        Stroke::solid(
            self.tick_stroke.with_alpha(self.tick_stroke_opacity),
            self.tick_stroke_width,
        )
        .with_dash(self.tick_dash)
    }

    #[must_use]
    pub fn grid_stroke(&self) -> Stroke {
        Stroke::solid(self.grid_lines_stroke, self.grid_lines_stroke_width)
            .with_dash(self.grid_lines_dash)
    }

    #[must_use]
    pub fn label_font(&self) -> TextFont {
        TextFont {
            family: self.font_family.clone(),
            size_px: self.font_size_px,
            weight: self.font_weight,
        }
    }

    /// Rejects styles whose primitives would fail frame validation.
    pub fn validate(&self) -> ChartResult<()> {
        let invalid = |part: &str, e: ChartError| {
            ChartError::InvalidConfig(format!("axis style {part}: {e}"))
        };
        if !(0.0..=1.0).contains(&self.tick_stroke_opacity) {
            return Err(ChartError::InvalidConfig(format!(
                "axis style tick opacity {} is outside [0, 1]",
                self.tick_stroke_opacity
            )));
        }
        self.domain_stroke().validate().map_err(|e| invalid("domain", e))?;
        self.tick_line_stroke().validate().map_err(|e| invalid("ticks", e))?;
        self.grid_stroke().validate().map_err(|e| invalid("grid", e))?;
        self.tick_label_fill
            .validate()
            .map_err(|e| invalid("label fill", e))?;
        self.label_font().validate().map_err(|e| invalid("font", e))?;
        for (name, size) in [
            ("inner_tick_size", self.inner_tick_size),
            ("outer_tick_size", self.outer_tick_size),
            ("tick_padding", self.tick_padding),
        ] {
            if !size.is_finite() || size < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "axis style `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}
