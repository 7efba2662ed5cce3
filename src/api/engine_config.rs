use serde::{Deserialize, Serialize};

use crate::core::{ChartGeometry, ChartId, ChartScale, Margin};
use crate::error::{ChartError, ChartResult};
use crate::interaction::BrushConfig;

use super::{AxisSpec, AxisStyle};

/// Mapping used for the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YScaleKind {
    #[default]
    Linear,
    Log,
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    #[serde(default)]
    pub chart_id: ChartId,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    #[serde(default)]
    pub y_scale_kind: YScaleKind,
    #[serde(default)]
    pub flip_y_scale: bool,
    #[serde(default = "default_y_pan")]
    pub y_pan: bool,
    #[serde(default = "default_y_axes")]
    pub y_axes: Vec<AxisSpec>,
    #[serde(default)]
    pub axis_style: AxisStyle,
    #[serde(default)]
    pub brush: Option<BrushConfig>,
}

impl ChartEngineConfig {
    /// Creates a config with one right-hand axis and no brush.
    #[must_use]
    pub fn new(width: f64, height: f64, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            chart_id: ChartId::default(),
            width,
            height,
            margin: Margin::default(),
            x_domain,
            y_domain,
            y_scale_kind: YScaleKind::default(),
            flip_y_scale: false,
            y_pan: default_y_pan(),
            y_axes: default_y_axes(),
            axis_style: AxisStyle::default(),
            brush: None,
        }
    }

    #[must_use]
    pub fn with_chart_id(mut self, chart_id: ChartId) -> Self {
        self.chart_id = chart_id;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_y_scale_kind(mut self, kind: YScaleKind) -> Self {
        self.y_scale_kind = kind;
        self
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
    pub fn with_y_axes(mut self, y_axes: Vec<AxisSpec>) -> Self {
        self.y_axes = y_axes;
        self
    }

    #[must_use]
    pub fn with_axis_style(mut self, style: AxisStyle) -> Self {
        self.axis_style = style;
        self
    }

    #[must_use]
    pub fn with_brush(mut self, brush: BrushConfig) -> Self {
        self.brush = Some(brush);
        self
    }

    /// Y scale over `y_domain`, mapped to `[height, 0]`.
    pub fn build_y_scale(&self) -> ChartResult<ChartScale> {
        let range = (self.height, 0.0);
        match self.y_scale_kind {
            YScaleKind::Linear => ChartScale::linear(self.y_domain, range),
            YScaleKind::Log => ChartScale::log(self.y_domain, range),
        }
    }

    /// X scale over `x_domain`, mapped to `[0, width]`.
    pub fn build_x_scale(&self) -> ChartResult<ChartScale> {
        ChartScale::linear(self.x_domain, (0.0, self.width))
    }

    pub fn build_geometry(&self) -> ChartResult<ChartGeometry> {
        let valid_size = |value: f64| value.is_finite() && value > 0.0;
        if !valid_size(self.width) || !valid_size(self.height) {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(
            ChartGeometry::new(self.chart_id, self.width, self.height, self.build_y_scale()?)?
                .with_margin(self.margin)?
                .with_flip_y_scale(self.flip_y_scale)
                .with_y_pan(self.y_pan),
        )
    }

    /// Checks every derived piece without keeping it.
    pub fn validate(&self) -> ChartResult<()> {
        self.build_geometry()?;
        self.build_x_scale()?;
        for spec in &self.y_axes {
            spec.validate()?;
        }
        self.axis_style.validate()?;
        if let Some(brush) = &self.brush {
            brush.validate()?;
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_y_pan() -> bool {
    true
}

fn default_y_axes() -> Vec<AxisSpec> {
    vec![AxisSpec::right()]
}
