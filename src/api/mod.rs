//! Chart-facing API: Y-axis management, axis zoom and the single-chart
//! engine that routes pointer events between components.

mod axis_config;
mod axis_layout;
mod axis_zoom;
mod engine;
mod engine_config;
mod y_axis;

pub use axis_config::{AxisAt, AxisOrientation, AxisSpec, AxisStyle, DEFAULT_Y_ZOOM_WIDTH};
pub use axis_layout::{
    AxisLayout, compute_axis_location, compute_tick_count, compute_zoom_hitbox,
    derive_effective_scale,
};
pub use axis_zoom::{
    AxisZoomCapture, AxisZoomHandler, LatestAxisZoom, MouseDelta, vertical_mouse_delta,
};
pub use engine::{ChartEngine, DrawTriggers};
pub use engine_config::{ChartEngineConfig, YScaleKind};
pub use y_axis::{AxisGesture, AxisPointerListener, TickFormat, YAxis};
