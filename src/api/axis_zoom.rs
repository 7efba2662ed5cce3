use tracing::{debug, warn};

use crate::core::{ChartId, ChartScale};

/// Signed drag distance used to rescale an axis.
pub type MouseDelta = fn(start: (f64, f64), current: (f64, f64)) -> f64;

/// Default Y-axis delta: dragging upward is positive.
#[must_use]
pub fn vertical_mouse_delta(start: (f64, f64), current: (f64, f64)) -> f64 {
    start.1 - current.1
}

/// Receives post-drag axis domains. Implemented by whatever owns the chart
/// geometry.
pub trait AxisZoomHandler {
    fn on_axis_zoom(&mut self, chart_id: ChartId, new_domain: (f64, f64));
}

/// Handler that keeps only the latest request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatestAxisZoom {
    pub request: Option<(ChartId, (f64, f64))>,
}

impl AxisZoomHandler for LatestAxisZoom {
    fn on_axis_zoom(&mut self, chart_id: ChartId, new_domain: (f64, f64)) {
        self.request = Some((chart_id, new_domain));
    }
}

/// Drag state for rescaling one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisZoomCapture {
    start_xy: (f64, f64),
    start_scale: ChartScale,
}

impl AxisZoomCapture {
    #[must_use]
    pub fn start(start_xy: (f64, f64), start_scale: ChartScale) -> Self {
        Self {
            start_xy,
            start_scale,
        }
    }

    #[must_use]
    pub fn start_xy(&self) -> (f64, f64) {
        self.start_xy
    }

    /// Domain for the current pointer position.
    ///
    /// Each range endpoint moves away from the range centre by the drag delta
    /// and is mapped back through the scale captured at drag start. Returns
    /// `None` when the moved range would collapse or flip, or when the scale
    /// has no inverse.
    #[must_use]
    pub fn drag(&self, mouse_xy: (f64, f64), mouse_delta: MouseDelta) -> Option<(f64, f64)> {
        let delta = mouse_delta(self.start_xy, mouse_xy);
        let (range_start, range_end) = self.start_scale.range();
        let center = (range_start + range_end) / 2.0;
        let moved = |edge: f64| edge + (edge - center).signum() * delta;
        let moved_start = moved(range_start);
        let moved_end = moved(range_end);

        let original_direction = (range_end - range_start).signum();
        let moved_direction = (moved_end - moved_start).signum();
        if moved_end == moved_start || original_direction != moved_direction {
            warn!(delta, "axis zoom rejected: range would collapse or flip");
            return None;
        }

        let new_domain = (
            self.start_scale.invert(moved_start)?,
            self.start_scale.invert(moved_end)?,
        );
        if !new_domain.0.is_finite() || !new_domain.1.is_finite() || new_domain.0 == new_domain.1 {
            return None;
        }
        debug!(
            delta,
            domain_start = new_domain.0,
            domain_end = new_domain.1,
            "axis zoom"
        );
        Some(new_domain)
    }
}
