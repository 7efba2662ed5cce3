use std::borrow::Cow;

use tracing::trace;

use crate::core::{ChartGeometry, ChartScale, ScreenRect};
use crate::error::ChartResult;

use super::{AxisAt, AxisOrientation, AxisSpec};

const SMALL_CHART_HEIGHT_PX: f64 = 300.0;
const MEDIUM_CHART_HEIGHT_PX: f64 = 500.0;
const SMALL_CHART_TICKS: usize = 2;
const MEDIUM_CHART_TICKS: usize = 6;
const LARGE_CHART_TICKS: usize = 8;

/// X position of the axis line in plot pixels.
#[must_use]
pub fn compute_axis_location(axis_at: AxisAt, chart_width: f64) -> f64 {
    match axis_at {
        AxisAt::Left => 0.0,
        AxisAt::Right => chart_width,
        AxisAt::Middle => chart_width / 2.0,
        AxisAt::Offset(offset) => offset,
    }
}

/// Explicit tick count if given (zero included), otherwise a density that
/// steps up with the chart height.
#[must_use]
pub fn compute_tick_count(height: f64, explicit_ticks: Option<usize>) -> usize {
    if let Some(ticks) = explicit_ticks {
        return ticks;
    }
    if height < SMALL_CHART_HEIGHT_PX {
        SMALL_CHART_TICKS
    } else if height < MEDIUM_CHART_HEIGHT_PX {
        MEDIUM_CHART_TICKS
    } else {
        LARGE_CHART_TICKS
    }
}

/// Pointer-capture rectangle, in axis-local pixels, that turns a drag into
/// an axis rescale instead of a chart pan.
#[must_use]
pub fn compute_zoom_hitbox(
    orient: AxisOrientation,
    zoom_width: f64,
    chart_height: f64,
) -> ScreenRect {
    let x = match orient {
        AxisOrientation::Left => -zoom_width,
        AxisOrientation::Right => 0.0,
    };
    ScreenRect::new(x, 0.0, zoom_width, chart_height)
}

/// Scale an axis draws with, normalized to `[height, 0]` (or `[0, height]`
/// when flipped).
///
/// The shared base scale is left untouched; a new scale is built from the
/// base scale's inverse of the target range. Scales without an inverse are
/// returned as-is.
pub fn derive_effective_scale(
    base: &ChartScale,
    flip: bool,
    height: f64,
) -> ChartResult<Cow<'_, ChartScale>> {
    let true_range = if flip { (0.0, height) } else { (height, 0.0) };
    let (Some(domain_start), Some(domain_end)) =
        (base.invert(true_range.0), base.invert(true_range.1))
    else {
        return Ok(Cow::Borrowed(base));
    };

    let derived = base
        .with_domain((domain_start, domain_end))?
        .with_range(true_range)?;
    trace!(flip, height, domain_start, domain_end, "derived effective axis scale");
    Ok(Cow::Owned(derived))
}

/// Resolved placement of one axis for one geometry snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLayout {
    /// Translation of the axis origin in plot pixels.
    pub transform: (f64, f64),
    pub range: (f64, f64),
    pub scale: ChartScale,
    pub zoom_hitbox: ScreenRect,
    pub tick_count: usize,
    pub zoom_enabled: bool,
}

impl AxisLayout {
    pub fn resolve(spec: &AxisSpec, chart: &ChartGeometry) -> ChartResult<Self> {
        let height = chart.height();
        let scale = derive_effective_scale(chart.y_scale(), chart.flip_y_scale(), height)?;

        Ok(Self {
            transform: (compute_axis_location(spec.axis_at, chart.width()), 0.0),
            range: (0.0, height),
            scale: scale.into_owned(),
            zoom_hitbox: compute_zoom_hitbox(spec.orient, spec.zoom_width, height),
            tick_count: compute_tick_count(height, spec.tick_count),
            zoom_enabled: spec.zoom_enabled && chart.y_pan(),
        })
    }

    /// Converts plot pixels into axis-local pixels.
    #[must_use]
    pub fn to_local(&self, plot_xy: (f64, f64)) -> (f64, f64) {
        (plot_xy.0 - self.transform.0, plot_xy.1 - self.transform.1)
    }

    /// Hitbox test in axis-local pixels.
    #[must_use]
    pub fn hitbox_contains(&self, local_xy: (f64, f64)) -> bool {
        self.zoom_hitbox.contains(local_xy)
    }

    /// True when a zoom-enabled axis captures a pointer at `plot_xy`.
    #[must_use]
    pub fn captures(&self, plot_xy: (f64, f64)) -> bool {
        self.zoom_enabled && self.hitbox_contains(self.to_local(plot_xy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_count_breakpoints() {
        assert_eq!(compute_tick_count(0.0, None), 2);
        assert_eq!(compute_tick_count(299.0, None), 2);
        assert_eq!(compute_tick_count(300.0, None), 6);
        assert_eq!(compute_tick_count(499.0, None), 6);
        assert_eq!(compute_tick_count(500.0, None), 8);
        assert_eq!(compute_tick_count(5_000.0, None), 8);
    }

    #[test]
    fn explicit_zero_ticks_win() {
        assert_eq!(compute_tick_count(800.0, Some(0)), 0);
        assert_eq!(compute_tick_count(100.0, Some(11)), 11);
    }
}
