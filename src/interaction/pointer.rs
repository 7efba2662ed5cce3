use std::fmt;

use crate::core::{ChartGeometry, ChartScale};

/// Pointer payload handed to gesture handlers.
///
/// `mouse_xy` is in plot-area pixels. `current_item` is the datum under the
/// pointer, `None` when the pointer is outside the plotted range.
pub struct PointerEvent<'a, D> {
    pub mouse_xy: (f64, f64),
    pub current_item: Option<&'a D>,
    pub x_accessor: &'a dyn Fn(&D) -> f64,
    pub x_scale: &'a ChartScale,
    pub chart: &'a ChartGeometry,
}

impl<'a, D> PointerEvent<'a, D> {
    #[must_use]
    pub fn new(
        mouse_xy: (f64, f64),
        current_item: Option<&'a D>,
        x_accessor: &'a dyn Fn(&D) -> f64,
        x_scale: &'a ChartScale,
        chart: &'a ChartGeometry,
    ) -> Self {
        Self {
            mouse_xy,
            current_item,
            x_accessor,
            x_scale,
            chart,
        }
    }

    /// Screen x of the current item, snapped to its data position.
    #[must_use]
    pub fn item_x(&self) -> Option<f64> {
        self.current_item
            .map(|item| self.x_scale.scale((self.x_accessor)(item)))
    }
}

impl<D: fmt::Debug> fmt::Debug for PointerEvent<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEvent")
            .field("mouse_xy", &self.mouse_xy)
            .field("current_item", &self.current_item)
            .field("x_scale", self.x_scale)
            .field("chart_id", &self.chart.chart_id())
            .finish_non_exhaustive()
    }
}
