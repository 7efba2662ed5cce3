use tracing::debug;

use crate::core::{Accessor, ChartGeometry, ChartId, ChartScale};
use crate::core::ticks::step_precision;
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};
use std::fmt;

use super::axis_zoom::{AxisZoomCapture, AxisZoomHandler, MouseDelta, vertical_mouse_delta};
use super::{AxisLayout, AxisOrientation, AxisSpec, AxisStyle};

/// Tick label formatter: a fixed string or a function of the tick value.
pub type TickFormat = Accessor<f64, String>;

/// Non-drag pointer gestures an axis strip reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisGesture {
    DoubleClick,
    ContextMenu,
}

/// Host hooks for gestures on the axis strip. Positions are plot pixels.
pub trait AxisPointerListener {
    fn on_double_click(&mut self, _chart_id: ChartId, _plot_xy: (f64, f64)) {}

    fn on_context_menu(&mut self, _chart_id: ChartId, _plot_xy: (f64, f64)) {}
}

/// Vertical price axis bound to one chart.
///
/// Holds configuration plus the transient drag capture used for axis
/// rescaling. Scale and geometry are read from the snapshot passed to each
/// call; the axis never stores them.
pub struct YAxis {
    spec: AxisSpec,
    style: AxisStyle,
    tick_format: Option<TickFormat>,
    mouse_delta: MouseDelta,
    zoom_capture: Option<AxisZoomCapture>,
    pointer_listener: Option<Box<dyn AxisPointerListener>>,
}

impl fmt::Debug for YAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YAxis")
            .field("spec", &self.spec)
            .field("style", &self.style)
            .field("tick_format", &self.tick_format)
            .field("zoom_capture", &self.zoom_capture)
            .field("has_pointer_listener", &self.pointer_listener.is_some())
            .finish_non_exhaustive()
    }
}

impl YAxis {
    pub fn new(spec: AxisSpec) -> ChartResult<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            style: AxisStyle::default(),
            tick_format: None,
            mouse_delta: vertical_mouse_delta,
            zoom_capture: None,
            pointer_listener: None,
        })
    }

    pub fn with_style(mut self, style: AxisStyle) -> ChartResult<Self> {
        style.validate()?;
        self.style = style;
        Ok(self)
    }

    #[must_use]
    pub fn with_tick_format(mut self, tick_format: TickFormat) -> Self {
        self.tick_format = Some(tick_format);
        self
    }

    #[must_use]
    pub fn with_pointer_listener(mut self, listener: impl AxisPointerListener + 'static) -> Self {
        self.pointer_listener = Some(Box::new(listener));
        self
    }

    pub fn set_pointer_listener(&mut self, listener: Option<Box<dyn AxisPointerListener>>) {
        self.pointer_listener = listener;
    }

    #[must_use]
    pub fn with_mouse_delta(mut self, mouse_delta: MouseDelta) -> Self {
        self.mouse_delta = mouse_delta;
        self
    }

    #[must_use]
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    #[must_use]
    pub fn style(&self) -> &AxisStyle {
        &self.style
    }

    pub fn layout(&self, chart: &ChartGeometry) -> ChartResult<AxisLayout> {
        AxisLayout::resolve(&self.spec, chart)
    }

    /// Tick values for the current snapshot, in scale domain order.
    pub fn ticks(&self, chart: &ChartGeometry) -> ChartResult<Vec<f64>> {
        let layout = self.layout(chart)?;
        Ok(self.ticks_for(&layout))
    }

    fn ticks_for(&self, layout: &AxisLayout) -> Vec<f64> {
        match &self.spec.tick_values {
            Some(values) => values.clone(),
            None => layout.scale.ticks(layout.tick_count),
        }
    }

    fn format_tick(&self, value: f64, precision: usize) -> String {
        match &self.tick_format {
            Some(format) => format.evaluate(&value),
            None => format!("{value:.precision$}"),
        }
    }

    /// Axis line, ticks, labels and grid lines in canvas pixels.
    pub fn build_frame(&self, chart: &ChartGeometry) -> ChartResult<RenderFrame> {
        let layout = self.layout(chart)?;
        let (outer_width, outer_height) = chart.outer_size();
        let mut frame = RenderFrame::new(outer_width, outer_height);

        let margin = chart.margin();
        let style = &self.style;
        let sign = self.spec.orient.sign();
        let axis_x = margin.left + layout.transform.0;
        let offset_y = margin.top + layout.transform.1;
        let (range_start, range_end) = layout.scale.range();
        let (range_low, range_high) = (range_start.min(range_end), range_start.max(range_end));

        if style.show_domain {
            let stroke = style.domain_stroke();
            frame.lines.push(LinePrimitive::new(
                (axis_x, offset_y + range_low),
                (axis_x, offset_y + range_high),
                stroke,
            ));
            if style.outer_tick_size > 0.0 {
                let outer_x = axis_x + sign * style.outer_tick_size;
                for edge in [range_low, range_high] {
                    frame.lines.push(LinePrimitive::horizontal(
                        offset_y + edge,
                        axis_x,
                        outer_x,
                        stroke,
                    ));
                }
            }
        }

        let ticks = self.ticks_for(&layout);
        let precision = layout
            .scale
            .tick_step(layout.tick_count)
            .map_or(2, step_precision);
        let tick_stroke = style.tick_line_stroke();
        let grid_stroke = style.grid_stroke();
        let label_font = style.label_font();
        let label_x = axis_x + sign * (style.inner_tick_size.max(0.0) + style.tick_padding);
        let label_align = match self.spec.orient {
            AxisOrientation::Left => TextHAlign::Right,
            AxisOrientation::Right => TextHAlign::Left,
        };

        for value in ticks {
            let y = layout.scale.scale(value);
            if !y.is_finite() || y < range_low - 1e-9 || y > range_high + 1e-9 {
                continue;
            }
            let canvas_y = offset_y + y;

            if style.show_grid_lines {
                frame.lines.push(LinePrimitive::horizontal(
                    canvas_y,
                    margin.left,
                    margin.left + chart.width(),
                    grid_stroke,
                ));
            }
            if style.show_ticks {
                frame.lines.push(LinePrimitive::horizontal(
                    canvas_y,
                    axis_x,
                    axis_x + sign * style.inner_tick_size,
                    tick_stroke,
                ));
            }
            if style.show_tick_label {
                let text = self.format_tick(value, precision);
                if !text.is_empty() {
                    frame.texts.push(
                        TextPrimitive::new(text, (label_x, canvas_y), label_align)
                            .with_font(label_font.clone())
                            .with_fill(style.tick_label_fill),
                    );
                }
            }
        }

        Ok(frame)
    }

    /// Starts an axis rescale if `plot_xy` falls in the zoom hitbox.
    pub fn begin_zoom(&mut self, plot_xy: (f64, f64), chart: &ChartGeometry) -> ChartResult<bool> {
        let layout = self.layout(chart)?;
        if !layout.captures(plot_xy) {
            return Ok(false);
        }
        self.zoom_capture = Some(AxisZoomCapture::start(plot_xy, layout.scale));
        debug!(chart_id = chart.chart_id().0, "axis zoom started");
        Ok(true)
    }

    /// Forwards a double-click or context-menu request landing on the axis
    /// strip to the pointer listener. Returns whether a listener ran.
    pub fn handle_gesture(
        &mut self,
        gesture: AxisGesture,
        plot_xy: (f64, f64),
        chart: &ChartGeometry,
    ) -> ChartResult<bool> {
        let layout = self.layout(chart)?;
        if !layout.hitbox_contains(layout.to_local(plot_xy)) {
            return Ok(false);
        }
        let Some(listener) = self.pointer_listener.as_mut() else {
            return Ok(false);
        };
        let chart_id = chart.chart_id();
        match gesture {
            AxisGesture::DoubleClick => listener.on_double_click(chart_id, plot_xy),
            AxisGesture::ContextMenu => listener.on_context_menu(chart_id, plot_xy),
        }
        debug!(chart_id = chart_id.0, ?gesture, "axis gesture");
        Ok(true)
    }

    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.zoom_capture.is_some()
    }

    /// Computes the dragged domain and forwards it. Returns whether a
    /// notification was sent.
    pub fn drag_zoom(
        &self,
        plot_xy: (f64, f64),
        chart_id: ChartId,
        handler: &mut dyn AxisZoomHandler,
    ) -> bool {
        let Some(capture) = self.zoom_capture else {
            return false;
        };
        match capture.drag(plot_xy, self.mouse_delta) {
            Some(new_domain) => {
                self.axis_zoom_callback(chart_id, new_domain, handler);
                true
            }
            None => false,
        }
    }

    pub fn end_zoom(&mut self) {
        self.zoom_capture = None;
    }

    /// Forwards a post-drag domain to the chart's zoom handler.
    pub fn axis_zoom_callback(
        &self,
        chart_id: ChartId,
        new_domain: (f64, f64),
        handler: &mut dyn AxisZoomHandler,
    ) {
        handler.on_axis_zoom(chart_id, new_domain);
    }

    /// Scale the axis draws with for `chart`.
    pub fn effective_scale(&self, chart: &ChartGeometry) -> ChartResult<ChartScale> {
        Ok(self.layout(chart)?.scale)
    }
}
