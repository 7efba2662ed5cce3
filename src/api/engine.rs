use std::rc::Rc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace, warn};

use crate::core::{ChartGeometry, ChartScale};
use crate::error::ChartResult;
use crate::extensions::{ClickEvent, PathAnnotation};
use crate::interaction::{
    Brush, BrushListener, BrushTransition, DrawTrigger, InteractionMode, PointerEvent,
};
use crate::render::{RenderFrame, Renderer};

use super::{AxisGesture, AxisZoomHandler, ChartEngineConfig, LatestAxisZoom, YAxis};

/// Redraw requests produced by one pointer event.
pub type DrawTriggers = SmallVec<[DrawTrigger; 2]>;

/// Pan gesture start: pointer position and both scales as they were.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnchor {
    start_xy: (f64, f64),
    x_scale: ChartScale,
    y_scale: ChartScale,
}

/// Single-chart coordinator: owns the geometry snapshot, the x scale, plot
/// data, Y axes, an optional brush and keyed annotations, and routes pointer
/// events between them.
pub struct ChartEngine<D, R: Renderer> {
    renderer: R,
    geometry: ChartGeometry,
    x_scale: ChartScale,
    plot_data: Rc<[D]>,
    x_accessor: Rc<dyn Fn(&D) -> f64>,
    y_axes: Vec<YAxis>,
    brush: Option<Brush<D>>,
    annotations: IndexMap<String, PathAnnotation<D>>,
    mode: InteractionMode,
    pan_anchor: Option<PanAnchor>,
    zooming_axis: Option<usize>,
    zoom_observer: Option<Box<dyn AxisZoomHandler>>,
}

impl<D: Clone + 'static, R: Renderer> ChartEngine<D, R> {
    pub fn new(
        renderer: R,
        config: &ChartEngineConfig,
        x_accessor: impl Fn(&D) -> f64 + 'static,
    ) -> ChartResult<Self> {
        let geometry = config.build_geometry()?;
        let x_scale = config.build_x_scale()?;
        let y_axes = config
            .y_axes
            .iter()
            .map(|spec| YAxis::new(spec.clone())?.with_style(config.axis_style.clone()))
            .collect::<ChartResult<Vec<_>>>()?;
        debug!(
            chart_id = config.chart_id.0,
            width = config.width,
            height = config.height,
            axes = y_axes.len(),
            "chart engine created"
        );

        Ok(Self {
            renderer,
            geometry,
            x_scale,
            plot_data: Rc::from(Vec::new()),
            x_accessor: Rc::new(x_accessor),
            y_axes,
            brush: config.brush.map(Brush::new).transpose()?,
            annotations: IndexMap::new(),
            mode: InteractionMode::Idle,
            pan_anchor: None,
            zooming_axis: None,
            zoom_observer: None,
        })
    }

    pub fn set_data(&mut self, plot_data: impl Into<Rc<[D]>>) {
        self.plot_data = plot_data.into();
        debug!(count = self.plot_data.len(), "set plot data");
    }

    #[must_use]
    pub fn plot_data(&self) -> &[D] {
        &self.plot_data
    }

    #[must_use]
    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn x_scale(&self) -> &ChartScale {
        &self.x_scale
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn y_axes(&self) -> &[YAxis] {
        &self.y_axes
    }

    pub fn y_axis_mut(&mut self, index: usize) -> Option<&mut YAxis> {
        self.y_axes.get_mut(index)
    }

    pub fn push_y_axis(&mut self, axis: YAxis) {
        self.y_axes.push(axis);
    }

    #[must_use]
    pub fn brush(&self) -> Option<&Brush<D>> {
        self.brush.as_ref()
    }

    pub fn brush_mut(&mut self) -> Option<&mut Brush<D>> {
        self.brush.as_mut()
    }

    pub fn set_brush(&mut self, brush: Option<Brush<D>>) {
        self.brush = brush;
    }

    /// Installs a brush listener. No-op when the chart has no brush.
    pub fn set_brush_listener(&mut self, listener: impl BrushListener<D> + 'static) {
        if let Some(brush) = self.brush.as_mut() {
            brush.set_listener(Some(Box::new(listener)));
        }
    }

    /// Receives every axis zoom after the engine has applied it.
    pub fn set_zoom_observer(&mut self, observer: impl AxisZoomHandler + 'static) {
        self.zoom_observer = Some(Box::new(observer));
    }

    /// Adds or replaces an annotation; insertion order is draw order.
    pub fn insert_annotation(
        &mut self,
        id: impl Into<String>,
        annotation: PathAnnotation<D>,
    ) -> Option<PathAnnotation<D>> {
        self.annotations.insert(id.into(), annotation)
    }

    pub fn remove_annotation(&mut self, id: &str) -> Option<PathAnnotation<D>> {
        self.annotations.shift_remove(id)
    }

    pub fn annotation_ids(&self) -> impl Iterator<Item = &str> {
        self.annotations.keys().map(String::as_str)
    }

    pub fn set_x_domain(&mut self, domain: (f64, f64)) -> ChartResult<()> {
        self.x_scale = self.x_scale.with_domain(domain)?;
        Ok(())
    }

    /// Replaces the geometry with a snapshot for the new plot size.
    pub fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let geometry = self.geometry.resized(width, height)?;
        self.x_scale = self.x_scale.with_range((0.0, width))?;
        self.replace_geometry(geometry);
        Ok(())
    }

    fn replace_geometry(&mut self, geometry: ChartGeometry) {
        let (domain_start, domain_end) = geometry.y_scale().domain();
        debug!(
            chart_id = geometry.chart_id().0,
            width = geometry.width(),
            height = geometry.height(),
            domain_start,
            domain_end,
            "geometry replaced"
        );
        self.geometry = geometry;
    }

    /// Index of the datum whose x pixel is closest to `plot_x`; `None`
    /// outside the plot area or without data.
    #[must_use]
    pub fn nearest_item_index(&self, plot_x: f64) -> Option<usize> {
        nearest_item_index(
            &self.plot_data,
            self.x_accessor.as_ref(),
            &self.x_scale,
            &self.geometry,
            plot_x,
        )
    }

    pub fn pointer_down(&mut self, canvas_xy: (f64, f64)) -> ChartResult<DrawTriggers> {
        let plot_xy = self.geometry.to_plot(canvas_xy);
        self.cancel_gestures();

        for (index, axis) in self.y_axes.iter_mut().enumerate() {
            if axis.begin_zoom(plot_xy, &self.geometry)? {
                self.zooming_axis = Some(index);
                self.mode = InteractionMode::AxisZooming;
                return Ok(SmallVec::new());
            }
        }

        if let Some(brush) = self.brush.as_mut().filter(|brush| brush.disables_pan()) {
            let event = pointer_event(
                plot_xy,
                &self.plot_data,
                self.x_accessor.as_ref(),
                &self.x_scale,
                &self.geometry,
            );
            if matches!(brush.handle_pointer_down(&event), BrushTransition::Started) {
                self.mode = InteractionMode::Brushing;
            }
            return Ok(SmallVec::new());
        }

        self.pan_anchor = Some(PanAnchor {
            start_xy: plot_xy,
            x_scale: self.x_scale,
            y_scale: *self.geometry.y_scale(),
        });
        self.mode = InteractionMode::Panning;
        trace!(x = plot_xy.0, y = plot_xy.1, "pan started");
        Ok(SmallVec::new())
    }

    pub fn pointer_move(&mut self, canvas_xy: (f64, f64)) -> ChartResult<DrawTriggers> {
        let plot_xy = self.geometry.to_plot(canvas_xy);
        match self.mode {
            InteractionMode::AxisZooming => self.drag_axis_zoom(plot_xy),
            InteractionMode::Panning => self.drag_pan(plot_xy),
            InteractionMode::Brushing => {
                let Some(brush) = self.brush.as_mut() else {
                    return Ok(SmallVec::new());
                };
                let event = pointer_event(
                    plot_xy,
                    &self.plot_data,
                    self.x_accessor.as_ref(),
                    &self.x_scale,
                    &self.geometry,
                );
                let transition = brush.handle_pointer_move(&event);
                if matches!(transition, BrushTransition::Redraw(_))
                    && brush.redraws_on(DrawTrigger::MouseMove)
                {
                    return Ok(smallvec![DrawTrigger::MouseMove]);
                }
                Ok(SmallVec::new())
            }
            InteractionMode::Idle => Ok(SmallVec::new()),
        }
    }

    pub fn pointer_up(&mut self, canvas_xy: (f64, f64)) -> ChartResult<DrawTriggers> {
        let plot_xy = self.geometry.to_plot(canvas_xy);
        let mode = std::mem::take(&mut self.mode);
        match mode {
            InteractionMode::AxisZooming => {
                if let Some(axis) = self.zooming_axis.take().and_then(|i| self.y_axes.get_mut(i)) {
                    axis.end_zoom();
                }
            }
            InteractionMode::Panning => {
                self.pan_anchor = None;
            }
            InteractionMode::Brushing => {
                if let Some(brush) = self.brush.as_mut() {
                    let event = pointer_event(
                        plot_xy,
                        &self.plot_data,
                        self.x_accessor.as_ref(),
                        &self.x_scale,
                        &self.geometry,
                    );
                    brush.handle_pointer_up(&event);
                    return Ok(smallvec![DrawTrigger::MouseMove]);
                }
            }
            InteractionMode::Idle => {}
        }
        Ok(SmallVec::new())
    }

    /// Abandons whatever gesture is in progress without emitting.
    pub fn cancel_gestures(&mut self) {
        if let Some(brush) = self.brush.as_mut() {
            brush.terminate();
        }
        if let Some(axis) = self.zooming_axis.take().and_then(|i| self.y_axes.get_mut(i)) {
            axis.end_zoom();
        }
        self.pan_anchor = None;
        self.mode = InteractionMode::Idle;
    }

    fn drag_axis_zoom(&mut self, plot_xy: (f64, f64)) -> ChartResult<DrawTriggers> {
        let Some(axis) = self.zooming_axis.and_then(|i| self.y_axes.get(i)) else {
            return Ok(SmallVec::new());
        };
        let mut latest = LatestAxisZoom::default();
        if !axis.drag_zoom(plot_xy, self.geometry.chart_id(), &mut latest) {
            return Ok(SmallVec::new());
        }
        let Some((chart_id, domain)) = latest.request else {
            return Ok(SmallVec::new());
        };

        // The axis reports a domain for its own range orientation; the base
        // scale may run the other way when the axis is flipped.
        let axis_range = axis.effective_scale(&self.geometry)?.range();
        let base_range = self.geometry.y_scale().range();
        let same_direction = (axis_range.1 - axis_range.0).signum()
            == (base_range.1 - base_range.0).signum();
        let base_domain = if same_direction {
            domain
        } else {
            (domain.1, domain.0)
        };

        let geometry = self.geometry.with_y_domain(base_domain)?;
        self.replace_geometry(geometry);
        if let Some(observer) = self.zoom_observer.as_mut() {
            observer.on_axis_zoom(chart_id, domain);
        }
        Ok(smallvec![DrawTrigger::Drag])
    }

    fn drag_pan(&mut self, plot_xy: (f64, f64)) -> ChartResult<DrawTriggers> {
        let Some(anchor) = self.pan_anchor else {
            return Ok(SmallVec::new());
        };
        let dx = plot_xy.0 - anchor.start_xy.0;
        let dy = plot_xy.1 - anchor.start_xy.1;

        let (x_start, x_end) = anchor.x_scale.range();
        if let (Some(start), Some(end)) = (
            anchor.x_scale.invert(x_start - dx),
            anchor.x_scale.invert(x_end - dx),
        ) {
            self.x_scale = anchor.x_scale.with_domain((start, end))?;
        } else {
            warn!("x scale cannot invert; pan skipped");
            return Ok(SmallVec::new());
        }

        if self.geometry.y_pan() {
            let (y_start, y_end) = anchor.y_scale.range();
            if let (Some(start), Some(end)) = (
                anchor.y_scale.invert(y_start - dy),
                anchor.y_scale.invert(y_end - dy),
            ) {
                let geometry = self
                    .geometry
                    .with_y_scale(anchor.y_scale)
                    .with_y_domain((start, end))?;
                self.geometry = geometry;
            }
        }
        trace!(dx, dy, "pan");
        Ok(smallvec![DrawTrigger::Pan])
    }

    /// Dispatches a click to the topmost annotation under the pointer.
    /// Returns whether a handler ran.
    pub fn click(&mut self, canvas_xy: (f64, f64)) -> bool {
        let plot_xy = self.geometry.to_plot(canvas_xy);
        let event = ClickEvent { canvas_xy };
        let y_scale = *self.geometry.y_scale();
        for (id, annotation) in self.annotations.iter_mut().rev() {
            let placed =
                annotation.place(&self.plot_data, &self.x_accessor, &self.x_scale, &y_scale);
            if PathAnnotation::<D>::hit_test(&placed, plot_xy).is_none() {
                continue;
            }
            trace!(annotation = id.as_str(), "annotation clicked");
            return annotation.handle_click(
                &event,
                plot_xy,
                &placed,
                &self.plot_data,
                &self.x_scale,
                &y_scale,
            );
        }
        false
    }

    pub fn double_click(&mut self, canvas_xy: (f64, f64)) -> ChartResult<bool> {
        self.axis_gesture(AxisGesture::DoubleClick, canvas_xy)
    }

    pub fn context_menu(&mut self, canvas_xy: (f64, f64)) -> ChartResult<bool> {
        self.axis_gesture(AxisGesture::ContextMenu, canvas_xy)
    }

    /// Offers the gesture to each axis strip in order; the first listener wins.
    fn axis_gesture(&mut self, gesture: AxisGesture, canvas_xy: (f64, f64)) -> ChartResult<bool> {
        let plot_xy = self.geometry.to_plot(canvas_xy);
        for axis in &mut self.y_axes {
            if axis.handle_gesture(gesture, plot_xy, &self.geometry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Axes, annotations and the brush rectangle for the current snapshot.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let (width, height) = self.geometry.outer_size();
        let mut frame = RenderFrame::new(width, height);
        for axis in &self.y_axes {
            frame.extend(axis.build_frame(&self.geometry)?);
        }

        let y_scale = self.geometry.y_scale();
        for annotation in self.annotations.values() {
            let placed =
                annotation.place(&self.plot_data, &self.x_accessor, &self.x_scale, y_scale);
            annotation.append_to_frame(&placed, &self.geometry, &mut frame);
        }

        if let Some(rect) = self.brush.as_ref().and_then(|brush| brush.draw(&self.geometry)) {
            frame.rects.push(rect);
        }
        Ok(frame)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        frame.validate()?;
        self.renderer.render(&frame)
    }

    /// Renders once when `triggers` asks for a repaint.
    pub fn redraw_on(&mut self, triggers: &[DrawTrigger]) -> ChartResult<bool> {
        if triggers.is_empty() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn nearest_item_index<D>(
    plot_data: &[D],
    x_accessor: &dyn Fn(&D) -> f64,
    x_scale: &ChartScale,
    chart: &ChartGeometry,
    plot_x: f64,
) -> Option<usize> {
    if !(0.0..=chart.width()).contains(&plot_x) {
        return None;
    }
    plot_data
        .iter()
        .enumerate()
        .min_by_key(|&(_, item)| OrderedFloat((x_scale.scale(x_accessor(item)) - plot_x).abs()))
        .map(|(index, _)| index)
}

fn pointer_event<'a, D>(
    plot_xy: (f64, f64),
    plot_data: &'a [D],
    x_accessor: &'a dyn Fn(&D) -> f64,
    x_scale: &'a ChartScale,
    chart: &'a ChartGeometry,
) -> PointerEvent<'a, D> {
    let current_item = nearest_item_index(plot_data, x_accessor, x_scale, chart, plot_xy.0)
        .and_then(|index| plot_data.get(index));
    PointerEvent::new(plot_xy, current_item, x_accessor, x_scale, chart)
}
