//! Brush (region selection) gesture.
//!
//! [`BrushState`] is the framework-free state machine:
//!
//! ```text
//! Idle --pointer down--> Selecting --pointer move--> Selecting
//!   ^                        |
//!   +------pointer up--------+   (commits when a move happened)
//!   +------terminate()-------+   (never commits)
//! ```
//!
//! Each transition returns a [`BrushTransition`] describing what the host
//! should do. [`Brush`] is the adapter that owns the state, forwards outcomes
//! to a [`BrushListener`] and produces the selection rectangle to paint.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ChartGeometry, ScreenRect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RectPrimitive, RenderFrame, Stroke, StrokeDash};

use super::{DrawTrigger, PointerEvent};

const BRUSH_DRAW_TRIGGERS: [DrawTrigger; 3] =
    [DrawTrigger::MouseMove, DrawTrigger::Pan, DrawTrigger::Drag];

/// Selection shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushKind {
    /// X range only; the rectangle spans the full chart height.
    OneD,
    /// Free rectangle over both axes.
    #[default]
    TwoD,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: f64,
    pub dash: StrokeDash,
}

impl BrushStyle {
    #[must_use]
    pub fn outline(&self) -> Stroke {
        Stroke::solid(self.stroke, self.stroke_width).with_dash(self.dash)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, color) in [("stroke", self.stroke), ("fill", self.fill)] {
            color
                .validate()
                .map_err(|e| ChartError::InvalidConfig(format!("brush style `{name}`: {e}")))?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "brush stroke width must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::rgba(0.2, 0.2, 0.2, 0.25),
            stroke_width: 1.0,
            dash: StrokeDash::ShortDash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub kind: BrushKind,
    #[serde(default)]
    pub style: BrushStyle,
}

fn default_enabled() -> bool {
    true
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            kind: BrushKind::default(),
            style: BrushStyle::default(),
        }
    }
}

impl BrushConfig {
    #[must_use]
    pub fn with_kind(mut self, kind: BrushKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: BrushStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.style.validate()
    }
}

/// One end of a selection in data space.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushPoint<D> {
    pub item: D,
    pub x_value: f64,
    pub y_value: f64,
}

/// Finalized selection passed to [`BrushListener::on_brush`].
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSelection<D> {
    pub start: BrushPoint<D>,
    pub end: BrushPoint<D>,
    pub rect: ScreenRect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrushTransition<D> {
    /// Event did not apply to the current state or referenced no datum.
    Ignored,
    Started,
    /// Selection rectangle changed; repaint.
    Redraw(ScreenRect),
    Committed(BrushSelection<D>),
    /// Pointer released without any move.
    Clicked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrushState<D> {
    kind: BrushKind,
    anchor: Option<BrushPoint<D>>,
    anchor_xy: Option<(f64, f64)>,
    cursor: Option<BrushPoint<D>>,
    rect: Option<ScreenRect>,
    selecting: bool,
    dragged: bool,
}

impl<D> Default for BrushState<D> {
    fn default() -> Self {
        Self::new(BrushKind::default())
    }
}

impl<D> BrushState<D> {
    #[must_use]
    pub fn new(kind: BrushKind) -> Self {
        Self {
            kind,
            anchor: None,
            anchor_xy: None,
            cursor: None,
            rect: None,
            selecting: false,
            dragged: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    #[must_use]
    pub fn anchor(&self) -> Option<&BrushPoint<D>> {
        self.anchor.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&BrushPoint<D>> {
        self.cursor.as_ref()
    }

    #[must_use]
    pub fn rect(&self) -> Option<ScreenRect> {
        self.rect
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Drops every transient field without emitting anything.
    pub fn terminate(&mut self) {
        if self.selecting {
            trace!("brush terminated");
        }
        self.anchor = None;
        self.anchor_xy = None;
        self.cursor = None;
        self.rect = None;
        self.selecting = false;
        self.dragged = false;
    }
}

impl<D: Clone> BrushState<D> {
    pub fn on_pointer_down(&mut self, event: &PointerEvent<'_, D>) -> BrushTransition<D> {
        let Some((anchor, anchor_xy)) = resolve_point(event) else {
            return BrushTransition::Ignored;
        };

        trace!(x = anchor_xy.0, y = anchor_xy.1, "brush anchored");
        self.terminate();
        self.anchor = Some(anchor);
        self.anchor_xy = Some(anchor_xy);
        self.selecting = true;
        BrushTransition::Started
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent<'_, D>) -> BrushTransition<D> {
        let Some(anchor_xy) = self.anchor_xy else {
            return BrushTransition::Ignored;
        };
        let Some((cursor, cursor_xy)) = resolve_point(event) else {
            return BrushTransition::Ignored;
        };

        let rect = match self.kind {
            BrushKind::TwoD => ScreenRect::from_corners(anchor_xy, cursor_xy),
            BrushKind::OneD => ScreenRect::new(
                anchor_xy.0.min(cursor_xy.0),
                0.0,
                (cursor_xy.0 - anchor_xy.0).abs(),
                event.chart.height(),
            ),
        };

        self.dragged = true;
        self.selecting = true;
        self.cursor = Some(cursor);
        self.rect = Some(rect);
        trace!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "brush rect updated"
        );
        BrushTransition::Redraw(rect)
    }

    /// Ends the gesture. The pointer position is not consulted: the last
    /// move defines the selection.
    pub fn on_pointer_up(&mut self) -> BrushTransition<D> {
        if !self.selecting {
            return BrushTransition::Ignored;
        }

        let dragged = self.dragged;
        let anchor = self.anchor.take();
        let cursor = self.cursor.take();
        let rect = self.rect.take();
        self.terminate();

        match (dragged, anchor, cursor, rect) {
            (true, Some(start), Some(end), Some(rect)) => {
                debug!(
                    x = rect.x,
                    y = rect.y,
                    width = rect.width,
                    height = rect.height,
                    "brush committed"
                );
                BrushTransition::Committed(BrushSelection { start, end, rect })
            }
            _ => BrushTransition::Clicked,
        }
    }
}

fn resolve_point<D: Clone>(event: &PointerEvent<'_, D>) -> Option<(BrushPoint<D>, (f64, f64))> {
    let item = event.current_item?;
    let (_, mouse_y) = event.mouse_xy;
    let Some(y_value) = event.chart.y_scale().invert(mouse_y) else {
        warn!(
            chart_id = event.chart.chart_id().0,
            "brush needs an invertible y scale; pointer event skipped"
        );
        return None;
    };

    let x_value = (event.x_accessor)(item);
    let screen_xy = (event.x_scale.scale(x_value), mouse_y);
    Some((
        BrushPoint {
            item: item.clone(),
            x_value,
            y_value,
        },
        screen_xy,
    ))
}

/// Brush lifecycle hooks. Unimplemented hooks are no-ops.
pub trait BrushListener<D> {
    fn on_start(&mut self, _event: &PointerEvent<'_, D>) {}
    fn on_brush(&mut self, _selection: &BrushSelection<D>, _event: &PointerEvent<'_, D>) {}
}

/// Brush component: state machine plus style, enablement and listener.
pub struct Brush<D> {
    config: BrushConfig,
    state: BrushState<D>,
    listener: Option<Box<dyn BrushListener<D>>>,
}

impl<D> std::fmt::Debug for Brush<D>
where
    D: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Brush")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl<D: Clone> Brush<D> {
    pub fn new(config: BrushConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: BrushState::new(config.kind),
            listener: None,
        })
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl BrushListener<D> + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn BrushListener<D>>>) {
        self.listener = listener;
    }

    #[must_use]
    pub fn config(&self) -> BrushConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> &BrushState<D> {
        &self.state
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Disabling drops any selection in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.state.terminate();
        }
        self.config.enabled = enabled;
    }

    /// Chart panning is suspended while an enabled brush owns the pointer.
    #[must_use]
    pub fn disables_pan(&self) -> bool {
        self.config.enabled
    }

    #[must_use]
    pub fn draw_on(&self) -> &'static [DrawTrigger] {
        &BRUSH_DRAW_TRIGGERS
    }

    #[must_use]
    pub fn redraws_on(&self, trigger: DrawTrigger) -> bool {
        self.config.enabled && BRUSH_DRAW_TRIGGERS.contains(&trigger)
    }

    pub fn handle_pointer_down(&mut self, event: &PointerEvent<'_, D>) -> BrushTransition<D> {
        if !self.config.enabled {
            return BrushTransition::Ignored;
        }
        let transition = self.state.on_pointer_down(event);
        if matches!(transition, BrushTransition::Started) {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_start(event);
            }
        }
        transition
    }

    pub fn handle_pointer_move(&mut self, event: &PointerEvent<'_, D>) -> BrushTransition<D> {
        if !self.config.enabled {
            return BrushTransition::Ignored;
        }
        self.state.on_pointer_move(event)
    }

    /// Pointer release / click. `event` is passed through to `on_brush` as
    /// its context.
    pub fn handle_pointer_up(&mut self, event: &PointerEvent<'_, D>) -> BrushTransition<D> {
        if !self.config.enabled {
            return BrushTransition::Ignored;
        }
        let transition = self.state.on_pointer_up();
        if let BrushTransition::Committed(selection) = &transition {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_brush(selection, event);
            }
        }
        transition
    }

    pub fn terminate(&mut self) {
        self.state.terminate();
    }

    /// Selection rectangle in canvas pixels, if one should be painted.
    #[must_use]
    pub fn draw(&self, chart: &ChartGeometry) -> Option<RectPrimitive> {
        if !self.config.enabled || !self.state.is_selecting() {
            return None;
        }
        let rect = self.state.rect()?;
        let margin = chart.margin();
        let style = self.config.style;
        let canvas_rect = ScreenRect::new(
            rect.x + margin.left,
            rect.y + margin.top,
            rect.width,
            rect.height,
        );
        Some(RectPrimitive::filled(canvas_rect, style.fill).with_stroke(style.outline()))
    }

    #[must_use]
    pub fn render_frame(&self, chart: &ChartGeometry) -> RenderFrame {
        let (width, height) = chart.outer_size();
        let frame = RenderFrame::new(width, height);
        match self.draw(chart) {
            Some(rect) => frame.with_rect(rect),
            None => frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChartId, ChartScale};

    fn chart() -> ChartGeometry {
        let y_scale = ChartScale::linear((0.0, 100.0), (100.0, 0.0)).expect("y scale");
        ChartGeometry::new(ChartId(1), 200.0, 100.0, y_scale).expect("geometry")
    }

    #[test]
    fn pointer_down_replaces_previous_anchor() {
        let chart = chart();
        let x_scale = ChartScale::linear((0.0, 200.0), (0.0, 200.0)).expect("x scale");
        let accessor = |v: &f64| *v;
        let (first, second) = (10.0, 30.0);
        let mut state = BrushState::new(BrushKind::TwoD);

        let down = PointerEvent::new((10.0, 10.0), Some(&first), &accessor, &x_scale, &chart);
        let drag = PointerEvent::new((20.0, 20.0), Some(&first), &accessor, &x_scale, &chart);
        let again = PointerEvent::new((30.0, 30.0), Some(&second), &accessor, &x_scale, &chart);
        state.on_pointer_down(&down);
        state.on_pointer_move(&drag);
        state.on_pointer_down(&again);

        assert_eq!(state.anchor().map(|a| a.x_value), Some(30.0));
        assert!(state.rect().is_none());
        assert_eq!(state.on_pointer_up(), BrushTransition::Clicked);
    }

    #[test]
    fn point_y_scale_is_skipped() {
        let y_scale = ChartScale::point(5, (100.0, 0.0)).expect("point scale");
        let chart = ChartGeometry::new(ChartId(1), 200.0, 100.0, y_scale).expect("geometry");
        let x_scale = ChartScale::linear((0.0, 200.0), (0.0, 200.0)).expect("x scale");
        let accessor = |v: &f64| *v;
        let item = 10.0;
        let mut state = BrushState::new(BrushKind::TwoD);

        let event = PointerEvent::new((10.0, 10.0), Some(&item), &accessor, &x_scale, &chart);
        assert_eq!(state.on_pointer_down(&event), BrushTransition::Ignored);
        assert!(!state.is_selecting());
    }
}
