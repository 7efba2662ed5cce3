//! Path annotations placed at data-derived coordinates.
//!
//! Every visual property is an [`Accessor`], resolved once per draw pass and
//! evaluated per datum. Position accessors receive an [`AnnotationContext`]
//! carrying the scales, the x accessor and the full dataset, so a default
//! like "x is the datum's scaled x value" needs no ambient state.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::core::{Accessor, ChartGeometry, ChartScale};
use crate::render::{Color, PathGeometry, PathPrimitive, RenderFrame, Stroke};

const ARROW_HALF_WIDTH: f64 = 10.0;
const ARROW_STEM_HALF_WIDTH: f64 = 3.0;
const ARROW_HEIGHT: f64 = 20.0;

/// Anchor point handed to an annotation's path builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOrigin {
    pub x: f64,
    pub y: f64,
}

/// Upward arrow with its tip at the origin, e.g. below a candle's low.
#[must_use]
pub fn buy_path(origin: PathOrigin) -> PathGeometry {
    arrow_path(origin, 1.0)
}

/// Downward arrow with its tip at the origin, e.g. above a candle's high.
#[must_use]
pub fn sell_path(origin: PathOrigin) -> PathGeometry {
    arrow_path(origin, -1.0)
}

fn arrow_path(PathOrigin { x, y }: PathOrigin, direction: f64) -> PathGeometry {
    let shoulder = y + direction * ARROW_HALF_WIDTH;
    let base = y + direction * ARROW_HEIGHT;
    PathGeometry::new()
        .move_to(x, y)
        .line_to(x + ARROW_HALF_WIDTH, shoulder)
        .line_to(x + ARROW_STEM_HALF_WIDTH, shoulder)
        .line_to(x + ARROW_STEM_HALF_WIDTH, base)
        .line_to(x - ARROW_STEM_HALF_WIDTH, base)
        .line_to(x - ARROW_STEM_HALF_WIDTH, shoulder)
        .line_to(x - ARROW_HALF_WIDTH, shoulder)
        .close()
}

/// Evaluation context for position accessors.
pub struct AnnotationContext<D> {
    x_scale: ChartScale,
    y_scale: ChartScale,
    x_accessor: Rc<dyn Fn(&D) -> f64>,
    plot_data: Rc<[D]>,
    index: usize,
}

impl<D> AnnotationContext<D> {
    #[must_use]
    pub fn x_scale(&self) -> &ChartScale {
        &self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> &ChartScale {
        &self.y_scale
    }

    #[must_use]
    pub fn x_accessor(&self) -> &dyn Fn(&D) -> f64 {
        self.x_accessor.as_ref()
    }

    #[must_use]
    pub fn plot_data(&self) -> &[D] {
        &self.plot_data
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn datum(&self) -> &D {
        &self.plot_data[self.index]
    }

    /// Screen x of the datum: `x_scale(x_accessor(datum))`.
    #[must_use]
    pub fn scaled_x(&self) -> f64 {
        self.x_scale.scale((self.x_accessor)(self.datum()))
    }
}

impl<D> fmt::Debug for AnnotationContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationContext")
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("plot_data_len", &self.plot_data.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Pointer click delivered to annotation handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub canvas_xy: (f64, f64),
}

/// What a click handler gets: scales and the original datum, never the
/// resolved pixel position.
#[derive(Debug)]
pub struct AnnotationClick<'a, D> {
    pub x_scale: &'a ChartScale,
    pub y_scale: &'a ChartScale,
    pub datum: &'a D,
}

pub type ClickHandler<D> = Box<dyn FnMut(&ClickEvent, AnnotationClick<'_, D>)>;

/// Resolved annotation for one datum, in plot pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAnnotation {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub fill: Option<Color>,
    pub tooltip: Option<String>,
    pub path: PathGeometry,
}

pub struct PathAnnotation<D> {
    path: Rc<dyn Fn(PathOrigin) -> PathGeometry>,
    x: Accessor<AnnotationContext<D>, f64>,
    y: Accessor<AnnotationContext<D>, f64>,
    fill: Option<Accessor<D, Color>>,
    tooltip: Option<Accessor<D, String>>,
    when: Option<Rc<dyn Fn(&D) -> bool>>,
    stroke: Option<Color>,
    opacity: f64,
    on_click: Option<ClickHandler<D>>,
}

impl<D> fmt::Debug for PathAnnotation<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathAnnotation")
            .field("x_is_constant", &self.x.is_constant())
            .field("y_is_constant", &self.y.is_constant())
            .field("stroke", &self.stroke)
            .field("opacity", &self.opacity)
            .field("has_on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: 'static> PathAnnotation<D> {
    /// Annotation drawing `path` at `y`, with x defaulting to the datum's
    /// scaled x value.
    #[must_use]
    pub fn new(
        path: impl Fn(PathOrigin) -> PathGeometry + 'static,
        y: impl Into<Accessor<AnnotationContext<D>, f64>>,
    ) -> Self {
        Self {
            path: Rc::new(path),
            x: Accessor::function(AnnotationContext::scaled_x),
            y: y.into(),
            fill: None,
            tooltip: None,
            when: None,
            stroke: None,
            opacity: 1.0,
            on_click: None,
        }
    }

    #[must_use]
    pub fn with_x(mut self, x: impl Into<Accessor<AnnotationContext<D>, f64>>) -> Self {
        self.x = x.into();
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Accessor<D, Color>>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<Accessor<D, String>>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Restricts the annotation to data matching `predicate`.
    #[must_use]
    pub fn with_when(mut self, predicate: impl Fn(&D) -> bool + 'static) -> Self {
        self.when = Some(Rc::new(predicate));
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_on_click(
        mut self,
        handler: impl FnMut(&ClickEvent, AnnotationClick<'_, D>) + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Resolves position, fill, tooltip and path for every selected datum.
    #[must_use]
    pub fn place(
        &self,
        plot_data: &Rc<[D]>,
        x_accessor: &Rc<dyn Fn(&D) -> f64>,
        x_scale: &ChartScale,
        y_scale: &ChartScale,
    ) -> Vec<PlacedAnnotation> {
        let x = self.x.clone().resolve();
        let y = self.y.clone().resolve();
        let fill = self.fill.clone().map(Accessor::resolve);
        let tooltip = self.tooltip.clone().map(Accessor::resolve);

        let placed: Vec<PlacedAnnotation> = (0..plot_data.len())
            .filter(|&index| self.when.as_ref().is_none_or(|when| when(&plot_data[index])))
            .map(|index| {
                let context = AnnotationContext {
                    x_scale: *x_scale,
                    y_scale: *y_scale,
                    x_accessor: Rc::clone(x_accessor),
                    plot_data: Rc::clone(plot_data),
                    index,
                };
                let (x_pos, y_pos) = (x(&context), y(&context));
                let datum = context.datum();
                PlacedAnnotation {
                    index,
                    x: x_pos,
                    y: y_pos,
                    fill: fill.as_ref().map(|fill| fill(datum)),
                    tooltip: tooltip.as_ref().map(|tooltip| tooltip(datum)),
                    path: (self.path)(PathOrigin { x: x_pos, y: y_pos }),
                }
            })
            .collect();
        trace!(count = placed.len(), "placed path annotations");
        placed
    }

    /// Appends styled paths for `placed`, translated into canvas pixels.
    /// Resolved tooltips become the path titles.
    pub fn append_to_frame(
        &self,
        placed: &[PlacedAnnotation],
        chart: &ChartGeometry,
        frame: &mut RenderFrame,
    ) {
        let margin = chart.margin();
        for annotation in placed {
            frame.paths.push(PathPrimitive {
                geometry: annotation.path.translated(margin.left, margin.top),
                fill: annotation.fill,
                stroke: self.stroke.map(|color| Stroke::solid(color, 1.0)),
                opacity: self.opacity,
                title: annotation.tooltip.clone(),
            });
        }
    }

    /// Datum index of the topmost placed path whose bounds contain `plot_xy`.
    #[must_use]
    pub fn hit_test(placed: &[PlacedAnnotation], plot_xy: (f64, f64)) -> Option<usize> {
        placed
            .iter()
            .rev()
            .find(|annotation| {
                annotation
                    .path
                    .bounds()
                    .is_some_and(|bounds| bounds.contains(plot_xy))
            })
            .map(|annotation| annotation.index)
    }

    /// Hit-tests `plot_xy` against `placed` and dispatches a click for the
    /// datum found. Returns whether a handler ran.
    pub fn handle_click(
        &mut self,
        event: &ClickEvent,
        plot_xy: (f64, f64),
        placed: &[PlacedAnnotation],
        plot_data: &[D],
        x_scale: &ChartScale,
        y_scale: &ChartScale,
    ) -> bool {
        let Some(datum) = Self::hit_test(placed, plot_xy).and_then(|index| plot_data.get(index))
        else {
            return false;
        };
        self.dispatch_click(event, datum, x_scale, y_scale)
    }

    /// Calls the click handler for `datum`. No handler means no-op.
    pub fn dispatch_click(
        &mut self,
        event: &ClickEvent,
        datum: &D,
        x_scale: &ChartScale,
        y_scale: &ChartScale,
    ) -> bool {
        let Some(handler) = self.on_click.as_mut() else {
            return false;
        };
        handler(
            event,
            AnnotationClick {
                x_scale,
                y_scale,
                datum,
            },
        );
        true
    }
}
