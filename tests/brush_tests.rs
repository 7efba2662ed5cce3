use std::cell::RefCell;
use std::rc::Rc;

use finchart::core::{Candle, ChartGeometry, ChartId, ChartScale, Margin, ScreenRect};
use finchart::interaction::{
    Brush, BrushConfig, BrushKind, BrushListener, BrushSelection, BrushState, BrushTransition,
    DrawTrigger, PointerEvent,
};
use finchart::render::{Color, StrokeDash};

#[derive(Debug, Clone, PartialEq)]
enum BrushEvent {
    Start { x: f64 },
    Brush { rect: ScreenRect, start_time: f64, end_time: f64 },
}

#[derive(Clone, Default)]
struct RecordingListener {
    events: Rc<RefCell<Vec<BrushEvent>>>,
}

impl BrushListener<Candle> for RecordingListener {
    fn on_start(&mut self, event: &PointerEvent<'_, Candle>) {
        self.events.borrow_mut().push(BrushEvent::Start {
            x: event.mouse_xy.0,
        });
    }

    fn on_brush(&mut self, selection: &BrushSelection<Candle>, _event: &PointerEvent<'_, Candle>) {
        self.events.borrow_mut().push(BrushEvent::Brush {
            rect: selection.rect,
            start_time: selection.start.item.time,
            end_time: selection.end.item.time,
        });
    }
}

fn candle(time: f64) -> Candle {
    Candle::new(time, 10.0, 12.0, 9.0, 11.0).expect("valid candle")
}

fn chart() -> ChartGeometry {
    let y_scale = ChartScale::linear((0.0, 100.0), (100.0, 0.0)).expect("y scale");
    ChartGeometry::new(ChartId(1), 100.0, 100.0, y_scale).expect("geometry")
}

fn x_scale() -> ChartScale {
    ChartScale::linear((0.0, 100.0), (0.0, 100.0)).expect("x scale")
}

fn recording_brush(config: BrushConfig) -> (Brush<Candle>, Rc<RefCell<Vec<BrushEvent>>>) {
    let listener = RecordingListener::default();
    let events = Rc::clone(&listener.events);
    (
        Brush::new(config).expect("valid brush").with_listener(listener),
        events,
    )
}

#[test]
fn press_and_release_without_move_is_a_click() {
    let chart = chart();
    let x_scale = x_scale();
    let item = candle(10.0);
    let (mut brush, events) = recording_brush(BrushConfig::default());

    let down = PointerEvent::new((10.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_down(&down), BrushTransition::Started);
    assert!(brush.state().is_selecting());

    let up = PointerEvent::new((10.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_up(&up), BrushTransition::Clicked);

    assert_eq!(*events.borrow(), vec![BrushEvent::Start { x: 10.0 }]);
    assert!(!brush.state().is_selecting());
    assert_eq!(brush.state().rect(), None);
}

#[test]
fn drag_commits_normalized_rectangle() {
    let chart = chart();
    let x_scale = x_scale();
    let first = candle(10.0);
    let second = candle(50.0);
    let (mut brush, events) = recording_brush(BrushConfig::default());

    let down = PointerEvent::new((10.0, 10.0), Some(&first), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    let moved =
        PointerEvent::new((50.0, 40.0), Some(&second), &Candle::time_of, &x_scale, &chart);
    let expected = ScreenRect::new(10.0, 10.0, 40.0, 30.0);
    assert_eq!(
        brush.handle_pointer_move(&moved),
        BrushTransition::Redraw(expected)
    );
    let up = PointerEvent::new((50.0, 40.0), Some(&second), &Candle::time_of, &x_scale, &chart);
    assert!(matches!(
        brush.handle_pointer_up(&up),
        BrushTransition::Committed(_)
    ));

    assert_eq!(
        *events.borrow(),
        vec![
            BrushEvent::Start { x: 10.0 },
            BrushEvent::Brush {
                rect: expected,
                start_time: 10.0,
                end_time: 50.0,
            },
        ]
    );
    assert_eq!(brush.state().rect(), None);
}

#[test]
fn selection_carries_data_space_values() {
    let chart = chart();
    let x_scale = x_scale();
    let first = candle(10.0);
    let second = candle(50.0);
    let mut state = BrushState::new(BrushKind::TwoD);

    let down = PointerEvent::new((12.0, 25.0), Some(&first), &Candle::time_of, &x_scale, &chart);
    state.on_pointer_down(&down);
    let moved = PointerEvent::new((48.0, 75.0), Some(&second), &Candle::time_of, &x_scale, &chart);
    state.on_pointer_move(&moved);

    let BrushTransition::Committed(selection) = state.on_pointer_up() else {
        panic!("expected a committed selection");
    };
    assert_eq!(selection.start.x_value, 10.0);
    assert_eq!(selection.start.y_value, 75.0);
    assert_eq!(selection.end.x_value, 50.0);
    assert_eq!(selection.end.y_value, 25.0);
    // Screen x snaps to the items, screen y follows the pointer.
    assert_eq!(selection.rect, ScreenRect::new(10.0, 25.0, 40.0, 50.0));
}

#[test]
fn terminate_mid_selection_ignores_later_moves() {
    let chart = chart();
    let x_scale = x_scale();
    let first = candle(10.0);
    let second = candle(50.0);
    let (mut brush, events) = recording_brush(BrushConfig::default());

    let down = PointerEvent::new((10.0, 10.0), Some(&first), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    brush.terminate();

    let moved =
        PointerEvent::new((50.0, 40.0), Some(&second), &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_move(&moved), BrushTransition::Ignored);
    assert_eq!(brush.handle_pointer_up(&moved), BrushTransition::Ignored);
    assert_eq!(brush.state().rect(), None);
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn zero_area_selection_is_still_committed() {
    let chart = chart();
    let x_scale = x_scale();
    let item = candle(10.0);
    let (mut brush, events) = recording_brush(BrushConfig::default());

    let down = PointerEvent::new((10.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    let moved = PointerEvent::new((11.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    assert_eq!(
        brush.handle_pointer_move(&moved),
        BrushTransition::Redraw(ScreenRect::new(10.0, 10.0, 0.0, 0.0))
    );
    assert!(matches!(
        brush.handle_pointer_up(&moved),
        BrushTransition::Committed(_)
    ));

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[1],
        BrushEvent::Brush { rect, .. } if rect.is_empty()
    ));
}

#[test]
fn one_dimensional_brush_spans_chart_height() {
    let chart = chart();
    let x_scale = x_scale();
    let first = candle(50.0);
    let second = candle(20.0);
    let (mut brush, _events) =
        recording_brush(BrushConfig::default().with_kind(BrushKind::OneD));

    let down = PointerEvent::new((50.0, 30.0), Some(&first), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    let moved =
        PointerEvent::new((20.0, 60.0), Some(&second), &Candle::time_of, &x_scale, &chart);

    assert_eq!(
        brush.handle_pointer_move(&moved),
        BrushTransition::Redraw(ScreenRect::new(20.0, 0.0, 30.0, 100.0))
    );
}

#[test]
fn events_without_item_are_skipped() {
    let chart = chart();
    let x_scale = x_scale();
    let (mut brush, events) = recording_brush(BrushConfig::default());

    let down: PointerEvent<'_, Candle> =
        PointerEvent::new((10.0, 10.0), None, &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_down(&down), BrushTransition::Ignored);
    assert!(!brush.state().is_selecting());
    assert!(events.borrow().is_empty());
}

#[test]
fn disabled_brush_ignores_everything_and_draws_nothing() {
    let chart = chart();
    let x_scale = x_scale();
    let item = candle(10.0);
    let config = BrushConfig {
        enabled: false,
        ..BrushConfig::default()
    };
    let (mut brush, events) = recording_brush(config);

    let down = PointerEvent::new((10.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_down(&down), BrushTransition::Ignored);
    assert!(!brush.disables_pan());
    assert!(!brush.redraws_on(DrawTrigger::MouseMove));
    assert_eq!(brush.draw(&chart), None);
    assert!(events.borrow().is_empty());
}

#[test]
fn disabling_mid_selection_drops_it() {
    let chart = chart();
    let x_scale = x_scale();
    let item = candle(10.0);
    let (mut brush, _events) = recording_brush(BrushConfig::default());

    let down = PointerEvent::new((10.0, 10.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    brush.set_enabled(false);

    assert!(!brush.state().is_selecting());
    brush.set_enabled(true);
    let moved = PointerEvent::new((40.0, 40.0), Some(&item), &Candle::time_of, &x_scale, &chart);
    assert_eq!(brush.handle_pointer_move(&moved), BrushTransition::Ignored);
}

#[test]
fn draw_emits_dashed_rectangle_offset_by_margin() {
    let chart = chart()
        .with_margin(Margin::new(5.0, 0.0, 7.0, 0.0))
        .expect("margin");
    let x_scale = x_scale();
    let first = candle(10.0);
    let second = candle(50.0);
    let (mut brush, _events) = recording_brush(BrushConfig::default());

    assert_eq!(brush.draw(&chart), None);

    let down = PointerEvent::new((10.0, 10.0), Some(&first), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_down(&down);
    let moved =
        PointerEvent::new((50.0, 40.0), Some(&second), &Candle::time_of, &x_scale, &chart);
    brush.handle_pointer_move(&moved);

    let rect = brush.draw(&chart).expect("brush rect");
    assert_eq!(rect.rect, ScreenRect::new(15.0, 17.0, 40.0, 30.0));
    let outline = rect.stroke.expect("outlined");
    assert_eq!(outline.color, Color::BLACK);
    assert_eq!(outline.dash, StrokeDash::ShortDash);
    assert!(rect.fill.is_some());
    // Repeated draws are idempotent.
    assert_eq!(brush.draw(&chart), Some(rect));

    for trigger in [DrawTrigger::MouseMove, DrawTrigger::Pan, DrawTrigger::Drag] {
        assert!(brush.redraws_on(trigger));
    }
    let frame = brush.render_frame(&chart);
    assert_eq!(frame.rects, vec![rect]);
    assert!(frame.validate().is_ok());
}
