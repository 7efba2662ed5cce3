use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use finchart::api::{
    AxisAt, AxisGesture, AxisOrientation, AxisPointerListener, AxisSpec, AxisStyle, YAxis,
    compute_axis_location, compute_tick_count, compute_zoom_hitbox, derive_effective_scale,
};
use finchart::core::{ChartGeometry, ChartId, ChartScale, Margin, ScreenRect};
use finchart::render::{Color, TextHAlign};

fn geometry(height: f64) -> ChartGeometry {
    let y_scale = ChartScale::linear((0.0, 100.0), (height, 0.0)).expect("y scale");
    ChartGeometry::new(ChartId(3), 800.0, height, y_scale).expect("geometry")
}

#[test]
fn axis_location_follows_placement() {
    assert_eq!(compute_axis_location(AxisAt::Left, 800.0), 0.0);
    assert_eq!(compute_axis_location(AxisAt::Right, 800.0), 800.0);
    assert_eq!(compute_axis_location(AxisAt::Middle, 800.0), 400.0);
    assert_eq!(compute_axis_location(AxisAt::Offset(42.0), 800.0), 42.0);
}

#[test]
fn tick_count_steps_with_height() {
    assert_eq!(compute_tick_count(299.0, None), 2);
    assert_eq!(compute_tick_count(300.0, None), 6);
    assert_eq!(compute_tick_count(499.0, None), 6);
    assert_eq!(compute_tick_count(500.0, None), 8);
    assert_eq!(compute_tick_count(500.0, Some(0)), 0);
}

#[test]
fn zoom_hitbox_extends_toward_orientation() {
    assert_eq!(
        compute_zoom_hitbox(AxisOrientation::Left, 40.0, 300.0),
        ScreenRect::new(-40.0, 0.0, 40.0, 300.0)
    );
    assert_eq!(
        compute_zoom_hitbox(AxisOrientation::Right, 40.0, 300.0),
        ScreenRect::new(0.0, 0.0, 40.0, 300.0)
    );
}

#[test]
fn effective_scale_matches_base_without_flip() {
    let base = ChartScale::linear((0.0, 100.0), (400.0, 0.0)).expect("base");
    let effective = derive_effective_scale(&base, false, 400.0).expect("effective");

    assert!(matches!(effective, Cow::Owned(_)));
    assert_eq!(effective.range(), (400.0, 0.0));
    let at_bottom = base.invert(400.0).expect("invertible");
    let at_top = base.invert(0.0).expect("invertible");
    assert_relative_eq!(effective.scale(at_bottom), 400.0, epsilon = 1e-9);
    assert_relative_eq!(effective.scale(at_top), 0.0, epsilon = 1e-9);
    assert_eq!(effective.domain(), (at_bottom, at_top));
}

#[test]
fn flipped_effective_scale_runs_top_down() {
    let base = ChartScale::linear((0.0, 100.0), (400.0, 0.0)).expect("base");
    let effective = derive_effective_scale(&base, true, 400.0).expect("effective");

    assert_eq!(effective.range(), (0.0, 400.0));
    assert_relative_eq!(effective.domain().0, 100.0, epsilon = 1e-9);
    assert_relative_eq!(effective.domain().1, 0.0, epsilon = 1e-9);
}

#[test]
fn effective_scale_uses_plot_height_not_base_range() {
    let base = ChartScale::linear((0.0, 100.0), (400.0, 0.0)).expect("base");
    let effective = derive_effective_scale(&base, false, 200.0).expect("effective");

    assert_eq!(effective.range(), (200.0, 0.0));
    assert_relative_eq!(effective.domain().0, 50.0, epsilon = 1e-9);
    assert_relative_eq!(effective.domain().1, 100.0, epsilon = 1e-9);
    assert_eq!(base.domain(), (0.0, 100.0));
}

#[test]
fn ordinal_scale_passes_through_by_reference() {
    let base = ChartScale::point(5, (400.0, 0.0)).expect("point scale");
    let effective = derive_effective_scale(&base, true, 400.0).expect("effective");

    match effective {
        Cow::Borrowed(scale) => assert!(std::ptr::eq(scale, &base)),
        Cow::Owned(_) => panic!("ordinal scale must not be rebuilt"),
    }
}

#[test]
fn layout_combines_placement_hitbox_and_ticks() {
    let axis = YAxis::new(AxisSpec::left().with_axis_at(AxisAt::Left)).expect("axis");
    let layout = axis.layout(&geometry(450.0)).expect("layout");

    assert_eq!(layout.transform, (0.0, 0.0));
    assert_eq!(layout.range, (0.0, 450.0));
    assert_eq!(layout.tick_count, 6);
    assert_eq!(layout.zoom_hitbox, ScreenRect::new(-40.0, 0.0, 40.0, 450.0));
    assert!(layout.zoom_enabled);
    assert!(layout.captures((-10.0, 100.0)));
    assert!(!layout.captures((10.0, 100.0)));
}

#[test]
fn zoom_is_disabled_when_chart_forbids_y_pan() {
    let axis = YAxis::new(AxisSpec::right()).expect("axis");
    let layout = axis
        .layout(&geometry(450.0).with_y_pan(false))
        .expect("layout");

    assert!(!layout.zoom_enabled);
    assert!(!layout.captures((810.0, 100.0)));
    assert!(layout.hitbox_contains((10.0, 100.0)));
}

#[test]
fn invalid_axis_spec_is_rejected() {
    assert!(YAxis::new(AxisSpec::right().with_zoom_width(-1.0)).is_err());
}

#[test]
fn explicit_tick_values_override_generated_ticks() {
    let axis = YAxis::new(AxisSpec::right().with_tick_values(vec![12.5, 50.0]))
        .expect("axis");
    assert_eq!(axis.ticks(&geometry(600.0)).expect("ticks"), vec![12.5, 50.0]);
}

#[test]
fn right_axis_frame_points_ticks_and_labels_right() {
    let chart = geometry(600.0)
        .with_margin(Margin::new(10.0, 60.0, 5.0, 5.0))
        .expect("margin");
    let axis = YAxis::new(AxisSpec::right()).expect("axis");
    let frame = axis.build_frame(&chart).expect("frame");

    assert_eq!((frame.width, frame.height), (870.0, 610.0));
    // Domain line at the right edge of the plot, in canvas pixels.
    let domain = frame.lines[0];
    assert_eq!((domain.from.0, domain.to.0), (810.0, 810.0));
    assert_eq!((domain.from.1, domain.to.1), (5.0, 605.0));

    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(labels.first().copied(), Some("0"));
    assert_eq!(labels.last().copied(), Some("100"));
    assert!(frame.texts.iter().all(|text| text.h_align == TextHAlign::Left));
    assert!(frame.texts.iter().all(|text| text.anchor.0 == 818.0));
    assert!(frame.validate().is_ok());
}

#[test]
fn grid_lines_and_custom_format_are_applied() {
    let style = AxisStyle {
        show_grid_lines: true,
        show_domain: false,
        show_ticks: false,
        ..AxisStyle::default()
    };
    let axis = YAxis::new(AxisSpec::left().with_tick_values(vec![25.0, 75.0]))
        .expect("axis")
        .with_style(style)
        .expect("valid style")
        .with_tick_format(finchart::core::Accessor::function(|value: &f64| {
            format!("${value}")
        }));
    let frame = axis.build_frame(&geometry(400.0)).expect("frame");

    assert_eq!(frame.lines.len(), 2);
    assert!(frame.lines.iter().all(|line| line.from.0 == 0.0 && line.to.0 == 800.0));
    assert!(
        frame
            .lines
            .iter()
            .all(|line| line.stroke.color == Color::from_hex("#E2E4EC").expect("hex"))
    );
    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(labels, vec!["$25", "$75"]);
    assert!(frame.texts.iter().all(|text| text.h_align == TextHAlign::Right));
}

#[test]
fn label_font_comes_from_style() {
    let style = AxisStyle {
        font_family: "monospace".to_owned(),
        font_size_px: 10.0,
        font_weight: 600,
        ..AxisStyle::default()
    };
    let axis = YAxis::new(AxisSpec::right())
        .expect("axis")
        .with_style(style)
        .expect("valid style");
    let frame = axis.build_frame(&geometry(400.0)).expect("frame");

    assert!(!frame.texts.is_empty());
    assert!(
        frame
            .texts
            .iter()
            .all(|text| text.font.css() == "600 10px monospace")
    );
}

#[test]
fn unusable_style_is_refused() {
    let axis = YAxis::new(AxisSpec::right()).expect("axis");
    let no_weight = AxisStyle {
        font_weight: 0,
        ..AxisStyle::default()
    };
    assert!(axis.with_style(no_weight).is_err());
}

#[derive(Clone, Default)]
struct RecordingAxisListener {
    events: Rc<RefCell<Vec<(&'static str, ChartId, (f64, f64))>>>,
}

impl AxisPointerListener for RecordingAxisListener {
    fn on_double_click(&mut self, chart_id: ChartId, plot_xy: (f64, f64)) {
        self.events
            .borrow_mut()
            .push(("double_click", chart_id, plot_xy));
    }

    fn on_context_menu(&mut self, chart_id: ChartId, plot_xy: (f64, f64)) {
        self.events
            .borrow_mut()
            .push(("context_menu", chart_id, plot_xy));
    }
}

#[test]
fn axis_gestures_reach_listener_only_inside_hitbox() {
    let chart = geometry(400.0);
    let listener = RecordingAxisListener::default();
    let events = Rc::clone(&listener.events);
    let mut axis = YAxis::new(AxisSpec::right())
        .expect("axis")
        .with_pointer_listener(listener);

    assert!(
        axis.handle_gesture(AxisGesture::DoubleClick, (810.0, 50.0), &chart)
            .expect("gesture")
    );
    assert!(
        axis.handle_gesture(AxisGesture::ContextMenu, (830.0, 120.0), &chart)
            .expect("gesture")
    );
    // Inside the plot, left of a right-hand axis.
    assert!(
        !axis
            .handle_gesture(AxisGesture::DoubleClick, (790.0, 50.0), &chart)
            .expect("gesture")
    );

    assert_eq!(
        *events.borrow(),
        vec![
            ("double_click", ChartId(3), (810.0, 50.0)),
            ("context_menu", ChartId(3), (830.0, 120.0)),
        ]
    );
}

#[test]
fn axis_without_listener_ignores_gestures() {
    let mut axis = YAxis::new(AxisSpec::left()).expect("axis");
    assert!(
        !axis
            .handle_gesture(AxisGesture::ContextMenu, (-10.0, 50.0), &geometry(400.0))
            .expect("gesture")
    );
}
