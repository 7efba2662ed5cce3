use finchart::core::ScreenRect;
use finchart::render::{
    Color, LinePrimitive, NullRenderer, PathGeometry, PathPrimitive, RectPrimitive, RenderFrame,
    Renderer, Stroke, StrokeDash, TextHAlign, TextPrimitive,
};

#[test]
fn null_renderer_records_valid_frames() {
    let frame = RenderFrame::new(200.0, 100.0)
        .with_line(LinePrimitive::horizontal(0.0, 0.0, 200.0, Stroke::solid(Color::BLACK, 1.0)))
        .with_rect(
            RectPrimitive::filled(ScreenRect::new(10.0, 10.0, 20.0, 20.0), Color::rgb(0.5, 0.5, 0.5))
                .with_stroke(Stroke::solid(Color::BLACK, 1.0).with_dash(StrokeDash::ShortDash)),
        )
        .with_text(TextPrimitive::new("42.00", (190.0, 50.0), TextHAlign::Right));
    let mut renderer = NullRenderer::default();

    renderer.render(&frame).expect("render");

    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_frame, Some(frame));
}

#[test]
fn invalid_primitives_fail_validation() {
    let bad_line = RenderFrame::new(200.0, 100.0)
        .with_line(LinePrimitive::new(
            (0.0, f64::NAN),
            (200.0, 0.0),
            Stroke::solid(Color::BLACK, 1.0),
        ));
    let hairline = RenderFrame::new(200.0, 100.0).with_line(LinePrimitive::horizontal(
        10.0,
        0.0,
        200.0,
        Stroke::solid(Color::BLACK, 0.0),
    ));
    let blank_label = RenderFrame::new(200.0, 100.0)
        .with_text(TextPrimitive::new("", (10.0, 10.0), TextHAlign::Left));
    let bad_rect = RenderFrame::new(200.0, 100.0).with_rect(RectPrimitive::filled(
        ScreenRect::new(0.0, 0.0, -5.0, 5.0),
        Color::BLACK,
    ));
    let open_path = RenderFrame::new(200.0, 100.0)
        .with_path(PathPrimitive::new(PathGeometry::new().line_to(1.0, 1.0)));

    let mut renderer = NullRenderer::default();
    assert!(renderer.render(&bad_line).is_err());
    assert!(renderer.render(&hairline).is_err());
    assert!(renderer.render(&blank_label).is_err());
    assert!(renderer.render(&bad_rect).is_err());
    assert!(renderer.render(&open_path).is_err());
    assert_eq!(renderer.frames_rendered, 0);
}

#[test]
fn extend_merges_primitives() {
    let mut frame = RenderFrame::new(100.0, 100.0);
    assert!(frame.is_empty());

    frame.extend(
        RenderFrame::new(50.0, 50.0)
            .with_line(LinePrimitive::new(
                (0.0, 0.0),
                (1.0, 1.0),
                Stroke::solid(Color::BLACK, 1.0),
            ))
            .with_path(PathPrimitive::new(
                PathGeometry::new().move_to(0.0, 0.0).line_to(5.0, 5.0).close(),
            )),
    );

    assert!(!frame.is_empty());
    assert_eq!((frame.width, frame.height), (100.0, 100.0));
    assert_eq!(frame.lines.len(), 1);
    assert_eq!(frame.paths.len(), 1);
}
