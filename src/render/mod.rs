mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, DEFAULT_FONT_FAMILY, LinePrimitive, PathCommand, PathGeometry, PathPrimitive,
    RectPrimitive, Stroke, StrokeDash, TextFont, TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Drawing surface contract.
///
/// Backends receive fully computed geometry and style values; they never see
/// scales, data or gesture state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
