//! Pointer-driven interaction: the brush gesture and the pointer payload it
//! consumes.

mod brush;
mod pointer;

use serde::{Deserialize, Serialize};

pub use brush::{
    Brush, BrushConfig, BrushKind, BrushListener, BrushPoint, BrushSelection, BrushState,
    BrushStyle, BrushTransition,
};
pub use pointer::PointerEvent;

/// What a chart is currently doing with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
    Brushing,
    AxisZooming,
}

/// Events after which a component asks to be repainted.
///
/// Repaint is event-driven; there is no frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawTrigger {
    MouseMove,
    Pan,
    Drag,
}
