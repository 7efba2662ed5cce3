//! Optional chart decorations layered over the plot area.

pub mod annotations;

pub use annotations::{
    AnnotationClick, AnnotationContext, ClickEvent, ClickHandler, PathAnnotation, PathOrigin,
    PlacedAnnotation, buy_path, sell_path,
};
