pub mod accessor;
pub mod geometry;
pub mod primitives;
pub mod scale;
pub mod ticks;
pub mod types;

pub use accessor::{Accessor, AccessorFn};
pub use geometry::{ChartGeometry, ChartId, Margin};
pub use scale::{ChartScale, LinearScale, LogScale, PointScale};
pub use types::{Candle, ScreenRect};
