//! finchart: interaction core for financial charts.
//!
//! Scales and Y-axis management, a brush selection gesture and data-driven
//! path annotations, emitting backend-agnostic render frames.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
