//! graphs-rs: geometry and layout engine for declarative charts.
//!
//! A [`Graph`] is built from a JSON definition, then bar, line, scatter and
//! paired-result series are loaded into it. The crate computes scales, band
//! layout, stack offsets, regions and selection boxes, and drives any
//! [`render::DrawingSurface`] through shape draws and transitions.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{Graph, GraphConfig};
pub use error::{ChartError, ChartResult};
