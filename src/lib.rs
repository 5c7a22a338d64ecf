//! chart-gallery: animated, interactive charts over an immediate-mode canvas.
//!
//! A [`Chart`](api::Chart) owns a canvas, a data table and a
//! [`ChartBehavior`](api::ChartBehavior). The engine handles layout, the
//! title, pointer tracking, the animation clock, tooltips and the accessible
//! table, while the behavior only draws. A [`Gallery`](api::Gallery) keeps
//! one chart active at a time and [`charts::default_gallery`] builds the five
//! shipped charts from the CSVs under `data/`.

pub mod api;
pub mod charts;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{Chart, ChartBehavior, ChartOptions, Gallery, GalleryConfig};
pub use charts::default_gallery;
pub use error::{ChartError, ChartResult};
