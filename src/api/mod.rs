//! Chart engine, behavior hooks, host elements and the gallery.

mod behavior;
mod chart;
mod config;
mod elements;
mod environment;
mod gallery;
mod slider;

pub use behavior::{ChartBehavior, ChartEvent, DrawContext, HookContext};
pub use chart::{Chart, ChartLifecycle, ChartOptions};
pub use config::GalleryConfig;
pub use elements::{CanvasElement, ChartElements, DataTable, HostElement, SelectControl};
pub use environment::{Environment, StaticEnvironment};
pub use gallery::{ChartId, FrameLoop, Gallery, IdManager, MenuEntry};
pub use slider::RangeSlider;
