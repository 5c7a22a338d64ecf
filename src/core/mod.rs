pub mod clock;
pub mod color;
pub mod format;
pub mod geometry;
pub mod layout;
pub mod math;
pub mod table;
pub mod theme;

pub use clock::AnimationClock;
pub use color::PerceptualColor;
pub use geometry::{Cartesian, HoverCandidate, Point2D, PointId, Polar};
pub use layout::{ChartTitle, DEFAULT_TITLE_FONT_SIZE, Dimensions, Layout, Margins, compute_layout};
pub use math::Easing;
pub use table::{ColumnRef, CsvTable, Record};
pub use theme::{Palette, Theme, ThemeColor};
