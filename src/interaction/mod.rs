//! Pointer tracking, hover resolution and the animated tooltip.

mod hover;
mod pointer;
mod tooltip;

pub use hover::{Hoverable, find_hovered_point};
pub use pointer::{DisplayRect, ListenerSubscription, PlotOffset, PointerTracker};
pub use tooltip::{TooltipController, TooltipMargin, TooltipPhase, TooltipRequest, TooltipState};
