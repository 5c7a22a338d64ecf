use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{Cartesian, Dimensions, Layout};

/// Where and how large the canvas is currently displayed, in host (device) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect of a canvas displayed at its backing size with its origin at (0, 0).
    #[must_use]
    pub const fn unscaled(dimensions: Dimensions) -> Self {
        Self::new(0.0, 0.0, dimensions.width, dimensions.height)
    }
}

/// Padding applied to the plot bounds by [`PointerTracker::is_mouse_in_plot`].
///
/// Directional values are added to the matching edge, so a negative `left`
/// widens the plot to the left. `Uniform(p)` widens every edge by `p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlotOffset {
    Uniform(f64),
    Directional {
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    },
}

impl PlotOffset {
    pub const NONE: PlotOffset = PlotOffset::Uniform(0.0);

    /// Edge adjustments as `(left, right, top, bottom)`.
    #[must_use]
    pub fn edges(self) -> (f64, f64, f64, f64) {
        match self {
            PlotOffset::Uniform(padding) => (-padding, padding, -padding, padding),
            PlotOffset::Directional {
                left,
                right,
                top,
                bottom,
            } => (left, right, top, bottom),
        }
    }
}

impl From<f64> for PlotOffset {
    fn from(value: f64) -> Self {
        PlotOffset::Uniform(value)
    }
}

/// Handle of the pointer listener registration owned by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerSubscription(u64);

impl ListenerSubscription {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Pointer position in canvas logical pixels.
///
/// Raw host coordinates are scaled by the ratio of the canvas backing size to
/// its displayed size, so the position stays correct when the canvas is shown
/// larger or smaller than its pixel buffer. Pointer events are only accepted
/// while a listener subscription is held.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    position: Cartesian,
    present: bool,
    layout: Layout,
    backing: Dimensions,
    subscription: Option<ListenerSubscription>,
    next_subscription: u64,
}

impl PointerTracker {
    #[must_use]
    pub fn new(backing: Dimensions, layout: Layout) -> Self {
        Self {
            position: Cartesian::default(),
            present: false,
            layout,
            backing,
            subscription: None,
            next_subscription: 0,
        }
    }

    /// Registers the pointer listener. A subscription still held from an
    /// earlier call is dropped first.
    pub fn attach_listeners(&mut self) -> ListenerSubscription {
        if self.subscription.is_some() {
            warn!("pointer listener already attached, detaching before re-attaching");
            self.detach_listeners();
        }
        self.next_subscription += 1;
        let subscription = ListenerSubscription(self.next_subscription);
        self.subscription = Some(subscription);
        trace!(subscription = subscription.raw(), "pointer listener attached");
        subscription
    }

    pub fn detach_listeners(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            warn!("no pointer listener attached, nothing to detach");
            return;
        };
        self.present = false;
        trace!(subscription = subscription.raw(), "pointer listener detached");
    }

    #[must_use]
    pub fn subscription(&self) -> Option<ListenerSubscription> {
        self.subscription
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Handles a pointer move given in host coordinates. Ignored while detached.
    pub fn on_pointer_move(&mut self, raw: Cartesian, rect: DisplayRect) {
        if self.subscription.is_none() {
            return;
        }
        if rect.width <= 0.0 || rect.height <= 0.0 {
            warn!(?rect, "ignoring pointer move on a collapsed canvas");
            return;
        }
        let scale_x = self.backing.width / rect.width;
        let scale_y = self.backing.height / rect.height;
        self.position = Cartesian::new((raw.x - rect.left) * scale_x, (raw.y - rect.top) * scale_y);
        self.present = true;
    }

    /// The pointer left the canvas; the last position is kept but no longer counts as in plot.
    pub fn on_pointer_leave(&mut self) {
        self.present = false;
    }

    #[must_use]
    pub fn position(&self) -> Cartesian {
        self.position
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn set_backing(&mut self, backing: Dimensions) {
        self.backing = backing;
    }

    /// Whether the pointer is strictly inside the plot bounds adjusted by `offset`.
    #[must_use]
    pub fn is_mouse_in_plot(&self, offset: impl Into<PlotOffset>) -> bool {
        if !self.present {
            return false;
        }
        let (left, right, top, bottom) = offset.into().edges();
        let Cartesian { x, y } = self.position;
        x > self.layout.left + left
            && x < self.layout.right + right
            && y > self.layout.top + top
            && y < self.layout.bottom + bottom
    }
}
