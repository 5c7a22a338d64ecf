use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::api::{Chart, Environment};
use crate::error::{ChartError, ChartResult};
use crate::render::Canvas;

/// Identifier the gallery hands out when a chart is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(u32);

impl ChartId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only registry issuing sequential ids from zero.
#[derive(Debug)]
pub struct IdManager<T> {
    next_id: u32,
    items: IndexMap<ChartId, T>,
}

impl<T> Default for IdManager<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: IndexMap::new(),
        }
    }
}

impl<T> IdManager<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve_id(&mut self, item: T) -> ChartId {
        let id = ChartId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    pub fn get(&self, id: ChartId) -> ChartResult<&T> {
        self.items.get(&id).ok_or(ChartError::UnknownChart(id))
    }

    pub fn get_mut(&mut self, id: ChartId) -> ChartResult<&mut T> {
        self.items.get_mut(&id).ok_or(ChartError::UnknownChart(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ChartId, &T)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }
}

/// Navigation menu entry for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: ChartId,
    pub label: String,
    pub selected: bool,
}

/// Ordered set of charts with at most one active at a time.
pub struct Gallery<C: Canvas> {
    charts: IdManager<Chart<C>>,
    active: Option<ChartId>,
    navigation_open: bool,
    env: Rc<dyn Environment>,
}

impl<C: Canvas> Gallery<C> {
    /// Creates an empty gallery; navigation starts collapsed on mobile layouts.
    #[must_use]
    pub fn new(env: Rc<dyn Environment>) -> Self {
        Self {
            charts: IdManager::new(),
            active: None,
            navigation_open: !env.is_mobile_view(),
            env,
        }
    }

    /// Registers a chart and returns its id. The chart is preloaded lazily
    /// the first time it is activated.
    pub fn add_chart(&mut self, chart: Chart<C>) -> ChartId {
        let name = chart.name().to_owned();
        let id = self.charts.reserve_id(chart);
        debug!(%id, %name, "chart registered");
        id
    }

    /// Makes `id` the active chart, destroying the previous one first.
    pub fn activate(&mut self, id: ChartId) -> ChartResult<()> {
        self.charts.get(id)?;
        if let Some(previous) = self.active.take() {
            self.charts.get_mut(previous)?.destroy()?;
        }
        let chart = self.charts.get_mut(id)?;
        chart.preload()?;
        chart.setup(id)?;
        self.active = Some(id);
        info!(%id, name = chart.name(), "chart activated");
        Ok(())
    }

    /// Activates `id` from the navigation menu. On mobile layouts the menu
    /// collapses afterwards.
    pub fn select_from_menu(&mut self, id: ChartId) -> ChartResult<()> {
        self.activate(id)?;
        if self.env.is_mobile_view() && self.navigation_open {
            self.toggle_navigation();
        }
        Ok(())
    }

    #[must_use]
    pub fn menu(&self) -> Vec<MenuEntry> {
        self.charts
            .iter()
            .map(|(id, chart)| MenuEntry {
                id,
                label: chart.name().to_owned(),
                selected: self.active == Some(id),
            })
            .collect()
    }

    /// Opens or collapses the navigation menu and returns whether it is open.
    pub fn toggle_navigation(&mut self) -> bool {
        self.navigation_open = !self.navigation_open;
        trace!(open = self.navigation_open, "navigation toggled");
        self.navigation_open
    }

    #[must_use]
    pub fn is_navigation_open(&self) -> bool {
        self.navigation_open
    }

    #[must_use]
    pub fn active_id(&self) -> Option<ChartId> {
        self.active
    }

    #[must_use]
    pub fn active_chart(&self) -> Option<&Chart<C>> {
        self.active.and_then(|id| self.charts.get(id).ok())
    }

    pub fn active_chart_mut(&mut self) -> Option<&mut Chart<C>> {
        let id = self.active?;
        self.charts.get_mut(id).ok()
    }

    pub fn chart(&self, id: ChartId) -> ChartResult<&Chart<C>> {
        self.charts.get(id)
    }

    pub fn chart_mut(&mut self, id: ChartId) -> ChartResult<&mut Chart<C>> {
        self.charts.get_mut(id)
    }

    /// Charts in registration order.
    pub fn charts(&self) -> impl Iterator<Item = (ChartId, &Chart<C>)> {
        self.charts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Draws the active chart. Returns `false` when no chart is active.
    pub fn draw_active(&mut self, dt: f64) -> ChartResult<bool> {
        match self.active_chart_mut() {
            Some(chart) => {
                chart.draw(dt)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<C: Canvas> fmt::Debug for Gallery<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("charts", &self.charts.len())
            .field("active", &self.active)
            .field("navigation_open", &self.navigation_open)
            .finish_non_exhaustive()
    }
}

/// Drives the active chart from host frame timestamps.
///
/// The first tick after `start` has a zero delta; after that the delta is
/// the time since the previous tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLoop {
    last: Option<f64>,
    running: bool,
}

impl FrameLoop {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.last = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Draws one frame at `timestamp` milliseconds. Returns the delta used,
    /// or `None` when the loop is stopped.
    pub fn tick<C: Canvas>(
        &mut self,
        timestamp: f64,
        gallery: &mut Gallery<C>,
    ) -> ChartResult<Option<f64>> {
        if !self.running {
            return Ok(None);
        }
        let last = self.last.unwrap_or(timestamp);
        let mut dt = timestamp - last;
        if !dt.is_finite() || dt < 0.0 {
            warn!(timestamp, last, "frame timestamp went backwards, using a zero delta");
            dt = 0.0;
        }
        self.last = Some(timestamp);
        gallery.draw_active(dt)?;
        Ok(Some(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut ids = IdManager::new();
        let a = ids.reserve_id("a");
        let b = ids.reserve_id("b");
        assert_eq!((a.raw(), b.raw()), (0, 1));
        assert_eq!(*ids.get(b).expect("b"), "b");
        assert!(matches!(ids.get(ChartId::new(7)), Err(ChartError::UnknownChart(_))));
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let env: Rc<dyn Environment> = Rc::new(crate::api::StaticEnvironment::default());
        let mut gallery: Gallery<crate::render::RecordingCanvas> = Gallery::new(env);
        let mut frames = FrameLoop::new();
        assert_eq!(frames.tick(10.0, &mut gallery).expect("tick"), None);

        frames.start();
        assert_eq!(frames.tick(10.0, &mut gallery).expect("tick"), Some(0.0));
        assert_eq!(frames.tick(26.0, &mut gallery).expect("tick"), Some(16.0));
        assert_eq!(frames.tick(20.0, &mut gallery).expect("tick"), Some(0.0));
    }
}
