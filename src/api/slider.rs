use std::fmt;

use tracing::{trace, warn};

use crate::core::PerceptualColor;
use crate::error::{ChartError, ChartResult};

/// Density of range pips at a display scale of 1.
const BASE_PIP_DENSITY: f64 = 8.0;

type ChangeListener = Box<dyn FnMut([f64; 2])>;

/// Two-handle range slider model.
///
/// Values are kept inside `[min, max]`, snapped to `step` from `min`, and the
/// handles never come closer than `margin`. Registered listeners are notified
/// whenever `set` changes the value.
pub struct RangeSlider {
    min: f64,
    max: f64,
    step: f64,
    margin: f64,
    value: [f64; 2],
    pip_density: f64,
    connect_colors: Vec<PerceptualColor>,
    listeners: Vec<ChangeListener>,
}

impl RangeSlider {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ChartError::InvalidData(format!(
                "slider range must be finite with min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self {
            min,
            max,
            step: 0.0,
            margin: 0.0,
            value: [min, max],
            pip_density: BASE_PIP_DENSITY,
            connect_colors: Vec::new(),
            listeners: Vec::new(),
        })
    }

    /// Snaps values to multiples of `step` from `min`; zero disables snapping.
    pub fn with_step(mut self, step: f64) -> ChartResult<Self> {
        if !step.is_finite() || step < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "slider step must be finite and >= 0, got {step}"
            )));
        }
        self.step = step;
        Ok(self)
    }

    pub fn with_margin(mut self, margin: f64) -> ChartResult<Self> {
        if !margin.is_finite() || margin < 0.0 || margin > self.max - self.min {
            return Err(ChartError::InvalidData(format!(
                "slider margin must be within [0, {}], got {margin}",
                self.max - self.min
            )));
        }
        self.margin = margin;
        Ok(self)
    }

    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    #[must_use]
    pub fn get(&self) -> [f64; 2] {
        self.value
    }

    /// Moves both handles. Returns whether the value changed.
    pub fn set(&mut self, [start, end]: [f64; 2]) -> bool {
        if !start.is_finite() || !end.is_finite() {
            warn!(start, end, "ignoring non-finite slider value");
            return false;
        }
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        let low = self.snap(low).clamp(self.min, self.max - self.margin);
        let high = self.snap(high).clamp(low + self.margin, self.max);
        let next = [low, high];
        if next == self.value {
            return false;
        }
        self.value = next;
        trace!(start = low, end = high, "slider value changed");
        for listener in &mut self.listeners {
            listener(next);
        }
        true
    }

    /// Returns both handles to the full range.
    pub fn reset(&mut self) -> bool {
        self.set([self.min, self.max])
    }

    pub fn on_change(&mut self, listener: impl FnMut([f64; 2]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Pip spacing for a canvas displayed at `display_scale` of its backing size.
    #[must_use]
    pub fn pip_density_for(display_scale: f64) -> f64 {
        (BASE_PIP_DENSITY / display_scale).ceil()
    }

    pub fn update_pip_density(&mut self, display_scale: f64) {
        if !display_scale.is_finite() || display_scale <= 0.0 {
            warn!(display_scale, "ignoring invalid display scale for slider pips");
            return;
        }
        self.pip_density = Self::pip_density_for(display_scale);
    }

    #[must_use]
    pub fn pip_density(&self) -> f64 {
        self.pip_density
    }

    /// Colours of the segment between the handles, left to right.
    #[must_use]
    pub fn connect_colors(&self) -> &[PerceptualColor] {
        &self.connect_colors
    }

    pub fn set_connect_colors(&mut self, colors: Vec<PerceptualColor>) {
        self.connect_colors = colors;
    }

    fn snap(&self, value: f64) -> f64 {
        if self.step <= 0.0 {
            return value;
        }
        self.min + ((value - self.min) / self.step).round() * self.step
    }
}

impl fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("margin", &self.margin)
            .field("value", &self.value)
            .field("pip_density", &self.pip_density)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn years() -> RangeSlider {
        RangeSlider::new(1880.0, 2018.0)
            .and_then(|slider| slider.with_step(1.0))
            .and_then(|slider| slider.with_margin(5.0))
            .expect("slider")
    }

    #[test]
    fn snaps_and_enforces_margin() {
        let mut slider = years();
        assert!(slider.set([1900.4, 1902.0]));
        assert_eq!(slider.get(), [1900.0, 1905.0]);

        slider.set([2017.0, 2018.0]);
        assert_eq!(slider.get(), [2013.0, 2018.0]);

        slider.set([1700.0, 2100.0]);
        assert_eq!(slider.get(), [1880.0, 2018.0]);
    }

    #[test]
    fn notifies_only_on_change() {
        let mut slider = years();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        slider.on_change(move |value| sink.borrow_mut().push(value));

        assert!(!slider.set([1880.0, 2018.0]));
        assert!(slider.set([1950.0, 2000.0]));
        assert_eq!(*seen.borrow(), vec![[1950.0, 2000.0]]);
    }

    #[test]
    fn pip_density_follows_display_scale() {
        assert_eq!(RangeSlider::pip_density_for(1.0), 8.0);
        assert_eq!(RangeSlider::pip_density_for(0.5), 16.0);
        assert_eq!(RangeSlider::pip_density_for(0.7), 12.0);

        let mut slider = years();
        slider.update_pip_density(0.0);
        assert_eq!(slider.pip_density(), 8.0);
    }

    #[test]
    fn rejects_empty_ranges() {
        assert!(RangeSlider::new(5.0, 5.0).is_err());
        assert!(years().with_margin(500.0).is_err());
    }
}
