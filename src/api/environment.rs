use std::cell::Cell;

/// Read-only host preferences.
///
/// Every query reflects the live host state; implementations must not cache.
pub trait Environment {
    fn is_dark(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
    fn prefers_contrast_more(&self) -> bool;
    fn forced_colors(&self) -> bool;
    fn is_mobile_view(&self) -> bool;
}

/// Environment backed by plain flags, used by headless rendering and tests.
///
/// Flags use interior mutability so a shared environment can be flipped
/// while charts hold a reference to it.
#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
    dark: Cell<bool>,
    reduced_motion: Cell<bool>,
    contrast_more: Cell<bool>,
    forced_colors: Cell<bool>,
    mobile: Cell<bool>,
}

impl StaticEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dark(self, dark: bool) -> Self {
        self.set_dark(dark);
        self
    }

    #[must_use]
    pub fn with_reduced_motion(self, reduced_motion: bool) -> Self {
        self.set_reduced_motion(reduced_motion);
        self
    }

    pub fn set_dark(&self, dark: bool) {
        self.dark.set(dark);
    }

    pub fn set_reduced_motion(&self, reduced_motion: bool) {
        self.reduced_motion.set(reduced_motion);
    }

    pub fn set_contrast_more(&self, contrast_more: bool) {
        self.contrast_more.set(contrast_more);
    }

    pub fn set_forced_colors(&self, forced_colors: bool) {
        self.forced_colors.set(forced_colors);
    }

    pub fn set_mobile(&self, mobile: bool) {
        self.mobile.set(mobile);
    }
}

impl Environment for StaticEnvironment {
    fn is_dark(&self) -> bool {
        self.dark.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn prefers_contrast_more(&self) -> bool {
        self.contrast_more.get()
    }

    fn forced_colors(&self) -> bool {
        self.forced_colors.get()
    }

    fn is_mobile_view(&self) -> bool {
        self.mobile.get()
    }
}
