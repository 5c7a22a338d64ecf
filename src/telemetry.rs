//! Opt-in tracing setup for gallery hosts.
//!
//! Library code only emits `tracing` events. Hosts either call one of the
//! helpers below or install their own subscriber.

/// Filter used when `RUST_LOG` is unset: gallery lifecycle at `info`,
/// everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,chart_gallery=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, or by
/// [`DEFAULT_FILTER`] when the variable is unset or invalid.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback filter, e.g.
/// `"chart_gallery=trace"` to see every frame.
///
/// Events go to stderr so tools that print results on stdout stay scriptable.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback_filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
