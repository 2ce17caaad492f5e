pub mod audio;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Log a diagnostic line only when the `perf_stats` feature is enabled.
///
/// Used for per-zone build statistics that are too chatty for normal runs.
/// When the feature is disabled this expands to an empty block and the
/// arguments are never evaluated.
///
/// # Example
/// ```
/// earshot::profile_log!("zone {:?}: {} nodes", (0, 0), 12);
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($($arg:tt)*) => {
        bevy::prelude::debug!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($($arg:tt)*) => {};
}
