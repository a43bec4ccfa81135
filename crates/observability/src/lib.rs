//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide logging in the given format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format, DEFAULT_FILTER);
}

/// Filter used when `RUST_LOG` is unset. The interactive menu owns stdout,
/// so only problems are logged by default.
pub const DEFAULT_FILTER: &str = "warn";

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
