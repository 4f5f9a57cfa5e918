//! Tracing/logging setup shared by the workspace binaries.

/// Initialize process-wide tracing with the format chosen by
/// `PRICECOMPARE_LOG_FORMAT` (JSON unless set to `pretty`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, formats).
pub mod tracing;
