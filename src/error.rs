use thiserror::Error;

/// The generic Error type covering all errors this library can return.
///
/// The pipeline itself is designed never to fail: reference-resolution
/// misses during reachability and malformed decryption idioms are expected
/// in obfuscated input and are silently skipped (or logged as warning
/// events). The only fatal conditions are environmental — an execution log
/// that cannot be read aborts the run before any phase touches the
/// assembly.
#[derive(Error, Debug)]
pub enum Error {
    /// The execution log could not be opened or read.
    ///
    /// The trace loader treats any I/O failure as fatal: without roots the
    /// reachability analysis would mark the entire user surface dead, so
    /// the run is aborted instead of producing a gutted assembly.
    #[error("could not read execution log '{path}': {source}")]
    TraceRead {
        /// Path of the execution log that failed to load.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
