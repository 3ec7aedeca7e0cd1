//! Error formatting helpers for stable, deterministic test assertions.

use std::error::Error;

/// Join an error and its sources, outermost first, with `": "`.
///
/// # Examples
///
/// ```
/// use std::io;
/// use test_support::display_error_chain;
///
/// let err = io::Error::new(io::ErrorKind::NotFound, "missing");
/// assert_eq!(display_error_chain(&err), "missing");
/// ```
pub fn display_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
