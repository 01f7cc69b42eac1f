/// This module detects the character encoding of uploaded files.
pub mod encoding;

/// This module provides the row reader for uploaded CSV tables.
pub mod csv;

#[cfg(feature = "alma")]
/// This module provides the record resolver and mutator backed by the Alma REST API.
pub mod alma;

/// This module provides a notifier that writes reports to the log.
pub mod logger;
