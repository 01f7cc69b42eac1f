use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
/// Job-fatal error.
///
/// Returned when a whole import cannot run: nothing has been attempted
/// against the catalog and no report exists.
pub enum BatchError {
    #[error("unable to read input file {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential is empty or unusable")]
    InvalidCredential,

    #[error("target field name must not be empty")]
    InvalidField,

    #[error("unknown item field: {0}")]
    UnknownField(String),

    #[error("unknown institution: {0}")]
    UnknownInstitution(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unable to deliver report to {recipient}: {message}")]
    Notification { recipient: String, message: String },

    #[error("job queue is closed")]
    QueueClosed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Row-scoped error. Recorded in the report; never stops a run.
pub enum RowError {
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Resolve(String),

    #[error("{0}")]
    Mutate(String),
}

impl RowError {
    /// Verb naming the phase that failed, as written in report lines.
    pub fn action(&self) -> &'static str {
        match self {
            RowError::Parse(_) => "reading",
            RowError::Resolve(_) => "finding",
            RowError::Mutate(_) => "updating",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_displays_cause_only() {
        let error = RowError::Resolve("HTTP 404 Not Found".to_string());
        assert_eq!(error.to_string(), "HTTP 404 Not Found");
        assert_eq!(error.action(), "finding");
        assert_eq!(RowError::Parse(String::new()).action(), "reading");
        assert_eq!(RowError::Mutate(String::new()).action(), "updating");
    }

    #[test]
    fn input_unreadable_names_the_path() {
        let error = BatchError::InputUnreadable {
            path: PathBuf::from("/tmp/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            error.to_string(),
            "unable to read input file /tmp/missing.csv: not found"
        );
    }
}
