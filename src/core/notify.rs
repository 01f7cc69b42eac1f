use crate::error::BatchError;

/// Delivers a finished report to the person who submitted the import.
///
/// Delivery is fire-and-forget: the runner logs an `Err` and carries on, the
/// job status is never changed by it.
pub trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), BatchError>;
}

/// Subject line of the report for an uploaded file.
pub fn report_subject(filename: &str) -> String {
    format!("Results for {filename}")
}
