use log::info;

use crate::{core::notify::Notifier, BatchError};

/// Writes reports to the log instead of mailing them.
#[derive(Default)]
pub struct LoggerNotifier {}

impl Notifier for LoggerNotifier {
    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), BatchError> {
        info!("Report for {recipient}: {subject}\n{body}");
        Ok(())
    }
}
