//! Mock version of the report notifier.
use alma_batch_rs::{core::notify::Notifier, BatchError};
use mockall::mock;

mock! {
    pub Notifier {}
    impl Notifier for Notifier {
        fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), BatchError>;
    }
}
