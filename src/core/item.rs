use crate::{config::Credential, error::RowError};

use super::record::RemoteRecord;

/// One parsed line of the uploaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based, matches the spreadsheet row the operator sees.
    pub number: usize,
    pub barcode: String,
    pub value: String,
}

/// A line that could not become a [`Row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub number: usize,
    /// First column as read, possibly empty.
    pub barcode: String,
    pub error: RowError,
}

/// Result of one call to [`ItemReader::read`]: `None` once the input is exhausted.
pub type ItemReaderResult<T> = Option<Result<T, RejectedRow>>;

pub trait ItemReader<T> {
    fn read(&self) -> ItemReaderResult<T>;
}

/// Fetches the current remote record for a barcode.
///
/// One network read per call; no retries and no caching.
pub trait RecordResolver: Send + Sync {
    fn resolve(&self, barcode: &str, credential: &Credential) -> Result<RemoteRecord, RowError>;
}

/// Writes a field change back to the remote catalog.
///
/// The field name is not checked against the record; the catalog accepts or
/// rejects it.
pub trait RecordMutator: Send + Sync {
    fn mutate(
        &self,
        record: RemoteRecord,
        field: &str,
        value: &str,
        credential: &Credential,
    ) -> Result<(), RowError>;
}
