use log::{debug, warn};

use crate::{config::Credential, error::RowError};

use super::{
    accumulator::RunAccumulator,
    item::{ItemReader, RecordMutator, RecordResolver, Row},
};

/// The row loop: resolve then mutate, one row at a time, in file order.
///
/// Every row's outcome goes to the accumulator and the loop always moves on
/// to the next row. Nothing here can end a run early.
pub struct UpdateStep<'a> {
    reader: &'a dyn ItemReader<Row>,
    resolver: &'a dyn RecordResolver,
    mutator: &'a dyn RecordMutator,
}

impl<'a> UpdateStep<'a> {
    pub fn new(
        reader: &'a dyn ItemReader<Row>,
        resolver: &'a dyn RecordResolver,
        mutator: &'a dyn RecordMutator,
    ) -> Self {
        Self {
            reader,
            resolver,
            mutator,
        }
    }

    pub fn execute(&self, field: &str, credential: &Credential, accumulator: &mut RunAccumulator) {
        while let Some(read) = self.reader.read() {
            match read {
                Ok(row) => {
                    debug!(
                        "Processing row {}: barcode {}; value {}",
                        row.number, row.barcode, row.value
                    );
                    let outcome = self.update(&row, field, credential);
                    match &outcome {
                        Ok(()) => debug!("Barcode {} updated in row {}", row.barcode, row.number),
                        Err(error) => warn!(
                            "Error {} Barcode {} in row {}: {}",
                            error.action(),
                            row.barcode,
                            row.number,
                            error
                        ),
                    }
                    accumulator.offer(row.number, &row.barcode, outcome);
                }
                Err(rejected) => {
                    warn!("Skipping row {}: {}", rejected.number, rejected.error);
                    accumulator.offer(rejected.number, &rejected.barcode, Err(rejected.error));
                }
            }
        }
    }

    fn update(&self, row: &Row, field: &str, credential: &Credential) -> Result<(), RowError> {
        let record = self.resolver.resolve(&row.barcode, credential)?;
        self.mutator.mutate(record, field, &row.value, credential)
    }
}
