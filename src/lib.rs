#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Alma Batch for Rust

 Bulk-edit a field of many catalog item records from a two-column spreadsheet.
 Column 1 holds an item barcode, column 2 the new value for the chosen field.
 Each row is looked up in the catalog, changed and written back; a bad row is
 recorded and skipped, never fatal. When the file is done a report listing
 every failed row goes to the person who submitted it.

 ## Core Concepts

- **ImportJob:** one run over one uploaded file, with a status that moves from
  `PENDING` to `RUNNING` and ends in `SUCCEEDED` or `FAILED`.
- **RowReader:** reads `(barcode, value)` rows from the decoded file, one at a
  time, numbered like the spreadsheet.
- **RecordResolver / RecordMutator:** fetch the item record for a barcode and
  write the changed record back. [`item::alma::AlmaClient`] implements both
  over the Alma REST API.
- **RunAccumulator:** counts successes and failures and keeps one error line
  per failed row.
- **JobRunner:** drives a job from file to report.
- **JobLauncher:** queues jobs and runs them on a pool of workers so that
  submitting returns at once.

 ## Features

| **Feature** | **Description**                                              |
|-------------|--------------------------------------------------------------|
| alma        | Enables the Alma REST client (default)                       |
| cli         | Enables the `alma-batch` command line tool                   |
| full        | Enables all available features                               |

 ## Getting Started

```rust
# use alma_batch_rs::{
#     config::Credential,
#     core::{item::{RecordMutator, RecordResolver}, job::JobRunner, record::RemoteRecord},
#     error::RowError,
# };
# use serde_json::json;
# use std::env::temp_dir;
# struct Catalog;
# impl RecordResolver for Catalog {
#     fn resolve(&self, barcode: &str, _: &Credential) -> Result<RemoteRecord, RowError> {
#         if barcode == "B999" {
#             return Err(RowError::Resolve("HTTP 404 Not Found".to_string()));
#         }
#         RemoteRecord::from_value(json!({
#             "bib_data": { "mms_id": "1" },
#             "holding_data": { "holding_id": "2" },
#             "item_data": { "pid": "3" }
#         })).map_err(RowError::Resolve)
#     }
# }
# impl RecordMutator for Catalog {
#     fn mutate(&self, _: RemoteRecord, _: &str, _: &str, _: &Credential) -> Result<(), RowError> {
#         Ok(())
#     }
# }
fn main() -> Result<(), alma_batch_rs::BatchError> {
    let path = temp_dir().join("getting-started.csv");
    std::fs::write(&path, "B001,new note A\nB999,new note B\n").unwrap();

    let catalog = Catalog; // or item::alma::AlmaClient
    let runner = JobRunner::new(&catalog, &catalog);

    let result = runner.run(&path, "internal_note_1", &Credential::new("api-key"))?;

    assert_eq!(result.success_count, 1);
    assert_eq!(
        result.to_report(),
        "Results for getting-started.csv:\n\
         Error finding Barcode B999 in row 2: HTTP 404 Not Found\n\
         1 barcodes updated.\n\
         1 barcodes not updated. (See errors above.)"
    );

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Importer configuration and credentials
pub mod config;

/// Core module for import jobs
pub mod core;

/// Error types for import jobs
pub mod error;

#[doc(inline)]
pub use error::*;

/// Readers, encoding detection, the catalog client and notifiers
pub mod item;
