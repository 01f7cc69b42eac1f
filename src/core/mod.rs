/// Accumulation of row outcomes into a run result and report.
pub mod accumulator;

/// Item fields an import may target.
pub mod field;

/// Rows, and the reader, resolver and mutator seams.
pub mod item;

/// Import jobs and the runner that drives them.
pub mod job;

/// Queue and worker pool that run jobs out of band.
pub mod launcher;

/// Delivery of finished reports.
pub mod notify;

/// The catalog's item record.
pub mod record;

/// Storage of job status for polling.
pub mod repository;

/// The per-row resolve/mutate loop.
pub mod step;
