use std::{
    fs,
    path::Path,
    time::Instant,
};

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::Credential,
    error::BatchError,
    item::{csv::csv_reader::RowReaderBuilder, encoding},
};

use super::{
    accumulator::{RunAccumulator, RunResult},
    item::{RecordMutator, RecordResolver},
    notify::{report_subject, Notifier},
    repository::JobRepository,
    step::UpdateStep,
};

/// Lifecycle of an import.
///
/// `Pending` until a worker picks the job up, `Running` while rows are
/// processed, then `Succeeded` once a report exists (whatever the row
/// failures) or `Failed` when no row could be attempted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

/// One run of the pipeline against one uploaded table.
#[derive(Debug, Clone, Serialize)]
pub struct ImportJob {
    pub id: Uuid,
    /// Name of the uploaded file, used in the report header.
    pub filename: String,
    pub field: String,
    /// Address the report is sent to.
    pub requester: String,
    /// Institution code whose API key the job uses.
    pub institution: String,
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
    /// Present once the job has succeeded.
    pub report: Option<String>,
    /// Present once the job has failed.
    pub error: Option<String>,
}

impl ImportJob {
    pub fn new(
        filename: impl Into<String>,
        field: impl Into<String>,
        requester: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            field: field.into(),
            requester: requester.into(),
            institution: institution.into(),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
            report: None,
            error: None,
        }
    }
}

/// Drives one import from file to report.
///
/// # Example
///
/// ```no_run
/// use alma_batch_rs::config::Credential;
/// use alma_batch_rs::core::job::JobRunner;
/// use alma_batch_rs::item::alma::AlmaClient;
/// use std::{path::Path, time::Duration};
///
/// let client = AlmaClient::new(
///     "https://api-eu.hosted.exlibrisgroup.com",
///     Duration::from_secs(30),
/// )?;
/// let runner = JobRunner::new(&client, &client);
///
/// let result = runner.run(
///     Path::new("notes.csv"),
///     "internal_note_1",
///     &Credential::new("l8xx..."),
/// )?;
/// println!("{}", result.to_report());
/// # Ok::<(), alma_batch_rs::BatchError>(())
/// ```
pub struct JobRunner<'a> {
    resolver: &'a dyn RecordResolver,
    mutator: &'a dyn RecordMutator,
    notifier: Option<&'a dyn Notifier>,
    repository: Option<&'a dyn JobRepository>,
    delimiter: u8,
}

impl<'a> JobRunner<'a> {
    pub fn new(resolver: &'a dyn RecordResolver, mutator: &'a dyn RecordMutator) -> Self {
        Self {
            resolver,
            mutator,
            notifier: None,
            repository: None,
            delimiter: b',',
        }
    }

    /// Receives the report of every succeeded job.
    pub fn notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Receives every status change of the executed job.
    pub fn repository(mut self, repository: &'a dyn JobRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Processes every row of `path` and returns the accumulated result.
    ///
    /// Row failures are part of the result. An `Err` means no row was
    /// attempted: blank field, unusable credential or unreadable file.
    pub fn run(
        &self,
        path: &Path,
        field: &str,
        credential: &Credential,
    ) -> Result<RunResult, BatchError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.run_named(path, &filename, field, credential)
    }

    /// Runs a stored job and records its progress in the repository.
    ///
    /// Returns the job in its terminal state.
    pub fn execute(&self, mut job: ImportJob, path: &Path, credential: &Credential) -> ImportJob {
        let start = Instant::now();
        info!("Start of job: {}, file: {}", job.id, job.filename);

        job.status = JobStatus::Running;
        self.save(&job);

        match self.run_named(path, &job.filename, &job.field, credential) {
            Ok(result) => {
                let report = result.to_report();
                job.status = JobStatus::Succeeded;
                job.report = Some(report.clone());
                self.save(&job);

                info!(
                    "End of job: {}, {} barcodes updated, {} barcodes not updated, duration: {:?}",
                    job.id,
                    result.success_count,
                    result.failure_count,
                    start.elapsed()
                );
                self.deliver(&job, &report);
            }
            Err(err) => {
                error!("Job {} failed: {}", job.id, err);
                job.status = JobStatus::Failed;
                job.error = Some(err.to_string());
                self.save(&job);
            }
        }

        job
    }

    fn run_named(
        &self,
        path: &Path,
        filename: &str,
        field: &str,
        credential: &Credential,
    ) -> Result<RunResult, BatchError> {
        if field.trim().is_empty() {
            return Err(BatchError::InvalidField);
        }
        if !credential.is_usable() {
            return Err(BatchError::InvalidCredential);
        }

        let bytes = fs::read(path).map_err(|source| BatchError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Processing CSV file: {filename}");
        let (text, _) = encoding::decode(&bytes);
        let reader = RowReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut accumulator = RunAccumulator::new(filename);
        UpdateStep::new(&reader, self.resolver, self.mutator).execute(
            field,
            credential,
            &mut accumulator,
        );

        Ok(accumulator.finalize())
    }

    fn save(&self, job: &ImportJob) {
        if let Some(repository) = self.repository {
            repository.save(job);
        }
    }

    fn deliver(&self, job: &ImportJob, report: &str) {
        let Some(notifier) = self.notifier else {
            return;
        };

        match notifier.notify(&job.requester, &report_subject(&job.filename), report) {
            Ok(()) => info!("Report for job {} sent to {}", job.id, job.requester),
            Err(err) => error!("Error sending report for job {}: {}", job.id, err),
        }
    }
}
