use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, error, info};
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        Mutex,
    },
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{config::Credential, error::BatchError};

use super::{
    item::{RecordMutator, RecordResolver},
    job::{ImportJob, JobRunner, JobStatus},
    notify::Notifier,
    repository::JobRepository,
};

/// Everything needed to queue one import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub path: PathBuf,
    pub field: String,
    pub credential: Credential,
    pub requester: String,
    pub institution: String,
    /// Name shown in the report; defaults to the file name of `path`.
    pub filename: Option<String>,
}

impl ImportRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        credential: Credential,
        requester: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
            credential,
            requester: requester.into(),
            institution: String::new(),
            filename: None,
        }
    }

    pub fn institution(mut self, code: impl Into<String>) -> Self {
        self.institution = code.into();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    fn display_name(&self) -> String {
        self.filename.clone().unwrap_or_else(|| file_name(&self.path))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

struct QueuedJob {
    job: ImportJob,
    path: PathBuf,
    credential: Credential,
}

/// Shared, owned collaborators of every worker.
struct Pipeline {
    resolver: Arc<dyn RecordResolver>,
    mutator: Arc<dyn RecordMutator>,
    notifier: Option<Arc<dyn Notifier>>,
    repository: Arc<dyn JobRepository>,
    delimiter: u8,
}

impl Pipeline {
    fn execute(&self, queued: QueuedJob) -> ImportJob {
        let mut runner = JobRunner::new(self.resolver.as_ref(), self.mutator.as_ref())
            .repository(self.repository.as_ref())
            .delimiter(self.delimiter);
        if let Some(notifier) = &self.notifier {
            runner = runner.notifier(notifier.as_ref());
        }
        runner.execute(queued.job, &queued.path, &queued.credential)
    }
}

/// Runs imports out of band on a pool of workers.
///
/// [`JobLauncher::submit`] returns as soon as the job is queued. Each worker
/// takes one job at a time and runs it on tokio's blocking pool, so rows of a
/// job are processed sequentially while different jobs run side by side.
/// Job state is published to the [`JobRepository`].
///
/// Must be started from within a tokio runtime.
pub struct JobLauncher {
    sender: Option<UnboundedSender<QueuedJob>>,
    repository: Arc<dyn JobRepository>,
    workers: Vec<JoinHandle<()>>,
}

impl JobLauncher {
    /// Queues an import and returns its id.
    pub fn submit(&self, request: ImportRequest) -> Result<Uuid, BatchError> {
        if request.field.trim().is_empty() {
            return Err(BatchError::InvalidField);
        }
        let sender = self.sender.as_ref().ok_or(BatchError::QueueClosed)?;

        let job = ImportJob::new(
            request.display_name(),
            request.field,
            request.requester,
            request.institution,
        );
        let id = job.id;
        self.repository.save(&job);

        let queued = QueuedJob {
            job,
            path: request.path,
            credential: request.credential,
        };
        if let Err(mpsc::error::SendError(queued)) = sender.send(queued) {
            let mut job = queued.job;
            job.status = JobStatus::Failed;
            job.error = Some(BatchError::QueueClosed.to_string());
            self.repository.save(&job);
            return Err(BatchError::QueueClosed);
        }

        info!("Queued job {id}");
        Ok(id)
    }

    pub fn status(&self, id: &Uuid) -> Option<ImportJob> {
        self.repository.find(id)
    }

    pub fn jobs(&self) -> Vec<ImportJob> {
        self.repository.list()
    }

    /// Stops accepting jobs and waits until every queued job has finished.
    pub async fn shutdown(mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if let Err(err) = worker.await {
                error!("Worker stopped abnormally: {err}");
            }
        }
        info!("Job launcher stopped");
    }
}

async fn work(
    worker: usize,
    queue: Arc<Mutex<UnboundedReceiver<QueuedJob>>>,
    pipeline: Arc<Pipeline>,
) {
    debug!("Worker {worker} started");
    loop {
        let next = queue.lock().await.recv().await;
        let Some(queued) = next else {
            break;
        };

        let mut job = queued.job.clone();
        debug!("Worker {worker} picked up job {}", job.id);

        let task_pipeline = Arc::clone(&pipeline);
        let outcome = tokio::task::spawn_blocking(move || task_pipeline.execute(queued)).await;

        if let Err(err) = outcome {
            error!("Job {} aborted: {}", job.id, err);
            job.status = JobStatus::Failed;
            job.error = Some(format!("job aborted: {err}"));
            pipeline.repository.save(&job);
        }
    }
    debug!("Worker {worker} stopped");
}

/// Configures and starts a [`JobLauncher`].
pub struct JobLauncherBuilder {
    resolver: Option<Arc<dyn RecordResolver>>,
    mutator: Option<Arc<dyn RecordMutator>>,
    notifier: Option<Arc<dyn Notifier>>,
    repository: Option<Arc<dyn JobRepository>>,
    workers: usize,
    delimiter: u8,
}

impl Default for JobLauncherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JobLauncherBuilder {
    pub fn new() -> Self {
        Self {
            resolver: None,
            mutator: None,
            notifier: None,
            repository: None,
            workers: 1,
            delimiter: b',',
        }
    }

    pub fn resolver(mut self, resolver: Arc<dyn RecordResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn mutator(mut self, mutator: Arc<dyn RecordMutator>) -> Self {
        self.mutator = Some(mutator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn JobRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Spawns the workers on the current tokio runtime.
    pub fn start(self) -> Result<JobLauncher, BatchError> {
        let resolver = self
            .resolver
            .ok_or_else(|| BatchError::Config("a record resolver is required".to_string()))?;
        let mutator = self
            .mutator
            .ok_or_else(|| BatchError::Config("a record mutator is required".to_string()))?;
        let repository = self
            .repository
            .ok_or_else(|| BatchError::Config("a job repository is required".to_string()))?;
        if self.workers == 0 {
            return Err(BatchError::Config("workers must be at least 1".to_string()));
        }

        let pipeline = Arc::new(Pipeline {
            resolver,
            mutator,
            notifier: self.notifier,
            repository: Arc::clone(&repository),
            delimiter: self.delimiter,
        });

        let (sender, receiver) = mpsc::unbounded_channel();
        let queue = Arc::new(Mutex::new(receiver));
        let workers = (0..self.workers)
            .map(|worker| tokio::spawn(work(worker, Arc::clone(&queue), Arc::clone(&pipeline))))
            .collect();

        info!("Job launcher started with {} workers", self.workers);
        Ok(JobLauncher {
            sender: Some(sender),
            repository,
            workers,
        })
    }
}
