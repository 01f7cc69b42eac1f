use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use uuid::Uuid;

use super::job::ImportJob;

/// Where job state is published for callers to poll.
pub trait JobRepository: Send + Sync {
    /// Inserts or replaces the job with the same id.
    fn save(&self, job: &ImportJob);

    fn find(&self, id: &Uuid) -> Option<ImportJob>;

    /// All known jobs, most recently submitted first.
    fn list(&self) -> Vec<ImportJob>;
}

/// Job store kept in process memory; lost on restart.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<Uuid, ImportJob>>,
}

impl JobRepository for InMemoryJobRepository {
    fn save(&self, job: &ImportJob) {
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job.id, job.clone());
    }

    fn find(&self, id: &Uuid) -> Option<ImportJob> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn list(&self) -> Vec<ImportJob> {
        let mut jobs: Vec<ImportJob> = self
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        jobs
    }
}
