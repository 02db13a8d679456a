//! Worker use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete/list entry points for workers.
//! - Enforce business rules above the repository (unique `dni`, existence).
//! - Translate between `Worker` and repository rows.
//!
//! # Invariants
//! - Invalid workers never reach the repository.
//! - Every call is a fresh round trip to storage; nothing is cached here.
//! - Failures are returned as `ServiceError` values, never panics.
//! - Logs carry identifiers only, never names or salaries.

use crate::config::StoreConfig;
use crate::model::record::WorkerRecord;
use crate::model::worker::{Salary, ValidationError, Worker, WorkerId};
use crate::repo::open_repository;
use crate::repo::worker_repo::{FieldUpdate, RepoError, WorkerRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome kinds reported by worker use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Field failed validation before reaching storage.
    Validation(ValidationError),
    /// Target identifier does not exist.
    NotFound(WorkerId),
    /// Create targeted an identifier that already exists.
    Duplicate(WorkerId),
    /// Backend I/O, connectivity or consistency failure.
    Storage(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no worker found with dni {id}"),
            Self::Duplicate(id) => write!(f, "a worker with dni {id} already exists"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict(id) => Self::Duplicate(id),
            other => Self::Storage(other),
        }
    }
}

impl ServiceError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::Storage(_) => "storage_failed",
        }
    }
}

/// CRUD façade over a worker repository.
pub struct WorkerService<R: WorkerRepository> {
    repo: R,
}

impl WorkerService<Box<dyn WorkerRepository>> {
    /// Opens the backend described by `config` and wraps it.
    pub fn from_config(config: &StoreConfig) -> ServiceResult<Self> {
        Ok(Self::new(open_repository(config)?))
    }
}

impl<R: WorkerRepository> WorkerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Stores a new worker.
    ///
    /// # Errors
    /// - `Duplicate` when the `dni` is already stored (checked before insert,
    ///   and again by the backend on insert).
    /// - `Storage` when the backend fails; nothing is left half-written.
    pub fn create(&self, worker: &Worker) -> ServiceResult<WorkerId> {
        let id = worker.id();
        let result = self.create_inner(worker);
        log_outcome("worker_create", id, &result);
        result
    }

    fn create_inner(&self, worker: &Worker) -> ServiceResult<WorkerId> {
        let id = worker.id();
        if self.repo.exists(id)? {
            return Err(ServiceError::Duplicate(id));
        }
        self.repo.insert(&worker.to_record())?;
        Ok(id)
    }

    /// Loads one worker with its variant.
    pub fn read(&self, id: WorkerId) -> ServiceResult<Worker> {
        let result = self
            .repo
            .fetch_one(id)
            .map_err(ServiceError::from)
            .and_then(|record| match record {
                Some(record) => to_worker(record),
                None => Err(ServiceError::NotFound(id)),
            });
        log_outcome("worker_read", id, &result);
        result
    }

    /// Replaces the salary of an existing worker and returns the stored record.
    ///
    /// # Errors
    /// - `Validation` when `new_salary` is negative or not finite.
    /// - `NotFound` when the worker is absent before the write, or when the
    ///   write itself touches nothing.
    pub fn update_salary(&self, id: WorkerId, new_salary: f64) -> ServiceResult<Worker> {
        let result = self.update_salary_inner(id, new_salary);
        log_outcome("worker_update", id, &result);
        result
    }

    fn update_salary_inner(&self, id: WorkerId, new_salary: f64) -> ServiceResult<Worker> {
        let salary = Salary::new(new_salary)?;
        let Some(record) = self.repo.fetch_one(id)? else {
            return Err(ServiceError::NotFound(id));
        };
        let mut worker = to_worker(record)?;

        let changed = self
            .repo
            .update_field(id, &FieldUpdate::Salary(salary.get()))?;
        if changed == 0 {
            return Err(ServiceError::NotFound(id));
        }

        worker.set_salary(salary.get())?;
        Ok(worker)
    }

    /// Removes a worker together with its variant data.
    ///
    /// Rows that fail to load (for example a tag without its extension row)
    /// can still be removed.
    pub fn delete(&self, id: WorkerId) -> ServiceResult<()> {
        let result = self.delete_inner(id);
        log_outcome("worker_delete", id, &result);
        result
    }

    fn delete_inner(&self, id: WorkerId) -> ServiceResult<()> {
        if !self.repo.exists(id)? {
            return Err(ServiceError::NotFound(id));
        }
        if self.repo.delete(id)? == 0 {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Lists every stored worker ordered by `dni`.
    pub fn list_all(&self) -> ServiceResult<Vec<Worker>> {
        let mut workers = self
            .repo
            .fetch_all()?
            .into_iter()
            .map(to_worker)
            .collect::<ServiceResult<Vec<_>>>()?;
        workers.sort_by_key(Worker::id);
        info!(
            "event=worker_list module=service status=ok count={}",
            workers.len()
        );
        Ok(workers)
    }
}

fn to_worker(record: WorkerRecord) -> ServiceResult<Worker> {
    let dni = record.dni;
    Worker::try_from(record).map_err(|err| {
        ServiceError::Storage(RepoError::InvalidData(format!("worker {dni}: {err}")))
    })
}

fn log_outcome<T>(event: &str, id: WorkerId, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok dni={id}"),
        Err(ServiceError::Storage(err)) => warn!(
            "event={event} module=service status=error dni={id} error_code=storage_failed error={err}"
        ),
        Err(err) => info!(
            "event={event} module=service status=rejected dni={id} error_code={}",
            err.code()
        ),
    }
}
