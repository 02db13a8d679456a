//! Repository layer: the persistence boundary for worker records.
//!
//! # Responsibility
//! - Define the narrow `WorkerRepository` contract used by the service layer.
//! - Provide relational (SQLite), document (JSON) and in-memory backends.
//! - Build the configured backend from an explicit `StoreConfig`.
//!
//! # Invariants
//! - Repository writes re-validate records before persistence.
//! - Repositories speak `WorkerRecord`, never UI types.

pub mod json_repo;
pub mod memory_repo;
pub mod worker_repo;

use crate::config::{StoreBackend, StoreConfig};
use json_repo::JsonWorkerRepository;
use log::info;
use memory_repo::MemoryWorkerRepository;
use worker_repo::{RepoResult, SqliteWorkerRepository, WorkerRepository};

/// Opens the backend selected by `config`.
pub fn open_repository(config: &StoreConfig) -> RepoResult<Box<dyn WorkerRepository>> {
    let repo: Box<dyn WorkerRepository> = match config.backend {
        StoreBackend::Sqlite => Box::new(SqliteWorkerRepository::open(&config.path)?),
        StoreBackend::Json => Box::new(JsonWorkerRepository::new(config.path.clone())),
        StoreBackend::Memory => Box::new(MemoryWorkerRepository::new()),
    };
    info!(
        "event=repo_open module=repo status=ok backend={}",
        config.backend.as_str()
    );
    Ok(repo)
}
