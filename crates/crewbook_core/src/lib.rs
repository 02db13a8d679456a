//! Core domain logic for crewbook, a personnel records manager.
//! This crate is the single source of truth for worker invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, StoreBackend, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::WorkerRecord;
pub use model::worker::{
    validate_age, validate_id, validate_name, validate_salary, validate_weekly_hours, Contract,
    Salary, ValidationError, Worker, WorkerId, WorkerKind,
};
pub use repo::json_repo::JsonWorkerRepository;
pub use repo::memory_repo::MemoryWorkerRepository;
pub use repo::open_repository;
pub use repo::worker_repo::{
    FieldUpdate, RepoError, RepoResult, SqliteWorkerRepository, WorkerRepository,
};
pub use service::worker_service::{ServiceError, ServiceResult, WorkerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
