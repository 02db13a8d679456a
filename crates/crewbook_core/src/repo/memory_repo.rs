//! In-memory worker repository.
//!
//! Uses `RefCell` for interior mutability since the application is
//! single-threaded and the repository trait takes `&self` everywhere.

use crate::model::record::WorkerRecord;
use crate::model::worker::{Worker, WorkerId};
use crate::repo::worker_repo::{FieldUpdate, RepoError, RepoResult, WorkerRepository};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;

#[derive(Default)]
pub struct MemoryWorkerRepository {
    records: RefCell<BTreeMap<u32, WorkerRecord>>,
    simulate_write_error: Cell<bool>,
}

impl MemoryWorkerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with an I/O error.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Stores a row without validation, for seeding inconsistent state in tests.
    pub fn insert_raw(&self, record: WorkerRecord) {
        self.records.borrow_mut().insert(record.dni, record);
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.simulate_write_error.get() {
            return Err(RepoError::Io(io::Error::other("simulated write error")));
        }
        Ok(())
    }
}

impl WorkerRepository for MemoryWorkerRepository {
    fn exists(&self, id: WorkerId) -> RepoResult<bool> {
        Ok(self.records.borrow().contains_key(&id.get()))
    }

    fn fetch_one(&self, id: WorkerId) -> RepoResult<Option<WorkerRecord>> {
        Ok(self.records.borrow().get(&id.get()).cloned())
    }

    fn fetch_all(&self) -> RepoResult<Vec<WorkerRecord>> {
        Ok(self.records.borrow().values().cloned().collect())
    }

    fn insert(&self, record: &WorkerRecord) -> RepoResult<()> {
        let worker = Worker::try_from(record.clone())?;
        self.check_writable()?;

        let mut records = self.records.borrow_mut();
        if records.contains_key(&worker.id().get()) {
            return Err(RepoError::Conflict(worker.id()));
        }
        records.insert(worker.id().get(), worker.to_record());
        Ok(())
    }

    fn update_field(&self, id: WorkerId, update: &FieldUpdate) -> RepoResult<usize> {
        update.validate()?;
        self.check_writable()?;

        let mut records = self.records.borrow_mut();
        let Some(record) = records.get_mut(&id.get()) else {
            return Ok(0);
        };
        match update {
            FieldUpdate::Salary(value) => record.salario = *value,
        }
        Ok(1)
    }

    fn delete(&self, id: WorkerId) -> RepoResult<usize> {
        self.check_writable()?;
        Ok(usize::from(self.records.borrow_mut().remove(&id.get()).is_some()))
    }
}
