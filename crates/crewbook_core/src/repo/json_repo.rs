//! JSON document worker repository.
//!
//! # Responsibility
//! - Persist the whole worker collection as one JSON object keyed by `dni`.
//!
//! # Invariants
//! - Every write reads the full document, mutates it, and writes it back in
//!   full through a temp file + rename, so readers never see a partial file.
//! - A missing or empty file is an empty collection.
//! - Document keys must match the `dni` stored inside each entry.

use crate::model::record::WorkerRecord;
use crate::model::worker::{Worker, WorkerId};
use crate::repo::worker_repo::{FieldUpdate, RepoError, RepoResult, WorkerRepository};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

type Document = BTreeMap<String, WorkerRecord>;

/// Flat-file document store.
pub struct JsonWorkerRepository {
    path: PathBuf,
}

impl JsonWorkerRepository {
    /// Points the repository at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RepoResult<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        let document: Document = serde_json::from_str(&content)?;
        for (key, record) in &document {
            if key != &record.dni.to_string() {
                return Err(RepoError::InvalidData(format!(
                    "document key `{key}` does not match dni {}",
                    record.dni
                )));
            }
        }
        Ok(document)
    }

    fn save(&self, document: &Document) -> RepoResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(document)?;
        let tmp_file = dir.join(format!(".workers-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        if let Err(err) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(err.into());
        }

        debug!(
            "event=document_write module=repo status=ok entries={}",
            document.len()
        );
        Ok(())
    }
}

impl WorkerRepository for JsonWorkerRepository {
    fn exists(&self, id: WorkerId) -> RepoResult<bool> {
        Ok(self.load()?.contains_key(&id.to_string()))
    }

    fn fetch_one(&self, id: WorkerId) -> RepoResult<Option<WorkerRecord>> {
        Ok(self.load()?.remove(&id.to_string()))
    }

    fn fetch_all(&self) -> RepoResult<Vec<WorkerRecord>> {
        let mut records: Vec<WorkerRecord> = self.load()?.into_values().collect();
        // String keys sort "9999999" after "10000000"; order numerically.
        records.sort_by_key(|record| record.dni);
        Ok(records)
    }

    fn insert(&self, record: &WorkerRecord) -> RepoResult<()> {
        let worker = Worker::try_from(record.clone())?;
        let mut document = self.load()?;
        let key = worker.id().to_string();
        if document.contains_key(&key) {
            return Err(RepoError::Conflict(worker.id()));
        }
        document.insert(key, worker.to_record());
        self.save(&document)
    }

    fn update_field(&self, id: WorkerId, update: &FieldUpdate) -> RepoResult<usize> {
        update.validate()?;

        let mut document = self.load()?;
        let Some(record) = document.get_mut(&id.to_string()) else {
            return Ok(0);
        };
        match update {
            FieldUpdate::Salary(value) => record.salario = *value,
        }
        self.save(&document)?;
        Ok(1)
    }

    fn delete(&self, id: WorkerId) -> RepoResult<usize> {
        let mut document = self.load()?;
        if document.remove(&id.to_string()).is_none() {
            return Ok(0);
        }
        self.save(&document)?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonWorkerRepository;
    use crate::model::worker::{Worker, WorkerId};
    use crate::repo::worker_repo::{RepoError, WorkerRepository};
    use std::fs;

    #[test]
    fn missing_and_empty_files_read_as_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workers.json");
        let repo = JsonWorkerRepository::new(&path);
        assert!(repo.fetch_all().unwrap().is_empty());

        fs::write(&path, "  \n").unwrap();
        assert!(repo.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn mismatched_document_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workers.json");
        fs::write(
            &path,
            r#"{"1234567": {"dni": 7654321, "nombre": "a", "apellido": "b", "edad": 1, "salario": 1.0}}"#,
        )
        .unwrap();

        let err = JsonWorkerRepository::new(&path).fetch_all().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)), "unexpected: {err}");
    }

    #[test]
    fn insert_writes_underscored_weekly_hours_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("workers.json");
        let repo = JsonWorkerRepository::new(&path);
        let worker = Worker::part_time(1234567, "leo", "paz", 22, 50.0, 16).unwrap();
        repo.insert(&worker.to_record()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"horas_semanales\": 16"));
        assert!(raw.contains("\"kind\": \"part_time\""));

        let dup = repo.insert(&worker.to_record()).unwrap_err();
        assert!(matches!(dup, RepoError::Conflict(id) if id == WorkerId::new(1234567).unwrap()));
    }

    #[test]
    fn fetch_all_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonWorkerRepository::new(dir.path().join("workers.json"));
        for id in [10_000_000, 9_999_999, 2_000_000] {
            let worker = Worker::full_time(id, "a", "b", 30, 1.0, "Ops").unwrap();
            repo.insert(&worker.to_record()).unwrap();
        }

        let ids: Vec<u32> = repo
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|record| record.dni)
            .collect();
        assert_eq!(ids, vec![2_000_000, 9_999_999, 10_000_000]);
    }
}
