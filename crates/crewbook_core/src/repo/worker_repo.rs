//! Worker repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow persistence interface every worker backend implements.
//! - Keep SQL details for the relational backend inside this module.
//!
//! # Invariants
//! - Write paths validate the record before any SQL mutation.
//! - Base row and variant row are written and deleted in one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::{schema_version, stored_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::record::WorkerRecord;
use crate::model::worker::{Salary, ValidationError, Worker, WorkerId, WorkerKind};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const WORKER_SELECT_SQL: &str = "SELECT
    w.dni,
    w.nombre,
    w.apellido,
    w.edad,
    w.salario,
    w.kind,
    f.departamento,
    p.horas_semanales
FROM workers w
LEFT JOIN full_time_workers f ON f.dni = w.dni
LEFT JOIN part_time_workers p ON p.dni = w.dni";

const REQUIRED_TABLES: &[&str] = &["workers", "full_time_workers", "part_time_workers"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer error shared by every worker backend.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    /// A row with the same identifier already exists.
    Conflict(WorkerId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "worker store i/o failed: {err}"),
            Self::Serialization(err) => write!(f, "worker document is not valid JSON: {err}"),
            Self::Conflict(id) => write!(f, "worker already stored: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted worker data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Conflict(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Single-field mutation supported after a worker is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldUpdate {
    Salary(f64),
}

impl FieldUpdate {
    /// Re-validates the new value before it reaches storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Salary(value) => Salary::new(*value).map(|_| ()),
        }
    }
}

/// Persistence interface for worker CRUD.
///
/// Counts returned by `update_field` and `delete` are the number of stored
/// rows/entries touched; `0` means nothing matched.
pub trait WorkerRepository {
    /// Reports whether a base record for `id` is stored, without validating it.
    fn exists(&self, id: WorkerId) -> RepoResult<bool>;
    fn fetch_one(&self, id: WorkerId) -> RepoResult<Option<WorkerRecord>>;
    fn fetch_all(&self) -> RepoResult<Vec<WorkerRecord>>;
    fn insert(&self, record: &WorkerRecord) -> RepoResult<()>;
    fn update_field(&self, id: WorkerId, update: &FieldUpdate) -> RepoResult<usize>;
    fn delete(&self, id: WorkerId) -> RepoResult<usize>;
}

impl<T: WorkerRepository + ?Sized> WorkerRepository for Box<T> {
    fn exists(&self, id: WorkerId) -> RepoResult<bool> {
        (**self).exists(id)
    }

    fn fetch_one(&self, id: WorkerId) -> RepoResult<Option<WorkerRecord>> {
        (**self).fetch_one(id)
    }

    fn fetch_all(&self) -> RepoResult<Vec<WorkerRecord>> {
        (**self).fetch_all()
    }

    fn insert(&self, record: &WorkerRecord) -> RepoResult<()> {
        (**self).insert(record)
    }

    fn update_field(&self, id: WorkerId, update: &FieldUpdate) -> RepoResult<usize> {
        (**self).update_field(id, update)
    }

    fn delete(&self, id: WorkerId) -> RepoResult<usize> {
        (**self).delete(id)
    }
}

/// SQLite-backed relational worker repository.
///
/// Base fields live in `workers`; each variant has its own extension table
/// keyed by `dni`.
pub struct SqliteWorkerRepository {
    conn: Connection,
}

impl SqliteWorkerRepository {
    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps a connection that already carries the worker schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` when a worker table is absent.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrow of the underlying connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl WorkerRepository for SqliteWorkerRepository {
    fn exists(&self, id: WorkerId) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM workers WHERE dni = ?1);",
            [id.get()],
            |row| row.get(0),
        )?;
        Ok(found != 0)
    }

    fn fetch_one(&self, id: WorkerId) -> RepoResult<Option<WorkerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKER_SELECT_SQL} WHERE w.dni = ?1;"))?;
        let row = stmt
            .query_row([id.get()], |row| Ok(read_row(row)))
            .optional()?;
        row.transpose()
    }

    fn fetch_all(&self) -> RepoResult<Vec<WorkerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKER_SELECT_SQL} ORDER BY w.dni ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(read_row(row)?);
        }

        Ok(records)
    }

    fn insert(&self, record: &WorkerRecord) -> RepoResult<()> {
        let worker = Worker::try_from(record.clone())?;
        let id = worker.id();
        let record = worker.to_record();

        // Dropping `tx` on any early return rolls back the base row.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO workers (dni, nombre, apellido, edad, salario, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.dni,
                record.nombre.as_str(),
                record.apellido.as_str(),
                record.edad,
                record.salario,
                record.kind.map(WorkerKind::as_str),
            ],
        )
        .map_err(|err| map_insert_error(err, id))?;

        match (record.kind, record.departamento, record.horas_semanales) {
            (Some(WorkerKind::FullTime), Some(department), _) => {
                tx.execute(
                    "INSERT INTO full_time_workers (dni, departamento) VALUES (?1, ?2);",
                    params![record.dni, department],
                )
                .map_err(|err| map_insert_error(err, id))?;
            }
            (Some(WorkerKind::PartTime), _, Some(hours)) => {
                tx.execute(
                    "INSERT INTO part_time_workers (dni, horas_semanales) VALUES (?1, ?2);",
                    params![record.dni, hours],
                )
                .map_err(|err| map_insert_error(err, id))?;
            }
            _ => {}
        }

        tx.commit()?;
        Ok(())
    }

    fn update_field(&self, id: WorkerId, update: &FieldUpdate) -> RepoResult<usize> {
        update.validate()?;

        let changed = match update {
            FieldUpdate::Salary(value) => self.conn.execute(
                "UPDATE workers SET salario = ?1 WHERE dni = ?2;",
                params![value, id.get()],
            )?,
        };

        Ok(changed)
    }

    fn delete(&self, id: WorkerId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        removed += tx.execute("DELETE FROM full_time_workers WHERE dni = ?1;", [id.get()])?;
        removed += tx.execute("DELETE FROM part_time_workers WHERE dni = ?1;", [id.get()])?;
        removed += tx.execute("DELETE FROM workers WHERE dni = ?1;", [id.get()])?;
        tx.commit()?;
        Ok(removed)
    }
}

fn read_row(row: &Row<'_>) -> RepoResult<WorkerRecord> {
    let dni: u32 = row.get("dni")?;
    let kind = match row.get::<_, Option<String>>("kind")? {
        Some(value) => Some(WorkerKind::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid kind `{value}` in workers.kind for {dni}"))
        })?),
        None => None,
    };

    let record = WorkerRecord {
        dni,
        nombre: row.get("nombre")?,
        apellido: row.get("apellido")?,
        edad: row.get("edad")?,
        salario: row.get("salario")?,
        kind,
        departamento: row.get("departamento")?,
        horas_semanales: row.get("horas_semanales")?,
    };

    // Tagged rows must carry exactly their own extension.
    Worker::try_from(record.clone())
        .map_err(|err| RepoError::InvalidData(format!("worker {dni}: {err}")))?;
    Ok(record)
}

fn map_insert_error(err: rusqlite::Error, id: WorkerId) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepoError::Conflict(id)
        }
        _ => RepoError::from(err),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = schema_version();
    let actual_version = stored_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
