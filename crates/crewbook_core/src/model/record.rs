//! Storage-neutral worker representation.
//!
//! # Responsibility
//! - Convert validated `Worker` values to flat key/value rows and back.
//! - Keep persisted key names in one place for every backend.
//!
//! # Invariants
//! - Keys are exactly `dni`, `nombre`, `apellido`, `edad`, `salario`, `kind`
//!   plus `departamento` or `horas_semanales`.
//! - Weekly hours are always written as `horas_semanales`; the legacy
//!   document key `horas semanales` is accepted on read only.
//! - Converting a record back into a `Worker` re-runs every validation.

use crate::model::worker::{Contract, ValidationError, Worker, WorkerKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_ID: &str = "dni";
pub const KEY_FIRST_NAME: &str = "nombre";
pub const KEY_LAST_NAME: &str = "apellido";
pub const KEY_AGE: &str = "edad";
pub const KEY_SALARY: &str = "salario";
pub const KEY_KIND: &str = "kind";
pub const KEY_DEPARTMENT: &str = "departamento";
pub const KEY_WEEKLY_HOURS: &str = "horas_semanales";

/// Flat persisted row shared by every storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub dni: u32,
    pub nombre: String,
    pub apellido: String,
    pub edad: u32,
    pub salario: f64,
    /// Explicit variant tag. Absent only in documents written by older tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departamento: Option<String>,
    #[serde(
        default,
        alias = "horas semanales",
        skip_serializing_if = "Option::is_none"
    )]
    pub horas_semanales: Option<u32>,
}

impl WorkerRecord {
    /// Returns the variant tag, falling back to field presence for untagged rows.
    pub fn resolved_kind(&self) -> Result<Option<WorkerKind>, ValidationError> {
        if let Some(kind) = self.kind {
            return Ok(Some(kind));
        }
        match (&self.departamento, self.horas_semanales) {
            (Some(_), None) => Ok(Some(WorkerKind::FullTime)),
            (None, Some(_)) => Ok(Some(WorkerKind::PartTime)),
            (None, None) => Ok(None),
            (Some(_), Some(_)) => Err(ValidationError::ContractMismatch(format!(
                "dni {} carries both `{KEY_DEPARTMENT}` and `{KEY_WEEKLY_HOURS}` without a `{KEY_KIND}` tag",
                self.dni
            ))),
        }
    }
}

impl Worker {
    /// Serializes this worker into its persisted row.
    pub fn to_record(&self) -> WorkerRecord {
        WorkerRecord {
            dni: self.id().get(),
            nombre: self.first_name().to_string(),
            apellido: self.last_name().to_string(),
            edad: self.age(),
            salario: self.salary().get(),
            kind: self.kind(),
            departamento: self.department().map(str::to_string),
            horas_semanales: self.weekly_hours(),
        }
    }

    /// Produces a JSON object mapping with the persisted key names.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let record = self.to_record();
        let mut map = Map::new();
        map.insert(KEY_ID.to_string(), Value::from(record.dni));
        map.insert(KEY_FIRST_NAME.to_string(), Value::from(record.nombre));
        map.insert(KEY_LAST_NAME.to_string(), Value::from(record.apellido));
        map.insert(KEY_AGE.to_string(), Value::from(record.edad));
        map.insert(KEY_SALARY.to_string(), Value::from(record.salario));
        if let Some(kind) = record.kind {
            map.insert(KEY_KIND.to_string(), Value::from(kind.as_str()));
        }
        if let Some(department) = record.departamento {
            map.insert(KEY_DEPARTMENT.to_string(), Value::from(department));
        }
        if let Some(hours) = record.horas_semanales {
            map.insert(KEY_WEEKLY_HOURS.to_string(), Value::from(hours));
        }
        map
    }

    /// Rebuilds a worker from a mapping produced by [`Worker::to_mapping`]
    /// or read from a document store.
    pub fn from_mapping(map: Map<String, Value>) -> Result<Self, ValidationError> {
        let record: WorkerRecord = serde_json::from_value(Value::Object(map))
            .map_err(|err| ValidationError::MalformedRecord(err.to_string()))?;
        Self::try_from(record)
    }
}

impl TryFrom<WorkerRecord> for Worker {
    type Error = ValidationError;

    fn try_from(record: WorkerRecord) -> Result<Self, Self::Error> {
        let contract = match record.resolved_kind()? {
            Some(WorkerKind::FullTime) => {
                if record.horas_semanales.is_some() {
                    return Err(ValidationError::ContractMismatch(format!(
                        "full-time dni {} must not carry `{KEY_WEEKLY_HOURS}`",
                        record.dni
                    )));
                }
                let department = record.departamento.ok_or_else(|| {
                    ValidationError::ContractMismatch(format!(
                        "full-time dni {} is missing `{KEY_DEPARTMENT}`",
                        record.dni
                    ))
                })?;
                Some(Contract::FullTime { department })
            }
            Some(WorkerKind::PartTime) => {
                if record.departamento.is_some() {
                    return Err(ValidationError::ContractMismatch(format!(
                        "part-time dni {} must not carry `{KEY_DEPARTMENT}`",
                        record.dni
                    )));
                }
                let weekly_hours = record.horas_semanales.ok_or_else(|| {
                    ValidationError::ContractMismatch(format!(
                        "part-time dni {} is missing `{KEY_WEEKLY_HOURS}`",
                        record.dni
                    ))
                })?;
                Some(Contract::PartTime { weekly_hours })
            }
            None => None,
        };

        Worker::new(
            record.dni,
            &record.nombre,
            &record.apellido,
            record.edad,
            record.salario,
            contract,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::WorkerRecord;
    use crate::model::worker::{ValidationError, Worker, WorkerKind};
    use serde_json::json;

    #[test]
    fn untagged_record_infers_variant_from_extension_field() {
        let record = WorkerRecord {
            dni: 1234567,
            nombre: "Leo".to_string(),
            apellido: "Paz".to_string(),
            edad: 31,
            salario: 10.0,
            kind: None,
            departamento: None,
            horas_semanales: Some(12),
        };
        assert_eq!(record.resolved_kind().unwrap(), Some(WorkerKind::PartTime));

        let worker = Worker::try_from(record).unwrap();
        assert_eq!(worker.weekly_hours(), Some(12));
    }

    #[test]
    fn record_without_extension_becomes_bare_worker() {
        let value = json!({
            "dni": 7654321,
            "nombre": "sol",
            "apellido": "rey",
            "edad": 50,
            "salario": 0.0
        });
        let worker = Worker::from_mapping(value.as_object().cloned().unwrap()).unwrap();
        assert_eq!(worker.kind(), None);
        assert_eq!(worker.first_name(), "Sol");
    }

    #[test]
    fn tag_and_fields_must_agree() {
        let value = json!({
            "dni": 7654321,
            "nombre": "sol",
            "apellido": "rey",
            "edad": 50,
            "salario": 1.0,
            "kind": "full_time",
            "horas_semanales": 10
        });
        let err = Worker::from_mapping(value.as_object().cloned().unwrap()).unwrap_err();
        assert!(matches!(err, ValidationError::ContractMismatch(_)));
    }

    #[test]
    fn legacy_spaced_weekly_hours_key_is_accepted() {
        let value = json!({
            "dni": 7654321,
            "nombre": "sol",
            "apellido": "rey",
            "edad": 50,
            "salario": 1.0,
            "horas semanales": 18
        });
        let worker = Worker::from_mapping(value.as_object().cloned().unwrap()).unwrap();
        assert_eq!(worker.weekly_hours(), Some(18));
        assert!(worker.to_mapping().contains_key("horas_semanales"));
    }

    #[test]
    fn mapping_rejects_invalid_persisted_salary() {
        let value = json!({
            "dni": 7654321,
            "nombre": "sol",
            "apellido": "rey",
            "edad": 50,
            "salario": -3.0,
            "kind": "full_time",
            "departamento": "IT"
        });
        let err = Worker::from_mapping(value.as_object().cloned().unwrap()).unwrap_err();
        assert_eq!(err, ValidationError::NegativeSalary(-3.0));
    }
}
