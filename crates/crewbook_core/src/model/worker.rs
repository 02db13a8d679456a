//! Worker domain model.
//!
//! # Responsibility
//! - Define the canonical personnel record shared by full-time and part-time
//!   projections.
//! - Own field validation for identifiers, salaries, ages and weekly hours.
//!
//! # Invariants
//! - `WorkerId` always holds a positive integer with 7 or 8 decimal digits.
//! - `Salary` is always finite and `>= 0`.
//! - A `Worker` is never observable in a partially validated state: builders
//!   validate every field before returning, mutators validate before writing.
//! - Names are stored capitalized (`"ana"` -> `"Ana"`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_ID: u32 = 1_000_000;
const MAX_ID: u32 = 99_999_999;

/// Validation failures for worker fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Identifier is not a positive integer.
    InvalidId(String),
    /// Identifier parsed but does not have 7 or 8 digits.
    IdLength { value: u64, digits: usize },
    /// Salary is not a finite number.
    InvalidSalary(String),
    /// Salary parsed but is below zero.
    NegativeSalary(f64),
    /// Age is not a non-negative integer.
    InvalidAge(String),
    /// Weekly hours are not a non-negative integer.
    InvalidWeeklyHours(String),
    /// Name field was left blank.
    EmptyName(&'static str),
    /// Persisted discriminator and extension fields disagree.
    ContractMismatch(String),
    /// Mapping is missing keys or carries values of the wrong type.
    MalformedRecord(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(raw) => {
                write!(f, "dni must be a positive integer, got `{raw}`")
            }
            Self::IdLength { value, digits } => write!(
                f,
                "dni must have 7 or 8 digits, got {value} ({digits} digits)"
            ),
            Self::InvalidSalary(raw) => write!(f, "salary must be a valid number, got `{raw}`"),
            Self::NegativeSalary(value) => {
                write!(f, "salary must be greater than or equal to 0, got {value}")
            }
            Self::InvalidAge(raw) => write!(f, "age must be a non-negative integer, got `{raw}`"),
            Self::InvalidWeeklyHours(raw) => write!(
                f,
                "weekly hours must be a non-negative integer, got `{raw}`"
            ),
            Self::EmptyName(field) => write!(f, "{field} must not be empty"),
            Self::ContractMismatch(details) => write!(f, "inconsistent worker contract: {details}"),
            Self::MalformedRecord(details) => write!(f, "malformed worker record: {details}"),
        }
    }
}

impl Error for ValidationError {}

/// National identity number used as the worker primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(u32);

impl WorkerId {
    /// Validates an already-numeric identifier.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        check_id_range(u64::from(value))?;
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for WorkerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative, finite monthly salary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Salary(f64);

impl Salary {
    /// Validates an already-numeric salary.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidSalary(value.to_string()));
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeSalary(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Display for Salary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Persisted discriminator for worker variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerKind {
    FullTime,
    PartTime,
}

impl WorkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "full_time" => Some(Self::FullTime),
            "part_time" => Some(Self::PartTime),
            _ => None,
        }
    }
}

/// Variant-specific employment terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Contract {
    /// Full-time worker assigned to a department.
    FullTime { department: String },
    /// Part-time worker with a fixed weekly hour count.
    PartTime { weekly_hours: u32 },
}

impl Contract {
    pub fn kind(&self) -> WorkerKind {
        match self {
            Self::FullTime { .. } => WorkerKind::FullTime,
            Self::PartTime { .. } => WorkerKind::PartTime,
        }
    }
}

/// Canonical personnel record.
///
/// `contract == None` is a bare worker: a base record without a variant
/// extension. New records are always created through [`Worker::full_time`]
/// or [`Worker::part_time`].
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    id: WorkerId,
    first_name: String,
    last_name: String,
    age: u32,
    salary: Salary,
    contract: Option<Contract>,
}

impl Worker {
    /// Builds a worker after validating identifier and salary.
    ///
    /// # Errors
    /// - `InvalidId`/`IdLength` when `id` is outside the 7-8 digit range.
    /// - `InvalidSalary`/`NegativeSalary` when `salary` is not a finite `>= 0`.
    pub fn new(
        id: u32,
        first_name: &str,
        last_name: &str,
        age: u32,
        salary: f64,
        contract: Option<Contract>,
    ) -> Result<Self, ValidationError> {
        let id = WorkerId::new(id)?;
        let salary = Salary::new(salary)?;
        Ok(Self {
            id,
            first_name: capitalize(first_name),
            last_name: capitalize(last_name),
            age,
            salary,
            contract,
        })
    }

    pub fn full_time(
        id: u32,
        first_name: &str,
        last_name: &str,
        age: u32,
        salary: f64,
        department: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            id,
            first_name,
            last_name,
            age,
            salary,
            Some(Contract::FullTime {
                department: department.into(),
            }),
        )
    }

    pub fn part_time(
        id: u32,
        first_name: &str,
        last_name: &str,
        age: u32,
        salary: f64,
        weekly_hours: u32,
    ) -> Result<Self, ValidationError> {
        Self::new(
            id,
            first_name,
            last_name,
            age,
            salary,
            Some(Contract::PartTime { weekly_hours }),
        )
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn salary(&self) -> Salary {
        self.salary
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn kind(&self) -> Option<WorkerKind> {
        self.contract.as_ref().map(Contract::kind)
    }

    pub fn department(&self) -> Option<&str> {
        match &self.contract {
            Some(Contract::FullTime { department }) => Some(department.as_str()),
            _ => None,
        }
    }

    pub fn weekly_hours(&self) -> Option<u32> {
        match self.contract {
            Some(Contract::PartTime { weekly_hours }) => Some(weekly_hours),
            _ => None,
        }
    }

    /// Replaces the salary after validation. Leaves the record untouched on error.
    pub fn set_salary(&mut self, salary: f64) -> Result<(), ValidationError> {
        self.salary = Salary::new(salary)?;
        Ok(())
    }

    /// Replaces the identifier after validation. Leaves the record untouched on error.
    pub fn set_id(&mut self, id: u32) -> Result<(), ValidationError> {
        self.id = WorkerId::new(id)?;
        Ok(())
    }

    /// Short human-readable label: full name plus the variant field.
    pub fn label(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        match &self.contract {
            Some(Contract::FullTime { department }) => {
                format!("{name} - Departamento: {department}")
            }
            Some(Contract::PartTime { weekly_hours }) => {
                format!("{name} - Horas semanales: {weekly_hours}")
            }
            None => name,
        }
    }
}

impl Display for Worker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DNI {} | {} {} | edad {} | salario {}",
            self.id, self.first_name, self.last_name, self.age, self.salary
        )?;
        match &self.contract {
            Some(Contract::FullTime { department }) => write!(f, " | Departamento: {department}"),
            Some(Contract::PartTime { weekly_hours }) => {
                write!(f, " | Horas semanales: {weekly_hours}")
            }
            None => Ok(()),
        }
    }
}

/// Parses and validates a raw identifier.
///
/// Accepts surrounding whitespace; the trimmed input must be all ASCII digits
/// and its numeric value must have 7 or 8 digits.
pub fn validate_id(raw: &str) -> Result<WorkerId, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::InvalidId(trimmed.to_string()));
    }
    let value = trimmed
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidId(trimmed.to_string()))?;
    if value == 0 {
        return Err(ValidationError::InvalidId(trimmed.to_string()));
    }
    check_id_range(value)?;
    // Range check above guarantees the value fits.
    Ok(WorkerId(value as u32))
}

/// Parses and validates a raw salary.
pub fn validate_salary(raw: &str) -> Result<Salary, ValidationError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidSalary(trimmed.to_string()))?;
    Salary::new(value)
}

/// Trims operator input for a name field and rejects blanks.
pub fn validate_name(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(field));
    }
    Ok(trimmed.to_string())
}

pub fn validate_age(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidAge(trimmed.to_string()))
}

pub fn validate_weekly_hours(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidWeeklyHours(trimmed.to_string()))
}

fn check_id_range(value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidId(value.to_string()));
    }
    if !(u64::from(MIN_ID)..=u64::from(MAX_ID)).contains(&value) {
        return Err(ValidationError::IdLength {
            value,
            digits: value.to_string().len(),
        });
    }
    Ok(())
}

// Same shape as Python's `str.capitalize`; whitespace is kept as given.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
