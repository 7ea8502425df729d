//! Bulk export/import of the four entity collections.
//!
//! # Responsibility
//! - Define the export document shape (`trades`, `trainees`, `modules`,
//!   `marks`).
//! - Parse import documents atomically: a malformed collection rejects the
//!   whole document.
//! - Validate imported records before anything is replaced.
//!
//! # Invariants
//! - Every collection key is optional on import; absent keys leave the
//!   matching collection untouched.
//! - Users are never part of a transfer document.
//! - Ids are unique within each imported collection.
//! - Imported mark totals are recomputed from their components.

use crate::model::mark::Mark;
use crate::model::module::Module;
use crate::model::trade::Trade;
use crate::model::trainee::Trainee;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from producing or reading a transfer document.
#[derive(Debug)]
pub enum TransferError {
    /// Document is not valid JSON or a collection has the wrong shape.
    Malformed(String),
    /// Snapshot could not be serialized.
    Encode(String),
    /// Two records in one collection share an id.
    DuplicateId { collection: &'static str, id: u32 },
    /// A record fails field validation.
    InvalidRecord {
        collection: &'static str,
        id: u32,
        error: ValidationError,
    },
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed import document: {message}"),
            Self::Encode(message) => write!(f, "failed to encode export document: {message}"),
            Self::DuplicateId { collection, id } => {
                write!(f, "import document repeats id {id} in `{collection}`")
            }
            Self::InvalidRecord {
                collection,
                id,
                error,
            } => write!(f, "invalid record {id} in `{collection}`: {error}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Consistent point-in-time copy of the four entity collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub trades: Vec<Trade>,
    pub trainees: Vec<Trainee>,
    pub modules: Vec<Module>,
    pub marks: Vec<Mark>,
}

impl Snapshot {
    /// Pretty-printed export document.
    pub fn to_json(&self) -> Result<String, TransferError> {
        serde_json::to_string_pretty(self).map_err(|err| TransferError::Encode(err.to_string()))
    }
}

impl From<Snapshot> for CollectionImport {
    fn from(value: Snapshot) -> Self {
        Self {
            trades: Some(value.trades),
            trainees: Some(value.trainees),
            modules: Some(value.modules),
            marks: Some(value.marks),
        }
    }
}

/// Whole-collection replacements requested by a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionImport {
    #[serde(default)]
    pub trades: Option<Vec<Trade>>,
    #[serde(default)]
    pub trainees: Option<Vec<Trainee>>,
    #[serde(default)]
    pub modules: Option<Vec<Module>>,
    #[serde(default)]
    pub marks: Option<Vec<Mark>>,
}

impl CollectionImport {
    /// Checks every present collection and returns the import with
    /// normalized names and mark totals recomputed from their components.
    ///
    /// # Errors
    /// - `TransferError::DuplicateId` when a collection repeats an id.
    /// - `TransferError::InvalidRecord` when a record fails field validation.
    pub fn validated(self) -> Result<Self, TransferError> {
        Ok(Self {
            trades: self
                .trades
                .map(|trades| {
                    validate_collection(
                        "trades",
                        trades,
                        |t: &Trade| t.trade_id,
                        Trade::normalized,
                    )
                })
                .transpose()?,
            trainees: self
                .trainees
                .map(|trainees| {
                    validate_collection(
                        "trainees",
                        trainees,
                        |t: &Trainee| t.trainee_id,
                        Trainee::normalized,
                    )
                })
                .transpose()?,
            modules: self
                .modules
                .map(|modules| {
                    validate_collection(
                        "modules",
                        modules,
                        |m: &Module| m.module_id,
                        Module::normalized,
                    )
                })
                .transpose()?,
            marks: self
                .marks
                .map(|marks| {
                    validate_collection("marks", marks, |m: &Mark| m.mark_id, Mark::recomputed)
                })
                .transpose()?,
        })
    }
}

fn validate_collection<T>(
    collection: &'static str,
    records: Vec<T>,
    id_of: impl Fn(&T) -> u32,
    check: impl Fn(&T) -> Result<T, ValidationError>,
) -> Result<Vec<T>, TransferError> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|record| {
            let id = id_of(record);
            if !seen.insert(id) {
                return Err(TransferError::DuplicateId { collection, id });
            }
            check(record).map_err(|error| TransferError::InvalidRecord {
                collection,
                id,
                error,
            })
        })
        .collect()
}

/// Parses an import document.
///
/// Unknown top-level keys are ignored. An explicit `null` counts as absent.
pub fn parse_import(document: &str) -> Result<CollectionImport, TransferError> {
    serde_json::from_str(document).map_err(|err| TransferError::Malformed(err.to_string()))
}
