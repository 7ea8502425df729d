//! Trainee (student) model.
//!
//! A trainee belongs to exactly one trade at a time through `trade_id`.

use super::{normalize_name, TradeId, TraineeId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Serialized as `"Male"` / `"Female"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainee {
    pub trainee_id: TraineeId,
    pub first_names: String,
    pub last_name: String,
    pub gender: Gender,
    pub trade_id: TradeId,
}

/// Create payload for a trainee; the store assigns `trainee_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainee {
    pub first_names: String,
    pub last_name: String,
    pub gender: Gender,
    pub trade_id: TradeId,
}

impl NewTrainee {
    pub fn new(
        first_names: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        trade_id: TradeId,
    ) -> Self {
        Self {
            first_names: first_names.into(),
            last_name: last_name.into(),
            gender,
            trade_id,
        }
    }

    pub(crate) fn into_trainee(self, trainee_id: TraineeId) -> Result<Trainee, ValidationError> {
        Trainee {
            trainee_id,
            first_names: self.first_names,
            last_name: self.last_name,
            gender: self.gender,
            trade_id: self.trade_id,
        }
        .normalized()
    }
}

impl Trainee {
    /// Returns a copy with validated, normalized name fields.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            trainee_id: self.trainee_id,
            first_names: normalize_name("firstNames", &self.first_names)?,
            last_name: normalize_name("lastName", &self.last_name)?,
            gender: self.gender,
            trade_id: self.trade_id,
        })
    }

    /// `First Last` form used by reports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
    }
}
