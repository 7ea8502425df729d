//! Domain model for trades, trainees, modules, marks and users.
//!
//! # Responsibility
//! - Define the canonical entity shapes shared by the store, the durable
//!   layout and the bulk transfer document.
//! - Own field-level validation so every write path applies the same rules.
//!
//! # Invariants
//! - Every entity is identified by a numeric id that never changes once
//!   assigned.
//! - Serialized field names are camelCase (`tradeId`, `modName`, ...).

pub mod grade;
pub mod mark;
pub mod module;
pub mod trade;
pub mod trainee;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TradeId = u32;
pub type TraineeId = u32;
pub type ModuleId = u32;
pub type MarkId = u32;
pub type UserId = u32;

/// Upper bound (inclusive) for every assessment score.
pub const MAX_SCORE: u32 = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Field-level validation failures raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required name field is blank after trimming.
    BlankField(&'static str),
    /// Module credit value must be positive.
    NonPositiveCredits,
    /// A score component lies outside `[0, 100]`.
    ScoreOutOfRange { field: &'static str, value: u32 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::NonPositiveCredits => write!(f, "`modCredits` must be greater than 0"),
            Self::ScoreOutOfRange { field, value } => write!(
                f,
                "`{field}` must be between 0 and {MAX_SCORE}, got {value}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims a display name and collapses inner whitespace runs to one space.
///
/// Returns `ValidationError::BlankField` when nothing is left.
pub fn normalize_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(collapsed.into_owned())
}

/// Checks one score component against `[0, MAX_SCORE]`.
pub fn check_score(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value > MAX_SCORE {
        return Err(ValidationError::ScoreOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_score, normalize_name, ValidationError};

    #[test]
    fn normalize_name_trims_and_collapses_whitespace() {
        assert_eq!(
            normalize_name("tradeName", "  Software \t Development\nL3 ").unwrap(),
            "Software Development L3"
        );
    }

    #[test]
    fn normalize_name_rejects_blank_values() {
        let err = normalize_name("lastName", " \n ").unwrap_err();
        assert_eq!(err, ValidationError::BlankField("lastName"));
    }

    #[test]
    fn check_score_accepts_bounds_and_rejects_overflow() {
        assert!(check_score("formativeAss", 0).is_ok());
        assert!(check_score("formativeAss", 100).is_ok());
        assert!(matches!(
            check_score("summativeAss", 101),
            Err(ValidationError::ScoreOutOfRange {
                field: "summativeAss",
                value: 101
            })
        ));
    }
}
