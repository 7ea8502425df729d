//! Mark model and the weighted total formula.
//!
//! # Invariants
//! - `total_marks100 = round(0.30 * formative + 0.30 * summative + 0.40 * comprehensive)`.
//! - Stored component scores and totals lie in `[0, 100]`.
//! - `trade_id` is a denormalized copy of the trainee's trade at recording
//!   time and is never corrected afterwards.

use super::{check_score, MarkId, ModuleId, TradeId, TraineeId, UserId, ValidationError};
use serde::{Deserialize, Serialize};

const FORMATIVE_WEIGHT_TENTHS: u64 = 3;
const SUMMATIVE_WEIGHT_TENTHS: u64 = 3;
const COMPREHENSIVE_WEIGHT_TENTHS: u64 = 4;

/// Computes the weighted total of the three assessment components.
///
/// Weights are 30/30/40. The sum is evaluated exactly in tenths; a result
/// ending in exactly `.5` rounds to the even neighbour.
///
/// This differs from half-up rounding on ties only:
/// `(80, 75, 85)` is `80.5` and yields `80`, and `(85, 90, 80)` is `84.5`
/// and yields `84` where half-up would give `81` and `85`.
///
/// Inputs are not clamped. Range checks happen on the store write path.
pub fn calculate_total_marks(formative: u32, summative: u32, comprehensive: u32) -> u32 {
    let tenths = FORMATIVE_WEIGHT_TENTHS * u64::from(formative)
        + SUMMATIVE_WEIGHT_TENTHS * u64::from(summative)
        + COMPREHENSIVE_WEIGHT_TENTHS * u64::from(comprehensive);
    let whole = tenths / 10;
    let rounded = match tenths % 10 {
        0..=4 => whole,
        5 if whole % 2 == 0 => whole,
        _ => whole + 1,
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// One trainee's assessment record for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub mark_id: MarkId,
    pub trainee_id: TraineeId,
    pub trade_id: TradeId,
    pub module_id: ModuleId,
    /// Author of the record.
    pub user_id: UserId,
    pub formative_ass: u32,
    pub summative_ass: u32,
    pub comprehensive_ass: u32,
    /// Derived; callers never set this on update.
    pub total_marks100: u32,
}

/// Create payload for a mark; the store assigns `mark_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMark {
    pub trainee_id: TraineeId,
    pub trade_id: TradeId,
    pub module_id: ModuleId,
    pub user_id: UserId,
    pub formative_ass: u32,
    pub summative_ass: u32,
    pub comprehensive_ass: u32,
    /// Precomputed total. `None` lets the store derive it.
    pub total_marks100: Option<u32>,
}

impl NewMark {
    /// Builds a payload whose total will be derived by the store.
    pub fn new(
        trainee_id: TraineeId,
        trade_id: TradeId,
        module_id: ModuleId,
        user_id: UserId,
        scores: [u32; 3],
    ) -> Self {
        let [formative_ass, summative_ass, comprehensive_ass] = scores;
        Self {
            trainee_id,
            trade_id,
            module_id,
            user_id,
            formative_ass,
            summative_ass,
            comprehensive_ass,
            total_marks100: None,
        }
    }

    /// Supplies a precomputed total instead of deriving it.
    pub fn with_total(mut self, total: u32) -> Self {
        self.total_marks100 = Some(total);
        self
    }

    pub(crate) fn into_mark(self, mark_id: MarkId) -> Result<Mark, ValidationError> {
        let mut mark = Mark {
            mark_id,
            trainee_id: self.trainee_id,
            trade_id: self.trade_id,
            module_id: self.module_id,
            user_id: self.user_id,
            formative_ass: self.formative_ass,
            summative_ass: self.summative_ass,
            comprehensive_ass: self.comprehensive_ass,
            total_marks100: 0,
        };
        mark.check_components()?;
        mark.total_marks100 = match self.total_marks100 {
            Some(total) => {
                check_score("totalMarks100", total)?;
                total
            }
            None => mark.computed_total(),
        };
        Ok(mark)
    }
}

impl Mark {
    /// Total derived from this mark's current components.
    pub fn computed_total(&self) -> u32 {
        calculate_total_marks(self.formative_ass, self.summative_ass, self.comprehensive_ass)
    }

    /// Returns a copy with validated components and a recomputed total,
    /// discarding whatever total the caller supplied.
    pub fn recomputed(&self) -> Result<Self, ValidationError> {
        self.check_components()?;
        Ok(Self {
            total_marks100: self.computed_total(),
            ..self.clone()
        })
    }

    fn check_components(&self) -> Result<(), ValidationError> {
        check_score("formativeAss", self.formative_ass)?;
        check_score("summativeAss", self.summative_ass)?;
        check_score("comprehensiveAss", self.comprehensive_ass)
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate_total_marks, NewMark};
    use crate::model::ValidationError;

    #[test]
    fn total_uses_thirty_thirty_forty_weights() {
        assert_eq!(calculate_total_marks(80, 75, 85), 80);
        assert_eq!(calculate_total_marks(70, 80, 75), 75);
        assert_eq!(calculate_total_marks(100, 100, 100), 100);
        assert_eq!(calculate_total_marks(0, 0, 0), 0);
        assert_eq!(calculate_total_marks(0, 0, 100), 40);
    }

    #[test]
    fn total_rounds_to_nearest_integer() {
        // 0.3 * 51 = 15.3
        assert_eq!(calculate_total_marks(51, 0, 0), 15);
        // 0.3 * 52 = 15.6
        assert_eq!(calculate_total_marks(52, 0, 0), 16);
        // 0.4 * 99 = 39.6
        assert_eq!(calculate_total_marks(0, 0, 99), 40);
    }

    #[test]
    fn exact_half_rounds_to_even() {
        // 80.5
        assert_eq!(calculate_total_marks(80, 75, 85), 80);
        // 84.5
        assert_eq!(calculate_total_marks(85, 90, 80), 84);
        // 90.5
        assert_eq!(calculate_total_marks(90, 85, 95), 90);
        // 75.5
        assert_eq!(calculate_total_marks(75, 70, 80), 76);
    }

    #[test]
    fn total_does_not_clamp_out_of_range_inputs() {
        assert_eq!(calculate_total_marks(200, 200, 200), 200);
    }

    #[test]
    fn new_mark_derives_total_unless_supplied() {
        let derived = NewMark::new(1, 1, 1, 2, [80, 75, 85]).into_mark(7).unwrap();
        assert_eq!(derived.mark_id, 7);
        assert_eq!(derived.total_marks100, 80);

        let supplied = NewMark::new(1, 1, 1, 2, [80, 75, 85])
            .with_total(81)
            .into_mark(8)
            .unwrap();
        assert_eq!(supplied.total_marks100, 81);
    }

    #[test]
    fn new_mark_rejects_out_of_range_scores() {
        let err = NewMark::new(1, 1, 1, 2, [80, 101, 85])
            .into_mark(1)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ScoreOutOfRange {
                field: "summativeAss",
                ..
            }
        ));

        let err = NewMark::new(1, 1, 1, 2, [80, 75, 85])
            .with_total(150)
            .into_mark(1)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ScoreOutOfRange {
                field: "totalMarks100",
                ..
            }
        ));
    }
}
