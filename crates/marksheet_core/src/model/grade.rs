//! Grade bands used by reports.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Totals at or above this value count as passing.
pub const PASSING_TOTAL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    /// 80 and above.
    Excellent,
    /// 70 to 79.
    Good,
    /// 60 to 69.
    Average,
    /// Below 60.
    Poor,
}

impl Grade {
    pub fn from_total(total: u32) -> Self {
        match total {
            80.. => Self::Excellent,
            70..=79 => Self::Good,
            PASSING_TOTAL..=69 => Self::Average,
            _ => Self::Poor,
        }
    }

    pub fn is_passing(self) -> bool {
        self != Self::Poor
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Count of marks per grade band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

impl GradeDistribution {
    pub fn from_totals(totals: impl IntoIterator<Item = u32>) -> Self {
        let mut distribution = Self::default();
        for total in totals {
            match Grade::from_total(total) {
                Grade::Excellent => distribution.excellent += 1,
                Grade::Good => distribution.good += 1,
                Grade::Average => distribution.average += 1,
                Grade::Poor => distribution.poor += 1,
            }
        }
        distribution
    }
}
