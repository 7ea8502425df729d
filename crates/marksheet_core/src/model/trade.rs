//! Trade (training program) model.

use super::{normalize_name, TradeId, ValidationError};
use serde::{Deserialize, Serialize};

/// A training program that trainees enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub trade_id: TradeId,
    pub trade_name: String,
}

/// Create payload for a trade; the store assigns `trade_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrade {
    pub trade_name: String,
}

impl NewTrade {
    pub fn new(trade_name: impl Into<String>) -> Self {
        Self {
            trade_name: trade_name.into(),
        }
    }

    pub(crate) fn into_trade(self, trade_id: TradeId) -> Result<Trade, ValidationError> {
        Trade {
            trade_id,
            trade_name: self.trade_name,
        }
        .normalized()
    }
}

impl Trade {
    /// Returns a copy with validated, normalized fields.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            trade_id: self.trade_id,
            trade_name: normalize_name("tradeName", &self.trade_name)?,
        })
    }
}
