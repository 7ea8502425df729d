//! Module (course) model. Modules are assessed independently of trade.

use super::{normalize_name, ModuleId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_id: ModuleId,
    pub mod_name: String,
    /// Credit value; always positive once stored.
    pub mod_credits: u32,
}

/// Create payload for a module; the store assigns `module_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub mod_name: String,
    pub mod_credits: u32,
}

impl NewModule {
    pub fn new(mod_name: impl Into<String>, mod_credits: u32) -> Self {
        Self {
            mod_name: mod_name.into(),
            mod_credits,
        }
    }

    pub(crate) fn into_module(self, module_id: ModuleId) -> Result<Module, ValidationError> {
        Module {
            module_id,
            mod_name: self.mod_name,
            mod_credits: self.mod_credits,
        }
        .normalized()
    }
}

impl Module {
    /// Returns a copy with a normalized name after checking credits.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.mod_credits == 0 {
            return Err(ValidationError::NonPositiveCredits);
        }
        Ok(Self {
            module_id: self.module_id,
            mod_name: normalize_name("modName", &self.mod_name)?,
            mod_credits: self.mod_credits,
        })
    }
}
