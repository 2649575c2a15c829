//! Session snapshot - the matrix overrides and kit capacity overrides that
//! survive save/restore
//!
//! Keys are the stable string ids (category / weapon / kit definition), and
//! ordered maps keep the serialized form deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::ammo::matrix::MatrixState;
use crate::core::error::Result;
use crate::core::types::KitDefId;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub matrix: MatrixState,
    #[serde(default)]
    pub kit_capacity_overrides: BTreeMap<KitDefId, Vec<u32>>,
}

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a snapshot; `Ok(None)` when no file exists
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map(Some)
    }
}
