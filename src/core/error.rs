use thiserror::Error;

use crate::core::types::{AmmoTypeId, CategoryId, EntityId, KitDefId};

#[derive(Error, Debug)]
pub enum AmmoError {
    #[error("Unknown ammo category: {0}")]
    UnknownCategory(CategoryId),

    #[error("Unknown ammo type: {0}")]
    UnknownAmmoType(AmmoTypeId),

    #[error("Unknown kit definition: {0}")]
    UnknownKitDef(KitDefId),

    #[error("Category {0} has no ammo type present in the registry")]
    NoResolvableAmmo(CategoryId),

    #[error("No kit definition can be worn by agent {0}")]
    NoEligibleKit(EntityId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid definitions: {0}")]
    InvalidDefinitions(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AmmoError>;
