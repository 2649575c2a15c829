//! Kits and their ammunition slots

pub mod catalog;
pub mod container;
pub mod slot;

pub use catalog::{BodySlot, KitCatalog, KitDef};
pub use container::Kit;
pub use slot::Slot;
