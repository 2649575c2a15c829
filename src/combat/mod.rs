//! Weapons and the ammo checks run when they fire

pub mod consumption;
pub mod weapons;

pub use consumption::{check_and_consume, fire_shot, is_armed_for_hunting, projectile_override, AmmoCheck, ShotOutcome};
pub use weapons::{WeaponCatalog, WeaponDef, WeaponKind};
