//! Bandolier - ammunition kits, weapon compatibility and ammo logistics for simulated agents

pub mod ammo;
pub mod combat;
pub mod core;
pub mod entity;
pub mod equip;
pub mod kit;
pub mod session;
pub mod tasks;
pub mod world;
