//! Engine configuration with documented constants
//!
//! All tunables are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{AmmoError, Result};

/// Configuration for the ammo engine
///
/// Lives inside the session context; there is no process-wide copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === SPAWNING ===
    /// Multiplier applied to the randomized initial fill of generated kits
    ///
    /// At 1.0 a generated slot starts between a third of and its full
    /// effective capacity. 0.5 halves that, 2.0 doubles it (count may then
    /// exceed the slot's target fill, which is a valid transient state).
    pub ammo_spawn_rate: f32,

    // === CONSUMPTION ===
    /// Whether every shot of a burst consumes one unit
    ///
    /// Affects kit selection: burst weapons prefer kits that last several
    /// bursts (see `burst_capacity_ratio`).
    pub per_shot_consumption: bool,

    /// Minimum `total_capacity / burst_size` for a kit to be preferred
    /// for a burst weapon
    pub burst_capacity_ratio: u32,

    // === KIT SELECTION ===
    /// Probability of accepting each candidate kit when walking them
    /// smallest-first
    ///
    /// At 0.5 the smallest kit is picked half the time, the next a quarter,
    /// and so on. If every candidate is rejected the smallest wins anyway.
    pub smaller_kit_acceptance: f64,

    // === TASKS ===
    /// Radius searched for another stack of the same ammo after a load
    pub retarget_radius: f32,

    /// Radius searched when an idle agent looks for ammo to refill its kit
    pub refill_search_radius: f32,

    /// Fraction of target fill below which a slot asks for a refill
    ///
    /// At 0.5 a slot targeting 40 rounds looks for ammo once it drops under 20.
    pub refill_threshold: f32,

    /// Distance covered per step while travelling (world units)
    pub travel_speed: f32,

    /// Distance at which an agent counts as touching its target
    pub touch_distance: f32,

    /// Steps spent stripping a loot target
    pub loot_wait_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ammo_spawn_rate: 1.0,

            per_shot_consumption: true,
            burst_capacity_ratio: 20,

            smaller_kit_acceptance: 0.5,

            retarget_radius: 30.0,
            refill_search_radius: 60.0,
            refill_threshold: 0.5,
            travel_speed: 1.0,
            touch_distance: 1.0,
            loot_wait_steps: 120,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a TOML file; missing fields take their defaults
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.ammo_spawn_rate < 0.0 {
            return Err(AmmoError::InvalidConfig(format!(
                "ammo_spawn_rate ({}) must not be negative",
                self.ammo_spawn_rate
            )));
        }

        if !(0.0..=1.0).contains(&self.smaller_kit_acceptance) {
            return Err(AmmoError::InvalidConfig(format!(
                "smaller_kit_acceptance ({}) must be within 0..=1",
                self.smaller_kit_acceptance
            )));
        }

        if !(0.0..=1.0).contains(&self.refill_threshold) {
            return Err(AmmoError::InvalidConfig(format!(
                "refill_threshold ({}) must be within 0..=1",
                self.refill_threshold
            )));
        }

        // A zero speed would leave every travel state spinning forever
        if self.travel_speed <= 0.0 || self.touch_distance <= 0.0 {
            return Err(AmmoError::InvalidConfig(
                "travel_speed and touch_distance must be positive".into(),
            ));
        }

        Ok(())
    }
}
