//! Session context - the explicitly owned state every engine operation reads
//!
//! Created at session start from declarative definitions, rebuilt on reset,
//! dropped at session end. Holds the compatibility matrix and the per-kit
//! capacity overrides, both of which round-trip through `SessionSnapshot`.

pub mod definitions;
pub mod snapshot;

use ahash::AHashMap;
use std::path::Path;

use crate::ammo::{AmmoCategory, AmmoRegistry, CompatibilityMatrix};
use crate::combat::weapons::WeaponCatalog;
use crate::core::config::EngineConfig;
use crate::core::error::{AmmoError, Result};
use crate::core::types::{CategoryId, KitDefId, WeaponId};
use crate::kit::catalog::KitCatalog;

pub use definitions::Definitions;
pub use snapshot::{SessionSnapshot, SNAPSHOT_VERSION};

pub struct AmmoSession {
    pub config: EngineConfig,
    pub registry: AmmoRegistry,
    pub weapons: WeaponCatalog,
    pub kits: KitCatalog,
    categories: Vec<AmmoCategory>,
    matrix: CompatibilityMatrix,
    capacity_overrides: AHashMap<KitDefId, Vec<u32>>,
    /// False when the session declares no categories or no ammo types
    enabled: bool,
}

impl AmmoSession {
    /// Build a session from definitions with a freshly built matrix
    pub fn new(defs: Definitions, config: EngineConfig) -> Self {
        let registry: AmmoRegistry = defs.ammo.into_iter().collect();
        let weapons: WeaponCatalog = defs.weapons.into_iter().collect();
        let kits: KitCatalog = defs.kits.into_iter().collect();

        let enabled = !defs.categories.is_empty() && !registry.is_empty();
        if !enabled {
            // Reported once here; every later check just reads the flag
            tracing::warn!(
                categories = defs.categories.len(),
                ammo_types = registry.len(),
                "no ammo categories or ammo types declared, ammo engine disabled"
            );
        }

        let mut matrix = CompatibilityMatrix::new();
        matrix.build(&defs.categories, &weapons, &registry);

        tracing::info!(
            ammo_types = registry.len(),
            categories = defs.categories.len(),
            weapons = weapons.len(),
            kits = kits.len(),
            "ammo session created"
        );

        Self {
            config,
            registry,
            weapons,
            kits,
            categories: defs.categories,
            matrix,
            capacity_overrides: AHashMap::new(),
            enabled,
        }
    }

    /// Whether the engine is active for this session
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// Opt a weapon in or out of a category (user override)
    pub fn set_override(&mut self, category: &CategoryId, weapon: &WeaponId, value: bool) -> Result<()> {
        self.matrix.set_override(category, weapon, value)
    }

    pub fn set_exemption(&mut self, weapon: &WeaponId, exempt: bool) {
        self.matrix.set_exemption(weapon, exempt);
    }

    /// Discard every override and rebuild from the declared rules
    pub fn reset_to_defaults(&mut self) {
        self.matrix.clear();
        self.matrix.build(&self.categories, &self.weapons, &self.registry);
        self.capacity_overrides.clear();
        tracing::info!("ammo settings reset to defaults");
    }

    /// Slot capacities a new kit of `def` gets: the override if set, else the definition's
    pub fn capacities_for(&self, def: &KitDefId) -> Option<&[u32]> {
        if let Some(caps) = self.capacity_overrides.get(def) {
            return Some(caps);
        }
        self.kits.get(def).map(|d| d.capacities.as_slice())
    }

    pub fn set_capacity_override(&mut self, def: &KitDefId, capacities: Vec<u32>) -> Result<()> {
        if self.kits.get(def).is_none() {
            return Err(AmmoError::UnknownKitDef(def.clone()));
        }
        self.capacity_overrides.insert(def.clone(), capacities);
        Ok(())
    }

    pub fn clear_capacity_override(&mut self, def: &KitDefId) {
        self.capacity_overrides.remove(def);
    }

    /// Total raw capacity a new kit of `def` would have
    pub fn total_capacity_for(&self, def: &KitDefId) -> u32 {
        self.capacities_for(def).map(|caps| caps.iter().sum()).unwrap_or(0)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            matrix: self.matrix.export_state(),
            kit_capacity_overrides: self
                .capacity_overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Apply a saved snapshot, then top the matrix up from the declared rules
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "snapshot version mismatch, loading anyway"
            );
        }
        self.matrix.import_state(snapshot.matrix);
        self.matrix.build(&self.categories, &self.weapons, &self.registry);
        self.capacity_overrides = snapshot.kit_capacity_overrides.into_iter().collect();
    }

    /// Restore from `path` if a readable snapshot exists, else rebuild defaults
    ///
    /// Never fails: a corrupt snapshot is logged and ignored. Returns whether
    /// a snapshot was applied.
    pub fn restore_or_rebuild(&mut self, path: &Path) -> bool {
        match SessionSnapshot::load(path) {
            Ok(Some(snapshot)) => {
                self.restore(snapshot);
                tracing::info!(path = %path.display(), "ammo settings restored");
                true
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no saved ammo settings, using defaults");
                false
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable ammo settings, rebuilding defaults");
                self.reset_to_defaults();
                false
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.snapshot().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::AmmoType;
    use crate::combat::weapons::{WeaponDef, WeaponKind};
    use crate::core::types::TechTier;
    use crate::kit::catalog::{BodySlot, KitDef};

    fn defs() -> Definitions {
        Definitions::new()
            .with_ammo(AmmoType::new("a1", "bullet_a1", 1))
            .with_category(AmmoCategory::new("c1", TechTier::Industrial).with_ammo("a1").including("w1"))
            .with_weapon(WeaponDef::new("w1", TechTier::Industrial, WeaponKind::Projectile))
            .with_weapon(WeaponDef::new("w2", TechTier::Industrial, WeaponKind::Projectile))
            .with_kit(KitDef::new("kit_belt", vec![30, 30], BodySlot::Belt))
    }

    #[test]
    fn test_disabled_without_categories() {
        let defs = Definitions::new().with_ammo(AmmoType::new("a1", "bullet_a1", 1));
        let session = AmmoSession::new(defs, EngineConfig::default());
        assert!(!session.is_enabled());
    }

    #[test]
    fn test_disabled_without_ammo_types() {
        let defs = Definitions::new().with_category(AmmoCategory::new("c1", TechTier::Industrial));
        let session = AmmoSession::new(defs, EngineConfig::default());
        assert!(!session.is_enabled());
    }

    #[test]
    fn test_capacity_override() {
        let mut session = AmmoSession::new(defs(), EngineConfig::default());
        let kit: KitDefId = "kit_belt".into();
        assert_eq!(session.total_capacity_for(&kit), 60);

        session.set_capacity_override(&kit, vec![10, 10, 10]).unwrap();
        assert_eq!(session.capacities_for(&kit), Some(&[10, 10, 10][..]));

        session.clear_capacity_override(&kit);
        assert_eq!(session.total_capacity_for(&kit), 60);
    }

    #[test]
    fn test_capacity_override_unknown_kit() {
        let mut session = AmmoSession::new(defs(), EngineConfig::default());
        let result = session.set_capacity_override(&"kit_none".into(), vec![1]);
        assert!(matches!(result, Err(AmmoError::UnknownKitDef(_))));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = AmmoSession::new(defs(), EngineConfig::default());
        session.set_override(&"c1".into(), &"w2".into(), true).unwrap();
        session.set_exemption(&"w1".into(), true);
        session.set_capacity_override(&"kit_belt".into(), vec![5]).unwrap();
        let snapshot = session.snapshot();

        let mut restored = AmmoSession::new(defs(), EngineConfig::default());
        restored.restore(SessionSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap());

        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.matrix().is_compatible(&"w2".into(), &"a1".into()));
    }

    #[test]
    fn test_reset_discards_overrides() {
        let mut session = AmmoSession::new(defs(), EngineConfig::default());
        session.set_override(&"c1".into(), &"w1".into(), false).unwrap();
        session.set_capacity_override(&"kit_belt".into(), vec![5]).unwrap();

        session.reset_to_defaults();

        assert!(session.matrix().is_compatible(&"w1".into(), &"a1".into()));
        assert_eq!(session.total_capacity_for(&"kit_belt".into()), 60);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("bandolier_corrupt_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ definitely not json").unwrap();

        let mut session = AmmoSession::new(defs(), EngineConfig::default());
        session.set_override(&"c1".into(), &"w1".into(), false).unwrap();
        assert!(!session.restore_or_rebuild(&path));
        assert!(session.matrix().is_compatible(&"w1".into(), &"a1".into()));

        let _ = std::fs::remove_file(&path);
    }
}
