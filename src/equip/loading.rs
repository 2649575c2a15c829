//! Kit loading - fill a fresh kit with ammo of one category

use rand::Rng;

use crate::ammo::{AmmoCategory, AmmoRegistry, AmmoType};
use crate::core::config::EngineConfig;
use crate::core::error::{AmmoError, Result};
use crate::kit::container::Kit;

/// Load every slot of `kit` with a random ammo type of `category`
///
/// Each slot gets a target fill drawn from a third of to all of its
/// effective capacity, scaled by the spawn rate, and starts with exactly
/// that many rounds. Fails if the category has no ammo the registry knows;
/// the caller is expected to discard the kit then.
pub fn load_kit(
    kit: &mut Kit,
    category: &AmmoCategory,
    registry: &AmmoRegistry,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Result<()> {
    let resolvable: Vec<&AmmoType> = category.ammo.iter().filter_map(|id| registry.get(id)).collect();
    if resolvable.is_empty() {
        return Err(AmmoError::NoResolvableAmmo(category.id.clone()));
    }

    for slot in kit.slots_mut() {
        let ammo = resolvable[rng.gen_range(0..resolvable.len())];
        slot.set_chosen_ammo(Some(ammo));

        let effective = slot.effective_capacity();
        let drawn = rng.gen_range(effective / 3..=effective);
        let value = (drawn as f32 * config.ammo_spawn_rate).round() as u32;
        slot.set_target_fill(value);
        slot.set_count(value);
    }

    tracing::debug!(kit = %kit.id, category = %category.id, rounds = kit.total_count(), "kit loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TechTier;
    use crate::kit::catalog::{BodySlot, KitDef};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn registry() -> AmmoRegistry {
        [
            AmmoType::new("ammo_light", "bullet_light", 1),
            AmmoType::new("ammo_heavy", "bullet_heavy", 2),
        ]
        .into_iter()
        .collect()
    }

    fn kit() -> Kit {
        let def = KitDef::new("kit_bandolier", vec![60, 60, 90], BodySlot::Shoulder);
        Kit::new(&def, &def.capacities)
    }

    #[test]
    fn test_fill_within_bounds() {
        let registry = registry();
        let category = AmmoCategory::new("rifle", TechTier::Industrial)
            .with_ammo("ammo_light")
            .with_ammo("ammo_heavy");
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let mut kit = kit();
            load_kit(&mut kit, &category, &registry, &EngineConfig::default(), &mut rng).unwrap();
            for slot in kit.slots() {
                let eff = slot.effective_capacity();
                assert!(slot.chosen_ammo().is_some());
                assert!(slot.count() >= eff / 3 && slot.count() <= eff);
                assert_eq!(slot.count(), slot.target_fill());
            }
        }
    }

    #[test]
    fn test_spawn_rate_scales_count_not_target() {
        let registry = registry();
        let category = AmmoCategory::new("rifle", TechTier::Industrial).with_ammo("ammo_light");
        let config = EngineConfig {
            ammo_spawn_rate: 3.0,
            ..EngineConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut kit = kit();

        load_kit(&mut kit, &category, &registry, &config, &mut rng).unwrap();
        for slot in kit.slots() {
            assert!(slot.target_fill() <= slot.effective_capacity());
            assert!(slot.count() >= slot.effective_capacity());
        }
    }

    #[test]
    fn test_unresolvable_category_fails() {
        let registry = registry();
        let category = AmmoCategory::new("ghost", TechTier::Spacer).with_ammo("ammo_missing");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut kit = kit();

        let result = load_kit(&mut kit, &category, &registry, &EngineConfig::default(), &mut rng);
        assert!(matches!(result, Err(AmmoError::NoResolvableAmmo(_))));
        assert_eq!(kit.total_count(), 0);
    }
}
