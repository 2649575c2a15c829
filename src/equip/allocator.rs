//! Equip-time allocator - dress a newly generated agent with a loaded kit
//!
//! Runs once per generation or redress event. An agent already wearing a
//! kit just gets it loaded; otherwise a kit type is chosen, instantiated,
//! worn and loaded. Failures leave the agent unequipped and are only logged.

use rand::Rng;

use crate::ammo::AmmoCategory;
use crate::core::error::{AmmoError, Result};
use crate::core::types::{EntityId, WeaponId};
use crate::entity::agent::{Agent, AgentKind, LifeStage};
use crate::equip::loading::load_kit;
use crate::kit::catalog::KitDef;
use crate::kit::container::Kit;
use crate::session::AmmoSession;

/// Equip and load a kit for `agent`
///
/// Returns the id of the kit that was loaded, or None when nothing was done
/// (no ammo needed, wrong agent kind) or allocation failed.
pub fn allocate_for_agent(session: &AmmoSession, agent: &mut Agent, rng: &mut impl Rng) -> Option<EntityId> {
    match try_allocate(session, agent, rng) {
        Ok(kit) => kit,
        Err(e) => {
            tracing::warn!(agent = %agent.id, name = %agent.name, error = %e, "kit allocation failed, agent left unequipped");
            None
        }
    }
}

fn try_allocate(session: &AmmoSession, agent: &mut Agent, rng: &mut impl Rng) -> Result<Option<EntityId>> {
    if agent.kind != AgentKind::Humanlike || !session.is_enabled() {
        return Ok(None);
    }
    let Some(weapon) = agent.wielded().cloned() else {
        return Ok(None);
    };

    let categories = session.matrix().categories_for_weapon(&weapon);
    if categories.is_empty() {
        return Ok(None);
    }

    // Already dressed: reload what they wear
    if let Some(kit) = agent.worn_kits_mut().first_mut() {
        let kit_id = kit.id;
        let category = pick(&categories, rng);
        if let Err(e) = load_kit(kit, category, &session.registry, &session.config, rng) {
            // Unloadable kits are destroyed, not left worn empty
            agent.take_off(kit_id);
            tracing::debug!(agent = %agent.id, kit = %kit_id, "destroying unloadable worn kit");
            return Err(e);
        }
        return Ok(Some(kit_id));
    }

    let def = choose_kit_def(session, agent, &weapon, rng).ok_or(AmmoError::NoEligibleKit(agent.id))?;
    let capacities = session
        .capacities_for(&def.id)
        .ok_or_else(|| AmmoError::UnknownKitDef(def.id.clone()))?;
    let style = (!def.styles.is_empty()).then(|| def.styles[rng.gen_range(0..def.styles.len())].clone());
    let mut kit = Kit::new(def, capacities).with_style(style);

    let category = pick(&categories, rng);
    if let Err(e) = load_kit(&mut kit, category, &session.registry, &session.config, rng) {
        // Never worn, so dropping it here discards it
        tracing::debug!(kit_def = %def.id, "discarding unloadable kit");
        return Err(e);
    }

    let id = kit.id;
    tracing::debug!(agent = %agent.id, kit_def = %def.id, category = %category.id, "kit allocated");
    agent.wear(kit);
    Ok(Some(id))
}

fn pick<'a>(categories: &[&'a AmmoCategory], rng: &mut impl Rng) -> &'a AmmoCategory {
    categories[rng.gen_range(0..categories.len())]
}

/// Choose a kit type for an unequipped agent
fn choose_kit_def<'a>(
    session: &'a AmmoSession,
    agent: &Agent,
    weapon: &WeaponId,
    rng: &mut impl Rng,
) -> Option<&'a KitDef> {
    let mut candidates: Vec<&KitDef> = session
        .kits
        .all()
        .iter()
        .filter(|def| def.generatable && agent.can_wear(def))
        .collect();
    candidates.sort_by_key(|def| session.total_capacity_for(&def.id));
    let smallest = *candidates.first()?;

    let config = &session.config;
    let burst = session
        .weapons
        .get(weapon)
        .filter(|w| config.per_shot_consumption && w.is_burst_projectile())
        .map(|w| w.burst_size);

    let chosen = if !agent.is_adult() {
        let child_kits: Vec<&KitDef> = candidates
            .iter()
            .copied()
            .filter(|def| def.wearable_at(LifeStage::Child))
            .collect();
        (!child_kits.is_empty()).then(|| child_kits[rng.gen_range(0..child_kits.len())])
    } else if let Some(burst) = burst {
        candidates
            .iter()
            .copied()
            .find(|def| session.total_capacity_for(&def.id) / burst > config.burst_capacity_ratio)
    } else {
        candidates
            .iter()
            .copied()
            .find(|_| rng.gen_bool(config.smaller_kit_acceptance))
    };

    Some(chosen.unwrap_or(smallest))
}
