//! Ammo consumption - the availability check run on every firing attempt
//!
//! A check walks the agent's worn kits in wear order and their slots in slot
//! order, stopping at the first enabled slot holding compatible rounds. A
//! consuming check removes exactly one round from that slot and nothing else.

use crate::core::error::{AmmoError, Result};
use crate::core::types::{EntityId, ProjectileId, WeaponId};
use crate::entity::agent::Agent;
use crate::session::AmmoSession;

/// Outcome of an availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoCheck {
    pub has_ammo: bool,
    /// Kit that fed the shot, when the main path found rounds
    pub source_kit: Option<EntityId>,
}

impl AmmoCheck {
    /// No ammo needed (or found outside any kit)
    pub fn available() -> Self {
        Self {
            has_ammo: true,
            source_kit: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            has_ammo: false,
            source_kit: None,
        }
    }

    fn from_kit(kit: EntityId) -> Self {
        Self {
            has_ammo: true,
            source_kit: Some(kit),
        }
    }
}

/// Check whether `agent` can fire `weapon`, optionally consuming one round
///
/// Short-circuits (in order) for a missing agent or weapon, melee weapons,
/// a disabled engine, exempt weapons and weapons no category claims; all of
/// those report ammo as available. An agent wearing nothing is out of ammo.
/// Faults while scanning kits degrade to "not available".
pub fn check_and_consume(
    session: &AmmoSession,
    agent: Option<&mut Agent>,
    weapon: Option<&WeaponId>,
    consume: bool,
) -> AmmoCheck {
    let (Some(agent), Some(weapon)) = (agent, weapon) else {
        return AmmoCheck::available();
    };
    if agent.is_destroyed() {
        return AmmoCheck::available();
    }

    if session.weapons.get(weapon).is_some_and(|w| w.is_melee()) {
        return AmmoCheck::available();
    }
    let matrix = session.matrix();
    if !session.is_enabled() || !matrix.has_categories() {
        return AmmoCheck::available();
    }
    if matrix.is_exempt(weapon) || !matrix.needs_ammo(weapon) {
        return AmmoCheck::available();
    }

    if !agent.wears_kit() {
        return AmmoCheck::unavailable();
    }

    match scan_worn_kits(session, agent, weapon, consume) {
        Ok(Some(kit)) => return AmmoCheck::from_kit(kit),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(agent = %agent.id, weapon = %weapon, error = %e, "ammo scan failed, treating as empty");
        }
    }
    for kit in agent.worn_kits_mut() {
        kit.set_last_used_ammo(None);
    }
    AmmoCheck::unavailable()
}

fn scan_worn_kits(
    session: &AmmoSession,
    agent: &mut Agent,
    weapon: &WeaponId,
    consume: bool,
) -> Result<Option<EntityId>> {
    let matrix = session.matrix();
    for kit in agent.worn_kits_mut() {
        let mut found = None;
        for (index, slot) in kit.slots().iter().enumerate() {
            if !slot.is_loaded() {
                continue;
            }
            let Some(ammo) = slot.chosen_ammo() else {
                continue;
            };
            // Loaded slot of an ammo type the session no longer knows
            if !session.registry.contains(ammo) {
                return Err(AmmoError::UnknownAmmoType(ammo.clone()));
            }
            if matrix.is_compatible(weapon, ammo) {
                found = Some((index, ammo.clone()));
                break;
            }
        }

        if let Some((index, ammo)) = found {
            if consume {
                if let Some(slot) = kit.slot_mut(index) {
                    slot.adjust_count(-1);
                }
            }
            kit.set_last_used_ammo(Some(ammo));
            return Ok(Some(kit.id));
        }
    }
    Ok(None)
}

/// Projectile the agent's weapon should fire, from the feeding kit's last used ammo
///
/// Non-consuming; None means "keep the weapon's default projectile".
pub fn projectile_override(session: &AmmoSession, agent: &mut Agent) -> Option<ProjectileId> {
    let weapon = agent.wielded().cloned();
    let check = check_and_consume(session, Some(&mut *agent), weapon.as_ref(), false);
    let kit = agent.kit(check.source_kit?)?;
    session.registry.projectile_for(kit.last_used_ammo()?).cloned()
}

/// Whether the agent counts as armed for hunting
pub fn is_armed_for_hunting(session: &AmmoSession, agent: &mut Agent) -> bool {
    let Some(weapon) = agent.wielded().cloned() else {
        return false;
    };
    check_and_consume(session, Some(agent), Some(&weapon), false).has_ammo
}

/// Result of one trigger pull through the firing hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Shot fired; `projectile` overrides the weapon default when set
    Fired { projectile: Option<ProjectileId> },
    /// Out of ammo, the shot does not happen
    Suppressed,
}

/// Run the before/after firing hooks for a single shot
pub fn fire_shot(session: &AmmoSession, agent: &mut Agent) -> ShotOutcome {
    let weapon = agent.wielded().cloned();
    let check = check_and_consume(session, Some(&mut *agent), weapon.as_ref(), true);
    if !check.has_ammo {
        tracing::debug!(agent = %agent.id, "shot suppressed, out of ammo");
        return ShotOutcome::Suppressed;
    }
    let projectile = check
        .source_kit
        .and_then(|kit| agent.kit(kit))
        .and_then(|kit| kit.last_used_ammo())
        .and_then(|ammo| session.registry.projectile_for(ammo))
        .cloned();
    ShotOutcome::Fired { projectile }
}
