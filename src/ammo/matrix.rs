//! Compatibility matrix - which weapons fire which ammo
//!
//! Built once per session from the declared category rules, then edited by
//! user overrides. Lookups run on every firing attempt, so the reverse index
//! from ammo type to categories is kept alongside the explicit entries.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ammo::category::AmmoCategory;
use crate::ammo::registry::AmmoRegistry;
use crate::combat::weapons::WeaponCatalog;
use crate::core::error::{AmmoError, Result};
use crate::core::types::{AmmoTypeId, CategoryId, WeaponId};

/// Persistable part of the matrix: explicit entries only
///
/// The reverse index is derived and never saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixState {
    pub category_to_weapon: BTreeMap<CategoryId, BTreeMap<WeaponId, bool>>,
    pub weapon_exemption: BTreeMap<WeaponId, bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    /// Declared categories, in declaration order
    categories: Vec<AmmoCategory>,
    category_index: AHashMap<CategoryId, usize>,
    /// Explicit per-weapon opt-in/out per category
    category_to_weapon: AHashMap<CategoryId, AHashMap<WeaponId, bool>>,
    /// true = never needs ammo. Missing = unseen weapon, treated as exempt.
    weapon_exemption: AHashMap<WeaponId, bool>,
    ammo_to_categories: AHashMap<AmmoTypeId, Vec<CategoryId>>,
    /// Bumped on every mutation so hosts can refresh cached hints
    revision: u64,
}

impl CompatibilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or top up) the matrix from declared rules
    ///
    /// Existing explicit entries are never overwritten, so calling this again
    /// after restoring a snapshot only fills in weapons or categories the
    /// snapshot did not know about.
    pub fn build(
        &mut self,
        categories: &[AmmoCategory],
        weapons: &WeaponCatalog,
        registry: &AmmoRegistry,
    ) {
        self.categories = categories.to_vec();
        self.category_index = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        self.ammo_to_categories.clear();
        for category in categories {
            for ammo in &category.ammo {
                if !registry.contains(ammo) {
                    tracing::trace!(category = %category.id, ammo = %ammo, "skipping unresolved ammo type");
                    continue;
                }
                let entry = self.ammo_to_categories.entry(ammo.clone()).or_default();
                if !entry.contains(&category.id) {
                    entry.push(category.id.clone());
                }
            }

            let members = self.category_to_weapon.entry(category.id.clone()).or_default();
            for weapon in weapons.iter() {
                members
                    .entry(weapon.id.clone())
                    .or_insert_with(|| category.default_membership(weapon));
            }
        }

        for weapon in weapons.iter() {
            self.weapon_exemption
                .entry(weapon.id.clone())
                .or_insert(weapon.exempt);
        }

        self.revision += 1;
        tracing::debug!(
            categories = self.categories.len(),
            weapons = weapons.len(),
            ammo_types = self.ammo_to_categories.len(),
            "compatibility matrix built"
        );
    }

    /// Drop every explicit entry (used before rebuilding from defaults)
    pub fn clear(&mut self) {
        self.category_to_weapon.clear();
        self.weapon_exemption.clear();
        self.ammo_to_categories.clear();
        self.revision += 1;
    }

    pub fn categories(&self) -> &[AmmoCategory] {
        &self.categories
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn category(&self, id: &CategoryId) -> Option<&AmmoCategory> {
        self.category_index.get(id).map(|&i| &self.categories[i])
    }

    /// Categories admitting this ammo type
    pub fn categories_for_ammo(&self, ammo: &AmmoTypeId) -> &[CategoryId] {
        self.ammo_to_categories
            .get(ammo)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Categories that currently list `weapon` as compatible, in declaration order
    pub fn categories_for_weapon(&self, weapon: &WeaponId) -> Vec<&AmmoCategory> {
        self.categories
            .iter()
            .filter(|c| self.membership(&c.id, weapon))
            .collect()
    }

    /// Explicit membership of a weapon in a category
    pub fn membership(&self, category: &CategoryId, weapon: &WeaponId) -> bool {
        self.category_to_weapon
            .get(category)
            .and_then(|members| members.get(weapon))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_compatible(&self, weapon: &WeaponId, ammo: &AmmoTypeId) -> bool {
        self.categories_for_ammo(ammo)
            .iter()
            .any(|category| self.membership(category, weapon))
    }

    /// Exemption flag; weapons the matrix has never seen are exempt
    pub fn is_exempt(&self, weapon: &WeaponId) -> bool {
        self.weapon_exemption.get(weapon).copied().unwrap_or(true)
    }

    /// A weapon needs ammo iff some category maps it true and it is not exempt
    pub fn needs_ammo(&self, weapon: &WeaponId) -> bool {
        if self.is_exempt(weapon) {
            return false;
        }
        self.category_to_weapon
            .values()
            .any(|members| members.get(weapon).copied().unwrap_or(false))
    }

    /// Opt a weapon in or out of a category
    pub fn set_override(&mut self, category: &CategoryId, weapon: &WeaponId, value: bool) -> Result<()> {
        if !self.category_index.contains_key(category) {
            return Err(AmmoError::UnknownCategory(category.clone()));
        }
        self.category_to_weapon
            .entry(category.clone())
            .or_default()
            .insert(weapon.clone(), value);
        // Assigning an unseen weapon makes it observed
        if value {
            self.weapon_exemption.entry(weapon.clone()).or_insert(false);
        }
        self.revision += 1;
        tracing::debug!(category = %category, weapon = %weapon, value, "compatibility override");
        Ok(())
    }

    pub fn set_exemption(&mut self, weapon: &WeaponId, exempt: bool) {
        self.weapon_exemption.insert(weapon.clone(), exempt);
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Export explicit entries for persistence
    pub fn export_state(&self) -> MatrixState {
        MatrixState {
            category_to_weapon: self
                .category_to_weapon
                .iter()
                .map(|(category, members)| {
                    let members = members.iter().map(|(w, v)| (w.clone(), *v)).collect();
                    (category.clone(), members)
                })
                .collect(),
            weapon_exemption: self
                .weapon_exemption
                .iter()
                .map(|(w, v)| (w.clone(), *v))
                .collect(),
        }
    }

    /// Replace explicit entries with saved ones
    ///
    /// Call `build` afterwards to derive the reverse index and fill gaps.
    pub fn import_state(&mut self, state: MatrixState) {
        self.category_to_weapon = state
            .category_to_weapon
            .into_iter()
            .map(|(category, members)| (category, members.into_iter().collect()))
            .collect();
        self.weapon_exemption = state.weapon_exemption.into_iter().collect();
        self.revision += 1;
    }
}
