//! Equip-time allocation against the bundled definitions

use bandolier::ammo::{AmmoCategory, AmmoType};
use bandolier::combat::{check_and_consume, WeaponDef, WeaponKind};
use bandolier::core::config::EngineConfig;
use bandolier::core::types::TechTier;
use bandolier::entity::agent::{Agent, AgentKind, LifeStage};
use bandolier::equip::allocate_for_agent;
use bandolier::kit::{BodySlot, KitDef};
use bandolier::session::{AmmoSession, Definitions};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DEFS: &str = include_str!("../data/ammo_defs.toml");

fn session() -> AmmoSession {
    AmmoSession::new(Definitions::parse_toml(DEFS).unwrap(), EngineConfig::default())
}

#[test]
fn test_child_always_gets_child_wearable_kit() {
    let defs = Definitions::new()
        .with_ammo(AmmoType::new("ammo_arrow", "arrow", 1))
        .with_category(AmmoCategory::new("arrows", TechTier::Neolithic).with_ammo("ammo_arrow").auto_assign())
        .with_weapon(WeaponDef::new("bow_short", TechTier::Neolithic, WeaponKind::Projectile))
        .with_kit(KitDef::new("kit_adult_quiver", vec![20], BodySlot::Back))
        .with_kit(
            KitDef::new("kit_child_quiver", vec![60], BodySlot::Belt)
                .with_stages(vec![LifeStage::Child, LifeStage::Adult]),
        );
    let session = AmmoSession::new(defs, EngineConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..50 {
        let mut child = Agent::new("Pip", AgentKind::Humanlike, LifeStage::Child).with_weapon("bow_short");
        allocate_for_agent(&session, &mut child, &mut rng).unwrap();
        assert_eq!(child.worn_kits()[0].def.as_str(), "kit_child_quiver");
    }
}

#[test]
fn test_generated_kits_feed_their_weapon() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let weapons = ["bow_short", "bow_long", "gun_revolver", "gun_smg", "gun_bolt_action", "gun_lmg", "gun_shotgun", "gun_charge_rifle"];

    for weapon in weapons {
        for _ in 0..10 {
            let mut agent = Agent::humanlike("Ada").with_weapon(weapon);
            let kit_id = allocate_for_agent(&session, &mut agent, &mut rng)
                .unwrap_or_else(|| panic!("{weapon} was not equipped"));

            let kit = agent.kit(kit_id).unwrap();
            assert_ne!(kit.def.as_str(), "kit_ceremonial_sash");
            for slot in kit.slots() {
                let ammo = slot.chosen_ammo().unwrap();
                assert!(session.matrix().is_compatible(&weapon.into(), ammo), "{weapon} got {ammo}");
                assert!(slot.target_fill() <= slot.effective_capacity());
            }

            let check = check_and_consume(&session, Some(&mut agent), Some(&weapon.into()), false);
            assert!(check.has_ammo);
        }
    }
}

#[test]
fn test_heavy_ammo_respects_weight() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..20 {
        let mut agent = Agent::humanlike("Ada").with_weapon("gun_charge_rifle");
        allocate_for_agent(&session, &mut agent, &mut rng).unwrap();
        for slot in agent.worn_kits()[0].slots() {
            assert_eq!(slot.weight(), 3);
            assert!(slot.count() <= slot.capacity() / 3);
        }
    }
}

#[test]
fn test_machine_gun_gets_large_kit() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut agent = Agent::humanlike("Ada").with_weapon("gun_lmg");
    allocate_for_agent(&session, &mut agent, &mut rng).unwrap();
    assert_eq!(agent.worn_kits()[0].def.as_str(), "kit_rucksack");
}

#[test]
fn test_melee_and_exempt_stay_unequipped() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for weapon in ["knife", "lance_zeus"] {
        let mut agent = Agent::humanlike("Ada").with_weapon(weapon);
        assert!(allocate_for_agent(&session, &mut agent, &mut rng).is_none());
        assert!(!agent.wears_kit());
    }
}

#[test]
fn test_mechanoids_skipped() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut mech = Agent::new("Scyther", AgentKind::Mechanoid, LifeStage::Adult).with_weapon("gun_lmg");
    assert!(allocate_for_agent(&session, &mut mech, &mut rng).is_none());
}

#[test]
fn test_style_is_declared_variant() {
    let session = session();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..20 {
        let mut agent = Agent::humanlike("Ada").with_weapon("gun_revolver");
        allocate_for_agent(&session, &mut agent, &mut rng).unwrap();
        let kit = &agent.worn_kits()[0];
        let def = session.kits.get(&kit.def).unwrap();
        match &kit.style {
            Some(style) => assert!(def.styles.contains(style)),
            None => assert!(def.styles.is_empty()),
        }
    }
}
