//! Consistency checks over the whole zap table

use bolt_core::beam::{BoltTag, ZapType};
use bolt_core::GameRng;
use bolt_data::{ZAP_DATA, num_zaps, standard_catalog};
use hashbrown::{HashMap, HashSet};
use proptest::prelude::*;
use strum::IntoEnumIterator;

#[test]
fn every_zap_has_a_row() {
    let catalog = standard_catalog().unwrap();
    for id in ZapType::iter() {
        assert!(catalog.lookup(id).is_ok(), "missing {id}");
    }
    assert_eq!(catalog.len(), num_zaps());
    assert_eq!(num_zaps(), ZapType::iter().count());
}

#[test]
fn table_is_in_identifier_order() {
    for (i, entry) in ZAP_DATA.iter().enumerate() {
        assert_eq!(entry.id as usize, i, "{} out of place", entry.id);
    }
}

#[test]
fn damage_names_are_unique_unless_tagged_alike() {
    let mut seen: HashSet<&str> = HashSet::new();
    for entry in ZAP_DATA.iter().filter(|z| z.tag.is_none()) {
        if let Some(name) = entry.name {
            assert!(seen.insert(name), "duplicate name {name}");
        }
    }
}

#[test]
fn tags_never_span_unrelated_names() {
    let mut by_tag: HashMap<BoltTag, Vec<&str>> = HashMap::new();
    for entry in ZAP_DATA {
        if let (Some(tag), Some(name)) = (entry.tag, entry.name) {
            by_tag.entry(tag).or_default().push(name);
        }
    }
    // bolt of fire and bolt of magma share the superhot behaviour
    assert_eq!(by_tag.get(&BoltTag::SuperhotBolt).map(Vec::len), Some(2));
    for (tag, names) in by_tag.iter().filter(|(t, _)| **t != BoltTag::SuperhotBolt) {
        assert_eq!(names.len(), 1, "{tag} used by {names:?}");
    }
}

#[test]
fn explosions_carry_a_tag() {
    for entry in ZAP_DATA.iter().filter(|z| z.is_explosion) {
        assert!(entry.tag.is_some(), "{} explodes untagged", entry.id);
    }
}

proptest! {
    #[test]
    fn configure_respects_power_caps(index in 0..ZAP_DATA.len(), power in 0..20_000i32, seed in any::<u64>()) {
        let catalog = standard_catalog().unwrap();
        let entry = &ZAP_DATA[index];
        let mut rng = GameRng::new(seed);

        let mut capped = bolt_core::beam::Bolt::default();
        catalog.configure(entry.id, power, &mut capped, false, &mut rng).unwrap();
        let mut at_cap = bolt_core::beam::Bolt::default();
        catalog.configure(entry.id, power.min(entry.power_cap), &mut at_cap, false, &mut rng).unwrap();

        prop_assert_eq!(capped.hit, at_cap.hit);
        prop_assert_eq!(capped.ench_power, at_cap.ench_power);
        prop_assert_eq!(capped.flavour, entry.flavour);
    }
}
