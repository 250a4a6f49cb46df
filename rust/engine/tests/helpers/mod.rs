//! Shared catalog fixtures for the engine integration tests.
#![allow(dead_code)]

use draftsim_engine::cards::{CardRecord, Color, ColorSet, Rarity};
use draftsim_engine::catalog::CardCatalog;

pub const SET: &str = "tst";

const TYPES: [&str; 5] = [
    "Creature — Soldier",
    "Instant",
    "Creature — Beast",
    "Sorcery",
    "Enchantment — Aura",
];

/// Same rarity mix for every color group, so rarity weighting does not skew colors.
pub fn rarity_for(i: usize) -> Rarity {
    match i % 10 {
        0..=5 => Rarity::Common,
        6 | 7 => Rarity::Uncommon,
        8 => Rarity::Rare,
        _ => Rarity::Mythic,
    }
}

pub fn spell(
    id: &str,
    colors: &str,
    mana_value: u32,
    type_line: &str,
    rarity: Rarity,
) -> CardRecord {
    CardRecord::new(
        id,
        format!("Card {id}"),
        mana_value,
        colors.parse().unwrap(),
        type_line,
        rarity,
    )
}

/// 40 mono-colored spells per color, 20 colorless artifacts, 10 nonbasic
/// lands and the five basics (which the catalog drops).
pub fn balanced_records() -> Vec<CardRecord> {
    let mut records = Vec::new();
    for color in Color::ALL {
        for i in 0..40 {
            let symbol = color.symbol().to_string();
            records.push(spell(
                &format!("{symbol}{i:02}"),
                &symbol,
                (i % 6) as u32 + 1,
                TYPES[i % TYPES.len()],
                rarity_for(i),
            ));
        }
    }
    for i in 0..20 {
        records.push(spell(
            &format!("A{i:02}"),
            "",
            (i % 5) as u32 + 1,
            "Artifact Creature — Golem",
            rarity_for(i),
        ));
    }
    for i in 0..10 {
        records.push(spell(&format!("L{i:02}"), "", 0, "Land", rarity_for(i)));
    }
    for color in Color::ALL {
        let mut identity = ColorSet::empty();
        identity.insert(color);
        records.push(CardRecord::new(
            format!("basic-{}", color.symbol()),
            color.basic_land_name(),
            0,
            identity,
            "Basic Land — Plains",
            Rarity::Common,
        ));
    }
    records
}

pub fn balanced_catalog() -> CardCatalog {
    CardCatalog::new(SET, balanced_records())
}

/// Only `on_color` cards of the given colors; everything else is black.
/// Each card appears at most once per booster, so with three or fewer
/// on-color cards a 90-card pool can never hold 23 of them.
pub fn starved_catalog(colors: &str, on_color: usize) -> CardCatalog {
    let mut records = Vec::new();
    for i in 0..on_color {
        records.push(spell(&format!("on{i}"), colors, 2, "Creature — Elf", Rarity::Common));
    }
    for i in 0..(100 - on_color) {
        records.push(spell(&format!("off{i}"), "B", 2, "Creature — Zombie", Rarity::Common));
    }
    CardCatalog::new(SET, records)
}
