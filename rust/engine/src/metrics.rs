use std::collections::BTreeMap;

use serde::Serialize;

use crate::builder::Deck;
use crate::cards::{CardRecord, CardType, Color, Rarity};

/// Spell counts per color symbol. A multicolor spell counts once for each of
/// its colors and once in `multicolor`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorCounts {
    pub by_color: BTreeMap<Color, u32>,
    pub colorless: u32,
    pub multicolor: u32,
}

impl ColorCounts {
    pub fn record(&mut self, card: &CardRecord) {
        let identity = card.color_identity;
        if identity.is_empty() {
            self.colorless += 1;
            return;
        }
        if identity.len() > 1 {
            self.multicolor += 1;
        }
        for color in identity.iter() {
            *self.by_color.entry(color).or_insert(0) += 1;
        }
    }

    pub fn merge(&mut self, other: &ColorCounts) {
        for (color, n) in &other.by_color {
            *self.by_color.entry(*color).or_insert(0) += n;
        }
        self.colorless += other.colorless;
        self.multicolor += other.multicolor;
    }

    pub fn get(&self, color: Color) -> u32 {
        self.by_color.get(&color).copied().unwrap_or(0)
    }
}

/// Derived per-deck numbers kept alongside every trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckMetrics {
    /// mana value -> spell count
    pub mana_curve: BTreeMap<u32, u32>,
    pub colors: ColorCounts,
    pub types: BTreeMap<CardType, u32>,
    pub rarities: BTreeMap<Rarity, u32>,
    pub creature_count: u32,
    pub total_mana_value: u64,
    pub average_mana_value: f64,
}

impl DeckMetrics {
    pub fn from_deck(deck: &Deck<'_>) -> Self {
        Self::from_spells(&deck.spells)
    }

    pub fn from_spells(spells: &[&CardRecord]) -> Self {
        let mut m = DeckMetrics::default();
        for card in spells {
            *m.mana_curve.entry(card.mana_value).or_insert(0) += 1;
            *m.types.entry(card.primary_type()).or_insert(0) += 1;
            *m.rarities.entry(card.rarity).or_insert(0) += 1;
            m.colors.record(card);
            m.total_mana_value += u64::from(card.mana_value);
            if card.is_creature() {
                m.creature_count += 1;
            }
        }
        if !spells.is_empty() {
            m.average_mana_value = m.total_mana_value as f64 / spells.len() as f64;
        }
        m
    }
}
