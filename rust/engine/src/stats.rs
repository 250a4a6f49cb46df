//! Cross-draft statistics.
//!
//! [`aggregate`] is a pure function of the trial results: same input, same
//! report. Per-archetype tables are only produced when the results contain
//! more than one archetype.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::cards::{CardType, Rarity};
use crate::metrics::ColorCounts;
use crate::simulator::TrialResult;

pub const TOP_CARDS: usize = 20;
pub const TOP_CARDS_PER_ARCHETYPE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCount {
    pub id: String,
    pub name: String,
    /// Number of decks containing at least one copy
    pub decks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeSummary {
    pub name: String,
    pub trials: u32,
    /// Mean mana value over every spell in this archetype's decks
    pub average_mana_value: f64,
    /// Mean creature count per deck
    pub average_creatures: f64,
    pub mana_curve: BTreeMap<u32, u32>,
    pub colors: ColorCounts,
    pub types: BTreeMap<CardType, u32>,
    pub top_cards: Vec<CardCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub trials: usize,
    /// card id -> number of decks containing it
    pub card_frequency: BTreeMap<String, u32>,
    pub card_names: BTreeMap<String, String>,
    pub top_cards: Vec<CardCount>,
    pub mana_curve: BTreeMap<u32, u32>,
    pub color_distribution: ColorCounts,
    pub type_distribution: BTreeMap<CardType, u32>,
    pub rarity_distribution: BTreeMap<Rarity, u32>,
    /// archetype tag -> trials
    pub archetype_distribution: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetypes: Option<BTreeMap<String, ArchetypeSummary>>,
}

impl AggregateReport {
    /// The `n` most frequent cards, ties broken by card id.
    pub fn most_common_cards(&self, n: usize) -> Vec<CardCount> {
        rank_cards(&self.card_frequency, &self.card_names, n)
    }

    /// Average number of spells at each mana value per deck.
    pub fn average_curve(&self) -> BTreeMap<u32, f64> {
        if self.trials == 0 {
            return BTreeMap::new();
        }
        self.mana_curve
            .iter()
            .map(|(mv, n)| (*mv, f64::from(*n) / self.trials as f64))
            .collect()
    }
}

#[derive(Default)]
struct Tally {
    trials: u32,
    spells: u32,
    total_mana_value: u64,
    creatures: u32,
    card_frequency: BTreeMap<String, u32>,
    mana_curve: BTreeMap<u32, u32>,
    colors: ColorCounts,
    types: BTreeMap<CardType, u32>,
    rarities: BTreeMap<Rarity, u32>,
}

impl Tally {
    fn add(&mut self, result: &TrialResult<'_>) {
        let m = &result.metrics;
        self.trials += 1;
        self.spells += result.deck.spells.len() as u32;
        self.total_mana_value += m.total_mana_value;
        self.creatures += m.creature_count;
        merge_counts(&mut self.mana_curve, &m.mana_curve);
        merge_counts(&mut self.types, &m.types);
        merge_counts(&mut self.rarities, &m.rarities);
        self.colors.merge(&m.colors);

        let distinct: BTreeSet<&str> = result.deck.spells.iter().map(|c| c.id.as_str()).collect();
        for id in distinct {
            *self.card_frequency.entry(id.to_string()).or_insert(0) += 1;
        }
    }

    fn average_mana_value(&self) -> f64 {
        if self.spells == 0 {
            0.0
        } else {
            self.total_mana_value as f64 / f64::from(self.spells)
        }
    }

    fn average_creatures(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            f64::from(self.creatures) / f64::from(self.trials)
        }
    }
}

fn merge_counts<K: Ord + Copy>(into: &mut BTreeMap<K, u32>, from: &BTreeMap<K, u32>) {
    for (k, n) in from {
        *into.entry(*k).or_insert(0) += n;
    }
}

fn rank_cards(
    frequency: &BTreeMap<String, u32>,
    names: &BTreeMap<String, String>,
    n: usize,
) -> Vec<CardCount> {
    let mut ranked: Vec<(&String, &u32)> = frequency.iter().collect();
    ranked.sort_by_key(|(id, decks)| (Reverse(**decks), *id));
    ranked
        .into_iter()
        .take(n)
        .map(|(id, decks)| CardCount {
            id: id.clone(),
            name: names.get(id).cloned().unwrap_or_default(),
            decks: *decks,
        })
        .collect()
}

pub fn aggregate(results: &[TrialResult<'_>]) -> AggregateReport {
    let mut global = Tally::default();
    let mut per_archetype: BTreeMap<String, Tally> = BTreeMap::new();
    let mut names: BTreeMap<String, String> = BTreeMap::new();
    let mut archetype_names: BTreeMap<String, &'static str> = BTreeMap::new();

    for result in results {
        global.add(result);
        let tag = result.archetype.tag().to_string();
        archetype_names.insert(tag.clone(), result.archetype.name());
        per_archetype.entry(tag).or_default().add(result);
        for card in &result.deck.spells {
            names
                .entry(card.id.clone())
                .or_insert_with(|| card.name.clone());
        }
    }

    let archetype_distribution = per_archetype
        .iter()
        .map(|(tag, t)| (tag.clone(), t.trials))
        .collect();

    let archetypes = (per_archetype.len() > 1).then(|| {
        per_archetype
            .iter()
            .map(|(tag, t)| {
                let summary = ArchetypeSummary {
                    name: archetype_names.get(tag).copied().unwrap_or_default().to_string(),
                    trials: t.trials,
                    average_mana_value: t.average_mana_value(),
                    average_creatures: t.average_creatures(),
                    mana_curve: t.mana_curve.clone(),
                    colors: t.colors.clone(),
                    types: t.types.clone(),
                    top_cards: rank_cards(&t.card_frequency, &names, TOP_CARDS_PER_ARCHETYPE),
                };
                (tag.clone(), summary)
            })
            .collect()
    });

    let top_cards = rank_cards(&global.card_frequency, &names, TOP_CARDS);
    AggregateReport {
        trials: results.len(),
        card_frequency: global.card_frequency,
        card_names: names,
        top_cards,
        mana_curve: global.mana_curve,
        color_distribution: global.colors,
        type_distribution: global.types,
        rarity_distribution: global.rarities,
        archetype_distribution,
        archetypes,
    }
}
