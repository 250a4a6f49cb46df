//! Deck construction from a sealed pool.
//!
//! The builder keeps the pool's non-land cards that the archetype allows
//! (on-color or colorless), ranks them, takes the best [`DECK_SPELLS`] and
//! derives a basic land split that adds up to [`DECK_LANDS`].

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::cards::{CardRecord, Color};
use crate::errors::DeckBuildError;
use crate::pool::Pool;

pub const DECK_SPELLS: usize = 23;
pub const DECK_LANDS: u32 = 17;

/// Per-bucket caps on how many spells of each mana value are taken before
/// higher-ranked but off-curve cards are let back in.
///
/// Buckets are mana value ≤1, 2, 3, 4, 5 and 6+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveTarget {
    pub caps: [usize; 6],
}

impl Default for CurveTarget {
    fn default() -> Self {
        Self {
            caps: [3, 7, 6, 4, 2, 1],
        }
    }
}

impl CurveTarget {
    pub fn bucket(mana_value: u32) -> usize {
        (mana_value.clamp(1, 6) - 1) as usize
    }
}

/// How candidates are ordered and picked.
///
/// Ranking is rarity tier (mythic first), then lower mana value, then pool
/// order. `curve` defers cards whose bucket is already full; `min_creatures`
/// swaps in creatures after the greedy pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingPolicy {
    pub curve: Option<CurveTarget>,
    pub min_creatures: Option<usize>,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            curve: Some(CurveTarget::default()),
            min_creatures: None,
        }
    }
}

impl RankingPolicy {
    /// Rarity then mana value then pool order, with no curve caps or quotas.
    pub fn plain() -> Self {
        Self {
            curve: None,
            min_creatures: None,
        }
    }
}

/// Basic lands per color. Every archetype color has an entry, possibly zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandSplit {
    counts: BTreeMap<Color, u32>,
}

impl LandSplit {
    pub fn get(&self, color: Color) -> u32 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

/// Splits `total` lands across the archetype's colors in proportion to
/// `symbols`, using largest-remainder rounding so the total is exact.
///
/// Remainder ties go to the color with more symbols, then WUBRG order.
/// With no symbols at all the lands are split evenly.
pub fn allocate_lands(
    symbols: &BTreeMap<Color, u32>,
    archetype: Archetype,
    total: u32,
) -> LandSplit {
    let colors: Vec<Color> = archetype.colors().iter().collect();
    let mut counts: BTreeMap<Color, u32> = colors.iter().map(|c| (*c, 0)).collect();
    let weights: Vec<u64> = colors
        .iter()
        .map(|c| u64::from(symbols.get(c).copied().unwrap_or(0)))
        .collect();
    let sum: u64 = weights.iter().sum();

    if sum == 0 {
        let n = colors.len() as u32;
        for (i, color) in colors.iter().enumerate() {
            let extra = u32::from((i as u32) < total % n);
            counts.insert(*color, total / n + extra);
        }
        return LandSplit { counts };
    }

    let total64 = u64::from(total);
    let mut assigned = 0u64;
    let mut remainders = Vec::with_capacity(colors.len());
    for (color, weight) in colors.iter().zip(&weights) {
        let share = total64 * weight;
        let base = share / sum;
        counts.insert(*color, base as u32);
        assigned += base;
        remainders.push((*color, share % sum, *weight));
    }
    remainders.sort_by_key(|(color, rem, weight)| (Reverse(*rem), Reverse(*weight), *color));
    for (color, _, _) in remainders.iter().take((total64 - assigned) as usize) {
        *counts.entry(*color).or_insert(0) += 1;
    }
    LandSplit { counts }
}

/// A finished 40-card deck: spells plus implied basics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck<'a> {
    pub archetype: Archetype,
    pub spells: Vec<&'a CardRecord>,
    pub lands: LandSplit,
}

impl Deck<'_> {
    /// Color symbol occurrences across the spells; colorless spells add nothing.
    pub fn color_symbols(&self) -> BTreeMap<Color, u32> {
        color_symbols(&self.spells, self.archetype)
    }

    pub fn creature_count(&self) -> usize {
        self.spells.iter().filter(|c| c.is_creature()).count()
    }

    pub fn is_legal(&self) -> bool {
        self.spells.len() == DECK_SPELLS
            && self.lands.total() == DECK_LANDS
            && self
                .spells
                .iter()
                .all(|c| !c.is_land && self.archetype.allows(c.color_identity))
    }
}

fn color_symbols(spells: &[&CardRecord], archetype: Archetype) -> BTreeMap<Color, u32> {
    let mut symbols = BTreeMap::new();
    for card in spells {
        for color in card.color_identity.iter() {
            if archetype.colors().contains(color) {
                *symbols.entry(color).or_insert(0) += 1;
            }
        }
    }
    symbols
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckBuilder {
    policy: RankingPolicy,
}

impl DeckBuilder {
    pub fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    pub fn build<'a>(
        &self,
        pool: &Pool<'a>,
        archetype: Archetype,
    ) -> Result<Deck<'a>, DeckBuildError> {
        let ranked = rank_candidates(pool, archetype);
        if ranked.len() < DECK_SPELLS {
            return Err(DeckBuildError::InsufficientCards {
                archetype: archetype.tag().to_string(),
                available: ranked.len(),
                required: DECK_SPELLS,
            });
        }

        let picked = self.pick(&ranked);
        let spells: Vec<&'a CardRecord> = picked.into_iter().map(|i| ranked[i]).collect();
        let lands = allocate_lands(&color_symbols(&spells, archetype), archetype, DECK_LANDS);
        Ok(Deck {
            archetype,
            spells,
            lands,
        })
    }

    /// Indices into `ranked`, sorted by rank.
    fn pick(&self, ranked: &[&CardRecord]) -> Vec<usize> {
        let mut chosen = Vec::with_capacity(DECK_SPELLS);
        let mut deferred = Vec::new();
        let mut filled = [0usize; 6];

        for (i, card) in ranked.iter().enumerate() {
            if chosen.len() == DECK_SPELLS {
                break;
            }
            match &self.policy.curve {
                Some(target) => {
                    let bucket = CurveTarget::bucket(card.mana_value);
                    if filled[bucket] < target.caps[bucket] {
                        filled[bucket] += 1;
                        chosen.push(i);
                    } else {
                        deferred.push(i);
                    }
                }
                None => chosen.push(i),
            }
        }
        let missing = DECK_SPELLS - chosen.len();
        chosen.extend(deferred.into_iter().take(missing));
        chosen.sort_unstable();

        if let Some(min) = self.policy.min_creatures {
            self.fill_creature_quota(ranked, &mut chosen, min);
        }
        chosen
    }

    fn fill_creature_quota(&self, ranked: &[&CardRecord], chosen: &mut Vec<usize>, min: usize) {
        let mut taken = vec![false; ranked.len()];
        for &i in chosen.iter() {
            taken[i] = true;
        }
        let mut creatures = chosen.iter().filter(|&&i| ranked[i].is_creature()).count();
        let spare = (0..ranked.len()).filter(|&i| !taken[i] && ranked[i].is_creature());
        for add in spare {
            if creatures >= min {
                break;
            }
            let Some(pos) = chosen.iter().rposition(|&i| !ranked[i].is_creature()) else {
                break;
            };
            chosen.remove(pos);
            chosen.push(add);
            creatures += 1;
        }
        chosen.sort_unstable();
    }
}

/// Eligible non-land cards in desirability order. Off-color cards are dropped.
fn rank_candidates<'a>(pool: &Pool<'a>, archetype: Archetype) -> Vec<&'a CardRecord> {
    let mut candidates: Vec<(usize, &'a CardRecord)> = pool
        .cards()
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| !c.is_land && archetype.allows(c.color_identity))
        .collect();
    candidates.sort_by_key(|(idx, c)| (Reverse(c.rarity), c.mana_value, *idx));
    candidates.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rarity;

    fn arch(tag: &str) -> Archetype {
        tag.parse().unwrap()
    }

    fn card(id: &str, mv: u32, colors: &str, type_line: &str, rarity: Rarity) -> CardRecord {
        CardRecord::new(id, id, mv, colors.parse().unwrap(), type_line, rarity)
    }

    fn symbols(pairs: &[(Color, u32)]) -> BTreeMap<Color, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn ten_to_five_split_keeps_seventeen_and_favours_white() {
        let split = allocate_lands(
            &symbols(&[(Color::White, 10), (Color::Blue, 5)]),
            arch("WU"),
            17,
        );
        assert_eq!(split.total(), 17);
        assert_eq!(split.get(Color::White), 11);
        assert_eq!(split.get(Color::Blue), 6);
    }

    #[test]
    fn fractional_three_way_split_is_exact() {
        let split = allocate_lands(
            &symbols(&[(Color::White, 1), (Color::Blue, 1), (Color::Black, 1)]),
            arch("WUB"),
            17,
        );
        assert_eq!(split.total(), 17);
        // 17/3 = 5.67 each: the two leftover lands go in WUBRG order
        assert_eq!(split.get(Color::White), 6);
        assert_eq!(split.get(Color::Blue), 6);
        assert_eq!(split.get(Color::Black), 5);
    }

    #[test]
    fn no_symbols_splits_evenly() {
        let split = allocate_lands(&BTreeMap::new(), arch("RG"), 17);
        assert_eq!(split.get(Color::Red), 9);
        assert_eq!(split.get(Color::Green), 8);
    }

    #[test]
    fn unused_archetype_color_gets_zero_lands() {
        let split = allocate_lands(&symbols(&[(Color::Blue, 4)]), arch("WU"), 17);
        assert_eq!(split.get(Color::Blue), 17);
        assert_eq!(split.get(Color::White), 0);
        assert_eq!(split.iter().count(), 2);
    }

    #[test]
    fn too_few_candidates_fail() {
        let w = card("w", 2, "W", "Creature", Rarity::Common);
        let pool = Pool::from_cards(vec![&w; 10]);
        let err = DeckBuilder::default().build(&pool, arch("WU")).unwrap_err();
        assert_eq!(
            err,
            DeckBuildError::InsufficientCards {
                archetype: "WU".into(),
                available: 10,
                required: DECK_SPELLS,
            }
        );
    }

    #[test]
    fn off_color_and_lands_are_never_selected() {
        let on = card("on", 2, "W", "Creature", Rarity::Common);
        let colorless = card("art", 3, "", "Artifact", Rarity::Common);
        let off = card("off", 1, "R", "Instant", Rarity::Mythic);
        let gold = card("gold", 2, "WR", "Creature", Rarity::Mythic);
        let land = card("gate", 0, "WU", "Land — Gate", Rarity::Mythic);
        let mut cards = vec![&off, &gold, &land];
        cards.extend(std::iter::repeat_n(&on, 15));
        cards.extend(std::iter::repeat_n(&colorless, 10));
        let deck = DeckBuilder::default()
            .build(&Pool::from_cards(cards), arch("WU"))
            .unwrap();
        assert!(deck.is_legal());
        assert!(deck.spells.iter().all(|c| c.id == "on" || c.id == "art"));
    }

    #[test]
    fn rarity_outranks_mana_value_without_curve_caps() {
        let cheap = card("cheap", 1, "U", "Creature", Rarity::Common);
        let rare = card("rare", 5, "U", "Creature", Rarity::Rare);
        let mut cards = vec![&cheap; 23];
        cards.push(&rare);
        let deck = DeckBuilder::new(RankingPolicy::plain())
            .build(&Pool::from_cards(cards), arch("MONO_U"))
            .unwrap();
        assert_eq!(deck.spells[0].id, "rare");
        assert_eq!(deck.spells.iter().filter(|c| c.id == "cheap").count(), 22);
    }

    #[test]
    fn curve_caps_defer_cards_from_full_buckets() {
        let six = card("six", 6, "G", "Creature", Rarity::Mythic);
        let two = card("two", 2, "G", "Creature", Rarity::Common);
        let three = card("three", 3, "G", "Creature", Rarity::Common);
        let mut cards = vec![&six; 5];
        cards.extend(std::iter::repeat_n(&two, 15));
        cards.extend(std::iter::repeat_n(&three, 15));
        let deck = DeckBuilder::default()
            .build(&Pool::from_cards(cards), arch("MONO_G"))
            .unwrap();
        // Default caps: one six-drop, seven two-drops, six three-drops
        // before deferred cards refill in rank order
        let sixes = deck.spells.iter().filter(|c| c.id == "six").count();
        assert_eq!(sixes, 5);
        let fillers: Vec<CardRecord> = (1..=5)
            .map(|mv| card(&format!("mv{mv}"), mv, "G", "Creature", Rarity::Common))
            .collect();
        let mut full_curve = vec![&six; 5];
        for filler in &fillers {
            full_curve.extend(std::iter::repeat_n(filler, 10));
        }
        let curve_first = DeckBuilder::default()
            .build(&Pool::from_cards(full_curve), arch("MONO_G"))
            .unwrap();
        assert_eq!(
            curve_first.spells.iter().filter(|c| c.id == "six").count(),
            1
        );
    }

    #[test]
    fn creature_quota_swaps_out_lowest_ranked_spells() {
        let spell = card("spell", 2, "B", "Instant", Rarity::Uncommon);
        let dude = card("dude", 2, "B", "Creature", Rarity::Common);
        let mut cards = vec![&spell; 23];
        cards.extend(std::iter::repeat_n(&dude, 10));
        let policy = RankingPolicy {
            curve: None,
            min_creatures: Some(8),
        };
        let deck = DeckBuilder::new(policy)
            .build(&Pool::from_cards(cards), arch("MONO_B"))
            .unwrap();
        assert_eq!(deck.creature_count(), 8);
        assert_eq!(deck.spells.len(), DECK_SPELLS);
    }

    #[test]
    fn land_split_follows_selected_spells() {
        let w = card("w", 2, "W", "Creature", Rarity::Common);
        let u = card("u", 2, "U", "Creature", Rarity::Common);
        let mut cards = vec![&w; 16];
        cards.extend(std::iter::repeat_n(&u, 7));
        let deck = DeckBuilder::new(RankingPolicy::plain())
            .build(&Pool::from_cards(cards), arch("WU"))
            .unwrap();
        assert_eq!(deck.lands.total(), DECK_LANDS);
        assert!(deck.lands.get(Color::White) > deck.lands.get(Color::Blue));
        assert_eq!(deck.color_symbols()[&Color::White], 16);
    }
}
