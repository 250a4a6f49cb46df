//! Sealed pool generation.
//!
//! A pool is `boosters × cards_per_booster` cards drawn from the catalog.
//! Cards inside one booster are distinct; boosters are independent of each
//! other, so the same card can show up in several boosters.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::cards::{CardRecord, Color, Rarity};
use crate::catalog::CardCatalog;
use crate::errors::PoolError;

pub const DEFAULT_BOOSTERS_PER_POOL: usize = 6;
pub const DEFAULT_CARDS_PER_BOOSTER: usize = 15;

/// Expected number of cards of each rarity in one booster.
///
/// Only the ratios matter. The default mirrors a play booster: eleven commons,
/// three uncommons and one rare slot that is mythic one time in eight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RarityWeights {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub mythic: f64,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 11.0,
            uncommon: 3.0,
            rare: 0.875,
            mythic: 0.125,
        }
    }
}

impl RarityWeights {
    pub fn share(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Mythic => self.mythic,
        }
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        for rarity in Rarity::ALL {
            let share = self.share(rarity);
            if !share.is_finite() || share <= 0.0 {
                return Err(PoolError::InvalidRarityWeights {
                    rarity: rarity.to_string(),
                    share,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplingMode {
    /// Every catalog card is equally likely.
    Uniform,
    /// Card weight is its rarity share divided by how many cards share that rarity.
    RarityWeighted(RarityWeights),
}

impl Default for SamplingMode {
    fn default() -> Self {
        SamplingMode::RarityWeighted(RarityWeights::default())
    }
}

/// The cards one simulated player opens. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool<'a> {
    cards: Vec<&'a CardRecord>,
}

impl<'a> Pool<'a> {
    pub fn from_cards(cards: Vec<&'a CardRecord>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[&'a CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// How many non-land cards carry each color. A multicolor card counts once per color.
    pub fn color_frequency(&self) -> BTreeMap<Color, usize> {
        let mut freq: BTreeMap<Color, usize> = Color::ALL.iter().map(|c| (*c, 0)).collect();
        for card in self.cards.iter().filter(|c| !c.is_land) {
            for color in card.color_identity.iter() {
                *freq.entry(color).or_insert(0) += 1;
            }
        }
        freq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolGenerator {
    boosters: usize,
    cards_per_booster: usize,
    sampling: SamplingMode,
}

impl Default for PoolGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BOOSTERS_PER_POOL, DEFAULT_CARDS_PER_BOOSTER)
    }
}

impl PoolGenerator {
    pub fn new(boosters: usize, cards_per_booster: usize) -> Self {
        Self {
            boosters,
            cards_per_booster,
            sampling: SamplingMode::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn pool_size(&self) -> usize {
        self.boosters * self.cards_per_booster
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.boosters == 0 || self.cards_per_booster == 0 {
            return Err(PoolError::InvalidBooster {
                boosters: self.boosters,
                cards_per_booster: self.cards_per_booster,
            });
        }
        if let SamplingMode::RarityWeighted(weights) = &self.sampling {
            weights.validate()?;
        }
        Ok(())
    }

    pub fn generate<'a, R: Rng + ?Sized>(
        &self,
        catalog: &'a CardCatalog,
        rng: &mut R,
    ) -> Result<Pool<'a>, PoolError> {
        self.validate()?;
        catalog.ensure_spells()?;

        let universe: Vec<&'a CardRecord> = catalog.cards().iter().collect();
        let weighted = match &self.sampling {
            SamplingMode::Uniform => None,
            SamplingMode::RarityWeighted(weights) => Some(card_weights(catalog, weights)),
        };

        let mut cards = Vec::with_capacity(self.pool_size());
        for _ in 0..self.boosters {
            self.open_booster(&universe, weighted.as_deref(), rng, &mut cards)?;
        }
        Ok(Pool { cards })
    }

    /// Draws one booster into `out`. A booster larger than the universe is
    /// filled by repeated passes, each pass without replacement.
    fn open_booster<'a, R: Rng + ?Sized>(
        &self,
        universe: &[&'a CardRecord],
        weighted: Option<&[(&'a CardRecord, f64)]>,
        rng: &mut R,
        out: &mut Vec<&'a CardRecord>,
    ) -> Result<(), PoolError> {
        let mut remaining = self.cards_per_booster;
        while remaining > 0 {
            let take = remaining.min(universe.len());
            match weighted {
                None => out.extend(universe.choose_multiple(rng, take).copied()),
                Some(weights) => {
                    let picks = weights
                        .choose_multiple_weighted(rng, take, |(_, w)| *w)
                        .map_err(|e| PoolError::Sampling(e.to_string()))?;
                    out.extend(picks.map(|(card, _)| *card));
                }
            }
            remaining -= take;
        }
        Ok(())
    }
}

fn card_weights<'a>(
    catalog: &'a CardCatalog,
    weights: &RarityWeights,
) -> Vec<(&'a CardRecord, f64)> {
    let counts = catalog.rarity_counts();
    catalog
        .cards()
        .iter()
        .map(|card| {
            let n = counts.get(&card.rarity).copied().unwrap_or(1).max(1);
            (card, weights.share(card.rarity) / n as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ColorSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn catalog(n: usize) -> CardCatalog {
        let records = (0..n)
            .map(|i| {
                let rarity = Rarity::ALL[i % 4];
                CardRecord::new(
                    format!("c{i}"),
                    format!("Card {i}"),
                    (i % 6) as u32,
                    ColorSet::empty(),
                    "Artifact",
                    rarity,
                )
            })
            .collect();
        CardCatalog::new("tst", records)
    }

    #[test]
    fn pool_has_fixed_size() {
        let cat = catalog(40);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let pool = PoolGenerator::default().generate(&cat, &mut rng).unwrap();
        assert_eq!(pool.len(), 90);
    }

    #[test]
    fn cards_within_a_booster_are_distinct() {
        let cat = catalog(40);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for sampling in [SamplingMode::Uniform, SamplingMode::default()] {
            let pool = PoolGenerator::new(3, 15)
                .with_sampling(sampling)
                .generate(&cat, &mut rng)
                .unwrap();
            for booster in pool.cards().chunks(15) {
                let ids: HashSet<&str> = booster.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids.len(), 15, "duplicate inside booster: {:?}", ids);
            }
        }
    }

    #[test]
    fn small_catalog_still_fills_boosters() {
        let cat = catalog(4);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let pool = PoolGenerator::new(2, 10).generate(&cat, &mut rng).unwrap();
        assert_eq!(pool.len(), 20);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let cat = CardCatalog::new("tst", vec![]);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let err = PoolGenerator::default().generate(&cat, &mut rng).unwrap_err();
        assert!(matches!(err, PoolError::Catalog(_)));
    }

    #[test]
    fn zero_rarity_share_is_rejected() {
        let weights = RarityWeights {
            mythic: 0.0,
            ..RarityWeights::default()
        };
        let generator =
            PoolGenerator::default().with_sampling(SamplingMode::RarityWeighted(weights));
        assert!(matches!(
            generator.validate(),
            Err(PoolError::InvalidRarityWeights { .. })
        ));
    }

    #[test]
    fn zero_sized_boosters_are_rejected() {
        assert!(matches!(
            PoolGenerator::new(0, 15).validate(),
            Err(PoolError::InvalidBooster { .. })
        ));
    }

    #[test]
    fn color_frequency_counts_each_color_of_multicolor_cards() {
        let a = CardRecord::new("a", "A", 2, "WU".parse().unwrap(), "Creature", Rarity::Common);
        let b = CardRecord::new("b", "B", 2, "U".parse().unwrap(), "Instant", Rarity::Common);
        let pool = Pool::from_cards(vec![&a, &b]);
        let freq = pool.color_frequency();
        assert_eq!(freq[&Color::White], 1);
        assert_eq!(freq[&Color::Blue], 2);
        assert_eq!(freq[&Color::Green], 0);
    }
}
