use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::cards::{CardRecord, Rarity};
use crate::errors::CatalogError;

/// Supplies the printed cards of a set.
///
/// Implementations do the actual lookup (remote API, file snapshot, fixture).
/// Failures are reported as [`CatalogError::Fetch`] and are not retried.
pub trait CatalogSource {
    fn fetch_card_catalog(&self, set_code: &str) -> Result<Vec<CardRecord>, CatalogError>;
}

/// In-memory catalog source keyed by set code.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    sets: HashMap<String, Vec<CardRecord>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, set_code: &str, cards: Vec<CardRecord>) -> Self {
        self.sets.insert(set_code.to_ascii_lowercase(), cards);
        self
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch_card_catalog(&self, set_code: &str) -> Result<Vec<CardRecord>, CatalogError> {
        self.sets
            .get(&set_code.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| CatalogError::Fetch {
                set_code: set_code.to_string(),
                reason: "unknown set".into(),
            })
    }
}

/// Normalized, read-only view of the cards available for one set.
///
/// Basic lands never make it into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCatalog {
    set_code: String,
    cards: Vec<CardRecord>,
}

impl CardCatalog {
    pub fn new(set_code: impl Into<String>, records: Vec<CardRecord>) -> Self {
        let cards = records
            .into_iter()
            .filter(|c| !c.is_basic_land())
            .collect();
        Self {
            set_code: set_code.into(),
            cards,
        }
    }

    pub fn fetch(source: &dyn CatalogSource, set_code: &str) -> Result<Self, CatalogError> {
        let records = source.fetch_card_catalog(set_code)?;
        Ok(Self::new(set_code, records))
    }

    pub fn set_code(&self) -> &str {
        &self.set_code
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CardRecord> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn spell_count(&self) -> usize {
        self.cards.iter().filter(|c| !c.is_land).count()
    }

    pub fn rarity_counts(&self) -> BTreeMap<Rarity, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.cards {
            *counts.entry(c.rarity).or_insert(0) += 1;
        }
        counts
    }

    /// Fails with [`CatalogError::Empty`] when no non-land card is available.
    pub fn ensure_spells(&self) -> Result<(), CatalogError> {
        if self.spell_count() == 0 {
            return Err(CatalogError::Empty {
                set_code: self.set_code.clone(),
            });
        }
        Ok(())
    }
}
