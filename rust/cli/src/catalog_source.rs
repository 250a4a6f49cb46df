//! Card catalog loaded from a local Scryfall-style JSON dump.
//!
//! Accepts either a bare array of card objects or a search page
//! (`{"object": "list", "data": [...]}`), optionally zstd-compressed.

use std::path::PathBuf;

use serde::Deserialize;

use draftsim_engine::cards::{CardRecord, ColorSet, Rarity};
use draftsim_engine::catalog::CatalogSource;
use draftsim_engine::errors::CatalogError;

use crate::io_utils::read_text_auto;

#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CardFile {
    List(Vec<RawCard>),
    Page { data: Vec<RawCard> },
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: String,
    name: String,
    #[serde(default)]
    cmc: f64,
    #[serde(default)]
    color_identity: Vec<String>,
    #[serde(default)]
    type_line: String,
    rarity: String,
    #[serde(default)]
    set: Option<String>,
}

fn parse_rarity(raw: &str) -> Option<Rarity> {
    match raw.to_ascii_lowercase().as_str() {
        "common" => Some(Rarity::Common),
        "uncommon" => Some(Rarity::Uncommon),
        "rare" | "special" | "bonus" => Some(Rarity::Rare),
        "mythic" => Some(Rarity::Mythic),
        _ => None,
    }
}

impl RawCard {
    fn into_record(self) -> Result<CardRecord, String> {
        let rarity = parse_rarity(&self.rarity)
            .ok_or_else(|| format!("card {}: unknown rarity '{}'", self.id, self.rarity))?;
        let colors: ColorSet = self
            .color_identity
            .concat()
            .parse()
            .map_err(|e| format!("card {}: {}", self.id, e))?;
        let mana_value = if self.cmc.is_finite() && self.cmc > 0.0 {
            self.cmc.round() as u32
        } else {
            0
        };
        Ok(CardRecord::new(
            self.id,
            self.name,
            mana_value,
            colors,
            self.type_line,
            rarity,
        ))
    }
}

/// Parses catalog JSON text and keeps the cards printed in `set_code`.
/// Cards without a `set` field are kept.
pub fn parse_catalog_json(text: &str, set_code: &str) -> Result<Vec<CardRecord>, String> {
    let file: CardFile = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let raw = match file {
        CardFile::List(cards) | CardFile::Page { data: cards } => cards,
    };
    raw.into_iter()
        .filter(|c| {
            c.set
                .as_deref()
                .is_none_or(|s| s.eq_ignore_ascii_case(set_code))
        })
        .map(RawCard::into_record)
        .collect()
}

impl CatalogSource for JsonCatalogSource {
    fn fetch_card_catalog(&self, set_code: &str) -> Result<Vec<CardRecord>, CatalogError> {
        let fetch_error = |reason: String| CatalogError::Fetch {
            set_code: set_code.to_string(),
            reason,
        };
        let path = self.path.to_string_lossy();
        let text = read_text_auto(&path).map_err(|e| fetch_error(format!("{}: {}", path, e)))?;
        let cards = parse_catalog_json(&text, set_code)
            .map_err(|e| fetch_error(format!("{}: {}", path, e)))?;
        tracing::debug!(set = set_code, cards = cards.len(), path = %path, "catalog loaded");
        Ok(cards)
    }
}
