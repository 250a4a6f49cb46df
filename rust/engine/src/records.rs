use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::builder::LandSplit;
use crate::cards::{CardType, ColorSet, Rarity};
use crate::metrics::DeckMetrics;
use crate::simulator::TrialResult;

/// One spell of one trial's deck, flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub trial: usize,
    pub archetype: String,
    pub card_id: String,
    pub card_name: String,
    pub mana_value: u32,
    pub colors: ColorSet,
    pub type_line: String,
    pub primary_type: CardType,
    pub rarity: Rarity,
}

pub fn card_rows(results: &[TrialResult<'_>]) -> Vec<CardRow> {
    results
        .iter()
        .flat_map(|r| {
            r.deck.spells.iter().map(move |card| CardRow {
                trial: r.trial,
                archetype: r.archetype.tag().to_string(),
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                mana_value: card.mana_value,
                colors: card.color_identity,
                type_line: card.type_line.clone(),
                primary_type: card.primary_type(),
                rarity: card.rarity,
            })
        })
        .collect()
}

/// Self-contained record of one trial. Written one per line as JSONL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    /// Base seed of the run; together with `trial` it replays the draft
    pub base_seed: u64,
    pub archetype: String,
    pub retried: bool,
    /// Card ids in deck order
    pub spells: Vec<String>,
    pub lands: LandSplit,
    pub creature_count: u32,
    pub average_mana_value: f64,
    /// RFC3339, filled in on write when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl TrialRecord {
    pub fn from_result(base_seed: u64, result: &TrialResult<'_>) -> Self {
        let DeckMetrics {
            creature_count,
            average_mana_value,
            ..
        } = result.metrics;
        Self {
            trial: result.trial,
            base_seed,
            archetype: result.archetype.tag().to_string(),
            retried: result.retried,
            spells: result.deck.spells.iter().map(|c| c.id.clone()).collect(),
            lands: result.deck.lands.clone(),
            creature_count,
            average_mana_value,
            ts: None,
        }
    }
}

pub struct TrialLogger {
    writer: BufWriter<File>,
    written: usize,
}

impl TrialLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
            written: 0,
        })
    }

    pub fn write(&mut self, record: &TrialRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        write_jsonl_line(&mut self.writer, &rec)?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

fn write_jsonl_line<W: Write, T: Serialize>(w: &mut W, value: &T) -> std::io::Result<()> {
    let line = serde_json::to_string(value).map_err(std::io::Error::other)?;
    w.write_all(line.as_bytes())?;
    w.write_all(b"\n")
}

/// Writes each item as one JSON line.
pub fn write_jsonl<W: Write, T: Serialize>(w: &mut W, items: &[T]) -> std::io::Result<()> {
    for item in items {
        write_jsonl_line(w, item)?;
    }
    w.flush()
}
