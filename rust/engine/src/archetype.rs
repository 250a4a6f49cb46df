//! Archetypes and how one is chosen for a simulated draft.
//!
//! An [`Archetype`] is a legal color combination (one, two, three or five
//! colors). An [`ArchetypeMode`] decides, per trial, which archetype the deck
//! builder works with:
//!
//! - `Fixed`: always the configured archetype
//! - `Weighted`: cumulative-weight draw from a validated distribution
//! - `Auto`: the two most frequent colors in the pool

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::cards::{Color, ColorSet};
use crate::errors::DistributionError;
use crate::pool::Pool;

/// Weights must sum to one within this tolerance.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

const NAMED: [(&str, &str); 26] = [
    ("WU", "Azorius"),
    ("UB", "Dimir"),
    ("BR", "Rakdos"),
    ("RG", "Gruul"),
    ("GW", "Selesnya"),
    ("WB", "Orzhov"),
    ("UR", "Izzet"),
    ("BG", "Golgari"),
    ("RW", "Boros"),
    ("GU", "Simic"),
    ("WUB", "Esper"),
    ("UBR", "Grixis"),
    ("BRG", "Jund"),
    ("RGW", "Naya"),
    ("GWU", "Bant"),
    ("WBG", "Abzan"),
    ("URW", "Jeskai"),
    ("BGU", "Sultai"),
    ("RWB", "Mardu"),
    ("GUR", "Temur"),
    ("MONO_W", "Mono White"),
    ("MONO_U", "Mono Blue"),
    ("MONO_B", "Mono Black"),
    ("MONO_R", "Mono Red"),
    ("MONO_G", "Mono Green"),
    ("5C", "Five Color"),
];

/// A deck strategy defined by the colors it may play.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Archetype {
    colors: ColorSet,
}

impl Archetype {
    /// Accepts one, two, three or five colors.
    pub fn from_colors(colors: ColorSet) -> Option<Self> {
        match colors.len() {
            1 | 2 | 3 | 5 => Some(Self { colors }),
            _ => None,
        }
    }

    pub fn five_color() -> Self {
        Self {
            colors: ColorSet::all(),
        }
    }

    pub fn colors(&self) -> ColorSet {
        self.colors
    }

    /// Every named archetype in catalogue order: pairs, three-color, mono, five-color.
    pub fn all() -> impl Iterator<Item = Archetype> {
        NAMED.iter().filter_map(|(tag, _)| tag_colors(tag).and_then(Self::from_colors))
    }

    pub fn tag(&self) -> &'static str {
        self.entry().0
    }

    /// Guild, shard or wedge name, e.g. "Azorius".
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// Whether a card with this color identity may be played. Colorless always may.
    pub fn allows(&self, identity: ColorSet) -> bool {
        identity.is_subset(self.colors)
    }

    fn entry(&self) -> (&'static str, &'static str) {
        NAMED
            .iter()
            .find(|(tag, _)| tag_colors(tag) == Some(self.colors))
            .copied()
            .unwrap_or(("?", "Unknown"))
    }
}

fn tag_colors(tag: &str) -> Option<ColorSet> {
    match tag {
        "5C" => Some(ColorSet::all()),
        t if t.starts_with("MONO_") => t[5..].parse().ok(),
        t => t.parse().ok(),
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Archetype {
    type Err = String;

    /// Parses a catalogue tag ("WU", "MONO_W", "5C") or any ordering of color
    /// symbols ("UW"). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let colors = match upper.as_str() {
            "5C" | "WUBRG" => Some(ColorSet::all()),
            t if t.starts_with("MONO_") => t[5..].parse::<ColorSet>().ok().filter(|c| c.len() == 1),
            t => t.parse::<ColorSet>().ok(),
        };
        colors
            .and_then(Self::from_colors)
            .ok_or_else(|| format!("unknown archetype '{}'", s))
    }
}

impl Serialize for Archetype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// What a mode hands out before the pool is known: a concrete archetype or
/// "detect from the pool".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArchetypeChoice {
    Archetype(Archetype),
    Auto,
}

impl ArchetypeChoice {
    pub fn resolve(self, pool: &Pool<'_>) -> Archetype {
        match self {
            ArchetypeChoice::Archetype(a) => a,
            ArchetypeChoice::Auto => detect_from_pool(pool),
        }
    }
}

impl fmt::Display for ArchetypeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchetypeChoice::Archetype(a) => write!(f, "{}", a),
            ArchetypeChoice::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for ArchetypeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(ArchetypeChoice::Auto)
        } else {
            s.parse().map(ArchetypeChoice::Archetype)
        }
    }
}

/// A validated archetype → probability mapping. Entry order is kept and is
/// the order of the cumulative draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedArchetypes {
    entries: Vec<(ArchetypeChoice, f64)>,
}

impl WeightedArchetypes {
    pub fn new(entries: Vec<(ArchetypeChoice, f64)>) -> Result<Self, DistributionError> {
        if entries.is_empty() {
            return Err(DistributionError::Empty);
        }
        for (i, (choice, weight)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(DistributionError::InvalidWeight {
                    tag: choice.to_string(),
                    weight: *weight,
                });
            }
            if entries[..i].iter().any(|(other, _)| other == choice) {
                return Err(DistributionError::Duplicate {
                    tag: choice.to_string(),
                });
            }
        }
        let sum: f64 = entries.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DistributionError::BadSum { sum });
        }
        Ok(Self { entries })
    }

    /// Parses `"WU=0.5,UB=0.5"`.
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut entries = Vec::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (tag, weight) = part
                .split_once('=')
                .ok_or_else(|| format!("expected TAG=WEIGHT, got '{}'", part))?;
            let choice: ArchetypeChoice = tag.parse()?;
            let weight: f64 = weight
                .trim()
                .parse()
                .map_err(|_| format!("invalid weight '{}' for {}", weight.trim(), tag.trim()))?;
            entries.push((choice, weight));
        }
        Self::new(entries).map_err(|e| e.to_string())
    }

    pub fn entries(&self) -> &[(ArchetypeChoice, f64)] {
        &self.entries
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ArchetypeChoice {
        let r: f64 = rng.random();
        let mut cumulative = 0.0;
        for (choice, weight) in &self.entries {
            cumulative += weight;
            if r < cumulative {
                return *choice;
            }
        }
        // Rounding can leave r just above the final cumulative sum.
        self.entries
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(c, _)| *c)
            .unwrap_or(self.entries[self.entries.len() - 1].0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ArchetypeMode {
    Fixed(Archetype),
    Weighted(WeightedArchetypes),
    #[default]
    Auto,
}

impl ArchetypeMode {
    /// The pool-independent half of selection. Only `Weighted` consumes randomness.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> ArchetypeChoice {
        match self {
            ArchetypeMode::Fixed(a) => ArchetypeChoice::Archetype(*a),
            ArchetypeMode::Weighted(dist) => dist.draw(rng),
            ArchetypeMode::Auto => ArchetypeChoice::Auto,
        }
    }

    pub fn select<R: Rng + ?Sized>(&self, pool: &Pool<'_>, rng: &mut R) -> Archetype {
        self.choose(rng).resolve(pool)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArchetypeMode::Fixed(_) => "fixed",
            ArchetypeMode::Weighted(_) => "weighted",
            ArchetypeMode::Auto => "auto",
        }
    }
}

/// The two-color pair covering the pool's two most frequent colors.
/// Ties go to the alphabetically smaller symbol (B < G < R < U < W).
pub fn detect_from_pool(pool: &Pool<'_>) -> Archetype {
    let mut ranked: Vec<(Color, usize)> = pool.color_frequency().into_iter().collect();
    ranked.sort_by_key(|(color, count)| (Reverse(*count), color.symbol()));
    let colors: ColorSet = ranked.iter().take(2).map(|(c, _)| *c).collect();
    Archetype::from_colors(colors).unwrap_or_else(Archetype::five_color)
}
