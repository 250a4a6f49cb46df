//! # draftsim-engine: Sealed Draft Simulation Core
//!
//! Simulates many independent sealed-deck drafts from a card set: open a pool
//! of boosters, pick an archetype, build a 40-card deck and aggregate what the
//! decks look like across trials. Every trial is reproducible from the run's
//! base seed and its index.
//!
//! ## Core Modules
//!
//! - [`cards`] - Colors, rarities, primary card types and the card record
//! - [`catalog`] - Card catalog sources and the filtered per-set catalog
//! - [`pool`] - Booster sampling into a sealed pool
//! - [`archetype`] - Color-identity archetypes and the selection modes
//! - [`builder`] - Spell ranking and basic land allocation
//! - [`metrics`] - Per-deck curve, color and type counts
//! - [`simulator`] - Trial orchestration, seeding and retry
//! - [`stats`] - Cross-trial aggregation
//! - [`records`] - Flattened rows and JSONL trial records
//! - [`errors`] - Error types for every stage
//!
//! ## Quick Start
//!
//! ```rust
//! use draftsim_engine::archetype::{Archetype, ArchetypeMode};
//! use draftsim_engine::cards::{CardRecord, Rarity};
//! use draftsim_engine::catalog::CardCatalog;
//! use draftsim_engine::simulator::{DraftSimulator, SimulationConfig};
//! use draftsim_engine::stats::aggregate;
//!
//! let mut cards = Vec::new();
//! for (i, colors) in ["W", "U", "WU", ""].iter().cycle().take(120).enumerate() {
//!     let colors = colors.parse().unwrap();
//!     cards.push(CardRecord::new(
//!         format!("c{i}"),
//!         format!("Card {i}"),
//!         (i % 6) as u32 + 1,
//!         colors,
//!         "Creature — Soldier",
//!         Rarity::Common,
//!     ));
//! }
//! let catalog = CardCatalog::new("tst", cards);
//!
//! let config = SimulationConfig {
//!     trials: 5,
//!     seed: Some(42),
//!     archetype_mode: ArchetypeMode::Fixed("WU".parse::<Archetype>().unwrap()),
//!     ..SimulationConfig::default()
//! };
//! let outcome = DraftSimulator::new(config).run(&catalog).unwrap();
//! let report = aggregate(&outcome.trials);
//! assert_eq!(report.trials, 5);
//! ```
//!
//! ## Deterministic Runs
//!
//! The same base seed and configuration produce identical decks:
//!
//! ```rust
//! use draftsim_engine::simulator::trial_rng;
//! use rand::RngCore;
//!
//! assert_eq!(trial_rng(7, 3).next_u64(), trial_rng(7, 3).next_u64());
//! ```

pub mod archetype;
pub mod builder;
pub mod cards;
pub mod catalog;
pub mod errors;
pub mod metrics;
pub mod pool;
pub mod records;
pub mod simulator;
pub mod stats;
