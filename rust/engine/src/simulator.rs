//! Orchestrates independent draft trials.
//!
//! Trial `i` draws all of its randomness from ChaCha20 stream `i` keyed by the
//! base seed, so a trial's outcome depends only on `(base_seed, i)` and the
//! configuration. Trials can therefore be replayed one at a time with
//! [`DraftSimulator::run_trial`] or run out of order and merged by index.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::archetype::{Archetype, ArchetypeMode};
use crate::builder::{Deck, DeckBuilder, RankingPolicy};
use crate::catalog::CardCatalog;
use crate::errors::SimulationError;
use crate::metrics::DeckMetrics;
use crate::pool::{
    PoolGenerator, SamplingMode, DEFAULT_BOOSTERS_PER_POOL, DEFAULT_CARDS_PER_BOOSTER,
};

pub const DEFAULT_TRIALS: usize = 100;

/// Everything a run needs besides the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub trials: usize,
    pub boosters_per_pool: usize,
    pub cards_per_booster: usize,
    pub sampling: SamplingMode,
    pub archetype_mode: ArchetypeMode,
    pub policy: RankingPolicy,
    /// `None` draws a fresh base seed; the one used is reported in the outcome.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            boosters_per_pool: DEFAULT_BOOSTERS_PER_POOL,
            cards_per_booster: DEFAULT_CARDS_PER_BOOSTER,
            sampling: SamplingMode::default(),
            archetype_mode: ArchetypeMode::default(),
            policy: RankingPolicy::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn generator(&self) -> PoolGenerator {
        PoolGenerator::new(self.boosters_per_pool, self.cards_per_booster)
            .with_sampling(self.sampling)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::InvalidConfig(
                "trials must be >= 1".into(),
            ));
        }
        self.generator().validate()?;
        Ok(())
    }
}

/// One simulated draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult<'a> {
    pub trial: usize,
    pub archetype: Archetype,
    pub deck: Deck<'a>,
    pub metrics: DeckMetrics,
    /// The first pool could not fill a deck and a second one was drawn.
    pub retried: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome<'a> {
    pub base_seed: u64,
    pub trials: Vec<TrialResult<'a>>,
}

/// The random source for one trial: base seed as key, trial index as stream.
pub fn trial_rng(base_seed: u64, trial: usize) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(base_seed);
    rng.set_stream(trial as u64);
    rng
}

#[derive(Debug, Clone)]
pub struct DraftSimulator {
    config: SimulationConfig,
    generator: PoolGenerator,
    builder: DeckBuilder,
}

impl DraftSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        let generator = config.generator();
        let builder = DeckBuilder::new(config.policy.clone());
        Self {
            config,
            generator,
            builder,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs every trial in order. Any trial that still fails after its retry
    /// aborts the whole run.
    pub fn run<'a>(
        &self,
        catalog: &'a CardCatalog,
    ) -> Result<SimulationOutcome<'a>, SimulationError> {
        self.config.validate()?;
        catalog.ensure_spells()?;

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        info!(
            set = catalog.set_code(),
            trials = self.config.trials,
            base_seed,
            mode = self.config.archetype_mode.label(),
            "starting draft simulation"
        );

        let mut trials = Vec::with_capacity(self.config.trials);
        for i in 0..self.config.trials {
            trials.push(self.run_trial(catalog, base_seed, i)?);
        }

        let retried = trials.iter().filter(|t| t.retried).count();
        info!(trials = trials.len(), retried, "draft simulation finished");
        Ok(SimulationOutcome { base_seed, trials })
    }

    /// generate pool → select archetype → build deck → metrics, with one retry
    /// on a fresh pool if the deck cannot be filled.
    pub fn run_trial<'a>(
        &self,
        catalog: &'a CardCatalog,
        base_seed: u64,
        trial: usize,
    ) -> Result<TrialResult<'a>, SimulationError> {
        let mut rng = trial_rng(base_seed, trial);
        let choice = self.config.archetype_mode.choose(&mut rng);

        let pool = self.generator.generate(catalog, &mut rng)?;
        let archetype = choice.resolve(&pool);
        let (deck, retried) = match self.builder.build(&pool, archetype) {
            Ok(deck) => (deck, false),
            Err(first) => {
                warn!(
                    trial,
                    %archetype,
                    error = %first,
                    "deck build failed, retrying with a fresh pool"
                );
                let pool = self.generator.generate(catalog, &mut rng)?;
                let archetype = choice.resolve(&pool);
                let deck = self.builder.build(&pool, archetype).map_err(|source| {
                    error!(trial, %archetype, error = %source, "deck build failed after retry");
                    SimulationError::Trial {
                        trial,
                        archetype: archetype.tag().to_string(),
                        source,
                    }
                })?;
                (deck, true)
            }
        };

        let metrics = DeckMetrics::from_deck(&deck);
        debug!(
            trial,
            archetype = %deck.archetype,
            creatures = metrics.creature_count,
            retried,
            "trial complete"
        );
        Ok(TrialResult {
            trial,
            archetype: deck.archetype,
            deck,
            metrics,
            retried,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn trial_streams_differ_by_index_and_repeat_by_seed() {
        let a = trial_rng(42, 0).next_u64();
        let b = trial_rng(42, 1).next_u64();
        let again = trial_rng(42, 0).next_u64();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn neighbouring_seeds_do_not_share_streams() {
        // seed+index style derivation would make these identical
        let a = trial_rng(42, 1).next_u64();
        let b = trial_rng(43, 0).next_u64();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_trials_is_invalid() {
        let cfg = SimulationConfig {
            trials: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}
