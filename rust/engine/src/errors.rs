use thiserror::Error;

/// Failures obtaining or using a card catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Failed to fetch catalog for set {set_code}: {reason}")]
    Fetch { set_code: String, reason: String },
    #[error("Catalog for set {set_code} has no eligible non-land cards")]
    Empty { set_code: String },
}

/// A weighted archetype distribution that cannot be sampled from.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    #[error("Archetype distribution is empty")]
    Empty,
    #[error("Invalid weight {weight} for archetype {tag}")]
    InvalidWeight { tag: String, weight: f64 },
    #[error("Archetype {tag} appears more than once")]
    Duplicate { tag: String },
    #[error("Archetype weights sum to {sum}, expected 1.0")]
    BadSum { sum: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Invalid booster shape: {boosters} boosters of {cards_per_booster} cards")]
    InvalidBooster {
        boosters: usize,
        cards_per_booster: usize,
    },
    #[error("Invalid rarity share {share} for {rarity}")]
    InvalidRarityWeights { rarity: String, share: f64 },
    #[error("Weighted sampling failed: {0}")]
    Sampling(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckBuildError {
    #[error("Only {available} eligible cards for {archetype}, need {required}")]
    InsufficientCards {
        archetype: String,
        available: usize,
        required: usize,
    },
}

/// Fatal errors that abort a whole simulation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
    #[error("Trial {trial} ({archetype}) failed after retry: {source}")]
    Trial {
        trial: usize,
        archetype: String,
        #[source]
        source: DeckBuildError,
    },
}
