//! Layered configuration: defaults, then the TOML file named by
//! `DRAFTSIM_CONFIG`, then `DRAFTSIM_*` environment variables. Command-line
//! flags are applied on top by the command handlers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

use draftsim_engine::archetype::{Archetype, ArchetypeChoice, ArchetypeMode, WeightedArchetypes};
use draftsim_engine::pool::{
    RarityWeights, SamplingMode, DEFAULT_BOOSTERS_PER_POOL, DEFAULT_CARDS_PER_BOOSTER,
};
use draftsim_engine::simulator::{SimulationConfig, DEFAULT_TRIALS};

pub const ENV_CONFIG: &str = "DRAFTSIM_CONFIG";
pub const ENV_SEED: &str = "DRAFTSIM_SEED";
pub const ENV_TRIALS: &str = "DRAFTSIM_TRIALS";
pub const ENV_SET: &str = "DRAFTSIM_SET";
pub const ENV_CATALOG: &str = "DRAFTSIM_CATALOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    Rarity,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Fixed,
    Weighted,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSettings {
    pub mode: ModeKind,
    #[serde(default)]
    pub fixed: Option<String>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl Default for ArchetypeSettings {
    fn default() -> Self {
        Self {
            mode: ModeKind::Auto,
            fixed: None,
            weights: BTreeMap::new(),
        }
    }
}

impl ArchetypeSettings {
    pub fn to_mode(&self) -> Result<ArchetypeMode, ConfigError> {
        match self.mode {
            ModeKind::Auto => Ok(ArchetypeMode::Auto),
            ModeKind::Fixed => {
                let tag = self.fixed.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("archetype mode 'fixed' needs an archetype tag".into())
                })?;
                let archetype: Archetype = tag.parse().map_err(ConfigError::Invalid)?;
                Ok(ArchetypeMode::Fixed(archetype))
            }
            ModeKind::Weighted => {
                let mut entries = Vec::with_capacity(self.weights.len());
                for (tag, weight) in &self.weights {
                    let choice: ArchetypeChoice = tag.parse().map_err(ConfigError::Invalid)?;
                    entries.push((choice, *weight));
                }
                let dist = WeightedArchetypes::new(entries)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                Ok(ArchetypeMode::Weighted(dist))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub set_code: Option<String>,
    pub catalog: Option<String>,
    pub trials: usize,
    pub seed: Option<u64>,
    pub boosters_per_pool: usize,
    pub cards_per_booster: usize,
    pub sampling: Sampling,
    pub archetype: ArchetypeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            set_code: None,
            catalog: None,
            trials: DEFAULT_TRIALS,
            seed: None,
            boosters_per_pool: DEFAULT_BOOSTERS_PER_POOL,
            cards_per_booster: DEFAULT_CARDS_PER_BOOSTER,
            sampling: Sampling::Rarity,
            archetype: ArchetypeSettings::default(),
        }
    }
}

impl Config {
    /// Engine configuration for this CLI configuration. The ranking policy is
    /// left at its default.
    pub fn to_simulation(&self) -> Result<SimulationConfig, ConfigError> {
        let sampling = match self.sampling {
            Sampling::Rarity => SamplingMode::RarityWeighted(RarityWeights::default()),
            Sampling::Uniform => SamplingMode::Uniform,
        };
        Ok(SimulationConfig {
            trials: self.trials,
            boosters_per_pool: self.boosters_per_pool,
            cards_per_booster: self.cards_per_booster,
            sampling,
            archetype_mode: self.archetype.to_mode()?,
            seed: self.seed,
            ..SimulationConfig::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub set_code: ValueSource,
    pub catalog: ValueSource,
    pub trials: ValueSource,
    pub seed: ValueSource,
    pub boosters_per_pool: ValueSource,
    pub cards_per_booster: ValueSource,
    pub sampling: ValueSource,
    pub archetype: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            set_code: ValueSource::Default,
            catalog: ValueSource::Default,
            trials: ValueSource::Default,
            seed: ValueSource::Default,
            boosters_per_pool: ValueSource::Default,
            cards_per_booster: ValueSource::Default,
            sampling: ValueSource::Default,
            archetype: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String, std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot read {}: {}", path, e),
            ConfigError::Parse(e) => write!(f, "invalid TOML: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolution against an arbitrary environment lookup.
pub fn resolve<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();
    let var = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(path) = var(ENV_CONFIG) {
        let s = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.set_code {
            cfg.set_code = Some(v);
            sources.set_code = ValueSource::File;
        }
        if let Some(v) = f.catalog {
            cfg.catalog = Some(v);
            sources.catalog = ValueSource::File;
        }
        if let Some(v) = f.trials {
            cfg.trials = v;
            sources.trials = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.boosters_per_pool {
            cfg.boosters_per_pool = v;
            sources.boosters_per_pool = ValueSource::File;
        }
        if let Some(v) = f.cards_per_booster {
            cfg.cards_per_booster = v;
            sources.cards_per_booster = ValueSource::File;
        }
        if let Some(v) = f.sampling {
            cfg.sampling = v;
            sources.sampling = ValueSource::File;
        }
        if let Some(v) = f.archetype {
            cfg.archetype = v;
            sources.archetype = ValueSource::File;
        }
    }

    if let Some(seed) = var(ENV_SEED) {
        cfg.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", ENV_SEED, seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(trials) = var(ENV_TRIALS) {
        cfg.trials = trials
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", ENV_TRIALS, trials)))?;
        sources.trials = ValueSource::Env;
    }
    if let Some(set) = var(ENV_SET) {
        cfg.set_code = Some(set);
        sources.set_code = ValueSource::Env;
    }
    if let Some(catalog) = var(ENV_CATALOG) {
        cfg.catalog = Some(catalog);
        sources.catalog = ValueSource::Env;
    }

    validate_counts(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    set_code: Option<String>,
    #[serde(default)]
    catalog: Option<String>,
    #[serde(default)]
    trials: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    boosters_per_pool: Option<usize>,
    #[serde(default)]
    cards_per_booster: Option<usize>,
    #[serde(default)]
    sampling: Option<Sampling>,
    #[serde(default)]
    archetype: Option<ArchetypeSettings>,
}

/// Full check, including the archetype settings. Run it once command-line
/// flags have been applied, since they may replace the archetype settings.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    validate_counts(cfg)?;
    cfg.archetype.to_mode()?;
    Ok(())
}

fn validate_counts(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.trials == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: trials must be >=1".into(),
        ));
    }
    if cfg.boosters_per_pool == 0 || cfg.cards_per_booster == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: boosters_per_pool and cards_per_booster must be >0".into(),
        ));
    }
    Ok(())
}
