//! Command handlers for the `draftsim` CLI.
//!
//! Each handler has the shape
//! `handle_COMMAND_command(args, out: &mut dyn Write, ...) -> Result<(), CliError>`,
//! writes its normal output to `out` and leaves error reporting to
//! [`crate::run`]. Handlers that can warn also take `err`.

mod archetypes;
mod build;
mod cfg;
mod simulate;

pub use archetypes::handle_archetypes_command;
pub use build::handle_build_command;
pub use cfg::handle_cfg_command;
pub use simulate::handle_simulate_command;

use draftsim_engine::builder::RankingPolicy;
use draftsim_engine::catalog::CardCatalog;

use crate::catalog_source::JsonCatalogSource;
use crate::cli::{CatalogArgs, PolicyArgs, SamplingArg};
use crate::config::{self, Config, Sampling};
use crate::error::CliError;

/// Resolved configuration with the catalog flags applied on top.
fn resolve_config(source: &CatalogArgs) -> Result<Config, CliError> {
    let mut cfg = config::load_with_sources()?.config;
    if let Some(path) = &source.catalog {
        cfg.catalog = Some(path.clone());
    }
    if let Some(set) = &source.set_code {
        cfg.set_code = Some(set.clone());
    }
    Ok(cfg)
}

fn apply_sampling(cfg: &mut Config, policy: &PolicyArgs) {
    if let Some(sampling) = policy.sampling {
        cfg.sampling = match sampling {
            SamplingArg::Rarity => Sampling::Rarity,
            SamplingArg::Uniform => Sampling::Uniform,
        };
    }
}

fn ranking_policy(policy: &PolicyArgs) -> RankingPolicy {
    let mut ranking = if policy.no_curve {
        RankingPolicy::plain()
    } else {
        RankingPolicy::default()
    };
    ranking.min_creatures = policy.min_creatures;
    ranking
}

fn load_catalog(cfg: &Config) -> Result<CardCatalog, CliError> {
    let path = cfg.catalog.as_deref().ok_or_else(|| {
        CliError::InvalidInput(format!(
            "no card catalog given (use --catalog or {})",
            config::ENV_CATALOG
        ))
    })?;
    let set_code = cfg.set_code.as_deref().ok_or_else(|| {
        CliError::InvalidInput(format!(
            "no set code given (use --set or {})",
            config::ENV_SET
        ))
    })?;
    let catalog = CardCatalog::fetch(&JsonCatalogSource::new(path), set_code)?;
    catalog.ensure_spells()?;
    Ok(catalog)
}
