//! `draftsim build`: replay a single trial and print its deck.

use std::io::Write;

use draftsim_engine::simulator::DraftSimulator;

use super::{apply_sampling, load_catalog, ranking_policy, resolve_config};
use crate::cli::BuildArgs;
use crate::config::ModeKind;
use crate::error::CliError;
use crate::formatters::format_deck;

/// The deck printed here is the deck trial `--trial` of a `simulate` run
/// with the same seed, archetype and policy flags would build.
pub fn handle_build_command(args: BuildArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let mut cfg = resolve_config(&args.source)?;
    if let Some(tag) = &args.archetype {
        cfg.archetype.mode = ModeKind::Fixed;
        cfg.archetype.fixed = Some(tag.clone());
    }
    apply_sampling(&mut cfg, &args.policy);

    let mut sim_cfg = cfg.to_simulation()?;
    sim_cfg.policy = ranking_policy(&args.policy);
    sim_cfg.validate()?;

    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let catalog = load_catalog(&cfg)?;
    let result = DraftSimulator::new(sim_cfg).run_trial(&catalog, seed, args.trial)?;

    writeln!(
        out,
        "Set {}  seed {}  trial {}",
        catalog.set_code().to_ascii_uppercase(),
        seed,
        args.trial
    )?;
    if result.retried {
        writeln!(out, "(first pool could not fill the deck; built from a second pool)")?;
    }
    write!(out, "{}", format_deck(&result.deck, &result.metrics))?;
    Ok(())
}
