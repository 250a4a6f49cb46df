//! `draftsim simulate`: run many drafts, print a summary, optionally export.
//!
//! Flags override the resolved configuration. `--archetype` alone implies
//! fixed mode and `--weights` alone implies weighted mode.

use std::io::Write;

use draftsim_engine::archetype::{ArchetypeMode, WeightedArchetypes};
use draftsim_engine::records::{card_rows, TrialLogger, TrialRecord};
use draftsim_engine::simulator::DraftSimulator;
use draftsim_engine::stats::aggregate;

use super::{apply_sampling, load_catalog, ranking_policy, resolve_config};
use crate::cli::{ModeArg, SimulateArgs};
use crate::config::{self, ArchetypeSettings, ModeKind};
use crate::error::CliError;
use crate::export::{export_report, export_rows};
use crate::formatters::{format_summary, SummaryHeader};
use crate::ui;

pub fn handle_simulate_command(
    args: SimulateArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut cfg = resolve_config(&args.source)?;
    if let Some(trials) = args.trials {
        cfg.trials = trials;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    apply_sampling(&mut cfg, &args.policy);
    let weights = apply_archetype_flags(&mut cfg.archetype, &args, err)?;
    config::validate(&cfg)?;

    let mut sim_cfg = cfg.to_simulation()?;
    if let Some(dist) = weights {
        // keep the command-line order for the cumulative draw
        sim_cfg.archetype_mode = ArchetypeMode::Weighted(dist);
    }
    sim_cfg.policy = ranking_policy(&args.policy);

    let catalog = load_catalog(&cfg)?;
    let simulator = DraftSimulator::new(sim_cfg);
    let outcome = simulator.run(&catalog)?;
    let report = aggregate(&outcome.trials);

    let header = SummaryHeader {
        set_code: catalog.set_code(),
        base_seed: outcome.base_seed,
        mode: simulator.config().archetype_mode.label(),
        retried: outcome.trials.iter().filter(|t| t.retried).count(),
    };
    write!(out, "{}", format_summary(&header, &report))?;

    if let Some(path) = &args.rows {
        let rows = card_rows(&outcome.trials);
        export_rows(&rows, path, args.rows_format)?;
        writeln!(out, "Wrote {} card rows to {}", rows.len(), path)?;
    }
    if let Some(path) = &args.report {
        export_report(&report, catalog.set_code(), outcome.base_seed, path)?;
        writeln!(out, "Wrote report to {}", path)?;
    }
    if let Some(path) = &args.trial_log {
        let mut logger = TrialLogger::create(path)?;
        for trial in &outcome.trials {
            logger.write(&TrialRecord::from_result(outcome.base_seed, trial))?;
        }
        let written = logger.finish()?;
        writeln!(out, "Wrote {} trial records to {}", written, path)?;
    }
    Ok(())
}

/// Applies `--mode`, `--archetype` and `--weights` to the settings. Returns the
/// parsed `--weights` distribution when weighted mode will use it.
fn apply_archetype_flags(
    settings: &mut ArchetypeSettings,
    args: &SimulateArgs,
    err: &mut dyn Write,
) -> Result<Option<WeightedArchetypes>, CliError> {
    let mode = match (args.mode, &args.archetype, &args.weights) {
        (Some(ModeArg::Fixed), _, _) => Some(ModeKind::Fixed),
        (Some(ModeArg::Weighted), _, _) => Some(ModeKind::Weighted),
        (Some(ModeArg::Auto), _, _) => Some(ModeKind::Auto),
        (None, Some(_), None) => Some(ModeKind::Fixed),
        (None, None, Some(_)) => Some(ModeKind::Weighted),
        (None, Some(_), Some(_)) => {
            return Err(CliError::InvalidInput(
                "--archetype and --weights conflict; pass --mode to pick one".into(),
            ));
        }
        (None, None, None) => None,
    };
    if let Some(mode) = mode {
        settings.mode = mode;
    }

    if let Some(tag) = &args.archetype {
        if settings.mode == ModeKind::Fixed {
            settings.fixed = Some(tag.clone());
        } else {
            ui::warn_flag_ignored(err, "archetype", "only used in fixed mode")?;
        }
    }
    let mut weights = None;
    if let Some(spec) = &args.weights {
        if settings.mode == ModeKind::Weighted {
            let dist = WeightedArchetypes::parse(spec).map_err(CliError::InvalidInput)?;
            settings.weights = dist
                .entries()
                .iter()
                .map(|(choice, w)| (choice.to_string(), *w))
                .collect();
            weights = Some(dist);
        } else {
            ui::warn_flag_ignored(err, "weights", "only used in weighted mode")?;
        }
    }
    Ok(weights)
}
