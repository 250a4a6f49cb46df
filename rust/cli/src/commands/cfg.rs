//! `draftsim cfg`: resolved configuration with the source of every value.
//!
//! ```json
//! {
//!   "trials": { "value": 100, "source": "default" },
//!   "seed": { "value": 42, "source": "env" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    config::validate(&config)?;
    let display = serde_json::json!({
        "set_code": { "value": config.set_code, "source": sources.set_code },
        "catalog": { "value": config.catalog, "source": sources.catalog },
        "trials": { "value": config.trials, "source": sources.trials },
        "seed": { "value": config.seed, "source": sources.seed },
        "boosters_per_pool": {
            "value": config.boosters_per_pool,
            "source": sources.boosters_per_pool,
        },
        "cards_per_booster": {
            "value": config.cards_per_booster,
            "source": sources.cards_per_booster,
        },
        "sampling": { "value": config.sampling, "source": sources.sampling },
        "archetype": { "value": config.archetype, "source": sources.archetype },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
