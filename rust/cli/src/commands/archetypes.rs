use std::io::Write;

use draftsim_engine::archetype::Archetype;

use crate::error::CliError;

pub fn handle_archetypes_command(out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "{:<7} {:<12} colors", "tag", "name")?;
    for archetype in Archetype::all() {
        writeln!(
            out,
            "{:<7} {:<12} {}",
            archetype.tag(),
            archetype.name(),
            archetype.colors().to_string()
        )?;
    }
    Ok(())
}
