use crate::build::collect_layers;
use crate::commands::{Resolved, SourceArgs};
use anyhow::{Context, Result};
use std::io::Write;

/// Print the resolved layer order without content.
///
/// Plain output lists each layer with its depth followed by the files it
/// concatenates; `json` emits the same data as a JSON array.
pub fn layers_command(args: &SourceArgs, json: bool, out: &mut dyn Write) -> Result<()> {
    let resolved = Resolved::load(args)?;
    let dir = resolved.dir_fs();
    let sources = resolved.sources(&dir);

    let layers = collect_layers(&sources).context("Failed to collect layers")?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&layers)?)?;
        return Ok(());
    }

    if layers.is_empty() {
        writeln!(out, "No layers")?;
        return Ok(());
    }

    writeln!(out, "Layers ({})", layers.len())?;
    for layer in &layers {
        writeln!(out)?;
        writeln!(out, "@layer {} (depth {})", layer.name, layer.depth)?;
        for file in &layer.files {
            writeln!(out, "    {}", file)?;
        }
    }

    Ok(())
}
