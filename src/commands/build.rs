use crate::commands::{Resolved, SourceArgs};
use crate::hash::build_with_hash;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a build command
#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No stylesheets were found; nothing written
    Empty,
    /// Stylesheet was printed to the writer
    Printed { hash: String },
    /// Stylesheet was written to a hashed file
    Written { path: PathBuf, hash: String },
}

/// Run the build command.
///
/// Without an output directory the stylesheet goes to `out`. With one,
/// it is written to `<out_dir>/<file_stem>.<hash>.css` and the path is
/// reported on `out` instead.
pub fn build_command(
    args: &SourceArgs,
    out_dir: Option<PathBuf>,
    out: &mut dyn Write,
) -> Result<BuildOutcome> {
    let resolved = Resolved::load(args)?;
    let dir = resolved.dir_fs();
    let sources = resolved.sources(&dir);

    let (css, hash) = build_with_hash(&sources).context("Failed to build stylesheet")?;

    if css.is_empty() {
        warn!("No stylesheets found in {} source(s)", sources.len());
        return Ok(BuildOutcome::Empty);
    }

    let out_dir = out_dir.or_else(|| {
        resolved
            .config
            .out_dir
            .as_ref()
            .map(|dir| resolved.base.join(dir))
    });

    let Some(out_dir) = out_dir else {
        out.write_all(css.as_bytes())
            .context("Failed to write stylesheet")?;
        return Ok(BuildOutcome::Printed { hash });
    };

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create directory {}", out_dir.display()))?;

    let path = out_dir.join(resolved.config.output_file_name(&hash));
    fs::write(&path, &css)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {} bytes to {}", css.len(), path.display());
    writeln!(out, "{} {}", "✓ Wrote".green(), path.display())?;

    Ok(BuildOutcome::Written { path, hash })
}
