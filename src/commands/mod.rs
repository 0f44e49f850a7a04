//! CLI commands
//!
//! Thin wrappers over the library: resolve sources from `strata.toml` and
//! command-line flags, open them as directories, run the build.

pub mod build;
pub mod layers;

use crate::config::{Config, SourceConfig};
use crate::source::{DirFs, Source};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Source selection shared by every command
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to strata.toml
    pub config: PathBuf,
    /// `DIR[:PREFIX]` sources given on the command line
    pub sources: Vec<String>,
}

/// Config plus the directory its source paths are relative to
#[derive(Debug)]
pub struct Resolved {
    pub config: Config,
    pub base: PathBuf,
}

impl Resolved {
    /// Load config and apply command-line sources over it.
    ///
    /// Command-line sources replace configured ones and are relative to the
    /// working directory; configured ones are relative to the config file.
    pub fn load(args: &SourceArgs) -> Result<Self> {
        let mut config = Config::load(&args.config)?;

        let base = if args.sources.is_empty() {
            config_dir(&args.config)
        } else {
            config.sources = args
                .sources
                .iter()
                .map(|spec| SourceConfig::parse(spec))
                .collect::<Result<_>>()?;
            PathBuf::from(".")
        };

        if config.sources.is_empty() {
            anyhow::bail!(
                "No sources configured. Pass --source DIR or add [[sources]] to {}",
                args.config.display()
            );
        }

        Ok(Self { config, base })
    }

    pub fn dir_fs(&self) -> DirFs {
        DirFs::new(&self.base)
    }

    /// Library sources over `fs`, in configured order
    pub fn sources<'a>(&'a self, fs: &'a DirFs) -> Vec<Source<'a>> {
        self.config
            .sources
            .iter()
            .map(|s| Source::new(fs).root(s.dir.as_str()).prefix(s.prefix.as_str()))
            .collect()
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
