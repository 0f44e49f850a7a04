use clap::{Args, Parser, Subcommand};
use strata::commands::build::build_command;
use strata::commands::layers::layers_command;
use strata::commands::SourceArgs;
use strata::config::CONFIG_FILE;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Build cascade-layered CSS from directory structure", long_about = None)]
struct Cli {
    /// Log every source walked and file read
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceOpts {
    /// Config file listing sources
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Source directory, optionally with a layer prefix (DIR[:PREFIX]); repeatable
    #[arg(long = "source", short = 's', value_name = "DIR[:PREFIX]")]
    sources: Vec<String>,
}

impl From<SourceOpts> for SourceArgs {
    fn from(opts: SourceOpts) -> Self {
        SourceArgs {
            config: opts.config,
            sources: opts.sources,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stylesheet and print it, or write it to a hashed file
    Build {
        #[command(flatten)]
        sources: SourceOpts,

        /// Write styles.<hash>.css into this directory instead of stdout
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Show the resolved layer order and the files in each layer
    Layers {
        #[command(flatten)]
        sources: SourceOpts,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("strata=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Build { sources, out_dir } => {
            build_command(&sources.into(), out_dir, &mut stdout)?;
            Ok(())
        }
        Commands::Layers { sources, json } => layers_command(&sources.into(), json, &mut stdout),
    }
}
