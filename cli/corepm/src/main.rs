//! corepm: search and download hardware platforms and the tools they need.

mod commands;
mod config;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use config::Config;
use output::Format;

#[derive(Parser)]
#[command(name = "corepm", version, about = "Toolchain platform package manager")]
struct Cli {
    /// Configuration file (default: ./corepm.toml, then ~/.corepm/corepm.toml)
    #[arg(long, global = true, env = "COREPM_CONFIG")]
    config: Option<PathBuf>,
    /// Directory holding package_index.json
    #[arg(long, global = true, env = "COREPM_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a core in the package index
    #[command(after_help = "Example:\n  corepm search MKRZero -v")]
    Search {
        /// Words matched against platform, architecture and board names, or a
        /// USB id such as 2341:804f
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Download one or more cores and corresponding tool dependencies
    #[command(after_help = "Examples:\n  \
        corepm download arduino:samd        # latest version of the arduino SAMD core\n  \
        corepm download arduino:samd=1.6.9  # a specific version")]
    Download {
        /// PACKAGER:ARCH[=VERSION]
        #[arg(required = true, value_name = "PACKAGER:ARCH[=VERSION]")]
        references: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(exit::code_for(&e).code());
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();

    let config = Config::load(cli.config.as_deref(), &cwd, home.as_deref())?;
    let settings = config.settings(cli.data_dir.as_deref(), home.as_deref())?;

    match cli.command {
        Commands::Search { keywords } => commands::search::run(&settings, cli.format, &keywords),
        Commands::Download { references } => {
            commands::download::run(&settings, cli.format, &references)
        }
    }
}
