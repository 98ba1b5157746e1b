//! acfkit CLI
//!
//! Developer tool for building ACF field groups from YAML.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// acfkit - Declarative field groups for Advanced Custom Fields
#[derive(Parser)]
#[command(name = "acfkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "acfkit.yaml", env = "ACFKIT_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new acfkit project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build field groups into ACF local JSON
    Build {
        /// Build a specific group only
        #[arg(short, long)]
        group: Option<String>,

        /// Print JSON to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Validate every group without writing output
    Validate,

    /// Inspect field groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// List all groups
    List,

    /// Print one built group as JSON
    Show {
        /// Group key
        key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref())?;
        }
        Commands::Build { group, stdout } => {
            commands::build::run(&cli.config, group.as_deref(), stdout)?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config)?;
        }
        Commands::Group { command } => match command {
            GroupCommands::List => {
                commands::group::list(&cli.config)?;
            }
            GroupCommands::Show { key } => {
                commands::group::show(&cli.config, &key)?;
            }
        },
    }

    Ok(())
}
