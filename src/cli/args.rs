use crate::cli::commands::{self, CommandExecutor};
use crate::common::Profile;
use crate::resolver::Resolver;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shop-env")]
#[command(about = "Inspect and scaffold client environment profiles", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved environment
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve and validate an environment
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write an empty environment file to fill in
    Init {
        /// Profile the file is for
        #[arg(long)]
        profile: Profile,

        /// Output path (default: environment.<profile>.toml)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Profile to resolve (default: SHOP_ENV_PROFILE or the build profile)
    #[arg(long)]
    pub profile: Option<Profile>,

    /// Use this file instead of searching
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl SourceArgs {
    pub fn resolver(&self) -> Result<Resolver> {
        self.resolver_from_lookup(|key| std::env::var(key).ok())
    }

    fn resolver_from_lookup<F>(&self, lookup: F) -> Result<Resolver>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolver = Resolver::from_lookup_with_profile(lookup, self.profile)?;
        if let Some(file) = &self.file {
            resolver = resolver.with_file(file);
        }
        Ok(resolver)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
    Json,
}

pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show { source, format } => {
            let executor = CommandExecutor::new(source.resolver()?);
            executor.show(format)?;
        }

        Commands::Check { source } => {
            let executor = CommandExecutor::new(source.resolver()?);
            executor.check()?;
        }

        Commands::Init {
            profile,
            output,
            force,
        } => {
            commands::init(profile, output, force)?;
        }
    }

    Ok(())
}
