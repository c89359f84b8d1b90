use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "storelens")]
#[command(about = "Investigate a business's web presence and produce a scored diagnosis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Full investigation: website, map reputation and social profiles
    Investigate {
        /// Business website URL
        url: String,
        /// City or region used to narrow the map search
        #[arg(long)]
        location: Option<String>,
        /// Skip the map reputation lookup
        #[arg(long)]
        no_reputation: bool,
        /// Skip the social profile analysis
        #[arg(long)]
        no_social: bool,
    },
    /// Website-only analysis
    Quick {
        /// Business website URL
        url: String,
    },
    /// Print the detected e-commerce platform and the fetch tier used
    Detect {
        /// Business website URL
        url: String,
    },
    /// Investigate every business listed in the targets file
    Batch {
        /// Targets YAML file (defaults to `STORELENS_TARGETS_PATH`)
        #[arg(long)]
        targets: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storelens_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Investigate {
            url,
            location,
            no_reputation,
            no_social,
        } => {
            let options = storelens_pipeline::InvestigationOptions {
                location,
                business_name: None,
                include_reputation: !no_reputation,
                include_social: !no_social,
            };
            commands::run_investigate(&config, &url, options).await?;
        }
        Commands::Quick { url } => commands::run_quick(&config, &url).await?,
        Commands::Detect { url } => commands::run_detect(&config, &url).await?,
        Commands::Batch { targets } => {
            let path = targets.unwrap_or_else(|| config.targets_path.clone());
            commands::run_batch(&config, &path).await?;
        }
    }

    Ok(())
}
