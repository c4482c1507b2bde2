use anyhow::Result;
use clap::{Parser, Subcommand};

/// NikJin, a small task and project tracker
#[derive(Parser)]
#[command(name = "nikjin")]
#[command(about = "Track tasks and projects with your team", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Create sample users, projects and tasks
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = nikjin::Config::load(cli.config)?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    nikjin::observability::init_tracing(&config.log)?;

    let result = match cli.command {
        Commands::Serve { host, port } => nikjin::cli::serve(config, host, port).await,
        Commands::Migrate => nikjin::cli::migrate(&config).await,
        Commands::Reset => nikjin::cli::reset(&config).await,
        Commands::Seed => nikjin::cli::seed_command(&config).await,
    };

    if let Err(ref e) = result {
        tracing::error!("Command failed: {e:#}");
    }

    result
}
