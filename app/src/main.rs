#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, InfoStrategy, InitStrategy, KeywordInput, KeywordStrategy, TauntInput,
    TauntStrategy, VersionStrategy,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "doodle")]
#[command(about = "Drawing-game companion: keyword tasks and a taunting rival", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show the effective configuration
    Info,
    /// Show version
    Version,
    /// Play one keyword drawing task
    Keyword {
        /// Description of the finished drawing (read from stdin if omitted)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Play a scripted game against the taunting rival
    Taunt {
        /// Comma-separated player names
        #[arg(short, long, value_delimiter = ',', required = true)]
        players: Vec<String>,

        /// Number of rounds
        #[arg(short, long, default_value_t = 3)]
        rounds: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Keyword { description } => {
            KeywordStrategy
                .execute(KeywordInput { description })
                .await
        }
        Commands::Taunt { players, rounds } => {
            TauntStrategy
                .execute(TauntInput { players, rounds })
                .await
        }
    }
}
