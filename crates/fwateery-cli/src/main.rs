//! CLI application for scanning and managing medical invoices.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, delete, edit, list, scan, show, Context};

/// Medical invoice capture - normalize vision model output into a local invoice store
#[derive(Parser)]
#[command(name = "fwateery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Language for placeholders and labels (ar or en)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// User whose invoices are used
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Directory holding the invoice stores
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan invoice images and store the extracted invoices
    Scan(scan::ScanArgs),

    /// List stored invoices
    List(list::ListArgs),

    /// Show one invoice
    Show(show::ShowArgs),

    /// Edit an invoice
    Edit(edit::EditArgs),

    /// Delete an invoice
    Delete(delete::DeleteArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let load_context = || {
        Context::load(
            cli.config.as_deref(),
            cli.lang.as_deref(),
            cli.user.as_deref(),
            cli.data_dir.clone(),
        )
    };

    // Execute command
    match cli.command {
        Commands::Scan(args) => scan::run(args, &load_context()?).await,
        Commands::List(args) => list::run(args, &load_context()?).await,
        Commands::Show(args) => show::run(args, &load_context()?).await,
        Commands::Edit(args) => edit::run(args, &load_context()?).await,
        Commands::Delete(args) => delete::run(args, &load_context()?).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
