use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zing", version, about = "Inbox Zing reading rewards CLI")]
struct Cli {
    /// Log engine transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Reward formulas and remote totals
    Rewards {
        #[command(subcommand)]
        action: commands::rewards::RewardsAction,
    },
    /// Read an article and earn points for qualifying dwell
    Read(commands::read::ReadArgs),
    /// Confirmations waiting to be retried
    Pending {
        #[command(subcommand)]
        action: commands::pending::PendingAction,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Rewards { action } => commands::rewards::run(action),
        Commands::Read(args) => commands::read::run(args),
        Commands::Pending { action } => commands::pending::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
