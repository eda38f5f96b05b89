use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "procrastinus-cli", version, about = "ProcrastiNUS CLI")]
struct Cli {
    /// Account the command acts on
    #[arg(long, global = true, env = "PROCRASTINUS_USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Virtual pet
    Pet {
        #[command(subcommand)]
        action: commands::pet::PetAction,
    },
    /// Food shop
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Study statistics and leaderboard
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Class calendar
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let user = cli.user;
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(&user, action),
        Commands::Pet { action } => commands::pet::run(&user, action),
        Commands::Shop { action } => commands::shop::run(&user, action),
        Commands::Stats { action } => commands::stats::run(&user, action),
        Commands::Calendar { action } => commands::calendar::run(&user, action),
        Commands::Task { action } => commands::task::run(&user, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
