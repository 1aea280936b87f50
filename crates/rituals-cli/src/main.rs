use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod telemetry;

#[derive(Parser)]
#[command(name = "rituals-cli", version, about = "Rituals CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ritual templates
    Ritual {
        #[command(subcommand)]
        action: commands::ritual::RitualAction,
    },
    /// Run rituals interactively on the terminal
    Run(commands::run::RunArgs),
    /// Launched ritual history
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    telemetry::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Ritual { action } => commands::ritual::run(action),
        Commands::Run(args) => commands::run::run(args),
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rituals-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
