use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Response model maintenance
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ModelCommands {
    /// Print the performance summary
    Stats,
    /// Re-tune the active model parameters from feedback
    Retrain,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    get_command(cli)?.call()
}

fn get_command(cli: Cli) -> Result<Box<dyn cipherdepth::console::commands::CallableTrait>, String> {
    match cli.command {
        Commands::Model { command } => match command {
            ModelCommands::Stats => Ok(Box::new(
                cipherdepth::console::commands::model::StatsCommand::new(),
            )),
            ModelCommands::Retrain => Ok(Box::new(
                cipherdepth::console::commands::model::RetrainCommand::new(),
            )),
        },
    }
}
