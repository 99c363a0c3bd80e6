use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;

use booth_assistant::{run_ask_mode, run_history_command, run_repl_mode, setup_from_cli, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    booth_logging::init_logger(cli.verbose);

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "booth-assistant", &mut io::stdout());
        return Ok(());
    }

    let mut app = setup_from_cli(&cli)?;

    match cli.command.clone() {
        Some(Commands::Ask { question, speak }) => {
            run_ask_mode(&mut app, &Commands::question_text(&question), speak).await
        }
        Some(Commands::History { command }) => run_history_command(&mut app, command).await,
        Some(Commands::Repl) | None => run_repl_mode(&mut app).await,
        Some(Commands::Completions { .. }) => Ok(()),
    }
}
