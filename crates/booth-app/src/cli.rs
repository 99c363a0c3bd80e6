use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use booth_llm_api::OPENAI_API_URL;
use booth_types::{DEFAULT_MCP_SERVER_LABEL, DEFAULT_MCP_SERVER_URL, DEFAULT_MODEL, DEFAULT_SPEECH_LANGUAGE};

/// CLI arguments for booth-assistant
#[derive(Parser, Debug)]
#[command(name = "booth-assistant")]
#[command(about = "Ask the booth assistant questions, hear the answers, revisit past exchanges")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API key for the assistant service
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model answering the questions
    #[arg(long, value_name = "MODEL", env = "BOOTH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Assistant endpoint (bare hosts get /v1/responses appended)
    #[arg(long, value_name = "URL", env = "BOOTH_API_URL", default_value = OPENAI_API_URL)]
    pub api_url: String,

    /// Label of the MCP server the assistant may consult
    #[arg(long, value_name = "LABEL", env = "BOOTH_MCP_SERVER_LABEL", default_value = DEFAULT_MCP_SERVER_LABEL)]
    pub mcp_server_label: String,

    /// URL of the MCP server the assistant may consult
    #[arg(long, value_name = "URL", env = "BOOTH_MCP_SERVER_URL", default_value = DEFAULT_MCP_SERVER_URL)]
    pub mcp_server_url: String,

    /// Send questions without any tool configuration
    #[arg(long)]
    pub no_tools: bool,

    /// Directory holding history and logs (default: ~/.booth-assistant)
    #[arg(long, value_name = "DIR", env = "BOOTH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Text-to-speech program (default: `say` on macOS, `espeak` elsewhere)
    #[arg(long, value_name = "PROGRAM", env = "BOOTH_SPEECH_COMMAND")]
    pub speech_command: Option<String>,

    /// Voice or language hint for narration
    #[arg(long, value_name = "VOICE", env = "BOOTH_SPEECH_VOICE", default_value = DEFAULT_SPEECH_LANGUAGE)]
    pub voice: String,

    /// Attempts per question when the service is unreachable
    #[arg(long, value_name = "N", env = "BOOTH_MAX_ATTEMPTS", default_value_t = 1)]
    pub max_attempts: usize,

    /// Delay before the first retry, doubled for each further one
    #[arg(long, value_name = "MS", env = "BOOTH_RETRY_DELAY_MS", default_value_t = 500)]
    pub retry_delay_ms: u64,

    /// Enable verbose debug output (shows HTTP requests and responses, writes request logs)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ask one question and print the answer
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Read the answer aloud
        #[arg(long)]
        speak: bool,
    },
    /// Inspect or edit past questions
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
    /// Interactive mode (default)
    Repl,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommands {
    /// List past questions, newest first
    List,
    /// Show a past exchange
    Show {
        id: String,
        /// Read the answer aloud
        #[arg(long)]
        speak: bool,
    },
    /// Delete one past exchange
    Delete { id: String },
    /// Delete every past exchange
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

impl Commands {
    /// Words of an `ask` command joined back into one question
    pub fn question_text(words: &[String]) -> String {
        words.join(" ")
    }
}
