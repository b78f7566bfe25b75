use biolearn_core::{
    AnswerLetter,
    llm_client::{DEFAULT_CHAT_MODEL, GROQ_API_BASE, LlmSettings},
};
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, time::Duration};

/// Explore biology topics, quiz yourself, and look up words from the terminal.
#[derive(Parser, Debug)]
#[command(name = "biolearn", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings for the chat-completion backend.
#[derive(Args, Debug)]
pub struct LlmArgs {
    /// API key; without one the deterministic demo content is served
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "LLM_API_BASE", default_value = GROQ_API_BASE, global = true)]
    pub api_base: String,

    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL, global = true)]
    pub model: String,

    /// Upper bound for one upstream request, in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_secs: u64,

    /// Directory of `<name>.md` prompt overrides
    #[arg(long, env = "PROMPTS_PATH", global = true)]
    pub prompts: Option<PathBuf>,
}

impl LlmArgs {
    pub fn settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate learning content for one or more topics, in order
    Learn {
        #[arg(required = true, num_args = 1..)]
        topics: Vec<String>,

        /// Answer every question with this letter instead of skipping it
        #[arg(short, long)]
        answer: Option<AnswerLetter>,

        /// Print the whole journey as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Explain a single word
    Explain {
        word: String,

        #[arg(short, long, default_value = "biology")]
        context: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Extract sections from saved model output (stdin when FILE is omitted)
    Parse {
        file: Option<PathBuf>,

        /// Input is the retrieval script's full stdout
        #[arg(long, default_value_t = false)]
        script: bool,
    },
}
