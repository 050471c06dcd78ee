use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use newsdesk_core::i18n::Language;
use std::path::PathBuf;

mod app;
mod commands;
mod logging;

use app::AppContext;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(version, about = "Newsdesk - compose and send the newsletter", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Directory holding config.toml and the stored credential
    #[arg(long, global = true, env = "NEWSDESK_HOME")]
    pub home: Option<PathBuf>,

    /// Base URL of the Newsdesk API (overrides config and NEWSDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Interface language: pt or es (overrides config and NEWSDESK_LANG)
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session credential
    Login {
        /// Account name (prompted for when omitted)
        username: Option<String>,
        /// Password (falls back to NEWSDESK_PASSWORD, then a prompt)
        #[arg(long, env = "NEWSDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored credential
    Logout,
    /// Show the current session
    Status,
    /// Render a draft file to HTML
    Preview {
        /// Draft file (TOML)
        draft: PathBuf,
        /// Write the HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Send a draft file
    Send {
        /// Draft file (TOML)
        draft: PathBuf,
        /// Send only to the test audience
        #[arg(long)]
        test: bool,
        /// Skip the confirmation prompt for a full send
        #[arg(short, long)]
        yes: bool,
        /// Explicit recipient (repeatable); defaults to every subscribed contact
        #[arg(long = "to", value_name = "EMAIL")]
        recipients: Vec<String>,
    },
    /// Edit and send a newsletter interactively
    Compose {
        /// Start from this draft file
        #[arg(long)]
        draft: Option<PathBuf>,
    },
    /// Inspect or change the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a stored configuration key
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let ctx = AppContext::bootstrap(&cli.global)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&ctx, username, password).await?
        }
        Commands::Logout => commands::session::logout(&ctx)?,
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::Preview { draft, output } => {
            commands::newsletter::preview(&ctx, &draft, output.as_deref()).await?
        }
        Commands::Send {
            draft,
            test,
            yes,
            recipients,
        } => commands::newsletter::send(&ctx, &draft, test, yes, recipients).await?,
        Commands::Compose { draft } => commands::compose::run(&ctx, draft.as_deref()).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Set { key, value } => commands::config::set(&ctx, &key, &value)?,
        },
    }

    Ok(())
}
