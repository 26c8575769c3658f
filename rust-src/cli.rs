//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aggregation::Granularity;
use crate::commands;
use crate::config::{get_db_path, require_secret, ServerConfig, DEFAULT_PORT, DEFAULT_TOKEN_TTL_SECS};


/// trafficd - traffic analytics API and tooling
#[derive(Parser)]
#[command(name = "trafficd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "TRAFFIC_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Database file (default: user data dir)
        #[arg(long, env = "TRAFFIC_DB")]
        db: Option<PathBuf>,

        /// HMAC secret used to verify bearer tokens
        #[arg(long, env = "TRAFFIC_TOKEN_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Load the sample traffic series and default editors
    Seed {
        /// Database file (default: user data dir)
        #[arg(long, env = "TRAFFIC_DB")]
        db: Option<PathBuf>,
    },

    /// Manage the editor allow-list
    Editors {
        /// Database file (default: user data dir)
        #[arg(long, env = "TRAFFIC_DB", global = true)]
        db: Option<PathBuf>,

        #[command(subcommand)]
        command: EditorCommands,
    },

    /// Mint a signed bearer token
    Token {
        /// User id to embed
        #[arg(long)]
        uid: String,

        /// Email to embed (decides the editor role)
        #[arg(long)]
        email: Option<String>,

        /// Lifetime in seconds
        #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_SECS)]
        ttl_secs: i64,

        /// HMAC secret shared with the server
        #[arg(long, env = "TRAFFIC_TOKEN_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Print visits rolled up by day, ISO week or month
    Rollup {
        /// Bucket size
        #[arg(short, long, value_enum, default_value_t = Granularity::Weekly)]
        granularity: Granularity,

        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Database file (default: user data dir)
        #[arg(long, env = "TRAFFIC_DB")]
        db: Option<PathBuf>,
    },
}


#[derive(Subcommand)]
enum EditorCommands {
    /// Grant the editor role to an email
    Add {
        email: String,
    },

    /// Revoke the editor role from an email
    Remove {
        email: String,
    },

    /// List editors
    List,
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, db, secret }) => {
            let config = ServerConfig::new(port, db, secret)?;
            commands::serve::run(config)?;
        }
        Some(Commands::Seed { db }) => {
            commands::seed::run(&db.unwrap_or_else(get_db_path))?;
        }
        Some(Commands::Editors { db, command }) => {
            let db_path = db.unwrap_or_else(get_db_path);
            match command {
                EditorCommands::Add { email } => commands::editors::add(&db_path, &email)?,
                EditorCommands::Remove { email } => commands::editors::remove(&db_path, &email)?,
                EditorCommands::List => commands::editors::list(&db_path)?,
            }
        }
        Some(Commands::Token { uid, email, ttl_secs, secret }) => {
            let secret = require_secret(secret)?;
            commands::token::run(&secret, &uid, email.as_deref(), ttl_secs)?;
        }
        Some(Commands::Rollup { granularity, from, to, db }) => {
            commands::rollup::run(
                &db.unwrap_or_else(get_db_path),
                granularity,
                from.as_deref(),
                to.as_deref(),
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
