//! Operator tool working directly on the noticeboard database file.
//!
//! Usage:
//!   noticeboard-admin token                          : bootstrap and print the admin token
//!   noticeboard-admin tokens                         : list registered admin tokens (masked)
//!   noticeboard-admin post --title T --content C     : publish an announcement
//!   noticeboard-admin list [--limit N]               : print announcements as JSON
//!
//! Paths come from DATABASE_PATH / ADMIN_TOKEN_PATH like the server, or from the flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use noticeboard_api::{
    config::Config,
    db,
    models::announcement::ListQuery,
    services::{admin_token::AdminTokenService, announcements::AnnouncementService},
};

#[derive(Parser)]
#[command(name = "noticeboard-admin", about = "Manage the noticeboard database")]
struct Args {
    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Admin token sidecar file (overrides ADMIN_TOKEN_PATH)
    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bootstrap the admin token (same as server startup) and print it
    Token,
    /// List registered admin tokens
    Tokens,
    /// Publish an announcement
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Print the most recent announcements
    List {
        #[arg(long)]
        limit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(token_file) = args.token_file {
        config.admin_token_path = token_file;
    }

    let pool = db::create_pool(
        &config.database_path,
        config.db_max_connections,
        config.db_busy_timeout,
    )
    .await?;
    db::run_migrations(&pool).await?;

    match args.command {
        Command::Token => {
            let token = AdminTokenService::ensure(&pool, &config.admin_token_path).await?;
            println!("{token}");
        }
        Command::Tokens => {
            for t in AdminTokenService::list(&pool).await? {
                println!("{}\t{}\t{}", t.id, t.created_at.to_rfc3339(), mask(&t.token));
            }
        }
        Command::Post { title, content } => {
            let announcement = AnnouncementService::create(&pool, &title, &content).await?;
            println!("{}", serde_json::to_string_pretty(&announcement)?);
        }
        Command::List { limit } => {
            let limit = ListQuery { limit }.limit();
            let announcements = AnnouncementService::list(&pool, limit).await?;
            println!("{}", serde_json::to_string_pretty(&announcements)?);
        }
    }

    pool.close().await;
    Ok(())
}

/// Show only the first few characters of a secret.
fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}
