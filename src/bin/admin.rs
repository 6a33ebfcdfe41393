//! CLI administration tool for tinee.
//!
//! Shortens and resolves links straight against the database, bypassing
//! the HTTP API and the cache.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL, optionally with a custom alias
//! cargo run --bin admin -- shorten https://example.com/page --alias mylink
//!
//! # Look up an alias
//! cargo run --bin admin -- resolve mylink
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` (required): PostgreSQL connection
//! - `SERVICE_DOMAIN` (optional): domain used in printed short URLs

use tinee::application::services::LinkService;
use tinee::config::{Config, mask_connection_string};
use tinee::infrastructure::cache::NullCache;
use tinee::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

type AdminService = LinkService<PgLinkRepository, NullCache>;

/// CLI tool for managing tinee.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten (http or https)
        url: String,

        /// Custom alias to register for the URL
        #[arg(short, long, default_value = "")]
        alias: String,
    },

    /// Show the link behind an alias
    Resolve {
        /// Alias to look up
        alias: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL or DB_HOST must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&database_url)))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let service = LinkService::new(
        config.service.clone(),
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        Arc::new(NullCache::new()),
    );

    match cli.command {
        Commands::Shorten { url, alias } => handle_shorten(&service, &url, &alias).await?,
        Commands::Resolve { alias } => handle_resolve(&service, &alias).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_shorten(service: &AdminService, url: &str, alias: &str) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let short_url = service
        .shorten(url, alias)
        .await
        .with_context(|| format!("Failed to shorten {}", url))?;

    println!("  URL:       {}", url.cyan());
    println!("  Short URL: {}", short_url.bright_yellow().bold());
    println!();
    println!("{}", "✅ Done".green().bold());
    println!();

    Ok(())
}

/// Prints the link owning an alias, generated alias first.
async fn handle_resolve(service: &AdminService, alias: &str) -> Result<()> {
    println!("{}", "🔗 Resolve Alias".bright_blue().bold());
    println!();

    let link = service
        .link_by_alias(alias)
        .await
        .with_context(|| format!("Failed to resolve {}", alias))?;

    println!("  ID:      {}", link.id.bright_black());
    println!("  URL:     {}", link.url.cyan());
    println!("  Aliases:");
    for (i, a) in link.aliases.iter().enumerate() {
        let label = if i == 0 { " (generated)" } else { "" };
        println!("    - {}{}", a.bright_white(), label.bright_black());
    }
    println!();

    Ok(())
}

/// Displays link and alias counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let aliases_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_aliases")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:          {}",
        links_count.to_string().bright_white().bold()
    );
    println!(
        "  Aliases:        {}",
        aliases_count.to_string().bright_white().bold()
    );
    println!(
        "  Custom aliases: {}",
        (aliases_count - links_count).to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Dispatches database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
