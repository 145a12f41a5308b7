//! CLI administration tool for url-shortener.
//!
//! Provides commands for inspecting mappings, purging expired ones and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Preview and run a cleanup pass
//! cargo run --bin admin -- cleanup --dry-run
//! cargo run --bin admin -- cleanup -y
//!
//! # Inspect a short code (does not count as a hit)
//! cargo run --bin admin -- show Ab3xQ9
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
//! - `DATABASE_URL` (or `DB_HOST`/`DB_USER`/...): PostgreSQL connection
//! - `BASE_URL`: prefix used when printing short links

use url_shortener::application::services::MappingService;
use url_shortener::config::{self, StorageBackend};
use url_shortener::infrastructure::persistence::PgMappingRepository;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type Service = MappingService<PgMappingRepository>;

/// CLI tool for managing url-shortener.
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
    /// Delete expired mappings
    Cleanup {
        /// Only report how many mappings would be removed
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a mapping by short code
    Show {
        /// Short code to look up
        code: String,
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

    let config = config::Config::from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool only works against the postgres backend");
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));
    let service = MappingService::new(repo, config.mapping_settings());

    match cli.command {
        Commands::Cleanup { dry_run, yes } => cleanup(&service, dry_run, yes).await?,
        Commands::Show { code } => show(&service, &code).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Removes expired mappings after showing how many would go.
///
/// # Flow
///
/// 1. Count mappings expired as of now
/// 2. Stop there on `--dry-run` or when nothing is expired
/// 3. Confirm (unless `--yes`)
/// 4. Delete and report the number removed
///
/// The count and the delete use separate timestamps, so the reported number
/// may be slightly higher than the preview.
async fn cleanup(service: &Service, dry_run: bool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Cleanup expired mappings".bright_blue().bold());
    println!();

    let expired = service
        .count_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired mappings: {}", e))?;

    println!(
        "  Expired mappings: {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    if expired == 0 {
        println!("{}", "✨ Nothing to clean up".green());
        return Ok(());
    }

    if dry_run {
        println!("{}", "ℹ️  Dry run, nothing deleted".bright_black());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} expired mappings?", expired))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = service
        .cleanup_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        format!("{} mappings", removed).green().bold()
    );
    println!();

    Ok(())
}

/// Prints a mapping's metadata.
///
/// # Output Format
///
/// ```text
/// 🔗 Mapping Ab3xQ9
///
///   Long URL:   https://example.com/a
///   Short URL:  http://localhost:3000/r/Ab3xQ9
///   Created:    2026-01-15 10:30
///   Expires:    2026-02-14 10:30
///   Hits:       12
///   Status:     LIVE
/// ```
async fn show(service: &Service, code: &str) -> Result<()> {
    let metadata = service
        .get_metadata(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let mapping = &metadata.mapping;

    println!(
        "{} {}",
        "🔗 Mapping".bright_blue().bold(),
        mapping.code.cyan().bold()
    );
    println!();

    let expires = mapping
        .expires_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());

    let status = if metadata.expired {
        "EXPIRED".red()
    } else {
        "LIVE".green()
    };

    println!("  Long URL:   {}", mapping.long_url.bright_white());
    println!("  Short URL:  {}", service.short_url(&mapping.code).cyan());
    println!(
        "  Created:    {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!("  Expires:    {}", expires.bright_black());
    println!(
        "  Hits:       {}",
        mapping.hit_count.to_string().bright_green().bold()
    );
    println!("  Status:     {}", status);
    println!();

    Ok(())
}

/// Displays mapping counts.
///
/// Shows:
/// - Total number of mappings
/// - Number of mappings past their expiry awaiting cleanup
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    let expired = service
        .count_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired mappings: {}", e))?;

    println!(
        "  Mappings:  {}",
        total.to_string().bright_green().bold()
    );
    println!(
        "  Live:      {}",
        total.saturating_sub(expired).to_string().bright_green().bold()
    );
    println!(
        "  Expired:   {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
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

            let size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('url_mappings'))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:     {}", version.bright_white());
            println!("  Mappings table: {}", size.bright_white());
            println!();
        }
    }

    Ok(())
}
