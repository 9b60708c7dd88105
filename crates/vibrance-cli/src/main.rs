mod articles;
mod curate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vibrance-cli")]
#[command(about = "Vibrance positive-news curator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Curate positive articles from the configured feeds
    Curate {
        /// Only process the feed with this name (case-insensitive)
        #[arg(long)]
        feed: Option<String>,
        /// Override the positivity threshold for this run (0.0 to 1.0)
        #[arg(long, value_parser = vibrance_core::parse_threshold)]
        threshold: Option<f64>,
        /// Delete every stored article before processing any feed
        #[arg(
            long,
            env = "VIBRANCE_RESET_COLLECTION",
            value_parser = clap::builder::BoolishValueParser::new()
        )]
        reset: bool,
        /// Classify and enrich without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// List curated articles, most positive first
    Articles {
        /// Minimum positivity score to include
        #[arg(long, default_value = "0.85", value_parser = vibrance_core::parse_threshold)]
        min_positivity: f64,
        /// Maximum number of articles to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// List the configured feed sources
    Feeds,
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vibrance-cli: run with --help to see available commands");
        return Ok(());
    };

    let config = vibrance_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Curate {
            feed,
            threshold,
            reset,
            dry_run,
        } => {
            let pool = connect(&config).await?;
            curate::run_curate(&pool, &config, feed.as_deref(), threshold, reset, dry_run).await?;
        }
        Commands::Articles {
            min_positivity,
            limit,
        } => {
            let pool = connect(&config).await?;
            articles::run_articles_list(&pool, min_positivity, limit).await?;
        }
        Commands::Feeds => articles::run_feeds_list(&config)?,
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    let latency = vibrance_db::health_check(&pool).await?;
                    let stored = vibrance_db::count_articles(&pool).await?;
                    println!(
                        "database is reachable ({} ms); {stored} article(s) stored",
                        latency.as_millis()
                    );
                }
                DbCommands::Migrate => {
                    let pending = vibrance_db::pending_migrations(&pool).await?;
                    tracing::info!(pending = ?pending, "applying migrations");
                    let applied = vibrance_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}

async fn connect(config: &vibrance_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = vibrance_db::PoolConfig::from_app_config(config);
    let pool = vibrance_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
