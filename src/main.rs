//! CLI entry point for folio

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Query and serve the blog posts of a portfolio site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site information
    List {
        /// Type of content to list (post, tag, category, route)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show one post by slug or year/month/day/slug
    Show {
        key: String,
    },

    /// List posts related to a post
    Related {
        key: String,

        /// Maximum number of posts (defaults to related_posts in _config.yml)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Date prefix for the file name (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Serve the blog as a JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&folio, &r#type)?;
        }

        Commands::Show { key } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::show::run(&folio, &key)?;
        }

        Commands::Related { key, limit } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::related::run(&folio, &key, limit)?;
        }

        Commands::New { title, date } => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = folio.new_post(&title, date)?;
            println!("Created: {:?}", path);
        }

        Commands::Serve { port, ip } => {
            let folio = folio::Folio::new(&base_dir)?;
            let port = port.unwrap_or(folio.config.server.port);
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
