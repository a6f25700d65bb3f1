//! # Wafer CLI (`wafer`)
//!
//! Builds Finnish wiki album articles and the review citations that go in
//! them.
//!
//! ## Usage
//!
//! ```bash
//! wafer --config ./config/wafer.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wafer sources` | List supported review sites |
//! | `wafer review <URL>...` | Print citation fragments for review URLs |
//! | `wafer neighbors <ALBUM>` | Print the previous and next album |
//! | `wafer build <ALBUM>` | Build and write the album article |
//!
//! `sources` and `review` need no catalog credentials and fall back to
//! built-in defaults when the config file does not exist.
//!
//! ## Examples
//!
//! ```bash
//! # Cite two reviews
//! wafer review https://kaaoszine.fi/levyarvio-x/ https://blabbermouth.net/reviews/y/
//!
//! # Full article with lineup and external links
//! wafer build 102314585 \
//!     --review https://www.soundi.fi/levyarviot/x/ \
//!     --member "Jaska Jokunen=kitara, laulu" \
//!     --discogs https://www.discogs.com/master/26111269-X-Y
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use wafer::config::{self, Config};
use wafer::document::ExternalLinks;
use wafer::fetch::HttpFetcher;
use wafer::generate::{self, BuildRequest};
use wafer::models::Member;
use wafer::review::ReviewEngine;
use wafer::sources::{self, SourceRegistry};

/// Wafer: album articles for the Finnish wiki.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/wafer.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "wafer",
    about = "Generate Finnish wiki album articles with review citations",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/wafer.toml`. Catalog credentials may instead
    /// come from `WAFER_CLIENT_ID` and `WAFER_CLIENT_SECRET`.
    #[arg(long, global = true, default_value = "./config/wafer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported review sources.
    Sources,

    /// Extract reviews and print their citation fragments.
    ///
    /// URLs are processed in the order given. Unsupported or unreadable
    /// reviews are skipped with a warning; a timeout stops the run.
    Review {
        /// Review page URLs.
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the previous and next album around a release.
    Neighbors {
        /// Album id or catalog album URL.
        album: String,
    },

    /// Build the album article.
    Build {
        /// Album id or catalog album URL.
        album: String,

        /// Review URL to cite (repeatable, kept in order).
        #[arg(long = "review")]
        reviews: Vec<String>,

        /// Lineup member as `Name=instrument, instrument` (repeatable).
        #[arg(long = "member", value_parser = parse_member)]
        members: Vec<Member>,

        /// Discogs master or release URL.
        #[arg(long)]
        discogs: Option<String>,

        /// Metal Archives album URL.
        #[arg(long)]
        metal_archives: Option<String>,

        /// Bandcamp album URL.
        #[arg(long)]
        bandcamp: Option<String>,

        /// Print the article instead of writing it to `[output].dir`.
        #[arg(long)]
        stdout: bool,
    },
}

/// Parse a `Name=inst, inst` pair for `--member`.
fn parse_member(s: &str) -> Result<Member, String> {
    Member::parse(s).ok_or_else(|| format!("invalid member '{}': expected NAME=INSTRUMENT[, ...]", s))
}

/// Config for commands that can run without a file.
fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        Ok(config::default_config())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wafer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = SourceRegistry::builtin();

    match cli.command {
        Commands::Sources => {
            sources::list_sources(&registry)?;
        }
        Commands::Review { urls } => {
            let cfg = load_or_default(&cli.config)?;
            let fetcher = HttpFetcher::new(&cfg.http)?;
            let engine = ReviewEngine::new(&registry, &fetcher)
                .cite_unrated(!cfg.citation.require_rating);
            for fragment in engine.extract_all(&urls).await? {
                println!("{}", fragment.render());
            }
        }
        Commands::Neighbors { album } => {
            let cfg = config::load_config(&cli.config)?;
            let catalog = generate::connect_catalog(&cfg)?;
            let neighbors = generate::resolve_neighbors(&cfg, &catalog, &album).await?;

            let release = &neighbors.release;
            println!("{} - {} ({})", release.artist, release.title, release.year());
            match &neighbors.previous {
                Some(n) => println!("  previous: {} ({})", n.title, n.year),
                None => println!("  previous: -"),
            }
            match &neighbors.next {
                Some(n) => println!("  next:     {} ({})", n.title, n.year),
                None => println!("  next:     -"),
            }
        }
        Commands::Build {
            album,
            reviews,
            members,
            discogs,
            metal_archives,
            bandcamp,
            stdout,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let catalog = generate::connect_catalog(&cfg)?;
            let fetcher = HttpFetcher::new(&cfg.http)?;
            let request = BuildRequest {
                album,
                reviews,
                members,
                links: ExternalLinks {
                    discogs,
                    metal_archives,
                    bandcamp,
                },
            };

            let document =
                generate::build_document(&cfg, &catalog, &fetcher, &registry, &request).await?;
            if stdout {
                print!("{}", document.render());
            } else {
                let path = generate::write_document(&cfg, &document)?;
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
