//! Pokedex CLI
//!
//! Command-line front end over `pokedex_core`: catalog lookups, name search,
//! and a favorites list that persists between runs.

mod render;

use clap::{Parser, Subcommand};
use pokedex_core::catalog::{CatalogClient, Suggestions, Typeahead};
use pokedex_core::config::PokedexConfig;
use pokedex_core::state::{
    open_durable, DurableStorage, FavoriteEntry, FavoritesStore, MemoryStorage,
};
use pokedex_core::PokedexError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Clone)]
#[command(author, version, about = "Pokedex - search the catalog and keep favorites")]
struct Args {
    /// Catalog API root (overrides POKEDEX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Favorites database path (overrides POKEDEX_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Keep favorites in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Show details for one entry
    Lookup {
        /// Exact name, case-insensitive
        name: String,
    },
    /// List names containing a substring
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// List alternate forms of a species
    Variants { name: String },
    /// Toggle an entry in favorites
    Favorite { name: String },
    /// Remove an entry from favorites
    Unfavorite { name: String },
    /// List favorites
    Favorites,
    /// Interactive search: each input line updates the suggestions
    Browse,
}

struct Session {
    config: PokedexConfig,
    client: Arc<CatalogClient>,
    store: FavoritesStore,
    json: bool,
}

impl Session {
    async fn open(args: &Args) -> anyhow::Result<Self> {
        let mut config = PokedexConfig::from_env();
        if let Some(url) = &args.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(path) = &args.db {
            config = config.with_db_path(path.clone());
        }

        // An unusable database never blocks lookups
        let storage: Arc<dyn DurableStorage> = if args.ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            open_durable(&config.storage.db_path).await
        };

        tracing::debug!(
            "Catalog at {}, ephemeral favorites: {}",
            config.catalog.api_root(),
            args.ephemeral
        );

        let store = FavoritesStore::open(storage).await;
        let client = Arc::new(CatalogClient::new(config.catalog.clone())?);

        Ok(Self {
            config,
            client,
            store,
            json: args.json,
        })
    }

    async fn run(&self, command: CliCommand) -> anyhow::Result<()> {
        match command {
            CliCommand::Lookup { name } => {
                let item = self.client.fetch_by_name(&name).await?;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&item)?);
                } else {
                    print!("{}", render::item(&item, self.store.is_favorite(&item.name)));
                }
            }
            CliCommand::Search { query, limit } => {
                let results = self.client.search_names(&query, limit).await;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    print!("{}", render::refs(&results, "No matches."));
                }
            }
            CliCommand::Variants { name } => {
                let variants = self.client.fetch_variants(&name).await;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&variants)?);
                } else {
                    print!("{}", render::refs(&variants, "No alternate forms."));
                }
            }
            CliCommand::Favorite { name } => {
                let item = self.client.fetch_by_name(&name).await?;
                let now_favorite = self.store.toggle(FavoriteEntry::from_item(&item));
                if self.json {
                    let status = favorite_status(&item.name, now_favorite, None);
                    println!("{}", serde_json::to_string_pretty(&status)?);
                } else {
                    let verb = if now_favorite { "Added" } else { "Removed" };
                    println!("{} {}", verb, render::display_name(&item.name));
                }
            }
            CliCommand::Unfavorite { name } => {
                let name = name.trim().to_lowercase();
                let removed = self.store.remove(&name);
                if self.json {
                    let status = favorite_status(&name, false, Some(removed));
                    println!("{}", serde_json::to_string_pretty(&status)?);
                } else if removed {
                    println!("Removed {}", render::display_name(&name));
                } else {
                    println!("{} is not a favorite", render::display_name(&name));
                }
            }
            CliCommand::Favorites => {
                let favorites = self.store.list();
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&favorites)?);
                } else {
                    print!("{}", render::favorites(&favorites));
                }
            }
            CliCommand::Browse => self.browse().await?,
        }

        Ok(())
    }

    async fn browse(&self) -> anyhow::Result<()> {
        let typeahead = Typeahead::new(Arc::clone(&self.client), self.config.typeahead.clone());
        let mut updates = typeahead.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        eprintln!("Type part of a name (empty line or EOF to quit)");

        let mut input_open = true;
        let mut last_seq = 0;
        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if !line.trim().is_empty() => last_seq = typeahead.input(line),
                    _ => input_open = false,
                },
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    print_suggestions(&updates.borrow_and_update());
                }
            }

            // Exit once the final query has been answered
            if !input_open && typeahead.current().seq >= last_seq {
                if updates.has_changed().unwrap_or(false) {
                    print_suggestions(&updates.borrow_and_update());
                }
                break;
            }
        }

        Ok(())
    }
}

/// JSON result of a favorite toggle or removal
fn favorite_status(name: &str, favorite: bool, removed: Option<bool>) -> serde_json::Value {
    let mut status = serde_json::json!({ "name": name, "favorite": favorite });
    if let Some(removed) = removed {
        status["removed"] = serde_json::Value::Bool(removed);
    }
    status
}

/// Errors shown as a one-line message instead of an error report
fn user_facing(err: &anyhow::Error) -> Option<&PokedexError> {
    err.downcast_ref::<PokedexError>()
        .filter(|e| e.is_user_facing())
}

fn print_suggestions(current: &Suggestions) {
    println!("[{}]", current.query.trim());
    print!("{}", render::refs(&current.results, "  (no suggestions)"));
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let session = Session::open(&args).await?;

    let result = session.run(args.command.clone()).await;
    session.store.flush().await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match user_facing(&e) {
            Some(err) => {
                eprintln!("{}", err);
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        },
    }
}
