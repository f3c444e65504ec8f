//! Binary entry point for toolshed.
//!
//! Admin surface for the catalog: list, edit, import, and export.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use toolshed::exchange::DEFAULT_EXPORT_FILENAME;
use toolshed::{Catalog, CatalogQuery, ItemDraft, ItemId, StoreConfig, ALL_CATEGORIES};
use tracing_subscriber::EnvFilter;

/// Toolshed - a curated catalog of tools.
#[derive(Parser)]
#[command(name = "toolshed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Store directory.
    #[arg(long, global = true, env = "TOOLSHED_STORE", default_value = "./toolshed")]
    store: PathBuf,

    /// Name of the durable slot inside the store.
    #[arg(long, global = true, env = "TOOLSHED_SLOT", default_value = "robo-ai-tools")]
    slot: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List items, optionally filtered.
    List {
        /// Case-insensitive text to match.
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact category, or "All".
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// Show category facets.
    Categories,

    /// Add an item.
    Add {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        url: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Edit an existing item.
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New category; an empty value clears it.
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete an item.
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Import a .csv or .json file.
    Import { file: PathBuf },

    /// Export to a .csv or .json file.
    Export {
        #[arg(default_value = DEFAULT_EXPORT_FILENAME)]
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "toolshed=debug" } else { "toolshed=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = StoreConfig {
        path: cli.store,
        slot_name: cli.slot,
        create_if_missing: true,
    };

    match run(config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: StoreConfig, command: Commands) -> toolshed::Result<()> {
    let catalog = Catalog::open_or_create(config)?;

    match command {
        Commands::List { search, category } => {
            let query = CatalogQuery::term(search).with_category(category);
            let hits = catalog.search(&query);
            if hits.is_empty() {
                println!("No tools found.");
            }
            for item in hits.iter() {
                let category = item.category.as_deref().unwrap_or("Uncategorized");
                println!("{}\t{}\t[{}]\t{}", item.id, item.name, category, item.url);
                println!("\t{}", item.description);
            }
        }

        Commands::Categories => {
            for category in catalog.categories() {
                println!("{category}");
            }
        }

        Commands::Add {
            name,
            url,
            description,
            category,
        } => {
            let mut draft = ItemDraft::new(name, url, description);
            if let Some(category) = category {
                draft = draft.with_category(category);
            }
            let item = catalog.submit(draft)?;
            println!("Tool added successfully! (id {})", item.id);
        }

        Commands::Update {
            id,
            name,
            url,
            description,
            category,
        } => {
            let id = ItemId(id);
            let mut item = catalog
                .get(id)
                .ok_or(toolshed::CatalogError::ItemNotFound(id))?;
            if let Some(name) = name {
                item.name = name;
            }
            if let Some(url) = url {
                item.url = url;
            }
            if let Some(description) = description {
                item.description = description;
            }
            if let Some(category) = category {
                item.category = Some(category).filter(|c| !c.is_empty());
            }
            catalog.edit(item)?;
            println!("Updated {id}.");
        }

        Commands::Delete { id } => {
            let id = ItemId(id);
            if catalog.delete(id) {
                println!("Deleted {id}.");
            } else {
                println!("No tool with id {id}.");
            }
        }

        Commands::Import { file } => {
            let summary = catalog.import_file(&file)?;
            println!("Successfully imported {} tools!", summary.imported);
            if summary.rejected > 0 {
                println!("Skipped {} incomplete rows.", summary.rejected);
            }
        }

        Commands::Export { file } => {
            let count = catalog.export_file(&file)?;
            if count == 0 {
                println!("No tools to export.");
            } else {
                println!("Exported {} tools to {}.", count, file.display());
            }
        }
    }

    Ok(())
}
