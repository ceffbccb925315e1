use clap::{Parser, Subcommand};
use m2_tools_ui::config::{self, AppConfig};
use m2_tools_ui::filter::{self, IconQuery};
use m2_tools_ui::manifest::ManifestCache;
use m2_tools_ui::{icons, output, scan, search, web};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "m2-tools-ui")]
#[command(about = "Local browser for quest documentation and game icons")]
#[command(long_about = "\
Local browser for quest documentation and game icons

Serves two read-only content repositories over HTTP:

  data/
  ├── config.toml                  # Optional settings (see gen-config)
  ├── metin2-quest-functions/      # Quest docs: *.md and *.txt, any depth
  │   └── npc/guards.md
  └── metin2-icons/                # Icons: *.png and/or *.tga, any depth
      ├── manifest.json            # Optional icon groups
      └── item/27620.png

Hidden files and directories (leading '.') are left out of the tree and the
icon catalog but are still searched. Symlinks are never followed.
Settings come from defaults, then config.toml, then environment variables
(DATA_DIR, QUEST_REPO_PATH, ICONS_REPO_PATH, BIND_ADDR, ICONS_PAGE_SIZE,
MANIFEST_LOCALE, QUEST_SEARCH_LIMIT), then command-line flags.

Run 'm2-tools-ui gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding both repositories
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Quest repository root
    #[arg(long, global = true)]
    quests: Option<PathBuf>,

    /// Icon repository root
    #[arg(long, global = true)]
    icons: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8000
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the quest tree
    Tree,
    /// Search quest documents
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List icons, optionally filtered
    Icons {
        #[arg(long)]
        group: Option<String>,
        /// Name substring
        #[arg(long)]
        q: Option<String>,
        /// Folder prefix
        #[arg(long)]
        folder: Option<String>,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// List icon groups from the manifest
    Groups,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config(cli.config.as_deref(), cli.data_dir.as_deref())?;
    apply_flags(&mut config, &cli);

    match cli.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }
            config.validate()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::serve(&config))?;
        }
        Command::Tree => {
            output::print_tree(&scan::scan_tree(&config.quest_root()));
        }
        Command::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search.limit);
            let results = search::search(&config.quest_root(), &query, limit);
            output::print_search(&query, &results);
        }
        Command::Icons {
            group,
            q,
            folder,
            page,
        } => {
            let manifest = ManifestCache::new(config.manifest_path(), config.icons.locale.clone());
            let query = IconQuery {
                group,
                q,
                folder,
                page: Some(page),
            };
            let catalog = icons::build_catalog(&config.icon_root());
            let listing =
                filter::list_icons(catalog, &manifest.groups(), &query, config.icons.page_size);
            output::print_icons(&listing);
        }
        Command::Groups => {
            let manifest = ManifestCache::new(config.manifest_path(), config.icons.locale.clone());
            output::print_groups(&manifest.groups());
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Root flags override file and environment settings. `--data-dir` is
/// handled by the loader, since it also decides where the file is read from.
fn apply_flags(config: &mut AppConfig, cli: &Cli) {
    if let Some(root) = &cli.quests {
        config.quest_root = Some(root.clone());
    }
    if let Some(root) = &cli.icons {
        config.icon_root = Some(root.clone());
    }
}
