use clap::{Parser, Subcommand, ValueEnum};
use commission_folio::catalog::Catalog;
use commission_folio::clipboard::NoClipboard;
use commission_folio::config::{self, SiteConfig};
use commission_folio::contact::{self, ContactFields};
use commission_folio::gallery::{Gallery, GalleryConfig};
use commission_folio::output::{self, ListedItem};
use commission_folio::prefs::{self, PreferenceStore, StatusCycle};
use commission_folio::{detail, generate};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "commission-folio")]
#[command(about = "Gallery filter, detail modals and site glue for a commission portfolio")]
#[command(long_about = "\
Gallery filter, detail modals and site glue for a commission portfolio

Drives the same controllers the site pages use, from the command line:
filter the works or image gallery, preview a category's detail modal,
render the static gallery pages, and inspect persisted preferences.

Inputs:

  config.toml     # Site config in --config dir (optional, merged over stock)
  catalog.toml    # Works, images, category details (--catalog, else stock)
  prefs.json      # Persisted theme / commission status (--prefs)

Run 'commission-folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Catalog file (default: built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Preferences file (default: preferences.file under --config)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum GalleryKind {
    Works,
    Images,
}

#[derive(Subcommand)]
enum Command {
    /// List the gallery items visible under a category and search text
    Filter {
        #[arg(long, value_enum, default_value = "works")]
        gallery: GalleryKind,
        /// Category tag ("all" shows every category)
        #[arg(long)]
        category: Option<String>,
        /// Search text
        #[arg(long)]
        query: Option<String>,
    },
    /// Print a category's detail modal title and markup
    Show {
        key: String,
    },
    /// Write works.html and myimages.html
    Generate {
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Show the saved theme, or flip it
    Theme {
        #[arg(value_parser = ["toggle"])]
        action: Option<String>,
    },
    /// Show the saved commission status, or advance it
    Status {
        #[arg(value_parser = ["cycle"])]
        action: Option<String>,
    },
    /// Compose the contact e-mail and print its Gmail URL
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long = "type", default_value = "")]
        kind: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Validate config and catalog, then print an inventory
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match &cli.command {
        Command::Filter {
            gallery,
            category,
            query,
        } => run_filter(
            &catalog,
            &site_config,
            *gallery,
            category.as_deref(),
            query.as_deref(),
        ),
        Command::Show { key } => {
            let labels = &site_config.labels;
            let view = detail::render(&catalog, key);
            let title = detail::modal_title(view.as_ref().ok(), labels);
            let markup = match &view {
                Ok(v) => detail::detail_markup(v, labels, None),
                Err(e) => {
                    tracing::warn!(key = %e.key, "unknown category, showing fallback");
                    detail::fallback_markup(labels, None)
                }
            };
            output::print_show_output(&title, &markup.into_string());
        }
        Command::Generate { output: dir } => {
            println!("==> Generating gallery pages → {}", dir.display());
            let pages = generate::generate(&catalog, &site_config, dir)?;
            output::print_generate_output(&pages, dir);
        }
        Command::Theme { action } => {
            let mut store = open_prefs(&cli, &site_config);
            let theme = if action.is_some() {
                prefs::toggle_stored_theme(&mut store, &site_config.preferences)?
            } else {
                prefs::stored_theme(&store, &site_config.preferences)
            };
            output::print_theme_output(theme);
        }
        Command::Status { action } => {
            let mut store = open_prefs(&cli, &site_config);
            let cycle = StatusCycle::new(&site_config.status, &site_config.preferences);
            let entry = if action.is_some() {
                cycle.advance(&mut store)?
            } else {
                cycle.current(&store)
            };
            output::print_status_output(entry);
        }
        Command::Contact {
            name,
            email,
            kind,
            message,
        } => {
            let fields = ContactFields {
                name: name.clone(),
                email: email.clone(),
                kind: kind.clone(),
                message: message.clone(),
            };
            let submission = contact::submit(&fields, &site_config.contact, &mut NoClipboard)?;
            output::print_contact_output(&submission);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            output::print_check_output(&catalog, &site_config);
            println!("==> Config and catalog are valid");
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, commission_folio::catalog::CatalogError> {
    match path {
        Some(p) => Catalog::load(p),
        None => Catalog::stock(),
    }
}

fn open_prefs(cli: &Cli, site_config: &SiteConfig) -> PreferenceStore {
    let path = cli
        .prefs
        .clone()
        .unwrap_or_else(|| cli.config.join(&site_config.preferences.file));
    PreferenceStore::open(&path)
}

/// Build the gallery's page model, apply the filter, and list what stays visible.
fn run_filter(
    catalog: &Catalog,
    site_config: &SiteConfig,
    kind: GalleryKind,
    category: Option<&str>,
    query: Option<&str>,
) {
    let labels = &site_config.labels;
    let (name, mut page, gallery_config) = match kind {
        GalleryKind::Works => (
            "works",
            generate::works_page(catalog, labels),
            GalleryConfig::works(),
        ),
        GalleryKind::Images => (
            "images",
            generate::my_images_page(catalog, labels),
            GalleryConfig::my_images(),
        ),
    };
    let mut gallery = Gallery::init(&mut page, gallery_config);
    let Some(filter) = gallery.as_mut().and_then(Gallery::filter_mut) else {
        println!("{name}: no gallery items");
        return;
    };
    if let Some(tag) = category {
        filter.set_category(&mut page, tag);
    }
    if let Some(text) = query {
        filter.set_query(&mut page, text);
    }

    let records: Vec<ListedItem<'_>> = match kind {
        GalleryKind::Works => catalog
            .works
            .iter()
            .map(|w| ListedItem {
                id: &w.id,
                category: &w.category,
                title: &w.title,
            })
            .collect(),
        GalleryKind::Images => catalog
            .images
            .iter()
            .map(|i| ListedItem {
                id: &i.id,
                category: &i.category,
                title: &i.title,
            })
            .collect(),
    };
    let visible_ids = filter.visible_ids();
    let visible: Vec<ListedItem<'_>> = records
        .iter()
        .filter(|r| visible_ids.contains(&r.id))
        .cloned()
        .collect();
    output::print_filter_output(name, filter.state(), &visible, records.len());
}
