use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dashblock::chart::TableChartBuilder;
use dashblock::page::{Page, compose_block, compose_page};
use dashblock::selector::Selector;
use dashblock::source::{FragmentSource, FsSource, ZipSource};
use dashblock::{Category, Dashboard, HeightResolver, Renderer, sample};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render survey dashboards from a block manifest", long_about = None)]
struct Cli {
    /// Dashboard manifest (TOML). The built-in sample is used when omitted.
    #[arg(short, long, value_name = "MANIFEST")]
    manifest: Option<Utf8PathBuf>,

    /// Read external fragments from this ZIP bundle instead of the filesystem.
    #[arg(long, value_name = "ZIP")]
    bundle: Option<Utf8PathBuf>,

    /// Override the directory external fragments are read from.
    #[arg(long, value_name = "DIR")]
    fragments: Option<Utf8PathBuf>,

    /// Default pixels added to each block's declared minimum height.
    #[arg(long)]
    buffer: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List blocks, grouped by category.
    List {
        /// Only list this category.
        #[arg(short, long)]
        category: Option<String>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Render a single block with its category picker.
    Render {
        id: String,
        #[arg(short, long)]
        out: Option<Utf8PathBuf>,
    },
    /// Render the whole dashboard page.
    Page {
        #[arg(short, long)]
        out: Option<Utf8PathBuf>,
    },
}

#[derive(Serialize)]
struct Listing<'a> {
    category: Category,
    blocks: Vec<dashblock::selector::Choice<'a>>,
    message: Option<String>,
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut dashboard = match &cli.manifest {
        Some(path) => Dashboard::load(path).with_context(|| format!("Load manifest {}", path))?,
        None => sample::saksham_baseline("fragments")?,
    };
    if let Some(buffer) = cli.buffer {
        dashboard.heights = HeightResolver::new(buffer);
    }
    if let Some(dir) = &cli.fragments {
        dashboard.fragment_root = dir.clone();
    }

    match &cli.command {
        Command::List { category, json } => list(&dashboard, category.as_deref(), *json),
        Command::Render { id, out } => {
            let mut renderer = renderer(&dashboard, cli.bundle.as_ref())?;
            let selection = Selector::new(&dashboard.registry).select(id)?;
            let page = compose_block(&dashboard, &mut renderer, &selection)?;
            write_page(&page, out.as_ref())
        }
        Command::Page { out } => {
            let mut renderer = renderer(&dashboard, cli.bundle.as_ref())?;
            let page = compose_page(&dashboard, &mut renderer)?;
            write_page(&page, out.as_ref())
        }
    }
}

fn renderer<'d>(
    dashboard: &'d Dashboard,
    bundle: Option<&Utf8PathBuf>,
) -> Result<Renderer<'d, Box<dyn FragmentSource>, TableChartBuilder>> {
    let source: Box<dyn FragmentSource> = match bundle {
        Some(path) => {
            let file = std::fs::File::open(path).with_context(|| format!("Open {}", path))?;
            let zip = ZipSource::new(std::io::BufReader::new(file))
                .with_context(|| format!("Open bundle {}", path))?;
            Box::new(zip)
        }
        None => Box::new(FsSource::new(&dashboard.fragment_root)),
    };
    Ok(Renderer::new(
        &dashboard.registry,
        &dashboard.datasets,
        dashboard.heights,
        source,
        TableChartBuilder,
    ))
}

fn list(dashboard: &Dashboard, category: Option<&str>, json: bool) -> Result<()> {
    let categories: Vec<Category> = match category {
        Some(name) => vec![name.parse()?],
        None => dashboard.registry.declared_categories().collect(),
    };
    let selector = Selector::new(&dashboard.registry);
    let listings: Vec<Listing> = categories
        .into_iter()
        .map(|c| {
            let available = selector.available_in(c);
            Listing {
                category: c,
                blocks: available.choices().to_vec(),
                message: available.message(),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }
    for listing in &listings {
        println!("{}", listing.category.title());
        match &listing.message {
            Some(msg) => println!("  ({msg})"),
            None => {
                for choice in &listing.blocks {
                    let d = dashboard.registry.get(choice.id)?;
                    println!(
                        "  {:<20} {:<32} {:>5}px  {}",
                        choice.id,
                        choice.label,
                        dashboard.heights.resolve(d, None),
                        d.content.kind_name()
                    );
                }
            }
        }
    }
    Ok(())
}

fn write_page(page: &Page, out: Option<&Utf8PathBuf>) -> Result<()> {
    tracing::info!(
        blocks = page.results.len(),
        degraded = page.degraded().count(),
        "page rendered"
    );
    match out {
        Some(path) => std::fs::write(path, &page.html).with_context(|| format!("Write {}", path))?,
        None => print!("{}", page.html),
    }
    Ok(())
}
