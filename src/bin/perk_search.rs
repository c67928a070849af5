//! Search the student-benefits catalogs from the command line.
//!
//! Loads every source listed in the catalog manifest through a single
//! `CatalogSession`, applies the same filter pipeline the views use, and
//! prints the grouped results as text or JSON.

use anyhow::{Context, Result, bail};
use campus_perks::catalog::CatalogSession;
use campus_perks::search::{category_facets, sort::SortKey};
use campus_perks::{
    CatalogManifest, FilterState, ItemType, SearchResults, apply_filters, default_manifest_path,
    find_data_root, init_tracing, split_labels,
};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let manifest_path = match args.manifest {
        Some(path) => path,
        None => default_manifest_path(&find_data_root()?),
    };
    let manifest = CatalogManifest::load(&manifest_path)?;

    let mut session = CatalogSession::new();
    for source in &manifest.sources {
        let path = manifest.source_path(source);
        session
            .load_from_path(source.kind, &path)
            .with_context(|| format!("loading {} catalog from {}", source.kind, path.display()))?;
    }
    let index = session.index();
    info!(items = index.len(), "catalogs loaded");

    if args.list_categories {
        for category in category_facets(index.items()) {
            println!("{category}");
        }
        return Ok(());
    }

    let mut state = FilterState::default()
        .with_query(args.query)
        .with_category(&args.category);
    for label in &args.filters {
        state = state.with_filter(label);
    }
    if let Some(label) = &args.sort {
        state = state.with_sort_label(label);
        if state.sort.is_none() {
            info!("unknown sort key '{label}'; keeping current order");
        }
    }

    let results = apply_filters(index.items(), &state, &manifest.search_options());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    session.close();
    Ok(())
}

fn print_results(results: &SearchResults<'_>) {
    for (label, item_type) in [
        ("Perks", ItemType::Perk),
        ("Tools", ItemType::Tool),
        ("Resources", ItemType::Resource),
    ] {
        let bucket = results.bucket(item_type);
        println!("{label} ({})", bucket.len());
        for item in bucket.iter() {
            let categories = item.category.join(", ");
            if item.link.is_empty() {
                println!("  - {} [{categories}]", item.title);
            } else {
                println!("  - {} [{categories}] {}", item.title, item.link);
            }
        }
    }
    println!("Total: {}", results.total);
}

struct CliArgs {
    manifest: Option<PathBuf>,
    query: String,
    category: String,
    filters: Vec<String>,
    sort: Option<String>,
    json: bool,
    list_categories: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut parsed = CliArgs {
            manifest: None,
            query: String::new(),
            category: String::new(),
            filters: Vec::new(),
            sort: None,
            json: false,
            list_categories: false,
        };

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--manifest" => {
                    if parsed.manifest.is_some() {
                        bail!("--manifest may only be provided once");
                    }
                    parsed.manifest = Some(PathBuf::from(next_value(&mut args, "--manifest")?));
                }
                "--query" | "-q" => parsed.query = next_value(&mut args, "--query")?,
                "--category" | "-c" => parsed.category = next_value(&mut args, "--category")?,
                "--filter" | "-f" => {
                    let raw = next_value(&mut args, "--filter")?;
                    parsed.filters.extend(split_labels(&raw));
                }
                "--sort" | "-s" => parsed.sort = Some(next_value(&mut args, "--sort")?),
                "--json" => parsed.json = true,
                "--categories" => parsed.list_categories = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n\n{}", usage()),
            }
        }
        Ok(parsed)
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> String {
    let sort_keys: Vec<&str> = SortKey::ALL.iter().map(SortKey::as_str).collect();
    format!(
        "Usage: perk-search [--manifest PATH] [--query TEXT] [--category NAME] [--filter LABEL[,LABEL]]... [--sort KEY] [--json]\n       perk-search [--manifest PATH] --categories\n\n\
Searches every catalog in the manifest (default: $CAMPUS_PERKS_ROOT/data/catalogs.json).\n\
Filters combine with AND. Sort keys: {}\n",
        sort_keys.join(", ")
    )
}
