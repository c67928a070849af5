//! Check a single catalog CSV the way the loader will read it.
//!
//! Prints the number of valid records and every skipped row with its line
//! number and reason. Load-fatal problems (missing columns, no valid rows)
//! exit non-zero.

use anyhow::{Context, Result, bail};
use campus_perks::catalog::{CatalogKind, load_catalog_from_path, required_columns};
use campus_perks::init_tracing;
use serde_json::json;
use std::env;
use std::path::PathBuf;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let catalog = load_catalog_from_path(args.kind, &args.file)
        .with_context(|| format!("linting {}", args.file.display()))?;

    if args.json {
        let report = json!({
            "kind": catalog.kind,
            "records": catalog.len(),
            "skipped": catalog.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {} records, {} skipped",
        catalog.kind,
        catalog.len(),
        catalog.skipped.len()
    );
    for row in &catalog.skipped {
        println!("  line {}: {}", row.line, row.error);
    }
    Ok(())
}

struct CliArgs {
    kind: CatalogKind,
    file: PathBuf,
    json: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut kind = None;
        let mut file = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--kind" => {
                    let raw = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("missing value for --kind"))?;
                    kind = Some(CatalogKind::parse(&raw).ok_or_else(|| {
                        anyhow::anyhow!(
                            "unknown catalog kind '{raw}' (expected perks|ai_tools|courses|resources|events)"
                        )
                    })?);
                }
                "--file" => {
                    let raw = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("missing value for --file"))?;
                    file = Some(PathBuf::from(raw));
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        let Some(kind) = kind else {
            bail!("--kind is required");
        };
        let Some(file) = file else {
            bail!("--file is required");
        };
        Ok(CliArgs { kind, file, json })
    }
}

fn print_usage() {
    println!("Usage: catalog-lint --kind KIND --file PATH [--json]\n");
    println!("Required columns per kind:");
    for kind in CatalogKind::ALL {
        println!("  {:<10} {}", kind.as_str(), required_columns(kind).join(","));
    }
}
