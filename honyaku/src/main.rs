use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use honyaku::{ReconcileLayout, StructuredOutcome, diff_structured, reconcile, stage_missing};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let matches = Command::new("honyaku-diff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stage raw game data that is missing from the translated reference tree")
        .arg(
            Arg::new("base")
                .long("base")
                .short('b')
                .help("Directory containing raw/, reference/ and diff/")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw data root (default: <base>/raw)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .help("Translated reference root (default: <base>/reference)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .help("Diff output root (default: <base>/diff)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every file comparison")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let base = matches
        .get_one::<PathBuf>("base")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let mut layout = ReconcileLayout::from_base(&base);
    if let Some(raw) = matches.get_one::<PathBuf>("raw") {
        layout.raw_root = raw.clone();
    }
    if let Some(reference) = matches.get_one::<PathBuf>("reference") {
        layout.reference_root = reference.clone();
    }
    if let Some(out) = matches.get_one::<PathBuf>("out") {
        layout.diff_root = out.clone();
    }

    println!("=== Processing non-MDB files (file existence check) ===");
    let missing = reconcile(&layout).context("scanning raw tree")?;
    println!(
        "Found {} files in raw/ that don't exist in reference/",
        missing.len()
    );
    for relative in stage_missing(&layout, &missing).context("copying missing files")? {
        println!("  Copied: {}", relative.display());
    }

    let reports = diff_structured(&layout).context("diffing structured data")?;
    if layout.raw_root.join(&layout.structured_folder).is_dir() {
        println!("\n=== Processing MDB files (content diff) ===");
    }
    for report in &reports {
        let name = &report.file_name;
        match &report.outcome {
            StructuredOutcome::Unmapped => println!("  No mapping for {}, skipping", name),
            StructuredOutcome::CopiedWhole => {
                println!("  Copied entire file (no reference): {}", name)
            }
            StructuredOutcome::NoNewKeys => println!("  No new keys in: {}", name),
            StructuredOutcome::Diffed { new_entries } => {
                println!("  Generated diff for {}: {} new entries", name, new_entries)
            }
            StructuredOutcome::NotAKeyTree => {
                println!("  Not a key-value document: {}, skipping", name)
            }
        }
    }

    println!("\nDone!");
    Ok(())
}
