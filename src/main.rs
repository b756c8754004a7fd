use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use dropbignore::{
    apply, classify, PatternSet, ReconcileOptions, ReconcileReport, XattrMarker, IGNORE_FILE_NAME,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Reconcile Dropbox sync-exclusion markers against .dropbignore glob patterns",
    long_about = None
)]
struct Args {
    /// Dropbox directory to reconcile (defaults to ~/Dropbox)
    root: Option<PathBuf>,

    /// Pattern file to load (defaults to .dropbignore under the root)
    #[arg(long)]
    ignore_file: Option<PathBuf>,

    /// Show what would change, but don't touch any marker
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_section(heading: &str, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("{}", heading.bold());
    for path in paths {
        println!("  {}", path.display());
    }
}

fn print_report(report: &ReconcileReport, dry_run: bool) {
    let (excluded_heading, restored_heading) = if dry_run {
        ("Would exclude:", "Would restore:")
    } else {
        ("Excluded:", "Restored:")
    };

    print_section(excluded_heading, &report.excluded);
    print_section(restored_heading, &report.restored);
    print_section("Already excluded (skipped):", &report.skipped);

    if !report.failures.is_empty() {
        println!("{}", "Failed:".bold().red());
        for failure in &report.failures {
            println!(
                "  {} ({})",
                failure.path.display(),
                failure.error.to_string().red()
            );
        }
    }

    println!("========================================");
    let summary = format!(
        "{} excluded, {} restored, {} already excluded, {} failed",
        report.excluded.len(),
        report.restored.len(),
        report.skipped.len(),
        report.failures.len()
    );
    if report.failures.is_empty() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
    if dry_run {
        println!("Dry run mode: no markers were changed.");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let root = match args.root {
        Some(root) => root,
        None => dirs::home_dir()
            .context("could not determine the home directory; pass the Dropbox root explicitly")?
            .join("Dropbox"),
    };
    if !root.is_dir() {
        bail!("Dropbox root is not a directory: {}", root.display());
    }

    let ignore_file = args
        .ignore_file
        .unwrap_or_else(|| root.join(IGNORE_FILE_NAME));
    let patterns = PatternSet::from_file(&ignore_file)
        .with_context(|| format!("failed to load patterns for {}", root.display()))?;

    let markers = XattrMarker;
    let classification = classify(&root, &patterns, &markers);
    let report = apply(
        &classification,
        &markers,
        ReconcileOptions {
            dry_run: args.dry_run,
        },
    );
    print_report(&report, args.dry_run);

    Ok(())
}
