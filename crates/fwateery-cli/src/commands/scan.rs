//! Scan command - turn invoice images into stored invoices.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use fwateery_core::analysis::is_supported_image;
use fwateery_core::{BatchProcessor, InvoiceRecord, InvoiceStore, SavedResponseAnalyzer, StoreError};

use super::Context;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Image files or glob pattern (png, jpg, jpeg, webp)
    #[arg(required = true)]
    input: String,

    /// Do not keep the source images on the stored invoices
    #[arg(long)]
    no_images: bool,
}

pub async fn run(args: ScanArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    // Open the store before any work so a corrupt file stops the scan
    let mut store = ctx.open_store()?;

    println!(
        "{} Found {} images to scan",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let analyzer = SavedResponseAnalyzer::new(ctx.config.scan.response_extension.clone());
    let processor = BatchProcessor::new(&analyzer, ctx.language)
        .with_attached_images(ctx.config.scan.attach_images && !args.no_images)
        .with_max_image_bytes(ctx.config.scan.max_image_bytes);

    let summary = processor.run(&files, |path, result| {
        if let Ok(records) = result {
            debug!("{} produced {} invoice(s)", path.display(), records.len());
        }
        pb.inc(1);
    });

    pb.finish_and_clear();

    let added = store_batch(&mut store, &summary.records)?;
    if added > 0 {
        store.save()?;
        info!("Stored {} invoice(s) in {}", added, store.path().display());
    }

    println!(
        "{} {} in {:?}",
        if summary.has_failures() {
            style("!").yellow()
        } else {
            style("✓").green()
        },
        summary.message(ctx.language),
        start.elapsed()
    );
    println!(
        "   {} invoice(s) added, {} stored",
        style(added).green(),
        store.len()
    );

    if summary.has_failures() {
        println!();
        println!("{}", style("Failed images:").red());
        for failure in &summary.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
    }

    if summary.succeeded == 0 {
        anyhow::bail!("No images could be processed");
    }

    Ok(())
}

/// Add a scanned batch to the store, keeping the batch's own order at the
/// top. A record whose id is already taken is skipped so the rest of the
/// batch is still stored. Returns how many records were added.
fn store_batch(store: &mut InvoiceStore, records: &[InvoiceRecord]) -> anyhow::Result<usize> {
    let mut added = 0;
    for record in records.iter().rev() {
        match store.add(record.clone()) {
            Ok(()) => added += 1,
            Err(StoreError::DuplicateId(id)) => {
                warn!("Skipping invoice with duplicate id {}", id);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(added)
}
