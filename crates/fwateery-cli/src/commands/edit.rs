//! Edit command - correct fields of a stored invoice.

use clap::Args;
use console::style;
use tracing::info;

use fwateery_core::models::invoice::parse_date;
use fwateery_core::{InvoiceStatus, InvoiceUpdate};

use super::Context;

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Invoice id
    id: String,

    /// Patient name
    #[arg(long)]
    patient: Option<String>,

    /// Procedure description
    #[arg(long)]
    procedure: Option<String>,

    /// Price, stored as given
    #[arg(long)]
    price: Option<String>,

    /// Invoice date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Status (processing, completed, failed)
    #[arg(long)]
    status: Option<String>,
}

pub async fn run(args: EditArgs, ctx: &Context) -> anyhow::Result<()> {
    if let Some(ref date) = args.date {
        if parse_date(date).is_none() {
            anyhow::bail!("Invalid date: {} (expected YYYY-MM-DD)", date);
        }
    }

    let status = match args.status.as_deref() {
        Some(s) => Some(
            InvoiceStatus::from_str(s)
                .ok_or_else(|| anyhow::anyhow!("Unknown status: {}", s))?,
        ),
        None => None,
    };

    let update = InvoiceUpdate {
        patient_name: args.patient,
        procedure: args.procedure,
        price: args.price,
        date: args.date,
        day_name: None,
        status,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to change; pass at least one field");
    }

    let mut store = ctx.open_store()?;
    let summary = store.update(&args.id, update)?.summary_text(ctx.language);
    store.save()?;

    info!("Updated invoice {}", args.id);
    println!("{} Updated {}", style("✓").green(), args.id);
    println!("{}", summary);

    Ok(())
}
