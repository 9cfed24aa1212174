//! List command - show stored invoices.

use clap::{Args, ValueEnum};
use console::style;

use fwateery_core::{InvoiceRecord, SortDirection, SortKey};

use super::Context;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Column to sort by
    #[arg(short, long, value_enum, default_value = "date")]
    sort: SortColumn,

    /// Sort ascending instead of newest/largest first
    #[arg(long)]
    asc: bool,

    /// Print the invoices as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Date,
    Price,
    Patient,
    Procedure,
}

impl From<SortColumn> for SortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Date => SortKey::Date,
            SortColumn::Price => SortKey::Price,
            SortColumn::Patient => SortKey::PatientName,
            SortColumn::Procedure => SortKey::Procedure,
        }
    }
}

pub async fn run(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let key = SortKey::from(args.sort);
    let direction = if args.asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    if args.json {
        // Images are large data URLs; leave them out of listings
        let records: Vec<InvoiceRecord> = store
            .sorted(key, direction)
            .into_iter()
            .map(|r| InvoiceRecord {
                original_image: None,
                ..r.clone()
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if store.is_empty() {
        println!("{} No invoices stored for {}", style("ℹ").blue(), ctx.user);
        return Ok(());
    }

    let lang = ctx.language;
    for group in store.grouped(key, direction, lang) {
        println!(
            "{} ({})",
            style(&group.title).bold(),
            lang.digits(&group.invoices.len().to_string())
        );
        for record in group.invoices {
            println!(
                "  {}  {}  {}  {}  {} {}  {}",
                style(&record.id).dim(),
                record.date,
                record.display_day_name(lang),
                record.patient_name,
                record.price,
                lang.currency(),
                record.procedure
            );
        }
        println!();
    }

    println!(
        "{} invoice(s), total {} {}",
        store.len(),
        style(store.total()).green(),
        lang.currency()
    );

    Ok(())
}
