//! Show command - print one invoice.

use clap::Args;

use fwateery_core::InvoiceRecord;

use super::Context;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Invoice id
    id: String,

    /// Print the invoice as JSON
    #[arg(long)]
    json: bool,

    /// Include the attached image in JSON output
    #[arg(long, requires = "json")]
    with_image: bool,
}

pub async fn run(args: ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let record = store
        .get(&args.id)
        .ok_or_else(|| anyhow::anyhow!("Invoice not found: {}", args.id))?;

    if args.json {
        let record = if args.with_image {
            record.clone()
        } else {
            InvoiceRecord {
                original_image: None,
                ..record.clone()
            }
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", record.summary_text(ctx.language));
    }

    Ok(())
}
