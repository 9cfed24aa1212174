//! Delete command - remove a stored invoice.

use clap::Args;
use console::style;

use super::Context;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Invoice id
    id: String,
}

pub async fn run(args: DeleteArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let removed = store.remove(&args.id)?;
    store.save()?;

    println!(
        "{} Deleted {} ({}, {})",
        style("✓").green(),
        removed.id,
        removed.patient_name,
        removed.date
    );

    Ok(())
}
