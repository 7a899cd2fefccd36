//! Implementation of the `msgfmt inspect` command.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use msgfmt::MessageSupport;

use super::import_packs;
use crate::output::table::{format_entry_table, EntryRow};

/// Arguments for the inspect command.
#[derive(Debug, clap::Args)]
pub struct InspectArgs {
    /// Pack files to read
    #[arg(required = true)]
    pub packs: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the inspect command.
pub fn run_inspect(args: InspectArgs) -> miette::Result<i32> {
    let mut support = MessageSupport::new();
    import_packs(&mut support, &args.packs)?;

    let mut rows: Vec<EntryRow> = support
        .message_codes()
        .filter_map(|code| support.get_message(code).map(|m| EntryRow::message(code, m)))
        .collect();
    rows.extend(
        support
            .template_names()
            .filter_map(|name| support.get_template(name).map(|t| EntryRow::template(name, t))),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
    } else {
        println!("{}", format_entry_table(&rows));
    }
    Ok(exitcode::OK)
}
