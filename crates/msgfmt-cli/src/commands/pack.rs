//! Implementation of the `msgfmt pack` command.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use miette::{miette, IntoDiagnostic, WrapErr};
use owo_colors::OwoColorize;

use super::load_definitions;

/// Arguments for the pack command.
#[derive(Debug, clap::Args)]
pub struct PackArgs {
    /// JSON message definitions
    pub definitions: PathBuf,

    /// Pack file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Only pack messages whose code starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Run the pack command.
pub fn run_pack(args: PackArgs) -> miette::Result<i32> {
    let support = load_definitions(&args.definitions)?;

    let file = File::create(&args.output)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    let prefix = args.prefix.as_deref().unwrap_or_default();
    support
        .export_messages(&mut writer, |code| code.starts_with(prefix))
        .map_err(|e| miette!("cannot write {}: {e}", args.output.display()))?;
    writer
        .into_inner()
        .map_err(|e| miette!("cannot write {}: {}", args.output.display(), e.error()))?;

    let packed = support
        .message_codes()
        .filter(|code| code.starts_with(prefix))
        .count();
    println!(
        "{} {} messages to {}",
        "packed".green().bold(),
        packed,
        args.output.display()
    );
    Ok(exitcode::OK)
}
