//! msgfmt CLI entry point.
//!
//! - `msgfmt pack` - Compile JSON message definitions into a binary pack
//! - `msgfmt inspect` - List the messages and templates of packs
//! - `msgfmt format` - Format a message from packs or definitions

mod commands;
mod definitions;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_format, run_inspect, run_pack, FormatArgs, InspectArgs, PackArgs};
use tracing_subscriber::EnvFilter;

/// Message pack tools.
#[derive(Debug, Parser)]
#[command(name = "msgfmt")]
#[command(about = "Build, inspect and format message packs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// When to color output
    #[arg(long, value_enum, global = true, default_value_t = ColorWhen::Auto)]
    pub color: ColorWhen,

    /// Log formatting decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile JSON message definitions into a pack
    Pack(PackArgs),
    /// List the contents of message packs
    Inspect(InspectArgs),
    /// Format one message
    Format(FormatArgs),
}

fn setup_colors(color_when: ColorWhen) {
    match color_when {
        // owo-colors checks TTY, NO_COLOR and FORCE_COLOR itself
        ColorWhen::Auto => {}
        ColorWhen::Always => owo_colors::set_override(true),
        ColorWhen::Never => owo_colors::set_override(false),
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(stderr)
        .init();
}

fn install_report_handler() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| {
        let handler = miette::MietteHandlerOpts::new()
            .terminal_links(true)
            .unicode(true)
            .context_lines(2)
            .build();
        Box::new(handler)
    }))?;
    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);
    install_report_handler()?;

    let outcome = match cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Inspect(args) => run_inspect(args),
        Commands::Format(args) => run_format(args),
    };
    let code = outcome.unwrap_or_else(|report| {
        eprintln!("{report:?}");
        exitcode::SOFTWARE
    });
    exit(code)
}
