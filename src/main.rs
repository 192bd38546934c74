//! azmine: carve Azure authentication contexts and cached access tokens out
//! of process minidumps.
//!
//! The dump is treated as an opaque byte stream. Two artifacts are located by
//! fixed byte signatures, validated, and merged into one importable JSON
//! document.

mod error;
mod extract;
mod memory;

use anyhow::Context;
use clap::Parser;
use memory::image::DumpImage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "azmine")]
#[command(about = "Extract a token-embedded Azure authentication context from a minidump")]
#[command(version)]
struct Cli {
    /// Target minidump file
    #[arg(short = 'd', long = "dump")]
    dump: PathBuf,

    /// File to write the token-embedded context to
    #[arg(short = 'o', long = "outfile")]
    outfile: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let image = DumpImage::open(&cli.dump)
        .with_context(|| format!("failed to open dump {}", cli.dump.display()))?;
    tracing::debug!(size = image.size(), "mapped dump file");

    let document = extract::carve(&image)?;

    std::fs::write(&cli.outfile, &document)
        .with_context(|| format!("failed to write {}", cli.outfile.display()))?;
    tracing::info!(bytes = document.len(), "exported token-embedded context");

    println!("{}", cli.outfile.display());
    Ok(())
}
