//! Inspector binary: feed it a raw LLM payload (file argument or stdin),
//! get the canonical record back as pretty JSON on stdout.

use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use analysis::normalize_text;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON for piping
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let raw = read_payload()?;
    info!("normalizing {} bytes of raw payload", raw.len());

    let record = normalize_text(&raw);
    let rendered =
        serde_json::to_string_pretty(&record).context("serializing canonical record")?;
    println!("{rendered}");

    Ok(())
}

/// Reads the payload from the file named by the first argument, or from
/// stdin when no argument is given.
fn read_payload() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("reading payload from {path}"))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading payload from stdin")?;
            Ok(buffer)
        }
    }
}
