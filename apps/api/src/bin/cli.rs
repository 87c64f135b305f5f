//! Interactive ZIP lookup: `ziplens-cli [ZIP]`, prompting when no ZIP is given.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ziplens::{generate_tax_breaks, render_text, AreaCode, Config, ProfileBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Diagnostics go to stderr so they never interleave with the report.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let raw = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => prompt("Enter a ZIP code: ")?,
    };

    let area = match AreaCode::parse(&raw) {
        Ok(area) => area,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let builder =
        ProfileBuilder::from_config(&config).context("Failed to initialize data sources")?;
    let report = generate_tax_breaks(&builder, &area).await;

    let text = render_text(&report).context("Failed to format the report")?;
    print!("{text}");
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{message}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read ZIP code from stdin")?;
    Ok(line.trim().to_string())
}
