use anyhow::{Context, Result};
use csvmap::{csv_record, CsvIterator, CsvOptions};
use reqwest::blocking::Response;
use std::{env, fs::File, io::Read, time::Instant};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

csv_record! {
    /// Binds no columns: every row maps to an empty record, so this reads
    /// any CSV regardless of its header.
    #[derive(Debug, Default)]
    struct AnyRow {}
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) args + options ───────────────────────────────────────────
    let source = env::args()
        .nth(1)
        .context("Usage: csvmap <PATH_OR_URL>")?;
    let options = CsvOptions::from_env().context("reading CSVMAP_* options")?;

    // ─── 3) open + count ─────────────────────────────────────────────
    let start = Instant::now();
    let rows = if source.starts_with("http://") || source.starts_with("https://") {
        let it: CsvIterator<AnyRow, Response> = CsvIterator::from_url_with_options(&source, &options)
            .with_context(|| format!("opening {}", source))?;
        report(it)?
    } else {
        let it: CsvIterator<AnyRow, File> = CsvIterator::from_file_with_options(&source, &options)
            .with_context(|| format!("opening {}", source))?;
        report(it)?
    };

    info!(source = %source, rows, elapsed = ?start.elapsed(), "done");
    Ok(())
}

/// Print the header and return the number of data rows.
fn report<R: Read>(mut it: CsvIterator<AnyRow, R>) -> Result<u64> {
    println!("{} columns:", it.headers().len());
    for (idx, name) in it.headers().iter().enumerate() {
        println!("  {:>3}  {}", idx, name.trim());
    }

    let mut rows = 0u64;
    for item in it.by_ref() {
        if let Err(e) = item {
            error!("stopped after {} rows: {}", rows, e);
            return Err(e.into());
        }
        rows += 1;
    }
    it.close();

    println!("{} rows", rows);
    Ok(rows)
}
