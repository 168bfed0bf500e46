//! Line filter entrypoint.
//! Reads `{"task": {...}, "record": {...}}` envelopes as NDJSON on stdin and
//! writes one storage document per accepted record to stdout. Rejected and
//! malformed lines are reported on stderr through `tracing`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, BufRead, BufWriter, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scrape_normalize::ingest::{self, config, taxonomy, RawRecord, RecordValidator, TaskMetadata};

#[derive(Debug, Deserialize)]
struct Envelope {
    task: TaskMetadata,
    record: RawRecord,
}

/// Compact logs to stderr; stdout carries the data.
/// `INGEST_LOG_JSON=1` switches to JSON lines for log shippers.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ingest=info,warn"));

    let json = std::env::var("INGEST_LOG_JSON").ok().is_some_and(|v| v == "1");
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

fn now_unix() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    taxonomy::install(config::load_taxonomy_default().context("loading taxonomy")?)?;
    let validator = RecordValidator::default();

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    let (mut stored, mut rejected, mut malformed) = (0usize, 0usize, 0usize);

    for (lineno, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let env: Envelope = match serde_json::from_str(&line) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(target: "ingest", line = lineno + 1, error = %e, "malformed envelope");
                malformed += 1;
                continue;
            }
        };

        // one crawl timestamp per record, shared by `version` and `crawled`
        match ingest::process(&validator, &env.task, &env.record, now_unix()) {
            Ok(doc) => {
                serde_json::to_writer(&mut out, &doc).context("writing document")?;
                out.write_all(b"\n").context("writing document")?;
                stored += 1;
            }
            Err(e) => {
                tracing::warn!(
                    target: "ingest",
                    taskid = %env.task.taskid,
                    url = %env.task.url,
                    field = e.field,
                    kind = e.kind.as_str(),
                    "record rejected"
                );
                rejected += 1;
            }
        }
    }
    out.flush().context("flushing stdout")?;

    tracing::info!(target: "ingest", stored, rejected, malformed, "done");
    Ok(())
}
