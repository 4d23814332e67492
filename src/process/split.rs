// src/process/split.rs

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::process::INSERT_PHRASE;

/// Statement selecting the target database, prepended to every part file.
const USE_STATEMENT: &str = "USE liftupai_db;";

/// Reconstructs one standalone statement per occurrence of the INSERT
/// phrase. The split eats the phrase, so each fragment gets it re-prepended
/// along with the USE preamble; anything before the first occurrence is
/// file preamble, not a statement, and is skipped.
pub fn split_statements(text: &str) -> Vec<String> {
    text.split(INSERT_PHRASE)
        .skip(1)
        .map(|fragment| {
            format!(
                "{}\n\n{}{}",
                USE_STATEMENT,
                INSERT_PHRASE,
                truncate_after_last_terminator(fragment)
            )
        })
        .collect()
}

/// Cuts the fragment after its last line whose right-trimmed content ends
/// with a semicolon, discarding content the naive phrase split leaked past
/// the statement's true end. A fragment with no such line is returned
/// unchanged. The scan runs before the preamble is prepended, so the USE
/// line is never a truncation candidate.
fn truncate_after_last_terminator(fragment: &str) -> String {
    let lines: Vec<&str> = fragment.split('\n').collect();
    match lines.iter().rposition(|l| l.trim_end().ends_with(';')) {
        Some(idx) => lines[..=idx].join("\n"),
        None => fragment.to_string(),
    }
}

/// Splits the dump at `input` into one `exercises_part_<N>.sql` file per
/// INSERT statement under `out_dir`, N starting at 1 in discovery order.
#[instrument(level = "info", skip(input, out_dir), fields(input = %input.as_ref().display()))]
pub fn split_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, out_dir: Q) -> Result<Vec<PathBuf>> {
    let start = Instant::now();
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.as_ref().display()))?;

    let statements = split_statements(&text);
    debug!(count = statements.len(), "reconstructed statements");

    let mut written = Vec::with_capacity(statements.len());
    for (i, statement) in statements.iter().enumerate() {
        let path = out_dir.join(format!("exercises_part_{}.sql", i + 1));
        fs::write(&path, statement)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("created {}", path.display());
        written.push(path);
    }

    info!(files = written.len(), "completed in {:?}", start.elapsed());
    Ok(written)
}
