// src/process/strip.rs

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::process::{ends_statement, is_blank, is_comment, is_statement_start, is_value_tuple};

/// Where the scanner sits relative to an INSERT statement's value section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Not inside any INSERT statement.
    Outside,
    /// Statement header seen, no value tuple yet.
    InHeader,
    /// At least one value tuple seen for the current statement.
    InBody,
}

/// Removes comment lines sitting between an INSERT header and its first
/// value tuple, and drops blank lines everywhere. All other lines pass
/// through byte for byte, line endings included.
///
/// Comments after the first tuple of a statement, or outside any statement,
/// are kept: only leading comments in a still-empty value section are noise.
pub fn strip_stray_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = ScanState::Outside;

    for line in text.split_inclusive('\n') {
        if is_blank(line) {
            continue;
        }
        if is_statement_start(line) {
            // A new header re-opens the header phase even mid-block.
            state = ScanState::InHeader;
            out.push_str(line);
        } else if is_comment(line) {
            if state != ScanState::InHeader {
                out.push_str(line);
            }
        } else if is_value_tuple(line) {
            state = if ends_statement(line) {
                ScanState::Outside
            } else {
                ScanState::InBody
            };
            out.push_str(line);
        } else {
            out.push_str(line);
        }
    }

    out
}

#[instrument(level = "info", skip(input, output), fields(input = %input.as_ref().display()))]
pub fn strip_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.as_ref().display()))?;

    let cleaned = strip_stray_comments(&text);

    fs::write(&output, cleaned)
        .with_context(|| format!("failed to write {}", output.as_ref().display()))?;
    info!("wrote {}", output.as_ref().display());
    Ok(())
}
