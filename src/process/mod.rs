// src/process/mod.rs

pub mod augment;
pub mod split;
pub mod strip;

/// Phrase introducing every exercises INSERT statement in the dumps.
pub const INSERT_PHRASE: &str = "INSERT INTO exercises";

/// Blank lines carry no SQL and are dropped by the stripper.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

pub(crate) fn is_statement_start(line: &str) -> bool {
    line.trim_start().starts_with(INSERT_PHRASE)
}

/// A value tuple opens with a parenthesis, e.g. `('Squat', 'LEGS', ...)`.
pub(crate) fn is_value_tuple(line: &str) -> bool {
    line.trim_start().starts_with('(')
}

/// The last value tuple of a statement closes it with a semicolon.
pub(crate) fn ends_statement(line: &str) -> bool {
    line.trim_end().ends_with(';')
}
