// src/process/augment.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::process::is_value_tuple;

/// Column list as it appears in the raw dumps, and its replacement carrying
/// the derived muscle_group column. The rewrite runs once over the whole
/// text before line processing.
const BASE_COLUMNS: &str =
    "INSERT INTO exercises (name, category, equipment, instructions) VALUES";
const AUGMENTED_COLUMNS: &str =
    "INSERT INTO exercises (name, category, equipment, instructions, muscle_group) VALUES";

/// Fields per value tuple in the raw dumps. Tuples with any other arity are
/// treated as already augmented (or malformed) and left alone.
const BASE_ARITY: usize = 4;

/// Exercise categories in marker-priority order, each with the Korean
/// muscle-group name it maps to.
const MUSCLE_GROUPS: &[(&str, &str)] = &[
    ("CHEST", "가슴"),
    ("BACK", "등"),
    ("LEGS", "하체"),
    ("SHOULDERS", "어깨"),
    ("ARMS", "팔"),
    ("CORE", "복근"),
    ("CARDIO", "유산소"),
    ("FULL_BODY", "전신"),
];

/// Muscle group for categories missing from the mapping.
const DEFAULT_MUSCLE_GROUP: &str = "기타";

/// Section markers (`-- CHEST 운동` and friends) paired with the category
/// each one activates.
static CATEGORY_MARKERS: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    MUSCLE_GROUPS
        .iter()
        .map(|(category, _)| (format!("-- {} 운동", category), *category))
        .collect()
});

/// Label lookup, falling back rather than failing on an unknown category.
fn muscle_group_for(category: &str) -> &'static str {
    MUSCLE_GROUPS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, group)| *group)
        .unwrap_or(DEFAULT_MUSCLE_GROUP)
}

/// First matching marker wins, preserving the original check order.
fn marker_category(line: &str) -> Option<&'static str> {
    CATEGORY_MARKERS
        .iter()
        .find(|(marker, _)| line.contains(marker.as_str()))
        .map(|(_, category)| *category)
}

/// Counts the top-level fields of a value tuple. Commas inside
/// single-quoted strings ('' escapes included) or nested parentheses do
/// not count, so instruction text like 'Bend knees, keep back straight'
/// stays one field.
fn tuple_arity(line: &str) -> usize {
    let mut fields = 1;
    let mut depth = 0usize;
    let mut in_string = false;
    for ch in line.chars() {
        match ch {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 1 => fields += 1,
            _ => {}
        }
    }
    fields
}

/// A tuple line is rewritten only while still at the raw arity, which makes
/// the transform idempotent.
fn qualifies(line: &str) -> bool {
    is_value_tuple(line) && tuple_arity(line) == BASE_ARITY
}

/// Appends the quoted label before the tuple's closing delimiter. The line
/// is matched and rebuilt right-trimmed; a tuple that closes with neither
/// `),` nor `);` on this line is left untouched.
fn augment_tuple(line: &str, group: &str) -> Option<String> {
    let trimmed = line.trim_end();
    if let Some(body) = trimmed.strip_suffix("),") {
        Some(format!("{}, '{}'),", body, group))
    } else if let Some(body) = trimmed.strip_suffix(");") {
        Some(format!("{}, '{}');", body, group))
    } else {
        None
    }
}

/// Rewrites the dump to carry the muscle_group column: the INSERT column
/// list gains the new name, and every raw value tuple below a category
/// marker gains the label for the active category. Tuples seen before any
/// marker have no category and pass through unchanged.
pub fn add_muscle_groups(text: &str) -> String {
    let text = text.replace(BASE_COLUMNS, AUGMENTED_COLUMNS);

    let mut out: Vec<String> = Vec::new();
    let mut current_category: Option<&'static str> = None;

    for line in text.split('\n') {
        if let Some(category) = marker_category(line) {
            current_category = Some(category);
            out.push(line.to_string());
            continue;
        }

        let augmented = current_category
            .filter(|_| qualifies(line))
            .and_then(|category| augment_tuple(line, muscle_group_for(category)));
        match augmented {
            Some(rewritten) => out.push(rewritten),
            None => out.push(line.to_string()),
        }
    }

    out.join("\n")
}

#[instrument(level = "info", skip(input, output), fields(input = %input.as_ref().display()))]
pub fn augment_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.as_ref().display()))?;

    let updated = add_muscle_groups(&text);
    debug!(bytes = updated.len(), "augmented dump");

    fs::write(&output, updated)
        .with_context(|| format!("failed to write {}", output.as_ref().display()))?;
    info!("wrote {}", output.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,seedfix::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const SAMPLE: &str = "\
INSERT INTO exercises (name, category, equipment, instructions) VALUES
-- CHEST 운동
('Bench Press', 'CHEST', 'Barbell', 'Lie flat and press'),
('Push Up', 'CHEST', 'Bodyweight', 'Plank, then push up'),
-- LEGS 운동
('Squat', 'LEGS', 'Barbell', 'desc'),
('Lunge', 'LEGS', 'Bodyweight', 'Step forward, drop the back knee');
";

    #[test]
    fn rewrites_column_list_once_globally() {
        let out = add_muscle_groups(SAMPLE);
        assert!(out.contains(
            "INSERT INTO exercises (name, category, equipment, instructions, muscle_group) VALUES"
        ));
        assert!(!out.contains(
            "INSERT INTO exercises (name, category, equipment, instructions) VALUES"
        ));
    }

    #[test]
    fn appends_label_for_active_category() {
        let out = add_muscle_groups(SAMPLE);
        assert!(out.contains("('Squat', 'LEGS', 'Barbell', 'desc', '하체'),"));
        assert!(out.contains("('Bench Press', 'CHEST', 'Barbell', 'Lie flat and press', '가슴'),"));
        // Statement-closing tuple keeps its semicolon.
        assert!(out
            .contains("('Lunge', 'LEGS', 'Bodyweight', 'Step forward, drop the back knee', '하체');"));
    }

    #[test]
    fn commas_inside_quoted_text_do_not_break_the_guard() {
        let out = add_muscle_groups(SAMPLE);
        assert!(out.contains("('Push Up', 'CHEST', 'Bodyweight', 'Plank, then push up', '가슴'),"));
    }

    #[test]
    fn marker_lines_pass_through_unchanged() {
        let out = add_muscle_groups(SAMPLE);
        assert!(out.contains("-- CHEST 운동\n"));
        assert!(out.contains("-- LEGS 운동\n"));
    }

    #[test]
    fn tuples_before_any_marker_are_untouched() {
        let input = "INSERT INTO exercises (name, category, equipment, instructions) VALUES\n('Plank', 'CORE', 'Bodyweight', 'Hold'),\n";
        let out = add_muscle_groups(input);
        assert!(out.contains("('Plank', 'CORE', 'Bodyweight', 'Hold'),"));
        assert!(!out.contains("복근"));
    }

    #[test]
    fn is_idempotent() {
        let once = add_muscle_groups(SAMPLE);
        let twice = add_muscle_groups(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn escaped_quotes_count_as_one_field() {
        assert_eq!(
            tuple_arity("('Farmer''s Walk', 'FULL_BODY', 'Dumbbell', 'Carry, walk, repeat'),"),
            4
        );
    }

    #[test]
    fn unmapped_category_falls_back() {
        assert_eq!(muscle_group_for("YOGA"), "기타");
        assert_eq!(muscle_group_for("LEGS"), "하체");
    }

    #[test]
    fn tuple_not_closing_on_this_line_is_left_alone() {
        let input = "-- ARMS 운동\n('Curl', 'ARMS', 'Dumbbell', 'Flex'\n";
        let out = add_muscle_groups(input);
        assert!(out.contains("('Curl', 'ARMS', 'Dumbbell', 'Flex'\n"));
    }

    #[test]
    fn trailing_whitespace_does_not_defeat_the_suffix_match() {
        let input = "-- CORE 운동\n('Sit Up', 'CORE', 'Bodyweight', 'Crunch'),   \n";
        let out = add_muscle_groups(input);
        assert!(out.contains("('Sit Up', 'CORE', 'Bodyweight', 'Crunch', '복근'),\n"));
    }

    #[test]
    fn augment_file_round_trips_through_disk() -> Result<()> {
        init_test_logging();
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("dump.sql");
        let output = dir.path().join("dump_updated.sql");
        fs::write(&input, SAMPLE)?;

        augment_file(&input, &output)?;

        let written = fs::read_to_string(&output)?;
        assert_eq!(written, add_muscle_groups(SAMPLE));
        Ok(())
    }
}
