use std::path::Path;

use crate::errors::PipelineError;

const BOM: char = '\u{feff}';

/// Reads a script file and splits it into executable batches.
pub fn read_script_batches(path: &Path) -> Result<Vec<String>, PipelineError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| PipelineError::file_system(path, e))?;
    Ok(split_batches(&text))
}

/// Splits script text into batches on lines holding only a batch separator
/// (`GO` in any case, or a lone `/`). A leading byte-order mark and
/// `USE <database>` lines are dropped so batches run against the session's
/// database. Blank batches are skipped.
pub fn split_batches(text: &str) -> Vec<String> {
    let text = text.trim_start_matches(BOM);

    let mut batches = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if is_separator(trimmed) {
            push_batch(&mut batches, &current);
            current.clear();
        } else if !is_use_statement(trimmed) {
            current.push(line.trim_end_matches('\r'));
        }
    }
    push_batch(&mut batches, &current);

    batches
}

fn push_batch(batches: &mut Vec<String>, lines: &[&str]) {
    let batch = lines.join("\n").trim().to_string();
    if !batch.is_empty() {
        batches.push(batch);
    }
}

fn is_separator(line: &str) -> bool {
    line == "/" || line.trim_end_matches(';').eq_ignore_ascii_case("go")
}

fn is_use_statement(line: &str) -> bool {
    let mut words = line.split_whitespace();
    matches!(words.next(), Some(w) if w.eq_ignore_ascii_case("use")) && words.next().is_some()
}
