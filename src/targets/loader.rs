use std::path::Path;

use crate::error::TargetError;

const UTF8_BOM: char = '\u{feff}';
const URL_COLUMN: &str = "url";

pub(super) fn read_target_file(path: &Path) -> Result<Vec<String>, TargetError> {
    let content = std::fs::read_to_string(path).map_err(|err| TargetError::ReadFile {
        path: path.to_path_buf(),
        source: err,
    })?;
    parse_target_lines(&content).ok_or_else(|| TargetError::MissingUrlColumn {
        path: path.to_path_buf(),
    })
}

/// Extracts URLs from file content.
///
/// A first line without `://` is a CSV header and must name a `url` column;
/// `None` is returned when it does not. Otherwise every non-empty line is a URL.
pub(super) fn parse_target_lines(content: &str) -> Option<Vec<String>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .peekable();

    let Some(first) = lines.peek().copied() else {
        return Some(Vec::new());
    };
    if first.contains("://") {
        return Some(lines.map(str::to_owned).collect());
    }

    let column = split_csv_line(first)
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case(URL_COLUMN))?;
    let urls = lines
        .skip(1)
        .filter_map(|row| {
            split_csv_line(row)
                .into_iter()
                .nth(column)
                .map(|value| value.trim().to_owned())
        })
        .filter(|value| !value.is_empty())
        .collect();
    Some(urls)
}

/// Splits one CSV record, honoring double quotes and `""` escapes.
pub(super) fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}
