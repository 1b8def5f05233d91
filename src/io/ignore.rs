//! Ignore lists: one taxon code per line.

use crate::error::RefineError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads taxon codes that must never be masked.
///
/// Lines are trimmed, blank lines are skipped.
pub fn read_ignore_list<P: AsRef<Path>>(path: P) -> Result<HashSet<String>, RefineError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_ignore_list(&content))
}

fn parse_ignore_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_and_padding() {
        let taxa = parse_ignore_list("Atha\n\n  Osat \r\n\t\nAtha\n");
        assert_eq!(taxa.len(), 2);
        assert!(taxa.contains("Atha"));
        assert!(taxa.contains("Osat"));
    }

    #[test]
    fn test_empty() {
        assert!(parse_ignore_list("").is_empty());
    }
}
