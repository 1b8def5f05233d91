//! Utility functions for label escaping in Newick strings.
//!
//! Labels read from quoted tokens may contain characters that would break
//! the Newick structure when written back verbatim; [escape_label] quotes
//! them so that parsing the written string yields the same label again.

/// Characters that cannot appear in an unquoted Newick label
const SPECIAL_CHARS: &[char] = &[
    ' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'',
];

/// Checks whether a label needs single quotes to be written as Newick.
///
/// The empty label is quoted as well, `''`, to tell it apart from a
/// missing one.
///
/// # Examples
/// ```
/// # use treefish::parser::utils::needs_quotes;
/// assert!(!needs_quotes("Atha@AT1G01010.1"));
/// assert!(needs_quotes("Swamp hen"));
/// assert!(needs_quotes("Baillon's"));
/// assert!(needs_quotes(""));
/// ```
pub fn needs_quotes(label: &str) -> bool {
    label.is_empty() || label.chars().any(|c| SPECIAL_CHARS.contains(&c))
}

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters (punctuation, delimiters, whitespace)
/// are wrapped in single quotes and internal single quotes are doubled.
/// Anything else is returned unchanged.
///
/// # Examples
/// ```
/// # use treefish::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label(""), "''");
/// ```
pub fn escape_label(label: &str) -> String {
    if needs_quotes(label) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
