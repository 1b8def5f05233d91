//! Taxon codes encoded in tip labels.
//!
//! Tips coming out of a multi-proteome search are labeled
//! `taxon_code@sequence_id`. Masking and taxon counting only look at the
//! part before the first `@`; labels without `@` (e.g. baits) are their own
//! taxon code.

/// Separator between taxon code and sequence id in tip labels
pub const TAXON_DELIMITER: char = '@';

/// Returns the taxon code of a tip label.
///
/// # Examples
/// ```
/// use treefish::model::taxon::taxon_code;
/// assert_eq!(taxon_code("Atha@AT1G01010.1"), "Atha");
/// assert_eq!(taxon_code("bait_seq"), "bait_seq");
/// ```
pub fn taxon_code(label: &str) -> &str {
    label
        .split_once(TAXON_DELIMITER)
        .map_or(label, |(code, _)| code)
}
