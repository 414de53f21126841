//! # Identifiers
//!
//! Every entity is keyed by a human-assigned identifier of the shape
//! `<PREFIX>_<integer>` (`NOTA_7`, `BRG_12`, `PELANGGAN_3`).
//!
//! ## Ordering Contract
//! ```text
//! Lexical:  NOTA_1, NOTA_10, NOTA_2, NOTA_9     ❌
//! Numeric:  NOTA_1, NOTA_2,  NOTA_9, NOTA_10    ✅  (every list uses this)
//! ```
//!
//! An id whose suffix is not a number sorts as suffix 0; ties fall back to
//! the full string so the order is total and stable.

use std::cmp::Ordering;

/// Splits `id` into its prefix and numeric suffix.
///
/// Returns `None` unless the id is `<non-empty prefix>_<digits>`.
///
/// ```rust
/// use toko_core::identifier::parse;
///
/// assert_eq!(parse("BRG_12"), Some(("BRG", 12)));
/// assert_eq!(parse("BRG_"), None);
/// assert_eq!(parse("BRG12"), None);
/// ```
pub fn parse(id: &str) -> Option<(&str, u128)> {
    let (prefix, suffix) = id.rsplit_once('_')?;
    if prefix.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(|n| (prefix, n))
}

/// The numeric suffix used for ordering (0 when absent).
pub fn suffix_number(id: &str) -> u128 {
    parse(id).map(|(_, n)| n).unwrap_or(0)
}

/// Compares two identifiers by numeric suffix, then lexically.
pub fn compare(a: &str, b: &str) -> Ordering {
    suffix_number(a)
        .cmp(&suffix_number(b))
        .then_with(|| a.cmp(b))
}

/// Sorts records in place by their identifier.
pub fn sort_by_id<T, F>(records: &mut [T], id_of: F)
where
    F: Fn(&T) -> &str,
{
    records.sort_by(|a, b| compare(id_of(a), id_of(b)));
}

/// Proposes the next free identifier for `prefix`.
///
/// Takes the highest numeric suffix among ids carrying exactly this prefix
/// and adds one; ids with another prefix or no number are ignored.
///
/// ```rust
/// use toko_core::identifier::next_id;
///
/// assert_eq!(next_id("BRG", ["BRG_1", "BRG_10", "BRG_3"]), "BRG_11");
/// assert_eq!(next_id("NOTA", Vec::<&str>::new()), "NOTA_1");
/// ```
pub fn next_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(parse)
        .filter(|(p, _)| *p == prefix)
        .map(|(_, n)| n)
        .max()
        .unwrap_or(0);

    format!("{}_{}", prefix, max + 1)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_not_lexical_order() {
        let mut ids = vec!["NOTA_10", "NOTA_1", "NOTA_9", "NOTA_2"];
        sort_by_id(&mut ids, |s| *s);
        assert_eq!(ids, vec!["NOTA_1", "NOTA_2", "NOTA_9", "NOTA_10"]);
    }

    #[test]
    fn test_prefix_with_underscore() {
        assert_eq!(parse("TOKO_A_3"), Some(("TOKO_A", 3)));
    }

    #[test]
    fn test_unparseable_suffix_sorts_first() {
        let mut ids = vec!["BRG_2", "BRG_X", "BRG_1"];
        sort_by_id(&mut ids, |s| *s);
        assert_eq!(ids, vec!["BRG_X", "BRG_1", "BRG_2"]);
    }

    #[test]
    fn test_ties_break_lexically() {
        assert_eq!(compare("A_1", "B_1"), Ordering::Less);
        assert_eq!(compare("B_01", "B_1"), Ordering::Less);
    }

    #[test]
    fn test_next_id_ignores_other_prefixes() {
        let ids = ["PELANGGAN_4", "NOTA_99", "PELANGGAN_10", "garbage"];
        assert_eq!(next_id("PELANGGAN", ids), "PELANGGAN_11");
    }
}
