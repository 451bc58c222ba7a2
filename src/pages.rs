//! Page-range resolution.
//!
//! Every page-selecting operation (delete, extract, reorder, rotate,
//! split-by-range) accepts a human-entered page-range expression such as
//! `"1-3, 5, 7-10"`. This module resolves such an expression against a
//! document's page count into zero-based page indices.
//!
//! Resolution is deliberately forgiving: malformed tokens and out-of-range
//! pages are dropped silently rather than failing the whole expression.
//! Callers that require at least one page reject an empty result as a
//! user-facing error before any document is touched.
//!
//! # Examples
//!
//! ```
//! use pdfforge::pages::resolve;
//!
//! assert_eq!(resolve("1-3,5,7-10", 10), vec![0, 1, 2, 4, 6, 7, 8, 9]);
//! assert_eq!(resolve("", 3), vec![0, 1, 2]); // empty selects all
//! assert_eq!(resolve("abc,3", 5), vec![2]); // bad token skipped
//! ```

/// Resolve a page-range expression into a sorted, deduplicated set of
/// zero-based page indices (selection mode).
///
/// An empty or whitespace-only expression selects every page. Tokens are
/// comma-separated; each is either a single 1-based page number or an
/// inclusive 1-based range `start-end`. Whitespace anywhere in the
/// expression is ignored.
///
/// Tokens that fail to parse, ranges that are empty or inverted after
/// clamping, and pages outside `[1, total_pages]` contribute nothing.
/// This function never fails; the worst case is an empty result.
///
/// Every returned index satisfies `index < total_pages`.
pub fn resolve(expression: &str, total_pages: usize) -> Vec<usize> {
    let mut pages = collect(expression, total_pages);
    pages.sort_unstable();
    pages.dedup();
    pages
}

/// Resolve a page-range expression preserving the caller-given order
/// (order-preserving mode).
///
/// Used where the sequence itself is the payload, e.g. a page permutation
/// for reordering. Out-of-range and malformed tokens are still dropped
/// silently, but duplicates and the first-seen order of valid tokens are
/// kept as given.
pub fn resolve_ordered(expression: &str, total_pages: usize) -> Vec<usize> {
    collect(expression, total_pages)
}

/// Render a set of zero-based indices back as a 1-based comma list.
///
/// The output is a valid expression: `resolve(&to_expression(p), n)`
/// returns `p` again for any selection produced by [`resolve`].
pub fn to_expression(pages: &[usize]) -> String {
    pages
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Shared tokenizer for both resolution modes.
///
/// Yields zero-based indices in expression order, duplicates included.
fn collect(expression: &str, total_pages: usize) -> Vec<usize> {
    let stripped: String = expression.chars().filter(|c| !c.is_whitespace()).collect();

    if stripped.is_empty() {
        return (0..total_pages).collect();
    }

    let mut pages = Vec::new();

    for token in stripped.split(',') {
        if token.is_empty() {
            continue;
        }

        let parts: Vec<&str> = token.split('-').collect();

        if parts.len() == 2 {
            // Range token: both bounds must parse or the token is skipped.
            let (Ok(start), Ok(end)) = (parts[0].parse::<i64>(), parts[1].parse::<i64>()) else {
                continue;
            };

            let start = (start - 1).max(0);
            let end = end.min(total_pages as i64);

            let mut idx = start;
            while idx < end {
                pages.push(idx as usize);
                idx += 1;
            }
        } else if parts.len() == 1 {
            let Ok(page) = token.parse::<i64>() else {
                continue;
            };

            let idx = page - 1;
            if idx >= 0 && (idx as usize) < total_pages {
                pages.push(idx as usize);
            }
        }
        // More than one dash does not match the range shape; skip entirely.
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_expression_selects_all() {
        assert_eq!(resolve("", 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve("   ", 3), vec![0, 1, 2]);
    }

    #[test]
    fn empty_document_resolves_empty() {
        assert_eq!(resolve("", 0), Vec::<usize>::new());
        assert_eq!(resolve("1-3,5", 0), Vec::<usize>::new());
        assert_eq!(resolve_ordered("2,1", 0), Vec::<usize>::new());
    }

    #[rstest]
    #[case("1-3,5,7-10", 10, vec![0, 1, 2, 4, 6, 7, 8, 9])]
    #[case("5-3", 10, vec![])] // inverted range after clamping
    #[case("1,1,2", 10, vec![0, 1])] // dedup
    #[case("0,-1,99", 10, vec![])] // all out of range/invalid
    #[case("  2 , 4 ", 5, vec![1, 3])] // whitespace tolerant
    #[case("abc,3", 5, vec![2])] // malformed token skipped, valid kept
    #[case("1-2-3,4", 10, vec![3])] // multi-dash token skipped entirely
    #[case("2-100", 5, vec![1, 2, 3, 4])] // end clamped to page count
    #[case("1-1", 5, vec![0])] // single-page range
    #[case(",,3,", 5, vec![2])] // empty tokens ignored
    fn selection_cases(
        #[case] expression: &str,
        #[case] total_pages: usize,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(resolve(expression, total_pages), expected);
    }

    #[test]
    fn selection_is_sorted_and_in_bounds() {
        let result = resolve("9,1,4-6,2,100", 8);
        assert_eq!(result, vec![0, 1, 3, 4, 5]);

        let mut sorted = result.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(result, sorted);
        assert!(result.iter().all(|&p| p < 8));
    }

    #[test]
    fn resolution_is_idempotent_over_its_own_output() {
        let first = resolve("3-5,1,9", 10);
        let again = resolve(&to_expression(&first), 10);
        assert_eq!(first, again);
    }

    #[test]
    fn ordered_preserves_sequence_and_duplicates() {
        assert_eq!(resolve_ordered("3,1,2", 5), vec![2, 0, 1]);
        assert_eq!(resolve_ordered("2,2,1", 5), vec![1, 1, 0]);
        // Out-of-range entries drop out without disturbing the rest.
        assert_eq!(resolve_ordered("3,9,1", 5), vec![2, 0]);
    }

    #[test]
    fn ordered_expands_ranges_in_place() {
        assert_eq!(resolve_ordered("4-5,1-2", 10), vec![3, 4, 0, 1]);
    }

    #[test]
    fn ordered_empty_expression_selects_all_in_order() {
        assert_eq!(resolve_ordered("", 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn zero_and_negative_pages_are_dropped() {
        assert_eq!(resolve("0", 10), Vec::<usize>::new());
        assert_eq!(resolve("-3", 10), Vec::<usize>::new());
        // "-3" splits into an empty token and "3"; the empty side fails to
        // parse, so the whole token is skipped rather than read as page 3.
        assert_eq!(resolve("-3,2", 10), vec![1]);
    }

    #[test]
    fn to_expression_round_trip() {
        assert_eq!(to_expression(&[0, 2, 4]), "1,3,5");
        assert_eq!(to_expression(&[]), "");
    }
}
