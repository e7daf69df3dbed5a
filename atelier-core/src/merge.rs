//! Overlap-merge resolution for continued artifacts.
//!
//! When a model resumes a truncated artifact it often resends a suffix of
//! the content it already produced. [`merge`] splices the continuation onto
//! the existing content without duplicating that resent overlap.
//!
//! The resolver is deliberately conservative: when the existing tail looks
//! like it stops mid-statement, overlap detection is skipped entirely and
//! the continuation is concatenated verbatim. A falsely detected overlap
//! collapses legitimately repeated text, which is worse than the duplicate
//! a missed overlap leaves behind.

/// Keywords that leave a line syntactically open when they end it.
const BLOCK_OPENING_KEYWORDS: &[&str] = &["do", "then", "else", "try", "begin"];

/// Splice `incoming` continuation content onto `existing`.
///
/// Three regimes, checked in order:
///
/// 1. `existing` ends mid-statement: plain concatenation, no separator —
///    the continuation is assumed to finish the open line.
/// 2. `incoming` starts with a suffix of `existing` (candidate lengths
///    checked largest-first down to 1): the overlapping prefix is stripped
///    before concatenating.
/// 3. No overlap: concatenate, inserting a single newline unless either
///    side already provides one at the join point.
#[must_use]
pub fn merge(existing: &str, incoming: &str) -> String {
    if existing.is_empty() {
        return incoming.to_string();
    }
    if incoming.is_empty() {
        return existing.to_string();
    }

    if looks_mid_statement(existing) {
        let mut merged = String::with_capacity(existing.len() + incoming.len());
        merged.push_str(existing);
        merged.push_str(incoming);
        return merged;
    }

    if let Some(overlap) = overlap_len(existing, incoming) {
        let mut merged = String::with_capacity(existing.len() + incoming.len() - overlap);
        merged.push_str(existing);
        merged.push_str(&incoming[overlap..]);
        return merged;
    }

    let needs_separator = !existing.ends_with('\n') && !incoming.starts_with('\n');
    let mut merged = String::with_capacity(existing.len() + incoming.len() + 1);
    merged.push_str(existing);
    if needs_separator {
        merged.push('\n');
    }
    merged.push_str(incoming);
    merged
}

/// Longest suffix of `existing` that `incoming` starts with.
fn overlap_len(existing: &str, incoming: &str) -> Option<usize> {
    let max = existing.len().min(incoming.len());
    for len in (1..=max).rev() {
        if !existing.is_char_boundary(existing.len() - len) {
            continue;
        }
        let suffix = &existing[existing.len() - len..];
        if incoming.starts_with(suffix) {
            return Some(len);
        }
    }
    None
}

/// Whether `tail` appears to stop in the middle of a statement.
///
/// True when the last line ends with an open bracket, a trailing operator,
/// a colon, a backslash continuation, or a block-opening keyword. A tail
/// that already ends with a newline is never mid-statement.
#[must_use]
pub fn looks_mid_statement(tail: &str) -> bool {
    if tail.ends_with('\n') {
        return false;
    }
    let last_line = tail.rsplit('\n').next().unwrap_or(tail);
    let trimmed = last_line.trim_end_matches([' ', '\t']);
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.ends_with('\\') {
        return true;
    }
    let last = trimmed.chars().next_back().unwrap_or(' ');
    if matches!(
        last,
        // no `>` here: HTML and XML lines legitimately end with it
        '(' | '[' | '{' | ',' | ':' | '+' | '-' | '*' | '/' | '%' | '=' | '<' | '&' | '|'
    ) {
        return true;
    }

    let last_word = trimmed
        .rsplit(|c: char| !c.is_alphanumeric() && c != '_')
        .next()
        .unwrap_or("");
    BLOCK_OPENING_KEYWORDS.contains(&last_word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overlap_is_deduplicated() {
        assert_eq!(merge("Hello wor", "Hello world!"), "Hello world!");
    }

    #[test]
    fn test_partial_overlap() {
        assert_eq!(merge("abcdef", "def ghi"), "abcdef ghi");
    }

    #[test]
    fn test_largest_overlap_wins() {
        // both "aba" and "a" are suffixes that prefix the incoming text;
        // the largest candidate must be taken
        assert_eq!(merge("xaba", "abab"), "xabab");
    }

    #[test]
    fn test_mid_statement_concatenates_verbatim() {
        assert_eq!(
            merge("function f() {", "\n  return 1;\n}"),
            "function f() {\n  return 1;\n}"
        );
        assert_eq!(merge("let x =", " 5;"), "let x = 5;");
        assert_eq!(merge("items,", " more"), "items, more");
        assert_eq!(merge("line \\", "continued"), "line \\continued");
    }

    #[test]
    fn test_mid_statement_skips_overlap_detection() {
        // "if x then" resends nothing; a naive overlap search on the
        // trailing "n" would eat the continuation's first byte
        assert_eq!(merge("if x then", "n = n + 1"), "if x thenn = n + 1");
    }

    #[test]
    fn test_separator_inserted_between_lines() {
        assert_eq!(merge("line one", "line two"), "line one\nline two");
    }

    #[test]
    fn test_no_separator_when_either_side_has_newline() {
        assert_eq!(merge("line one\n", "line two"), "line one\nline two");
        assert_eq!(merge("done.", "\nnext"), "done.\nnext");
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(merge("", "abc"), "abc");
        assert_eq!(merge("abc", ""), "abc");
        assert_eq!(merge("", ""), "");
    }

    #[test]
    fn test_full_resend() {
        // continuation resends everything seen so far plus more
        assert_eq!(merge("# My Doc", "# My Doc\n\nBody"), "# My Doc\n\nBody");
    }

    #[test]
    fn test_looks_mid_statement() {
        assert!(looks_mid_statement("foo("));
        assert!(looks_mid_statement("a +"));
        assert!(looks_mid_statement("case x:"));
        assert!(looks_mid_statement("loop do"));
        assert!(looks_mid_statement("x = [1, 2,"));
        assert!(!looks_mid_statement("Hello wor"));
        assert!(!looks_mid_statement("complete sentence."));
        assert!(!looks_mid_statement("ends with newline\n"));
        assert!(!looks_mid_statement(""));
        // keyword must be a whole word
        assert!(!looks_mid_statement("overdo no wait redo"));
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(merge("héllo wö", "héllo wörld"), "héllo wörld");
    }
}
