//! Artifact tag scanning.
//!
//! Locates artifact markers inside model output text. The scanner is
//! stateless: streaming callers decide how much trailing text to withhold
//! between chunks using [`holdback_len`] / [`longest_trailing_partial_marker`],
//! and feed the scanner whole buffers.
//!
//! The wire syntax is
//!
//! ```text
//! <artifact type="text/html" id="page" title="My Page">
//! ...verbatim content...
//! </artifact>
//! ```
//!
//! An opening marker without an `id` attribute is not a tag — scanning
//! continues past it and the marker stays in the narrative text. An opening
//! marker whose `>` has not arrived yet is not a tag *yet*.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactKind, DEFAULT_TITLE};

/// Default opening-marker prefix.
pub const DEFAULT_OPEN_PREFIX: &str = "<artifact";
/// Default closing-marker literal.
pub const DEFAULT_CLOSE_MARKER: &str = "</artifact>";

const ATTR_ID: &str = "id";
const ATTR_TYPE: &str = "type";
const ATTR_LANGUAGE: &str = "language";
const ATTR_TITLE: &str = "title";
const ATTR_CONTINUE: &str = "continue";

/// Tag delimiters.
///
/// Delimiters are configuration, not hard-coded literals; the defaults match
/// the wire protocol above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Opening-marker prefix, e.g. `<artifact`. The character following it
    /// must be whitespace or `>` for the marker to count.
    pub open_prefix: String,
    /// Closing-marker literal, e.g. `</artifact>`.
    pub close_marker: String,
}

impl TagConfig {
    /// Create a config with custom delimiters.
    #[must_use]
    pub fn new(open_prefix: impl Into<String>, close_marker: impl Into<String>) -> Self {
        Self {
            open_prefix: open_prefix.into(),
            close_marker: close_marker.into(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_PREFIX, DEFAULT_CLOSE_MARKER)
    }
}

/// Attribute map parsed from an opening marker.
///
/// A small explicit tokenizer over `name="value"` pairs. Attribute order is
/// insignificant to the protocol but preserved here for faithful re-display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAttributes(IndexMap<String, String>);

impl TagAttributes {
    /// Tokenize the attribute span of an opening marker (the text between
    /// the prefix and the terminating `>`).
    ///
    /// Values must be double-quoted; content is taken verbatim with no
    /// escape processing. Malformed fragments are skipped, not fatal.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut attrs = IndexMap::new();
        let bytes = raw.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            // skip to the start of a name
            while pos < bytes.len() && !is_name_byte(bytes[pos]) {
                pos += 1;
            }
            let name_start = pos;
            while pos < bytes.len() && is_name_byte(bytes[pos]) {
                pos += 1;
            }
            if name_start == pos {
                break;
            }
            let name = &raw[name_start..pos];

            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= bytes.len() || bytes[pos] != b'=' {
                // bare attribute without a value; skip it
                continue;
            }
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= bytes.len() || bytes[pos] != b'"' {
                continue;
            }
            pos += 1;
            let value_start = pos;
            while pos < bytes.len() && bytes[pos] != b'"' {
                pos += 1;
            }
            if pos >= bytes.len() {
                // unterminated value; the marker itself was terminated, so
                // treat the fragment as absent
                break;
            }
            attrs.insert(name.to_string(), raw[value_start..pos].to_string());
            pos += 1;
        }

        Self(attrs)
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of parsed attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no attributes were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// A resolved opening tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatch {
    /// Byte offset of the marker's first character.
    pub start: usize,
    /// Byte offset just past the terminating `>`.
    pub tag_end: usize,
    /// Mandatory artifact identifier.
    pub id: String,
    /// Content kind, defaulted from the `type` attribute.
    pub kind: ArtifactKind,
    /// Optional language hint.
    pub language: Option<String>,
    /// Display title, defaulted to "Untitled".
    pub title: String,
    /// Whether the tag resumes a previously incomplete artifact.
    pub continued: bool,
    /// The full attribute map, for callers that need more.
    pub attributes: TagAttributes,
}

/// Locate the next complete opening tag at or after `from`.
///
/// Returns `None` when no *terminated* opening marker with an `id` attribute
/// exists in `text[from..]`. A marker missing its `id` is treated as plain
/// text and scanning continues past it; a marker missing its terminating `>`
/// is not a tag yet.
#[must_use]
pub fn find_next_tag(config: &TagConfig, text: &str, from: usize) -> Option<TagMatch> {
    let mut search = from;

    while let Some(rel) = text[search..].find(&config.open_prefix) {
        let start = search + rel;
        let after_prefix = start + config.open_prefix.len();

        match text[after_prefix..].chars().next() {
            // prefix flush at end of text: terminator cannot have arrived
            None => return None,
            Some(c) if c.is_whitespace() || c == '>' => {}
            // e.g. `<artifacts>`: a longer word, not our marker
            Some(_) => {
                search = after_prefix;
                continue;
            }
        }

        let Some(gt_rel) = find_unquoted_gt(&text[after_prefix..]) else {
            return None;
        };
        let tag_end = after_prefix + gt_rel + 1;
        let attributes = TagAttributes::parse(&text[after_prefix..after_prefix + gt_rel]);

        match attributes.get(ATTR_ID) {
            Some(id) if !id.is_empty() => {
                let kind = attributes
                    .get(ATTR_TYPE)
                    .map(ArtifactKind::from_type_attr)
                    .unwrap_or_default();
                let language = attributes.get(ATTR_LANGUAGE).map(str::to_string);
                let title = attributes
                    .get(ATTR_TITLE)
                    .unwrap_or(DEFAULT_TITLE)
                    .to_string();
                let continued = attributes.get(ATTR_CONTINUE) == Some("true");
                return Some(TagMatch {
                    start,
                    tag_end,
                    id: id.to_string(),
                    kind,
                    language,
                    title,
                    continued,
                    attributes,
                });
            }
            // no id: not a tag, keep scanning after the marker
            _ => {
                search = tag_end;
            }
        }
    }

    None
}

/// Locate the next closing marker at or after `from`.
#[must_use]
pub fn find_closing_marker(config: &TagConfig, text: &str, from: usize) -> Option<usize> {
    text[from..].find(&config.close_marker).map(|rel| from + rel)
}

/// Length of the longest suffix of `text` that is a *proper* prefix of
/// `marker`.
///
/// Streaming callers withhold that many trailing bytes because they might be
/// the start of a marker split across chunks. Candidate lengths are checked
/// from `min(len(marker) - 1, len(text))` down to 1; returns 0 when no
/// suffix qualifies.
#[must_use]
pub fn longest_trailing_partial_marker(text: &str, marker: &str) -> usize {
    let text = text.as_bytes();
    let marker = marker.as_bytes();
    if marker.is_empty() {
        return 0;
    }
    let max = (marker.len() - 1).min(text.len());
    for len in (1..=max).rev() {
        if text[text.len() - len..] == marker[..len] {
            return len;
        }
    }
    0
}

/// How many trailing bytes of `text` a streaming caller must withhold while
/// outside an artifact.
///
/// Covers both withholding cases: a trailing fragment that is a proper
/// prefix of the opening marker, and a full opening marker whose
/// terminating `>` has not arrived. Text already containing a complete tag
/// should be drained through [`find_next_tag`] first.
#[must_use]
pub fn holdback_len(config: &TagConfig, text: &str) -> usize {
    let mut search = 0;

    while let Some(rel) = text[search..].find(&config.open_prefix) {
        let start = search + rel;
        let after_prefix = start + config.open_prefix.len();

        match text[after_prefix..].chars().next() {
            None => return text.len() - start,
            Some(c) if c.is_whitespace() || c == '>' => {
                match find_unquoted_gt(&text[after_prefix..]) {
                    // terminated marker (the caller already decided it was
                    // not a tag); it is plain text, move past it
                    Some(gt_rel) => search = after_prefix + gt_rel + 1,
                    None => return text.len() - start,
                }
            }
            Some(_) => search = after_prefix,
        }
    }

    longest_trailing_partial_marker(text, &config.open_prefix)
}

/// Find the first `>` outside a double-quoted attribute value.
///
/// Attribute values may contain `>`, so the marker terminator is the first
/// unquoted one. Returns `None` if the text ends first (including while a
/// quote is still open).
fn find_unquoted_gt(text: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'>' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> TagConfig {
        TagConfig::default()
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = TagAttributes::parse(r#" type="text/html" id="page" title="My Page""#);
        assert_eq!(attrs.get("type"), Some("text/html"));
        assert_eq!(attrs.get("id"), Some("page"));
        assert_eq!(attrs.get("title"), Some("My Page"));
        assert_eq!(attrs.get("missing"), None);
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_parse_attributes_order_insignificant() {
        let text = r#"Start <artifact title="T" language="rust" id="x" type="code">"#;
        let tag = find_next_tag(&config(), text, 0).unwrap();
        assert_eq!(tag.id, "x");
        assert_eq!(tag.kind, ArtifactKind::Code);
        assert_eq!(tag.language.as_deref(), Some("rust"));
        assert_eq!(tag.title, "T");
        assert!(!tag.continued);
    }

    #[test]
    fn test_find_next_tag_defaults() {
        let text = r#"<artifact id="bare">"#;
        let tag = find_next_tag(&config(), text, 0).unwrap();
        assert_eq!(tag.kind, ArtifactKind::PlainText);
        assert_eq!(tag.title, DEFAULT_TITLE);
        assert_eq!(tag.language, None);
        assert_eq!(tag.start, 0);
        assert_eq!(tag.tag_end, text.len());
    }

    #[test]
    fn test_missing_id_is_not_a_tag() {
        let text = r#"a <artifact type="code"> b <artifact id="real"> c"#;
        let tag = find_next_tag(&config(), text, 0).unwrap();
        assert_eq!(tag.id, "real");
        assert!(tag.start > text.find('b').unwrap());
    }

    #[test]
    fn test_unterminated_marker_is_not_a_tag_yet() {
        assert!(find_next_tag(&config(), r#"text <artifact id="a"#, 0).is_none());
        assert!(find_next_tag(&config(), "text <artifact", 0).is_none());
    }

    #[test]
    fn test_longer_word_is_plain_text() {
        assert!(find_next_tag(&config(), r#"see <artifacts id="a"> here"#, 0).is_none());
    }

    #[test]
    fn test_gt_inside_quoted_value() {
        let text = r#"<artifact id="cmp" title="a > b">body"#;
        let tag = find_next_tag(&config(), text, 0).unwrap();
        assert_eq!(tag.title, "a > b");
        assert_eq!(&text[tag.tag_end..], "body");
    }

    #[test]
    fn test_continue_attribute() {
        let tag = find_next_tag(&config(), r#"<artifact id="a" continue="true">"#, 0).unwrap();
        assert!(tag.continued);
        let tag = find_next_tag(&config(), r#"<artifact id="a" continue="false">"#, 0).unwrap();
        assert!(!tag.continued);
    }

    #[test]
    fn test_find_closing_marker() {
        let text = "content</artifact> rest";
        assert_eq!(find_closing_marker(&config(), text, 0), Some(7));
        assert_eq!(find_closing_marker(&config(), text, 8), None);
    }

    #[test]
    fn test_longest_trailing_partial_marker() {
        let marker = DEFAULT_CLOSE_MARKER;
        assert_eq!(longest_trailing_partial_marker("hello", marker), 0);
        assert_eq!(longest_trailing_partial_marker("hello <", marker), 1);
        assert_eq!(longest_trailing_partial_marker("hello </artifac", marker), 9);
        // a full marker is not a partial one
        assert_eq!(longest_trailing_partial_marker("x</artifact>", marker), 0);
        // text shorter than the marker
        assert_eq!(longest_trailing_partial_marker("</a", marker), 3);
    }

    #[test]
    fn test_longest_trailing_partial_marker_is_exact() {
        // `<` appears twice; only the trailing run counts
        assert_eq!(
            longest_trailing_partial_marker("a < b </artif", DEFAULT_CLOSE_MARKER),
            7
        );
    }

    #[test]
    fn test_holdback_for_partial_prefix() {
        let cfg = config();
        assert_eq!(holdback_len(&cfg, "hello <artif"), 6);
        assert_eq!(holdback_len(&cfg, "hello <"), 1);
        assert_eq!(holdback_len(&cfg, "hello world"), 0);
    }

    #[test]
    fn test_holdback_for_unterminated_marker() {
        let cfg = config();
        let text = r#"intro <artifact id="a" title="Un"#;
        assert_eq!(holdback_len(&cfg, text), text.len() - 6);
        // flush prefix with no boundary character yet
        assert_eq!(holdback_len(&cfg, "intro <artifact"), "<artifact".len());
    }

    #[test]
    fn test_holdback_skips_terminated_markers() {
        let cfg = config();
        // the first marker is terminated (and id-less, so plain text);
        // nothing needs withholding
        assert_eq!(holdback_len(&cfg, r#"a <artifact type="code"> b"#), 0);
    }

    #[test]
    fn test_empty_id_is_not_a_tag() {
        assert!(find_next_tag(&config(), r#"<artifact id="">"#, 0).is_none());
    }

    #[test]
    fn test_custom_delimiters() {
        let cfg = TagConfig::new("<block", "</block>");
        let tag = find_next_tag(&cfg, r#"x <block id="b">y</block>"#, 0).unwrap();
        assert_eq!(tag.id, "b");
        assert_eq!(find_closing_marker(&cfg, r#"x <block id="b">y</block>"#, tag.tag_end), Some(17));
    }
}
