//! Heading extraction from case-study markdown.
//!
//! A heading is a line of 1-6 `#`, whitespace, then text, optionally ending
//! in an identifier marker ` {#id}`. The marker is what keeps a heading's
//! identity stable across edits: [`ensure_heading_ids`] writes one into every
//! heading that lacks it, and every later parse reuses it verbatim.

use std::collections::HashSet;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::ids;
use crate::types::Heading;

/// `#`-run, whitespace, lazy text, optional end-anchored marker.
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^(#{1,6})\s+(.+?)(?:\s+\{#([a-zA-Z0-9_-]+)\})?$").expect("valid regex");
});

/// A marker with nothing before it, which the lazy text group captures whole.
static BARE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^\{#[a-zA-Z0-9_-]+\}$").expect("valid regex");
});

/// A heading as written in the source, marker optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRecord {
    /// Identifier from the marker, if the line carries one.
    pub id: Option<String>,
    /// Count of leading `#`.
    pub level: u8,
    /// Zero-based source line.
    pub line: usize,
    /// Trimmed heading text, marker stripped.
    pub text: String,
}

/// Output of [`ensure_heading_ids`]: rewritten source plus its heading index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredDocument {
    /// Source with a marker on every heading.
    pub content: String,
    /// Headings in document order.
    pub heading_index: Vec<Heading>,
}

/// One matched heading line, borrowed from the source.
struct ParsedLine<'a> {
    /// The raw `#` run.
    hashes: &'a str,
    /// Identifier from the marker.
    marker: Option<&'a str>,
    /// Trimmed text, never empty.
    text: &'a str,
}

impl ParsedLine<'_> {
    /// Number of `#` characters, always 1..=6 by the pattern.
    fn level(&self) -> u8 {
        return u8::try_from(self.hashes.len()).unwrap_or(u8::MAX);
    }
}

/// Split a trailing carriage return off so CRLF documents parse like LF ones.
fn split_carriage_return(line: &str) -> (&str, &str) {
    return match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    };
}

/// Match one line against the heading grammar.
/// Lines whose text is empty after trimming, or is only a marker, are not
/// headings.
fn parse_heading_line(line: &str) -> Option<ParsedLine<'_>> {
    let caps = HEADING_PATTERN.captures(line)?;
    let hashes = caps.get(1)?.as_str();
    let text = caps.get(2)?.as_str().trim();
    if text.is_empty() || BARE_MARKER.is_match(text) {
        return None;
    }
    return Some(ParsedLine {
        hashes,
        marker: caps.get(3).map(|m| return m.as_str()),
        text,
    });
}

/// Read-only extraction: headings in document order, markers as written.
/// Never generates identifiers.
pub fn extract_headings(content: &str) -> Vec<HeadingRecord> {
    return content
        .split('\n')
        .enumerate()
        .filter_map(|(index, raw)| {
            let (line, _) = split_carriage_return(raw);
            let parsed = parse_heading_line(line)?;
            return Some(HeadingRecord {
                id: parsed.marker.map(str::to_string),
                level: parsed.level(),
                line: index,
                text: parsed.text.to_string(),
            });
        })
        .collect();
}

/// Give every heading a marker, using the thread-local RNG for new ids.
pub fn ensure_heading_ids(content: &str) -> EnsuredDocument {
    return ensure_heading_ids_with(content, &mut rand::rng());
}

/// Give every heading a marker, drawing new ids from `rng`.
///
/// Existing markers are reused verbatim. A marker that repeats an earlier
/// heading's id is replaced, so ids stay unique within the index. New ids
/// never collide with any marker already present in the source.
pub fn ensure_heading_ids_with<R: Rng + ?Sized>(content: &str, rng: &mut R) -> EnsuredDocument {
    let mut taken: HashSet<String> = extract_headings(content)
        .into_iter()
        .filter_map(|h| return h.id)
        .collect();
    let mut assigned: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();
    let mut heading_index = Vec::new();

    for (index, raw) in content.split('\n').enumerate() {
        let (line, line_ending) = split_carriage_return(raw);
        let Some(parsed) = parse_heading_line(line) else {
            lines.push(raw.to_string());
            continue;
        };

        let reusable = parsed.marker.filter(|id| return !assigned.contains(*id));
        let id = match reusable {
            Some(existing) => {
                lines.push(raw.to_string());
                existing.to_string()
            },
            None => {
                let fresh = fresh_id(&mut taken, rng);
                lines.push(format!("{} {} {{#{fresh}}}{line_ending}", parsed.hashes, parsed.text));
                tracing::trace!(line = index, id = %fresh, "assigned heading id");
                fresh
            },
        };

        assigned.insert(id.clone());
        heading_index.push(Heading {
            id,
            level: parsed.level(),
            line: index,
            text: parsed.text.to_string(),
        });
    }

    return EnsuredDocument {
        content: lines.join("\n"),
        heading_index,
    };
}

/// Draw an id not yet in `taken` and reserve it.
fn fresh_id<R: Rng + ?Sized>(taken: &mut HashSet<String>, rng: &mut R) -> String {
    loop {
        let candidate = ids::generate_id_with(rng);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn assigns_missing_ids_and_keeps_existing_ones() {
        let mut rng = StdRng::seed_from_u64(1);
        let doc = ensure_heading_ids_with("# Intro\n## Details {#abc123}\n", &mut rng);

        assert_eq!(doc.heading_index.len(), 2);
        let intro = &doc.heading_index[0];
        assert_eq!((intro.level, intro.text.as_str(), intro.line), (1, "Intro", 0));
        assert_eq!(
            doc.content,
            format!("# Intro {{#{}}}\n## Details {{#abc123}}\n", intro.id)
        );
        assert_eq!(
            doc.heading_index[1],
            Heading {
                id: "abc123".to_string(),
                level: 2,
                line: 1,
                text: "Details".to_string(),
            }
        );
    }

    #[test]
    fn second_pass_is_identity() {
        let first = ensure_heading_ids("# A\ntext\n### B\n# C {#c}\n");
        let second = ensure_heading_ids(&first.content);
        assert_eq!(first, second);
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        assert!(extract_headings("####### deep").is_empty());
        assert_eq!(extract_headings("###### six").len(), 1);
    }

    #[test]
    fn requires_whitespace_after_hashes() {
        assert!(extract_headings("#hashtag").is_empty());
    }

    #[test]
    fn marker_must_end_the_line() {
        let headings = extract_headings("# Title {#abc} trailing");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, None);
        assert_eq!(headings[0].text, "Title {#abc} trailing");
    }

    #[test]
    fn malformed_marker_stays_in_text() {
        let headings = extract_headings("# Title {#bad id}");
        assert_eq!(headings[0].id, None);
        assert_eq!(headings[0].text, "Title {#bad id}");
    }

    #[test]
    fn blank_heading_text_is_rejected() {
        assert!(extract_headings("#   ").is_empty());
        let doc = ensure_heading_ids("#   \n");
        assert!(doc.heading_index.is_empty());
        assert_eq!(doc.content, "#   \n");
    }

    #[test]
    fn marker_without_text_is_rejected() {
        assert!(extract_headings("# {#id}").is_empty());
        assert!(extract_headings("##   {#abc_1}  ").is_empty());

        let doc = ensure_heading_ids("# {#id}\n");
        assert_eq!(doc.content, "# {#id}\n");
        assert!(doc.heading_index.is_empty());
    }

    #[test]
    fn read_only_extraction_never_rewrites() {
        let headings = extract_headings("# One\n\n## Two {#t2}");
        assert_eq!(headings[0].id, None);
        assert_eq!(headings[1].id.as_deref(), Some("t2"));
        assert_eq!(headings[1].line, 2);
    }

    #[test]
    fn duplicate_marker_gets_a_fresh_id() {
        let doc = ensure_heading_ids("# A {#same}\n# B {#same}");
        assert_eq!(doc.heading_index[0].id, "same");
        assert_ne!(doc.heading_index[1].id, "same");
        assert!(doc.content.starts_with("# A {#same}\n# B {#"));
        assert_eq!(ensure_heading_ids(&doc.content), doc);
    }

    #[test]
    fn crlf_lines_keep_their_ending() {
        let doc = ensure_heading_ids("# A\r\nbody\r\n");
        let id = &doc.heading_index[0].id;
        assert_eq!(doc.content, format!("# A {{#{id}}}\r\nbody\r\n"));
        assert_eq!(doc.heading_index[0].text, "A");
    }

    #[test]
    fn text_is_trimmed() {
        let headings = extract_headings("##   Spaced out   {#s}");
        assert_eq!(headings[0].text, "Spaced out");
        assert_eq!(headings[0].level, 2);
    }
}
