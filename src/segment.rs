//! Tag/chunk segmenter: line-by-line state machine.
//!
//! Splits a help document into [`Chunk`]s. A chunk opens on every line whose
//! lookahead window (the line's visible text plus the raw lines after it)
//! matches the boundary pattern and grows while following
//! lines match the continuation pattern (or are blank). Inline `*tag*`
//! markers are stripped from the visible text; the last tag set seen carries
//! forward until another tagged line appears.

use crate::error::{Error, Result};
use crate::model::Chunk;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

/// Default continuation: leading whitespace or `<`.
pub const DEFAULT_CONTINUATION: &str = r"^[\s<]";

pub const DEFAULT_TAG_DELIMITER: char = '*';

static RE_DEFAULT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s]+)\*").unwrap());

fn tag_regex(delimiter: char) -> Result<Regex> {
    if delimiter == DEFAULT_TAG_DELIMITER {
        return Ok(RE_DEFAULT_TAG.clone());
    }
    let d = regex::escape(&delimiter.to_string());
    Regex::new(&format!(r"{d}([^{d}\s]+){d}")).map_err(|source| Error::Pattern {
        field: "tag_delimiter",
        source,
    })
}

// -- Public API ---------------------------------------------------------------

/// A line with its tag markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedLine {
    /// Remaining text, trailing whitespace trimmed
    pub visible: String,
    /// Tag names in left-to-right order
    pub tags: Vec<String>,
}

/// Chunking rules for one kind of document.
#[derive(Debug, Clone)]
pub struct Segmenter {
    pattern: Regex,
    continuation: Regex,
    depth: usize,
    tag: Regex,
}

impl Segmenter {
    /// `depth` is the number of lines (current included) folded into the
    /// window matched against `pattern`. The default window is one line:
    /// with `depth` 1, `pattern` sees the current line alone. Zero behaves
    /// like one.
    pub fn new(pattern: Regex, continuation: Regex, depth: usize) -> Self {
        Self {
            pattern,
            continuation,
            depth: depth.max(1),
            tag: RE_DEFAULT_TAG.clone(),
        }
    }

    pub fn with_tag_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.tag = tag_regex(delimiter)?;
        Ok(self)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Remove tag markers from `line`, recording their names.
    pub fn strip_tags(&self, line: &str) -> StrippedLine {
        let mut visible = String::with_capacity(line.len());
        let mut tags = Vec::new();
        let mut last = 0;
        for caps in self.tag.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            visible.push_str(&line[last..whole.start()]);
            tags.push(name.as_str().to_string());
            last = whole.end();
        }
        visible.push_str(&line[last..]);
        visible.truncate(visible.trim_end().len());
        StrippedLine { visible, tags }
    }

    /// Split `lines` into chunks. Empty chunks are never emitted.
    pub fn segment<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Chunk> {
        let stripped: Vec<StrippedLine> =
            lines.iter().map(|l| self.strip_tags(l.as_ref())).collect();

        let mut scanner = Scanner::default();
        for index in 0..stripped.len() {
            self.process_line(&mut scanner, lines, &stripped, index);
        }
        scanner.close();
        scanner.chunks
    }

    // -- Line processing ------------------------------------------------------

    fn process_line<S: AsRef<str>>(
        &self,
        s: &mut Scanner,
        raw: &[S],
        stripped: &[StrippedLine],
        index: usize,
    ) {
        let line = &stripped[index];

        if !line.tags.is_empty() {
            s.current_tags = line.tags.clone();
        }

        // Current line stripped, lookahead lines raw
        let end = (index + self.depth).min(raw.len());
        let window = std::iter::once(line.visible.as_str())
            .chain(raw[index + 1..end].iter().map(|l| l.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(caps) = self.pattern.captures(&window) {
            s.close();
            s.open = Some(ChunkBuilder {
                tags: s.current_tags.clone(),
                captures: caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().to_string()))
                    .collect(),
                start_line: index + 1,
                lines: vec![line.visible.clone()],
            });
            return;
        }

        if let Some(open) = s.open.as_mut() {
            if line.visible.is_empty() || self.continuation.is_match(&line.visible) {
                open.lines.push(line.visible.clone());
                return;
            }
        }

        // Belongs to no chunk
        s.close();
    }
}

// -- Scanner state ------------------------------------------------------------

#[derive(Default)]
struct Scanner {
    chunks: Vec<Chunk>,
    current_tags: Vec<String>,
    open: Option<ChunkBuilder>,
}

struct ChunkBuilder {
    tags: Vec<String>,
    captures: Vec<Option<String>>,
    start_line: usize,
    lines: Vec<String>,
}

impl Scanner {
    fn close(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        if open.lines.is_empty() {
            return;
        }
        self.chunks.push(Chunk {
            tags: open.tags,
            text: open.lines.join("\n"),
            captures: open.captures,
            start_line: open.start_line,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seg(pattern: &str, depth: usize) -> Segmenter {
        Segmenter::new(
            Regex::new(pattern).unwrap(),
            Regex::new(DEFAULT_CONTINUATION).unwrap(),
            depth,
        )
    }

    #[test]
    fn strip_tags_extracts_in_order() {
        let s = seg("^x", 1);
        let line = s.strip_tags("abs({expr})\t\t*abs()* *E123*  ");
        assert_eq!(line.visible, "abs({expr})");
        assert_eq!(line.tags, vec!["abs()", "E123"]);
    }

    #[test]
    fn strip_tags_ignores_lone_delimiters() {
        let s = seg("^x", 1);
        let line = s.strip_tags("a * b * c");
        assert_eq!(line.visible, "a * b * c");
        assert!(line.tags.is_empty());
    }

    #[test]
    fn strip_tags_never_grows_line() {
        let s = seg("^x", 1);
        for raw in ["", "*a*", "x *a* y *b*", "**", "trailing   ", "*a**b*"] {
            let line = s.strip_tags(raw);
            assert!(line.visible.len() <= raw.len(), "{raw:?}");
        }
    }

    #[test]
    fn custom_tag_delimiter() {
        let s = seg("^x", 1).with_tag_delimiter('|').unwrap();
        let line = s.strip_tags("see |foo| and *bar*");
        assert_eq!(line.visible, "see  and *bar*");
        assert_eq!(line.tags, vec!["foo"]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let lines: [&str; 0] = [];
        assert!(seg(r"^\w+\(", 1).segment(&lines).is_empty());
    }

    #[test]
    fn continuation_and_blank_lines_extend_chunk() {
        let lines = [
            "foo({a})\t*foo()*",
            "\t\tDoes foo.",
            "",
            "\t\tMore foo.",
            "plain prose",
            "bar()\t*bar()*",
        ];
        let chunks = seg(r"^(\w+)\(", 1).segment(&lines);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "foo({a})\n\t\tDoes foo.\n\n\t\tMore foo.");
        assert_eq!(chunks[0].tags, vec!["foo()"]);
        assert_eq!(chunks[0].capture(1), Some("foo"));
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[1].text, "bar()");
        assert_eq!(chunks[1].start_line, 6);
    }

    #[test]
    fn unmatched_lines_outside_chunks_are_dropped() {
        let lines = ["intro", "\tindented intro", "foo()", "outro"];
        let chunks = seg(r"^\w+\(", 1).segment(&lines);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "foo()");
    }

    #[test]
    fn never_emits_empty_chunks() {
        let lines = ["", "", "x()", "", "y", "", "\t", "z()"];
        for chunk in seg(r"^\w\(", 1).segment(&lines) {
            assert!(!chunk.text.is_empty());
            assert!(chunk.text.starts_with(|c: char| c.is_alphabetic()));
        }
    }

    #[test]
    fn tags_carry_forward_to_later_chunks() {
        let lines = [
            "*X*",
            "a()",
            "\tcontinued",
            "b()",
            "*Y*",
            "c()",
        ];
        let chunks = seg(r"^\w\(", 1).segment(&lines);
        let tags: Vec<_> = chunks.iter().map(|c| c.tags.clone()).collect();
        assert_eq!(
            tags,
            vec![
                vec!["X".to_string()],
                vec!["X".to_string()],
                vec!["Y".to_string()],
            ]
        );
    }

    #[test]
    fn tagged_non_matching_line_applies_to_next_chunk() {
        let lines = ["a()", "\tbody *later*", "b()"];
        let chunks = seg(r"^\w\(", 1).segment(&lines);
        assert!(chunks[0].tags.is_empty());
        assert_eq!(chunks[0].text, "a()\n\tbody");
        assert_eq!(chunks[1].tags, vec!["later"]);
    }

    #[test]
    fn chunk_keeps_own_tags_when_continuation_is_tagged() {
        let lines = ["*X*", "a()", "\t*Y* trailing"];
        let chunks = seg(r"^\w\(", 1).segment(&lines);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tags, vec!["X"]);
    }

    #[test]
    fn lookahead_window_anchors_at_first_line() {
        let lines = ["long_name({a},", "\t\t{b})\tNumber\tdoes things", "short()\tString"];
        let chunks = seg(r"^(\w+)\([^)]*\)\s+(\w+)", 2).segment(&lines);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].capture(2), Some("Number"));
        assert_eq!(chunks[0].text, "long_name({a},\n\t\t{b})\tNumber\tdoes things");
        assert_eq!(chunks[1].capture(2), Some("String"));
    }

    #[test]
    fn lookahead_lines_are_raw() {
        let lines = ["foo()", "\t\t*foo()*", "\tdoc"];
        let chunks = seg(r"^(\w+)\(\)\n\s*\*(\S+)\*", 2).segment(&lines);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].capture(2), Some("foo()"));
        assert_eq!(chunks[0].text, "foo()\n\n\tdoc");
        assert_eq!(chunks[0].tags, Vec::<String>::new());
    }

    #[test]
    fn one_line_window_misses_wrapped_match() {
        let lines = ["long_name({a},", "\t\t{b})\tNumber"];
        assert!(seg(r"^(\w+)\([^)]*\)\s+(\w+)", 1).segment(&lines).is_empty());
    }

    #[test]
    fn non_participating_group_is_none() {
        let lines = ["foo()"];
        let chunks = seg(r"^(\w+)\((x)?", 1).segment(&lines);
        assert_eq!(chunks[0].captures, vec![Some("foo".to_string()), None]);
        assert_eq!(chunks[0].capture(2), None);
        assert_eq!(chunks[0].capture(0), None);
    }

    #[test]
    fn segmentation_is_repeatable() {
        let lines = ["*T*", "a({x})", "\tdoc", "", "b()", "junk", "c()"];
        let s = seg(r"^(\w)\(", 1);
        assert_eq!(s.segment(&lines), s.segment(&lines));
    }

    #[test]
    fn zero_depth_is_one_line() {
        assert_eq!(seg("^a", 0).depth(), 1);
    }
}
