//! Quote block grammar
//!
//! A quote block is a pair of HTML comments whose body is replaced with a
//! line range copied from another file:
//!
//! ```text
//! <!-- quote_begin content="[description](path/to/file.rs#L10-L20)" lang="rust" -->
//! ...body, replaced on sync...
//! <!-- quote_end -->
//! ```
//!
//! `content` and `lang` may appear in either order; `lang` defaults to
//! [`DEFAULT_LANG`]. A block whose `content` is missing or does not parse as
//! `<path>#L<start>-L<end>` is still recognized, but carries a
//! [`PathSpecError`] instead of a [`PathSpec`].
//!
//! This module does no I/O. [`QuoteGrammar`] holds the compiled patterns and
//! exposes pure functions over input text.

use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Language used when a block has no `lang` attribute; emitted without a code fence
pub const DEFAULT_LANG: &str = "text";

const BEGIN_TOKEN: &str = "quote_begin";
const CONTENT_ATTR: &str = r#"\s+content="\[[\s\S]*?\]\((?P<content>[\s\S]*?)\)""#;
const LANG_ATTR: &str = r#"\s+lang="(?P<lang>[^"]*)""#;
const END_MARKER: &str = r"<!--\s*quote_end\s*-->";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathSpecError {
    #[error("quote block has no content attribute")]
    Missing,

    #[error("unresolvable path-spec '{0}': expected '<path>#L<start>-L<end>'")]
    Malformed(String),
}

/// A referenced file and an inclusive, 1-based line range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#L{}-L{}", self.path, self.start_line, self.end_line)
    }
}

impl FromStr for PathSpec {
    type Err = PathSpecError;

    /// Parses `<path>#L<start>-L<end>`, splitting on the last `#L`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PathSpecError::Malformed(s.to_string());

        let (path, range) = s.rsplit_once("#L").ok_or_else(malformed)?;
        let (start, end) = range.split_once("-L").ok_or_else(malformed)?;
        if path.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            path: path.to_string(),
            start_line: parse_line_number(start).ok_or_else(malformed)?,
            end_line: parse_line_number(end).ok_or_else(malformed)?,
        })
    }
}

fn parse_line_number(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// One begin/end marker pair found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBlock<'a> {
    /// Byte range of the whole block, begin marker through end marker
    pub span: Range<usize>,

    /// 1-based line of the begin marker
    pub line: usize,

    /// Begin marker, verbatim
    pub begin: &'a str,

    /// Current text between the markers
    pub body: &'a str,

    /// End marker, verbatim
    pub end: &'a str,

    pub spec: Result<PathSpec, PathSpecError>,

    pub lang: &'a str,
}

impl QuoteBlock<'_> {
    /// Returns true if the body should be wrapped in a code fence
    pub fn is_fenced(&self) -> bool {
        self.lang != DEFAULT_LANG
    }
}

/// Compiled quote block patterns
#[derive(Debug, Clone)]
pub struct QuoteGrammar {
    block: Regex,
    attribute: Regex,
    end: Regex,
}

impl Default for QuoteGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteGrammar {
    pub fn new() -> Self {
        let attribute = format!("(?:{CONTENT_ATTR}|{LANG_ATTR})");
        let begin = format!(r"<!--\s*{BEGIN_TOKEN}(?:{CONTENT_ATTR}|{LANG_ATTR})*\s*-->");
        let block = format!(r"(?P<begin>{begin})(?P<body>(?s:.*?))(?P<end>{END_MARKER})");

        Self {
            block: Regex::new(&block).expect("quote block pattern is valid"),
            attribute: Regex::new(&attribute).expect("attribute pattern is valid"),
            end: Regex::new(END_MARKER).expect("end marker pattern is valid"),
        }
    }

    /// Returns true if `text` contains a quote end marker
    ///
    /// Text like this cannot be placed inside a block: the end marker would
    /// close the block early on the next run.
    pub fn has_end_marker(&self, text: &str) -> bool {
        self.end.is_match(text)
    }

    /// Finds every quote block in `text`, in document order
    ///
    /// Each begin marker pairs with the nearest end marker after it.
    pub fn blocks<'a>(&self, text: &'a str) -> Vec<QuoteBlock<'a>> {
        let mut blocks = Vec::new();
        let mut line = 1;
        let mut counted_to = 0;

        for caps in self.block.captures_iter(text) {
            let (Some(whole), Some(begin), Some(body), Some(end)) = (
                caps.get(0),
                caps.name("begin"),
                caps.name("body"),
                caps.name("end"),
            ) else {
                continue;
            };

            line += text[counted_to..whole.start()].matches('\n').count();
            counted_to = whole.start();

            let (content, lang) = self.attributes(begin.as_str());
            let spec = match content {
                Some(content) => content.parse(),
                None => Err(PathSpecError::Missing),
            };
            let lang = lang.filter(|lang| !lang.is_empty()).unwrap_or(DEFAULT_LANG);

            blocks.push(QuoteBlock {
                span: whole.range(),
                line,
                begin: begin.as_str(),
                body: body.as_str(),
                end: end.as_str(),
                spec,
                lang,
            });
        }

        blocks
    }

    /// Reads `content` and `lang` from a matched begin marker
    ///
    /// Attributes are consumed left to right, so text inside the content
    /// description is never mistaken for an attribute. The first occurrence
    /// of each wins.
    fn attributes<'a>(&self, begin: &'a str) -> (Option<&'a str>, Option<&'a str>) {
        let mut content = None;
        let mut lang = None;

        let Some(start) = begin.find(BEGIN_TOKEN).map(|i| i + BEGIN_TOKEN.len()) else {
            return (content, lang);
        };
        let attrs = &begin[start..];

        let mut pos = 0;
        for caps in self.attribute.captures_iter(attrs) {
            let Some(whole) = caps.get(0) else { break };
            if whole.start() != pos {
                break;
            }
            pos = whole.end();

            if let Some(m) = caps.name("content") {
                content.get_or_insert(m.as_str());
            }
            if let Some(m) = caps.name("lang") {
                lang.get_or_insert(m.as_str());
            }
        }

        (content, lang)
    }
}
