//! Pass 2: quote block substitution
//!
//! Each resolvable block's body is replaced with the quoted line range. A
//! block that cannot be resolved or read keeps its original text, markers and
//! stale body included. So does a block whose quoted range contains a
//! `quote_end` marker, since that marker would end the block early on the
//! next run and the document would grow on every sync.

use crate::domain::{DocumentId, QuoteBlock, QuoteGrammar};
use crate::storage::{Document, SourceReader};

use super::report::{BlockWarning, DocumentReport, DocumentStatus};
use super::Mode;

/// Result of substituting every block in one document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub blocks: usize,
    pub warnings: Vec<BlockWarning>,
}

/// Substitutes every quote block in `text`
///
/// `id` is the document the text belongs to; relative paths in its blocks are
/// resolved against its directory.
pub fn rewrite_text(
    grammar: &QuoteGrammar,
    id: &DocumentId,
    text: &str,
    sources: &SourceReader,
) -> Rewrite {
    let blocks = grammar.blocks(text);
    let mut out = String::with_capacity(text.len());
    let mut warnings = Vec::new();
    let mut copied_to = 0;

    for block in &blocks {
        out.push_str(&text[copied_to..block.span.start]);
        copied_to = block.span.end;

        match substitute(grammar, id, block, sources) {
            Ok(replacement) => out.push_str(&replacement),
            Err(message) => {
                warnings.push(BlockWarning {
                    line: block.line,
                    message,
                });
                out.push_str(&text[block.span.clone()]);
            }
        }
    }
    out.push_str(&text[copied_to..]);

    Rewrite {
        text: out,
        blocks: blocks.len(),
        warnings,
    }
}

fn substitute(
    grammar: &QuoteGrammar,
    id: &DocumentId,
    block: &QuoteBlock<'_>,
    sources: &SourceReader,
) -> Result<String, String> {
    let spec = block.spec.as_ref().map_err(|e| e.to_string())?;
    let quoted = id.resolve(&spec.path);
    let content = sources
        .extract(&quoted, spec.start_line, spec.end_line)
        .map_err(|e| e.to_string())?;

    if grammar.has_end_marker(&content) {
        return Err(format!("quoted range {spec} contains a quote_end marker"));
    }

    Ok(format!(
        "{}\n{}\n{}",
        block.begin,
        render_body(block, &content),
        block.end
    ))
}

/// Formats extracted content for insertion between the markers
fn render_body(block: &QuoteBlock<'_>, content: &str) -> String {
    if block.is_fenced() {
        let separator = if content.is_empty() || content.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        format!("```{}\n{}{}```", block.lang, content, separator)
    } else {
        format!("\n{}", content)
    }
}

/// Reads one document, rewrites it and reports what happened
pub fn rewrite_document(
    grammar: &QuoteGrammar,
    id: &DocumentId,
    sources: &mut SourceReader,
    mode: Mode,
) -> DocumentReport {
    match Document::read(id.clone()) {
        Ok(document) => rewrite_loaded(grammar, &document, sources, mode),
        Err(e) => DocumentReport {
            path: id.clone(),
            status: DocumentStatus::Failed,
            blocks: 0,
            warnings: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Rewrites a document that has already been read
///
/// In [`Mode::Write`] a changed document is written back; in [`Mode::Check`]
/// its new text is kept in `sources` so later documents quote it as if it
/// had been written.
pub fn rewrite_loaded(
    grammar: &QuoteGrammar,
    document: &Document,
    sources: &mut SourceReader,
    mode: Mode,
) -> DocumentReport {
    let id = document.id();
    let mut report = DocumentReport {
        path: id.clone(),
        status: DocumentStatus::Unchanged,
        blocks: 0,
        warnings: Vec::new(),
        error: None,
    };

    let rewrite = rewrite_text(grammar, id, document.text(), sources);
    report.blocks = rewrite.blocks;
    report.warnings = rewrite.warnings;

    match mode {
        Mode::Write => match document.write_if_changed(&rewrite.text) {
            Ok(true) => report.status = DocumentStatus::Updated,
            Ok(false) => {}
            Err(e) => {
                report.status = DocumentStatus::Failed;
                report.error = Some(e.to_string());
            }
        },
        Mode::Check => {
            if rewrite.text != document.text() {
                report.status = DocumentStatus::Stale;
                sources.set_pending(id.clone(), rewrite.text);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn file(&self, name: &str, text: &str) -> DocumentId {
            let path = self.dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, text).unwrap();
            DocumentId::from_path(path).unwrap()
        }

        fn doc_id(&self, name: &str) -> DocumentId {
            DocumentId::from_path(self.dir.path().join(name)).unwrap()
        }

        fn rewrite(&self, doc: &str, text: &str) -> Rewrite {
            rewrite_text(&QuoteGrammar::new(), &self.doc_id(doc), text, &SourceReader::new())
        }
    }

    const TEN_LINES: &str = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10\n";

    #[test]
    fn fenced_block_for_language() {
        let fx = Fixture::new();
        fx.file("src/lib.rs", "fn a() {}\nfn b() {}\nfn c() {}\n");
        let text = "<!-- quote_begin content=\"[lib](src/lib.rs#L2-L3)\" lang=\"rust\" -->\nstale\n<!-- quote_end -->\n";

        let rewrite = fx.rewrite("README.md", text);

        assert_eq!(
            rewrite.text,
            "<!-- quote_begin content=\"[lib](src/lib.rs#L2-L3)\" lang=\"rust\" -->\n```rust\nfn b() {}\nfn c() {}\n```\n<!-- quote_end -->\n"
        );
        assert_eq!(rewrite.blocks, 1);
        assert!(rewrite.warnings.is_empty());
    }

    #[test]
    fn plain_block_without_lang() {
        let fx = Fixture::new();
        fx.file("notes.txt", TEN_LINES);
        let text = "<!-- quote_begin content=\"[n](notes.txt#L1-L2)\" -->\nstale\n<!-- quote_end -->";

        let rewrite = fx.rewrite("README.md", text);

        assert_eq!(
            rewrite.text,
            "<!-- quote_begin content=\"[n](notes.txt#L1-L2)\" -->\n\nl1\nl2\n\n<!-- quote_end -->"
        );
    }

    #[test]
    fn explicit_text_lang_is_not_fenced() {
        let fx = Fixture::new();
        fx.file("notes.txt", TEN_LINES);
        let text = "<!-- quote_begin content=\"[n](notes.txt#L3-L3)\" lang=\"text\" --><!-- quote_end -->";

        let rewrite = fx.rewrite("README.md", text);

        assert!(!rewrite.text.contains("```"));
        assert!(rewrite.text.contains("\n\nl3\n\n"));
    }

    #[test]
    fn fence_closes_on_its_own_line() {
        let fx = Fixture::new();
        fx.file("tail.py", "a = 1\nb = 2");
        let text = "<!-- quote_begin content=\"[t](tail.py#L2-L2)\" lang=\"python\" --><!-- quote_end -->";

        let rewrite = fx.rewrite("README.md", text);

        assert!(rewrite.text.contains("```python\nb = 2\n```\n<!-- quote_end -->"));
    }

    #[test]
    fn range_is_clamped() {
        let fx = Fixture::new();
        fx.file("notes.txt", TEN_LINES);
        let text = "<!-- quote_begin content=\"[n](notes.txt#L20-L25)\" --><!-- quote_end -->";

        let rewrite = fx.rewrite("README.md", text);

        assert!(rewrite.text.contains("\n\nl10\n\n<!-- quote_end -->"));
    }

    #[test]
    fn unresolvable_block_is_byte_identical() {
        let fx = Fixture::new();
        let text = "before\n<!-- quote_begin content=\"[x](not-a-valid-spec)\" -->\nkeep me\n<!-- quote_end -->\nafter\n";

        let rewrite = fx.rewrite("README.md", text);

        assert_eq!(rewrite.text, text);
        assert_eq!(rewrite.warnings.len(), 1);
        assert_eq!(rewrite.warnings[0].line, 2);
        assert!(rewrite.warnings[0].message.contains("not-a-valid-spec"));
    }

    #[test]
    fn missing_file_keeps_block_and_continues() {
        let fx = Fixture::new();
        fx.file("ok.txt", "fresh\n");
        let text = "\
<!-- quote_begin content=\"[m](missing.txt#L1-L2)\" -->
old one
<!-- quote_end -->
<!-- quote_begin content=\"[o](ok.txt#L1-L1)\" -->
old two
<!-- quote_end -->
";

        let rewrite = fx.rewrite("README.md", text);

        assert_eq!(
            rewrite.text,
            "\
<!-- quote_begin content=\"[m](missing.txt#L1-L2)\" -->
old one
<!-- quote_end -->
<!-- quote_begin content=\"[o](ok.txt#L1-L1)\" -->

fresh

<!-- quote_end -->
"
        );
        assert_eq!(rewrite.warnings.len(), 1);
        assert_eq!(rewrite.warnings[0].line, 1);
        assert!(rewrite.warnings[0].message.contains("missing.txt"));
    }

    #[test]
    fn rewriting_is_idempotent() {
        let fx = Fixture::new();
        fx.file("src/lib.rs", "fn a() {}\nfn b() {}\n");
        fx.file("notes.txt", TEN_LINES);
        let text = "\
# Doc
<!-- quote_begin content=\"[lib](src/lib.rs#L1-L2)\" lang=\"rust\" -->
<!-- quote_end -->
middle
<!-- quote_begin content=\"[n](notes.txt#L4-L5)\" -->
<!-- quote_end -->
";

        let first = fx.rewrite("README.md", text);
        let second = fx.rewrite("README.md", &first.text);

        assert_ne!(first.text, text);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn text_outside_blocks_is_untouched() {
        let fx = Fixture::new();
        let text = "# Title\n\nNo quotes here.\n";

        let rewrite = fx.rewrite("README.md", text);

        assert_eq!(rewrite.text, text);
        assert_eq!(rewrite.blocks, 0);
    }

    #[test]
    fn write_mode_updates_file() {
        let fx = Fixture::new();
        fx.file("notes.txt", "fresh\n");
        let doc = fx.file(
            "README.md",
            "<!-- quote_begin content=\"[n](notes.txt#L1-L1)\" -->\n<!-- quote_end -->\n",
        );
        let mut sources = SourceReader::new();

        let report = rewrite_document(&QuoteGrammar::new(), &doc, &mut sources, Mode::Write);
        assert_eq!(report.status, DocumentStatus::Updated);
        assert!(fs::read_to_string(doc.path()).unwrap().contains("fresh"));

        let again = rewrite_document(&QuoteGrammar::new(), &doc, &mut sources, Mode::Write);
        assert_eq!(again.status, DocumentStatus::Unchanged);
    }

    #[test]
    fn check_mode_leaves_file_alone() {
        let fx = Fixture::new();
        fx.file("notes.txt", "fresh\n");
        let original = "<!-- quote_begin content=\"[n](notes.txt#L1-L1)\" -->\n<!-- quote_end -->\n";
        let doc = fx.file("README.md", original);
        let mut sources = SourceReader::new();

        let report = rewrite_document(&QuoteGrammar::new(), &doc, &mut sources, Mode::Check);

        assert_eq!(report.status, DocumentStatus::Stale);
        assert_eq!(fs::read_to_string(doc.path()).unwrap(), original);
        assert!(sources.pending(&doc).unwrap().contains("fresh"));
    }

    #[test]
    fn quoted_end_marker_keeps_block() {
        let fx = Fixture::new();
        fx.file(
            "b.md",
            "<!-- quote_begin content=\"[a](A.txt#L1-L1)\" -->\n\nfrom a\n\n<!-- quote_end -->\n",
        );
        let text = "<!-- quote_begin content=\"[b](b.md#L1-L5)\" -->\nold\n<!-- quote_end -->\n";

        let rewrite = fx.rewrite("c.md", text);

        assert_eq!(rewrite.text, text);
        assert_eq!(rewrite.warnings.len(), 1);
        assert_eq!(
            rewrite.warnings[0].message,
            "quoted range b.md#L1-L5 contains a quote_end marker"
        );
    }

    #[test]
    fn write_failure_marks_document_failed() {
        let fx = Fixture::new();
        fx.file("notes.txt", "fresh\n");
        let doc = fx.file(
            "README.md",
            "<!-- quote_begin content=\"[n](notes.txt#L1-L1)\" -->\n<!-- quote_end -->\n",
        );
        let document = Document::read(doc.clone()).unwrap();

        // Replace the file with a directory so the write fails
        fs::remove_file(doc.path()).unwrap();
        fs::create_dir(doc.path()).unwrap();

        let report =
            rewrite_loaded(&QuoteGrammar::new(), &document, &mut SourceReader::new(), Mode::Write);

        assert_eq!(report.status, DocumentStatus::Failed);
        assert_eq!(report.blocks, 1);
        assert!(report.error.unwrap().contains("README.md"));
    }

    #[test]
    fn write_failure_does_not_stop_later_documents() {
        let fx = Fixture::new();
        fx.file("notes.txt", "fresh\n");
        let block = "<!-- quote_begin content=\"[n](notes.txt#L1-L1)\" -->\n<!-- quote_end -->\n";
        let broken = fx.file("broken.md", block);
        let ok = fx.file("ok.md", block);
        let grammar = QuoteGrammar::new();
        let mut sources = SourceReader::new();

        let document = Document::read(broken.clone()).unwrap();
        fs::remove_file(broken.path()).unwrap();
        fs::create_dir(broken.path()).unwrap();

        let reports = [
            rewrite_loaded(&grammar, &document, &mut sources, Mode::Write),
            rewrite_document(&grammar, &ok, &mut sources, Mode::Write),
        ];

        assert_eq!(reports[0].status, DocumentStatus::Failed);
        assert_eq!(reports[1].status, DocumentStatus::Updated);
        assert!(fs::read_to_string(ok.path()).unwrap().contains("fresh"));
    }

    #[test]
    fn unreadable_document_fails() {
        let fx = Fixture::new();
        let doc = fx.doc_id("missing.md");

        let report =
            rewrite_document(&QuoteGrammar::new(), &doc, &mut SourceReader::new(), Mode::Write);

        assert_eq!(report.status, DocumentStatus::Failed);
        assert!(report.error.unwrap().contains("missing.md"));
    }
}
