// extract.rs — Recover candidate file edits from a model response.
//
// The model names files with loose, inconsistent conventions, so extraction
// is an ordered chain of recognizers over the response's fenced blocks. The
// first recognizer that produces anything wins and later ones are not
// consulted. Extraction never fails: malformed input yields fewer candidates
// or none.
//
// Default chain:
//   1. MarkerRecognizer: blocks whose first line is a `filepath:` or
//      `file:` marker, optionally behind a comment token.
//   2. UnnamedBlockRecognizer: whole-file-looking blocks with no marker,
//      given synthetic names. Reached only when (1) found nothing.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::candidate::{normalize_path, CandidateEdit};
use crate::fence::{code_blocks, CodeBlock};

/// A marker line: optional comment token, a keyword, a colon, a path, and
/// an optional comment closer.
static MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?i)^\s*(?:(?://+|#+|--|;+|%+|/\*+|<!--|\*)\s*)?(?P<keyword>[a-z_]+)\s*:\s*(?P<path>.*?)\s*(?:\*/|-->)?\s*$",
    )
});

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Covered by the `marker_regex_compiles` test.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// One strategy for turning fenced blocks into candidate edits.
pub trait Recognizer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Candidates found in `blocks`, in block order.
    fn recognize(&self, blocks: &[CodeBlock<'_>]) -> Vec<CandidateEdit>;
}

/// Blocks whose first line names the target file.
///
/// Keywords are tried in priority order against each block's first line.
/// The remaining lines, trimmed, are the file content.
#[derive(Debug, Clone)]
pub struct MarkerRecognizer {
    keywords: Vec<String>,
}

impl MarkerRecognizer {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// The path named by `line`, if it is a marker for one of our keywords.
    pub fn marker_path(&self, line: &str) -> Option<String> {
        let captures = MARKER_LINE.captures(line)?;
        let keyword = captures.name("keyword")?.as_str();
        if !self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            return None;
        }
        clean_marker_path(captures.name("path")?.as_str())
    }
}

impl Default for MarkerRecognizer {
    fn default() -> Self {
        Self::new(["filepath", "file"])
    }
}

impl Recognizer for MarkerRecognizer {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn recognize(&self, blocks: &[CodeBlock<'_>]) -> Vec<CandidateEdit> {
        blocks
            .iter()
            .filter_map(|block| {
                let first = block.lines.first()?;
                let path = self.marker_path(first)?;
                Some(CandidateEdit::new(
                    path,
                    block.body_after_first_line().trim(),
                ))
            })
            .collect()
    }
}

/// Strip wrapping backticks or quotes; reject what's left if empty.
fn clean_marker_path(raw: &str) -> Option<String> {
    let mut path = raw.trim();
    for quote in ['`', '"', '\''] {
        if path.len() >= 2 && path.starts_with(quote) && path.ends_with(quote) {
            path = path[1..path.len() - 1].trim();
        }
    }
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Unmarked blocks that look like whole files, named
/// `generated_<n>.<ext>`.
///
/// Short blocks and single-line blocks are taken to be inline snippets and
/// skipped.
#[derive(Debug, Clone)]
pub struct UnnamedBlockRecognizer {
    /// Trimmed content must be longer than this many characters.
    pub min_chars: usize,
}

impl Default for UnnamedBlockRecognizer {
    fn default() -> Self {
        Self { min_chars: 50 }
    }
}

impl Recognizer for UnnamedBlockRecognizer {
    fn name(&self) -> &'static str {
        "unnamed"
    }

    fn recognize(&self, blocks: &[CodeBlock<'_>]) -> Vec<CandidateEdit> {
        let mut counter = 0usize;
        let mut found = Vec::new();
        for block in blocks {
            let body = block.body();
            let content = body.trim();
            if content.chars().count() <= self.min_chars || !content.contains('\n') {
                continue;
            }
            let path = format!("generated_{}.{}", counter, extension_for(block.lang));
            counter += 1;
            found.push(CandidateEdit::new(path, content));
        }
        found
    }
}

/// File extension for a fence language tag. Unknown tags pass through
/// lower-cased; untagged blocks become `.txt`.
pub fn extension_for(lang: Option<&str>) -> String {
    let Some(lang) = lang else {
        return "txt".to_string();
    };
    let lang = lang.to_ascii_lowercase();
    let mapped = match lang.as_str() {
        "python" => "py",
        "javascript" => "js",
        "typescript" => "ts",
        "rust" => "rs",
        "ruby" => "rb",
        "shell" | "bash" => "sh",
        "markdown" => "md",
        _ => return lang,
    };
    mapped.to_string()
}

/// What to do when two candidates normalize to the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, drop the rest.
    #[default]
    FirstWins,
    /// Keep the first occurrence's position but the last occurrence's
    /// content.
    LastWins,
}

/// An ordered chain of recognizers plus a duplicate policy.
pub struct EditExtractor {
    recognizers: Vec<Box<dyn Recognizer>>,
    duplicates: DuplicatePolicy,
}

impl EditExtractor {
    /// An extractor with no recognizers; add them with `with_recognizer`.
    pub fn empty() -> Self {
        Self {
            recognizers: Vec::new(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.recognizers.push(Box::new(recognizer));
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Candidates in first-appearance order, de-duplicated by normalized
    /// path.
    pub fn extract(&self, text: &str) -> Vec<CandidateEdit> {
        let blocks = code_blocks(text);
        if blocks.is_empty() {
            return Vec::new();
        }

        for recognizer in &self.recognizers {
            let found = recognizer.recognize(&blocks);
            if !found.is_empty() {
                tracing::debug!(
                    recognizer = recognizer.name(),
                    blocks = blocks.len(),
                    candidates = found.len(),
                    "recognized edits"
                );
                return dedup(found, self.duplicates);
            }
        }
        Vec::new()
    }
}

impl Default for EditExtractor {
    fn default() -> Self {
        Self::empty()
            .with_recognizer(MarkerRecognizer::default())
            .with_recognizer(UnnamedBlockRecognizer::default())
    }
}

fn dedup(candidates: Vec<CandidateEdit>, policy: DuplicatePolicy) -> Vec<CandidateEdit> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<CandidateEdit> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = normalize_path(&candidate.path);
        match seen.get(&key) {
            Some(&index) => {
                tracing::debug!(path = %candidate.path, ?policy, "duplicate candidate");
                if policy == DuplicatePolicy::LastWins {
                    out[index].content = candidate.content;
                }
            }
            None => {
                seen.insert(key, out.len());
                out.push(candidate);
            }
        }
    }
    out
}

/// Extract with the default recognizer chain and first-wins duplicates.
pub fn extract_edits(text: &str) -> Vec<CandidateEdit> {
    EditExtractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(edits: &[CandidateEdit]) -> Vec<&str> {
        edits.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn filepath_and_file_markers_in_source_order() {
        let text = "Here you go:\n\
            ```python\n# filepath: app.py\nprint('hi')\n```\n\
            and the frontend:\n\
            ```javascript\n// file: index.js\nconsole.log('hi');\n```\n";
        let edits = extract_edits(text);
        assert_eq!(paths(&edits), vec!["app.py", "index.js"]);
        assert_eq!(edits[0].content, "print('hi')");
        assert_eq!(edits[1].content, "console.log('hi');");
    }

    #[test]
    fn marker_accepts_many_comment_styles() {
        let recognizer = MarkerRecognizer::default();
        let cases = [
            ("// filepath: src/a.ts", "src/a.ts"),
            ("# filepath: a.py", "a.py"),
            ("filepath: plain.txt", "plain.txt"),
            ("-- file: schema.sql", "schema.sql"),
            ("<!-- filepath: index.html -->", "index.html"),
            ("/* file: style.css */", "style.css"),
            ("; file: init.el", "init.el"),
            ("# FilePath: Mixed.py", "Mixed.py"),
            ("// filepath: `quoted/path.rs`", "quoted/path.rs"),
            ("# file: \"spaced name.md\"", "spaced name.md"),
        ];
        for (line, expected) in cases {
            assert_eq!(
                recognizer.marker_path(line).as_deref(),
                Some(expected),
                "{line}"
            );
        }
    }

    #[test]
    fn non_marker_lines_are_not_paths() {
        let recognizer = MarkerRecognizer::default();
        for line in ["import os", "// TODO: later", "filepath:", "# path: x.py", "x = {file: 1}"] {
            assert_eq!(recognizer.marker_path(line), None, "{line}");
        }
    }

    #[test]
    fn keyword_list_is_configurable() {
        let recognizer = MarkerRecognizer::new(["path"]);
        assert_eq!(recognizer.marker_path("# path: x.py").as_deref(), Some("x.py"));
        assert_eq!(recognizer.marker_path("# filepath: x.py"), None);
    }

    #[test]
    fn unnamed_fallback_when_no_markers() {
        let body: Vec<String> = (0..10).map(|i| format!("line number {i}")).collect();
        let text = format!("Try this:\n```\n{}\n```\n", body.join("\n"));
        let edits = extract_edits(&text);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].path, "generated_0.txt");
        assert_eq!(edits[0].content, body.join("\n"));
    }

    #[test]
    fn fallback_maps_language_tags() {
        let long = "def main():\n    print('this is long enough to count as a file')\n";
        let text = format!(
            "```python\n{long}```\n```typescript\n{long}```\n```elixir\n{long}```\n"
        );
        let edits = extract_edits(&text);
        assert_eq!(
            paths(&edits),
            vec!["generated_0.py", "generated_1.ts", "generated_2.elixir"]
        );
    }

    #[test]
    fn fallback_skips_snippets() {
        let text = "Run:\n```\nnpm install\n```\nthen\n```bash\nnpm start\nnpm test\n```\n\
                    ```js\nconst x = 'a single line that is definitely longer than fifty characters';\n```\n";
        assert!(extract_edits(text).is_empty());
    }

    #[test]
    fn fallback_not_used_when_a_marker_exists() {
        let long = "x".repeat(80);
        let text = format!(
            "```python\n# filepath: named.py\npass\n```\n```python\n{long}\n{long}\n```\n"
        );
        let edits = extract_edits(&text);
        assert_eq!(paths(&edits), vec!["named.py"]);
    }

    #[test]
    fn duplicates_first_wins() {
        let text = "```\n# filepath: a.txt\nfirst\n```\n```\n# filepath: ./a.txt\nsecond\n```\n";
        let edits = extract_edits(text);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].path, "a.txt");
        assert_eq!(edits[0].content, "first");
    }

    #[test]
    fn marker_regex_compiles() {
        assert!(MARKER_LINE.is_match("# filepath: a.py"));
    }

    #[test]
    fn inline_closing_fence_does_not_swallow_next_file() {
        let text = "```python\n# filepath: a.py\nprint(1)```\n\nNext file:\n\
                    ```python\n# filepath: b.py\nprint(2)\n```\n";
        let edits = extract_edits(text);
        assert_eq!(
            edits,
            vec![
                CandidateEdit::new("a.py", "print(1)"),
                CandidateEdit::new("b.py", "print(2)"),
            ]
        );
    }

    #[test]
    fn duplicates_match_on_resolved_target() {
        let text = "```\n# filepath: app.py\nfirst\n```\n\
                    ```\n# filepath: memory/app.py\nsecond\n```\n\
                    ```\n# filepath: src/../app.py\nthird\n```\n";
        let edits = extract_edits(text);
        assert_eq!(edits, vec![CandidateEdit::new("app.py", "first")]);
    }

    #[test]
    fn duplicates_last_wins_keeps_position() {
        let text = "```\n# filepath: a.txt\nfirst\n```\n\
                    ```\n# filepath: b.txt\nb\n```\n\
                    ```\n# filepath: a.txt\nsecond\n```\n";
        let edits = EditExtractor::default()
            .with_duplicate_policy(DuplicatePolicy::LastWins)
            .extract(text);
        assert_eq!(paths(&edits), vec!["a.txt", "b.txt"]);
        assert_eq!(edits[0].content, "second");
    }

    #[test]
    fn malformed_input_yields_nothing() {
        for text in ["", "no code here", "```", "```\n```", "```python\n# filepath: a.py\nunterminated", "\u{0}\u{ffff}```\u{1f980}"] {
            let _ = extract_edits(text);
        }
        assert!(extract_edits("```python\n# filepath: a.py\nunterminated").is_empty());
    }

    #[test]
    fn marker_block_with_no_body_is_an_empty_file() {
        let edits = extract_edits("```\n// filepath: empty.txt\n```");
        assert_eq!(edits, vec![CandidateEdit::new("empty.txt", "")]);
    }

    #[test]
    fn empty_chain_extracts_nothing() {
        let text = "```\n# filepath: a.txt\nx\n```";
        assert!(EditExtractor::empty().extract(text).is_empty());
    }

    #[test]
    fn extension_table() {
        assert_eq!(extension_for(Some("Python")), "py");
        assert_eq!(extension_for(Some("bash")), "sh");
        assert_eq!(extension_for(Some("go")), "go");
        assert_eq!(extension_for(None), "txt");
    }
}
