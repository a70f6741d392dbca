// fence.rs — Split free text into fenced code blocks.
//
// A block opens on a line starting with three backticks, optionally
// followed by a language tag, and closes on the next line starting with
// three backticks, or on a body line that ends with them (the fence written
// straight after the last line of code). Text outside blocks is ignored, as is a block that is
// still open when the text ends.

/// One fenced block, borrowed from the response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Language tag after the opening backticks, if any.
    pub lang: Option<&'a str>,
    /// Lines between the fences, without line terminators.
    pub lines: Vec<&'a str>,
}

impl CodeBlock<'_> {
    /// The block body joined with `\n`.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// The body after the first line, joined with `\n`.
    pub fn body_after_first_line(&self) -> String {
        self.lines.iter().skip(1).copied().collect::<Vec<_>>().join("\n")
    }
}

const FENCE: &str = "```";

pub fn code_blocks(text: &str) -> Vec<CodeBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<CodeBlock<'_>> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        match open.take() {
            None => {
                if let Some(rest) = trimmed.strip_prefix(FENCE) {
                    open = Some(CodeBlock {
                        lang: language_tag(rest),
                        lines: Vec::new(),
                    });
                }
            }
            Some(mut block) => {
                if trimmed.starts_with(FENCE) {
                    blocks.push(block);
                } else if let Some(last) = line.trim_end().strip_suffix(FENCE) {
                    block.lines.push(last);
                    blocks.push(block);
                } else {
                    block.lines.push(line);
                    open = Some(block);
                }
            }
        }
    }

    blocks
}

fn language_tag(rest: &str) -> Option<&str> {
    let tag = rest.trim_start_matches('`').split_whitespace().next()?;
    if tag
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '+' | '#' | '-' | '.'))
    {
        Some(tag)
    } else {
        None
    }
}
