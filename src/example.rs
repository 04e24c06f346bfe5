//! Splits one example's mixed prose-and-code body into its help sections.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// The three ordered sections of a rendered example.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleBody {
    /// Prose blocks appearing before the first code block.
    pub introduction: Vec<String>,
    /// The first code block, with immediately following code blocks joined
    /// by a blank line.
    pub code: String,
    /// Blocks appearing after the code listing.
    pub remarks: Vec<String>,
}

#[derive(Debug)]
enum MarkupBlock {
    Code(String),
    Prose(String),
}

/// Partition an example body into introduction, code listing, and remarks.
///
/// A body without any code block routes everything to the introduction.
pub fn parse_example_body(text: &str) -> ExampleBody {
    let mut body = ExampleBody::default();
    let mut past_code = false;
    for block in top_level_blocks(text) {
        match block {
            MarkupBlock::Code(code) if !past_code => {
                if body.code.is_empty() {
                    body.code = code;
                } else {
                    body.code.push_str("\n\n");
                    body.code.push_str(&code);
                }
            }
            MarkupBlock::Code(code) => body.remarks.push(code),
            MarkupBlock::Prose(prose) => {
                if body.code.is_empty() {
                    body.introduction.push(prose);
                } else {
                    past_code = true;
                    body.remarks.push(prose);
                }
            }
        }
    }
    // Trailing blank line keeps the serializer from joining the
    // introduction onto the paragraph that follows the code.
    if let Some(last) = body.introduction.last_mut() {
        last.push_str("\n\n");
    }
    body
}

/// Decoration applied to every example title.
pub fn decorate_title(title: &str) -> String {
    format!("--------- {title} ---------")
}

/// Parse text into its ordered top-level blocks: code blocks yield their
/// content, any other block yields its trimmed source slice.
fn top_level_blocks(text: &str) -> Vec<MarkupBlock> {
    let parser = Parser::new_ext(text, Options::empty());
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<(bool, std::ops::Range<usize>, String)> = None;
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    let is_code = matches!(tag, Tag::CodeBlock(_));
                    current = Some((is_code, range, String::new()));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some((is_code, span, code)) = current.take() {
                        if is_code {
                            blocks.push(MarkupBlock::Code(trim_code_trailer(code)));
                        } else {
                            blocks.push(MarkupBlock::Prose(text[span].trim().to_string()));
                        }
                    }
                }
            }
            Event::Text(chunk) => {
                if let Some((true, _, buffer)) = current.as_mut() {
                    buffer.push_str(&chunk);
                }
            }
            // Thematic breaks have no Start/End pair; keep their source text.
            Event::Rule => {
                if depth == 0 {
                    blocks.push(MarkupBlock::Prose(text[range].trim().to_string()));
                }
            }
            _ => {}
        }
    }
    blocks
}

fn trim_code_trailer(mut code: String) -> String {
    while code.ends_with('\n') {
        code.pop();
    }
    code
}
