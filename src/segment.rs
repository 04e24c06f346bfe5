//! Splits free-form description prose into ordered display blocks.
//!
//! Blocks whose first line looks like document structure (code, quote,
//! table, list) are kept verbatim; everything else is narrative prose whose
//! internal line breaks collapse into spaces.

/// One segmented unit of free-form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    /// Formatting-sensitive text kept verbatim, internal line breaks included.
    Structural(String),
    /// Flowing prose, whitespace-normalized.
    Narrative(String),
}

impl TextBlock {
    pub fn text(&self) -> &str {
        match self {
            TextBlock::Structural(text) | TextBlock::Narrative(text) => text,
        }
    }
}

type FirstLinePredicate = fn(&str) -> bool;

/// First-line tests deciding structural classification, in priority order.
const STRUCTURAL_RULES: &[(&str, FirstLinePredicate)] = &[
    ("indented-code", |line| line.starts_with("    ")),
    ("code-fence", |line| line.starts_with("```")),
    ("block-quote", |line| line.starts_with('>')),
    ("table-row", |line| line.starts_with('|')),
    ("unordered-list", unordered_list_marker),
    ("ordered-list", ordered_list_marker),
];

fn unordered_list_marker(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('-' | '*')) && chars.next().is_some_and(char::is_whitespace)
}

fn ordered_list_marker(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn is_structural(first_line: &str) -> bool {
    STRUCTURAL_RULES
        .iter()
        .any(|(_, predicate)| predicate(first_line))
}

/// Segment a block of free-form text into ordered structural/narrative units.
pub fn segment(text: &str) -> Vec<TextBlock> {
    let normalized = text.replace("\r\n", "\n");
    split_on_blank_lines(&normalized)
        .into_iter()
        .filter(|candidate| !candidate.trim().is_empty())
        .map(|candidate| {
            let first_line = candidate.lines().next().unwrap_or("");
            if is_structural(first_line) {
                TextBlock::Structural(candidate.to_string())
            } else {
                TextBlock::Narrative(candidate.replace('\n', " ").trim().to_string())
            }
        })
        .collect()
}

/// Split on runs of two or more newlines, keeping block order.
fn split_on_blank_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx + 1 < bytes.len() {
        if bytes[idx] == b'\n' && bytes[idx + 1] == b'\n' {
            blocks.push(&text[start..idx]);
            while idx < bytes.len() && bytes[idx] == b'\n' {
                idx += 1;
            }
            start = idx;
        } else {
            idx += 1;
        }
    }
    if start < text.len() {
        blocks.push(&text[start..]);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrative_lines_collapse_to_spaces() {
        let blocks = segment("Para one.\n\nPara two line1\nline2.");
        assert_eq!(
            blocks,
            vec![
                TextBlock::Narrative("Para one.".to_string()),
                TextBlock::Narrative("Para two line1 line2.".to_string()),
            ]
        );
    }

    #[test]
    fn structural_first_lines_are_preserved_verbatim() {
        let fenced = "```\nlet x = 1;\nlet y = 2;\n```";
        let blocks = segment(fenced);
        assert_eq!(blocks, vec![TextBlock::Structural(fenced.to_string())]);

        let indented = "    indented code\n    second line";
        let blocks = segment(indented);
        assert_eq!(blocks, vec![TextBlock::Structural(indented.to_string())]);
    }

    #[test]
    fn classifier_covers_every_marker() {
        assert!(is_structural("    code"));
        assert!(is_structural("```rust"));
        assert!(is_structural("> quoted"));
        assert!(is_structural("| a | b |"));
        assert!(is_structural("- item"));
        assert!(is_structural("* item"));
        assert!(is_structural("1. item"));
        assert!(is_structural("12. item"));
        assert!(!is_structural("plain prose"));
        assert!(!is_structural("-not a list"));
        assert!(!is_structural("*emphasis*"));
        assert!(!is_structural(". no digits"));
        assert!(!is_structural("1point5"));
    }

    #[test]
    fn segmentation_is_idempotent_for_narrative() {
        let once = segment("line one\nline two");
        let text = once[0].text().to_string();
        let twice = segment(&text);
        assert_eq!(once, twice);
    }

    #[test]
    fn extra_blank_lines_and_crlf_are_tolerated() {
        let blocks = segment("first\r\n\r\n\r\nsecond\n\n\n");
        assert_eq!(
            blocks,
            vec![
                TextBlock::Narrative("first".to_string()),
                TextBlock::Narrative("second".to_string()),
            ]
        );
    }

    #[test]
    fn mixed_structural_and_narrative_keeps_order() {
        let text = "Intro prose.\n\n- one\n- two\n\nClosing\nprose.";
        let blocks = segment(text);
        assert_eq!(
            blocks,
            vec![
                TextBlock::Narrative("Intro prose.".to_string()),
                TextBlock::Structural("- one\n- two".to_string()),
                TextBlock::Narrative("Closing prose.".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(segment("").is_empty());
        assert!(segment("\n\n\n").is_empty());
    }
}
