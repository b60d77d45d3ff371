use std::sync::LazyLock;

use regex::Regex;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

static THINK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("think pattern compiles"));

/// Removes every `<think>...</think>` span (markers included) and trims the result.
pub fn strip_thinking(text: &str) -> String {
    THINK_SPAN.replace_all(text, "").trim().to_string()
}

/// A message split around its first reasoning section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Thinking<'a> {
    pub before: &'a str,
    pub thinking: Option<&'a str>,
    pub after: &'a str,
}

/// Splits `text` around the first `<think>` section for display.
///
/// A buffer that is still streaming may hold an opening marker without its closing one; in that
/// case everything after the opening marker is reported as thinking and `after` is empty.
pub fn split_thinking(text: &str) -> Thinking<'_> {
    let Some(open) = text.find(THINK_OPEN) else {
        return Thinking {
            before: text,
            thinking: None,
            after: "",
        };
    };
    let body_start = open + THINK_OPEN.len();
    match text[body_start..].find(THINK_CLOSE) {
        Some(rel_close) => {
            let close = body_start + rel_close;
            Thinking {
                before: &text[..open],
                thinking: Some(text[body_start..close].trim()),
                after: &text[close + THINK_CLOSE.len()..],
            }
        }
        None => Thinking {
            before: &text[..open],
            thinking: Some(text[body_start..].trim()),
            after: "",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_span() {
        assert_eq!(strip_thinking("<think>ignore</think>Hello"), "Hello");
    }

    #[test]
    fn strips_every_span_across_lines() {
        let raw = "  <think>line one\nline two</think>A <think>\nmore\n</think>B\n";
        assert_eq!(strip_thinking(raw), "A B");
    }

    #[test]
    fn non_greedy_keeps_text_between_spans() {
        let raw = "<think>a</think>keep<think>b</think>";
        assert_eq!(strip_thinking(raw), "keep");
    }

    #[test]
    fn no_markers_only_trims() {
        assert_eq!(strip_thinking("\n  plain answer \t"), "plain answer");
        assert_eq!(strip_thinking(""), "");
    }

    #[test]
    fn unterminated_marker_is_left_alone() {
        assert_eq!(strip_thinking("<think>still going"), "<think>still going");
    }

    #[test]
    fn split_complete_section() {
        let parts = split_thinking("pre<think> why </think>answer");
        assert_eq!(parts.before, "pre");
        assert_eq!(parts.thinking, Some("why"));
        assert_eq!(parts.after, "answer");
    }

    #[test]
    fn split_open_section_while_streaming() {
        let parts = split_thinking("<think>partial reas");
        assert_eq!(parts.before, "");
        assert_eq!(parts.thinking, Some("partial reas"));
        assert_eq!(parts.after, "");
    }

    #[test]
    fn split_without_markers() {
        let parts = split_thinking("just text");
        assert_eq!(parts.before, "just text");
        assert_eq!(parts.thinking, None);
    }
}
