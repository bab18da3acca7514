//! Splits a raw model response into its reasoning and its answer.

use serde::Serialize;

/// Marker opening the reasoning segment.
pub const OPEN_MARKER: &str = "<think>";

/// Marker closing the reasoning segment.
pub const CLOSE_MARKER: &str = "</think>";

/// A model response split into an optional reasoning segment and the answer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SegmentedResponse {
    /// The "thought process" between the markers, trimmed.
    pub reasoning: Option<String>,
    /// What the model answered.
    pub answer: String,
}

/// Splits `raw` at the first [`OPEN_MARKER`] and the first [`CLOSE_MARKER`].
///
/// When either marker is missing, there is no reasoning and the answer is
/// `raw` unchanged, without trimming.
///
/// When both are present, the reasoning is the trimmed text between the
/// end of the opening marker and the start of the closing marker (empty if
/// the closing marker comes first). The answer starts
/// `OPEN_MARKER.len()` bytes past the start of the closing marker, not
/// `CLOSE_MARKER.len()`. Since the closing marker is one byte longer, the
/// answer keeps its final `>`. Trimming treats the information separators
/// U+001C to U+001F as whitespace, on top of Unicode whitespace:
///
/// ```
/// use devmind_core::segment::segment;
///
/// let resp = segment("<think> reasoning here </think> final answer");
/// assert_eq!(resp.reasoning.as_deref(), Some("reasoning here"));
/// assert_eq!(resp.answer, "> final answer");
/// ```
pub fn segment(raw: &str) -> SegmentedResponse {
    let (Some(open_idx), Some(close_idx)) =
        (raw.find(OPEN_MARKER), raw.find(CLOSE_MARKER))
    else {
        return SegmentedResponse {
            reasoning: None,
            answer: raw.to_owned(),
        };
    };

    let reasoning_start = open_idx + OPEN_MARKER.len();
    let reasoning = raw.get(reasoning_start..close_idx).unwrap_or_default();
    // Both offsets land on ASCII bytes of the markers, so they are always
    // char boundaries.
    let answer = &raw[close_idx + OPEN_MARKER.len()..];

    SegmentedResponse {
        reasoning: Some(strip(reasoning).to_owned()),
        answer: strip(answer).to_owned(),
    }
}

/// Trims whitespace, counting the ASCII information separators
/// (U+001C to U+001F) as whitespace.
fn strip(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(
            segment("plain text"),
            SegmentedResponse {
                reasoning: None,
                answer: "plain text".to_owned(),
            }
        );
        assert_eq!(segment("  padded \n").answer, "  padded \n");
    }

    #[test]
    fn test_answer_offset_uses_open_marker_length() {
        let raw = "<think> reasoning here </think> final answer";
        let end_idx = raw.find("</think>").unwrap();
        let resp = segment(raw);
        assert_eq!(resp.reasoning.as_deref(), Some("reasoning here"));
        assert_eq!(resp.answer, raw[end_idx + "<think>".len()..].trim());
        assert_ne!(resp.answer, raw[end_idx + "</think>".len()..].trim());
        assert_eq!(resp.answer, "> final answer");
    }

    #[test]
    fn test_single_marker_falls_back() {
        let raw = "<think> never closed";
        assert_eq!(segment(raw).reasoning, None);
        assert_eq!(segment(raw).answer, raw);

        let raw = "stray </think> closer ";
        assert_eq!(segment(raw).reasoning, None);
        assert_eq!(segment(raw).answer, raw);
    }

    #[test]
    fn test_first_markers_win() {
        let raw = "<think>a</think>b<think>c</think>d";
        let resp = segment(raw);
        assert_eq!(resp.reasoning.as_deref(), Some("a"));
        assert_eq!(resp.answer, ">b<think>c</think>d");
    }

    #[test]
    fn test_closing_before_opening() {
        let resp = segment("</think> answer <think> late");
        assert_eq!(resp.reasoning.as_deref(), Some(""));
        assert_eq!(resp.answer, "> answer <think> late");
    }

    #[test]
    fn test_empty_reasoning_and_answer() {
        let resp = segment("<think>\n\n</think>");
        assert_eq!(resp.reasoning.as_deref(), Some(""));
        assert_eq!(resp.answer, ">");
    }

    #[test]
    fn test_information_separators_are_trimmed() {
        let raw = "<think>\x1f why \x1c</think>\x1d answer\x1e\u{3000}";
        let resp = segment(raw);
        assert_eq!(resp.reasoning.as_deref(), Some("why"));
        assert_eq!(resp.answer, ">\x1d answer");
    }

    #[test]
    fn test_multibyte_text() {
        let resp = segment("<think>思考</think>\n答え");
        assert_eq!(resp.reasoning.as_deref(), Some("思考"));
        assert_eq!(resp.answer, ">\n答え");
    }
}
