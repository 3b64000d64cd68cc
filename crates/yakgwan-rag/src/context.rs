//! Context assembly under length constraints

use yakgwan_core::RetrievedHit;

use crate::prompts::context_label;

/// Number of top hits that make it into the context and the cited sources
pub const MAX_CONTEXT_PASSAGES: usize = 3;

/// Per-passage character cap applied before the global cap
pub const PER_PASSAGE_CAP: usize = 1000;

/// Marker appended when the global cap cuts the context
pub const ELLIPSIS: &str = "...";

/// Render the top hits into a ranked, length-capped context block
///
/// Each of the first [`MAX_CONTEXT_PASSAGES`] hits is cut to
/// `per_passage_cap` characters and placed under its 1-based rank label.
/// If the result is longer than `total_cap` characters it is cut hard at
/// `total_cap` (possibly mid-sentence) and [`ELLIPSIS`] is appended.
pub fn assemble(hits: &[RetrievedHit], per_passage_cap: usize, total_cap: usize) -> String {
    let mut context = String::new();

    for (i, hit) in hits.iter().take(MAX_CONTEXT_PASSAGES).enumerate() {
        context.push_str(&context_label(i + 1));
        context.push('\n');
        context.push_str(truncate_chars(hit.text(), per_passage_cap));
        context.push_str("\n\n");
    }

    if context.chars().count() > total_cap {
        let mut capped = truncate_chars(&context, total_cap).to_string();
        capped.push_str(ELLIPSIS);
        return capped;
    }

    context
}

/// Longest prefix of `text` with at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
