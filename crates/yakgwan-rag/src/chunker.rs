//! Sentence-boundary chunking for indexing
//!
//! Text is normalized, split after terminal punctuation (`.`, `!`, `?`
//! followed by whitespace) and greedily packed into chunks of at most
//! `max_size` characters. Each chunk after the first is seeded with the tail
//! of the previous one so that consecutive chunks overlap. A sentence is
//! never split: one longer than `max_size` becomes its own oversized chunk.
//!
//! Sizes are counted in characters, not bytes.

use regex::Regex;
use std::sync::LazyLock;

static CARRIAGE_RETURNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?").expect("valid regex"));
static REPEATED_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));
static REPEATED_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Collapse repeated newlines and spaces, then trim both ends
pub fn clean_text(text: &str) -> String {
    let text = CARRIAGE_RETURNS.replace_all(text, "\n");
    let text = REPEATED_NEWLINES.replace_all(&text, "\n");
    let text = REPEATED_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

/// Split normalized text into sentence-like units
///
/// The terminal punctuation stays with its sentence; the whitespace after it
/// is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        let end = boundary.start() + 1;
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = boundary.end();
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

/// Split raw document text into bounded, overlapping chunks
///
/// Precondition: `max_size > overlap`. A larger overlap is clamped to
/// `max_size - 1`.
pub fn chunk_text(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let overlap = overlap.min(max_size.saturating_sub(1));
    let cleaned = clean_text(text);

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for sentence in split_sentences(&cleaned) {
        let sentence_len = sentence.chars().count();
        let joined_len = if buffer.is_empty() {
            sentence_len
        } else {
            buffer_len + 1 + sentence_len
        };

        if joined_len > max_size && !buffer.is_empty() {
            let closed = std::mem::take(&mut buffer);
            let seed = overlap_seed(&closed, overlap);
            buffer = if seed.is_empty() {
                sentence.to_string()
            } else {
                format!("{} {}", seed, sentence)
            };
            buffer_len = buffer.chars().count();
            chunks.push(closed);
        } else {
            if !buffer.is_empty() {
                buffer.push(' ');
                buffer_len += 1;
            }
            buffer.push_str(sentence);
            buffer_len += sentence_len;
        }
    }

    if !buffer.trim().is_empty() {
        chunks.push(buffer);
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}

/// Tail of a closed chunk used to seed the next one
///
/// Takes at most `overlap - 1` characters so that the seed plus the joining
/// space stays within `overlap`. A seed that starts in the middle of a word
/// drops that partial word, unless the whole tail is one word.
pub(crate) fn overlap_seed(chunk: &str, overlap: usize) -> &str {
    let budget = overlap.saturating_sub(1);
    if budget == 0 {
        return "";
    }

    let total = chunk.chars().count();
    if total <= budget {
        return chunk.trim();
    }

    let start = chunk
        .char_indices()
        .nth(total - budget)
        .map(|(index, _)| index)
        .unwrap_or(0);
    let tail = &chunk[start..];

    let cut_mid_word = chunk[..start]
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_whitespace())
        && tail.chars().next().is_some_and(|c| !c.is_whitespace());

    if cut_mid_word {
        if let Some(space) = tail.find(char::is_whitespace) {
            return tail[space..].trim();
        }
    }

    tail.trim()
}
