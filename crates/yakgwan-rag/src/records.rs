//! Passage records for the write path

use yakgwan_core::Passage;

/// Wrap chunks into passages with positional ids (`chunk_0`, `chunk_1`, ...)
///
/// Ids are only stable across runs over identical input; a different chunk
/// count reassigns them, so an upsert by id is only idempotent for re-runs of
/// the same document.
pub fn build_records<S: AsRef<str>>(chunks: &[S], source_label: &str) -> Vec<Passage> {
    chunks
        .iter()
        .enumerate()
        .map(|(ordinal, chunk)| {
            Passage::new(format!("chunk_{}", ordinal), chunk.as_ref(), source_label, ordinal)
        })
        .collect()
}
