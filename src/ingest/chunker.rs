//! CV text chunking for ingestion
//!
//! Chunks follow the document's own structure: paragraphs split on blank
//! lines stay whole, and only paragraphs over the size limit are re-packed
//! sentence by sentence. Sizes are measured in characters, not bytes, so
//! accented text counts the way an author would expect.

/// Maximum characters per chunk
pub const DEFAULT_MAX_CHARS: usize = 2000;

/// Split CV text into embedding-ready chunks
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    split_paragraphs(text)
        .into_iter()
        .flat_map(|p| chunk_long_paragraph(p, max_chars))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Split text into trimmed, non-empty paragraphs on blank lines
fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Re-pack one paragraph into chunks of at most `max_chars` characters.
///
/// Short paragraphs pass through whole. Long ones are split on sentence
/// boundaries and greedily packed; a single sentence over the limit is
/// emitted as its own oversized chunk rather than cut mid-sentence.
fn chunk_long_paragraph(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.chars().count() <= max_chars {
        return vec![paragraph.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(paragraph) {
        let candidate = if current.is_empty() {
            sentence.clone()
        } else {
            format!("{current} {sentence}")
        };

        if candidate.chars().count() <= max_chars {
            current = candidate;
        } else {
            if !current.is_empty() {
                chunks.push(current);
            }
            current = sentence;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split a paragraph into sentences, keeping terminal punctuation
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}
