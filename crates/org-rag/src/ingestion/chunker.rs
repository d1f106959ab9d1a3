//! Fixed-width text chunking

/// Split text into contiguous, non-overlapping segments of exactly
/// `max_chars` characters, except the final segment which holds the
/// remainder.
///
/// Text that already fits returns as a single unchanged segment. Counts
/// characters, not bytes, so multi-byte input never splits mid-codepoint.
/// Deterministic, no side effects, never panics.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_segment() {
        assert_eq!(chunk_text("hello", 10), vec!["hello"]);
        assert_eq!(chunk_text("exact", 5), vec!["exact"]);
        assert_eq!(chunk_text("", 10), vec![""]);
    }

    #[test]
    fn test_segments_have_exact_length_except_last() {
        let text = "a".repeat(2000);
        let chunks = chunk_text(&text, 900);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 900);
        assert_eq!(chunks[1].len(), 900);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = chunk_text(&text, 137);

        assert_eq!(chunks.concat(), text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 137);
        }
    }

    #[test]
    fn test_multibyte_input_splits_on_char_boundaries() {
        let text = "áéíóú".repeat(100);
        let chunks = chunk_text(&text, 7);

        assert_eq!(chunks.concat(), text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 7);
        }
    }
}
