//! Overlapping text chunker.
//!
//! Splits a document into fixed-size character windows with overlap, snapping
//! to a sentence boundary when one falls near the end of a window.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// One window of a source document, the unit of indexing and retrieval.
#[derive(Debug, Clone)]
pub struct TextChunk {
    pub text: String,
    /// Chunk index within the source document
    pub position: usize,
}

/// Split text into overlapping chunks.
pub fn split_into_chunks(config: &ChunkerConfig, text: &str) -> Vec<TextChunk> {
    let chunk_size = config.chunk_size;
    let step = chunk_size.saturating_sub(config.chunk_overlap).max(1);

    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    let mut chunks = Vec::new();
    if total_chars == 0 {
        return chunks;
    }

    let mut start = 0;
    let mut position = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        let chunk_text: String = chars[start..end].iter().collect();

        let final_text = if end < total_chars {
            snap_to_sentence_boundary(&chunk_text)
        } else {
            chunk_text
        };

        let trimmed = final_text.trim();
        if !trimmed.is_empty() {
            chunks.push(TextChunk {
                text: trimmed.to_string(),
                position,
            });
            position += 1;
        }

        start += step;
    }

    chunks
}

/// Cut the chunk at a sentence ending in its last 20%, if one exists.
fn snap_to_sentence_boundary(text: &str) -> String {
    let sentence_endings = [". ", "! ", "? ", ".\n", "!\n", "?\n"];

    let search_start = (text.len() * 80) / 100;
    let search_start = floor_char_boundary(text, search_start);
    let search_text = &text[search_start..];

    for ending in sentence_endings.iter() {
        if let Some(pos) = search_text.rfind(ending) {
            let cut_pos = search_start + pos + ending.len();
            return text[..cut_pos].to_string();
        }
    }

    text.to_string()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_splitting_with_overlap() {
        let config = ChunkerConfig {
            chunk_size: 100,
            chunk_overlap: 20,
        };

        let text = "This is a test sentence. ".repeat(20);
        let chunks = split_into_chunks(&config, &text);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i);
            assert!(!chunk.text.is_empty());
            assert!(chunk.text.chars().count() <= 100);
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunks = split_into_chunks(&ChunkerConfig::default(), "");
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_into_chunks(&ChunkerConfig::default(), "Coverage starts at age 18.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Coverage starts at age 18.");
    }

    #[test]
    fn test_sentence_boundary_snap() {
        let config = ChunkerConfig {
            chunk_size: 60,
            chunk_overlap: 10,
        };
        let text = "First sentence here. Second sentence follows after it. Third one keeps going for a while longer.";
        let chunks = split_into_chunks(&config, text);

        // Non-final chunks should end on a sentence boundary when one is near.
        assert!(chunks[0].text.ends_with('.'));
    }
}
