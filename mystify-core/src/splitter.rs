//! Paragraph splitting: a chapter is a sequence of blank-line-delimited paragraphs.

use crate::types::{Paragraph, PARAGRAPH_SEPARATOR};
use std::str::Split;

/// Lazy sequence of the trimmed, non-empty paragraphs of a document.
///
/// Clone it to walk the same document again from the start.
#[derive(Debug, Clone)]
pub struct Paragraphs<'a> {
    segments: Split<'a, &'static str>,
    next_index: usize,
}

impl<'a> Iterator for Paragraphs<'a> {
    type Item = Paragraph<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for segment in self.segments.by_ref() {
            let text = segment.trim();
            if text.is_empty() {
                continue;
            }

            let index = self.next_index;
            self.next_index += 1;
            return Some(Paragraph { index, text });
        }
        None
    }
}

/// Split `document` on `"\n\n"`, trimming each piece and skipping the empty ones.
pub fn split_paragraphs(document: &str) -> Paragraphs<'_> {
    Paragraphs {
        segments: document.split(PARAGRAPH_SEPARATOR),
        next_index: 0,
    }
}
