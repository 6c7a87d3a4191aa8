//! Overlapping character windows over reference documents.
//!
//! Windows are at most `size` characters long and adjacent windows share
//! exactly `overlap` characters. A cut prefers the last paragraph break in the
//! window, then the last line break, then the last space, and falls back to a
//! hard cut at `size`. All arithmetic is in `char`s so multi-byte text never
//! splits a code point.

use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::config::WindowConfig;
use crate::record::{ReferenceDocument, TextWindow};

/// Splits `doc` into ordered, overlapping windows.
///
/// Whitespace-only documents and invalid configs produce no windows.
pub fn split_document(doc: &ReferenceDocument, cfg: &WindowConfig) -> Vec<TextWindow> {
    if doc.text.trim().is_empty() || cfg.validate().is_err() {
        trace!(source = %doc.source, "split_document: nothing to split");
        return Vec::new();
    }

    let chars: Vec<char> = doc.text.chars().collect();
    let total = chars.len();

    let mut out = Vec::new();
    let mut start = 0usize;
    let mut ordinal = 0u32;

    loop {
        let end = (start + cfg.size).min(total);
        let cut = if end == total {
            total
        } else {
            // A cut must leave the next window starting after this one.
            preferred_cut(&chars, start, end, start + cfg.overlap + 1)
        };

        let text: String = chars[start..cut].iter().collect();
        out.push(TextWindow {
            id: window_id(&doc.source, ordinal, &text),
            source: doc.source.clone(),
            ordinal,
            start_char: start,
            text,
        });

        if cut == total {
            break;
        }
        start = cut - cfg.overlap;
        ordinal = ordinal.saturating_add(1);
    }

    debug!(
        source = %doc.source,
        windows = out.len(),
        size = cfg.size,
        overlap = cfg.overlap,
        "split_document"
    );
    out
}

/// Exclusive end of the window starting at `start`; never below `min_cut`.
fn preferred_cut(chars: &[char], start: usize, end: usize, min_cut: usize) -> usize {
    let window = &chars[start..end];

    let paragraph = window
        .windows(2)
        .rposition(|pair| pair == ['\n', '\n'])
        .map(|i| start + i + 2);
    let line = window.iter().rposition(|&c| c == '\n').map(|i| start + i + 1);
    let space = window.iter().rposition(|&c| c == ' ').map(|i| start + i + 1);

    [paragraph, line, space]
        .into_iter()
        .flatten()
        .find(|&cut| cut >= min_cut)
        .unwrap_or(end)
}

/// Stable id: SHA-256 over source, ordinal and text.
fn window_id(source: &str, ordinal: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(ordinal.to_le_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
