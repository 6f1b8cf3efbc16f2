//! Display width of UTF-8 text in terminal columns
//!
//! This is a lead-byte table, not full Unicode width resolution: every
//! multi-byte sequence is treated as a wide character except the halfwidth
//! forms block (U+FF61..U+FFDC and U+FFE8..U+FFEE). The renderer relies on
//! these exact numbers to right-align timestamps and application names, so
//! the timeline view uses the same function when it wraps lines.

/// Number of monospace columns occupied by `bytes`.
///
/// Malformed lead bytes count as one column and consume one byte. A
/// truncated trailing sequence still counts as a full character.
pub fn display_width(bytes: &[u8]) -> usize {
    let mut width = 0;
    let mut i = 0;

    while i < bytes.len() {
        let (size, w) = classify(bytes, i);
        width += w;
        i += size;
    }

    width
}

/// Convenience wrapper for string slices
pub fn str_width(s: &str) -> usize {
    display_width(s.as_bytes())
}

/// Returns (bytes consumed, columns) for the sequence starting at `i`
fn classify(bytes: &[u8], i: usize) -> (usize, usize) {
    match bytes[i] {
        0x00..=0x7f => (1, 1),
        0xc2..=0xdf => (2, 2),
        0xef => {
            let hi = bytes.get(i + 1).copied().unwrap_or(0) as u16;
            let lo = bytes.get(i + 2).copied().unwrap_or(0) as u16;
            let p = (hi << 8) | lo;
            match p {
                // Halfwidth CJK punctuation, Katakana and Hangul variants
                0xbda1..=0xbe9c => (3, 1),
                // Halfwidth symbol variants
                0xbfa8..=0xbfae => (3, 1),
                _ => (3, 2),
            }
        }
        0xe0..=0xef => (3, 2),
        0xf0..=0xf7 => (4, 2),
        _ => (1, 1),
    }
}
