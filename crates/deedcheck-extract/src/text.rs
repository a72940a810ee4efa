//! Character-safe slicing helpers. OCR text mixes scripts, so byte offsets are
//! never used as lengths.

/// The first `max` characters of `text`.
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncate to at most `max` characters, ending in `...` only when something
/// was cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out = take_chars(text, max.saturating_sub(3)).to_string();
    out.push_str("...");
    out
}

/// Byte offset `n` characters before `byte_idx`, clamped to the start.
pub fn back_chars(text: &str, byte_idx: usize, n: usize) -> usize {
    if n == 0 {
        return byte_idx;
    }
    text[..byte_idx]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(idx, _)| idx)
}

/// Number of characters in `text[..byte_idx]`.
pub fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}
