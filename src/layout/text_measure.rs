//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Display width of one char. Control characters count as 0.
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Longest prefix of `s` that fits in `max_width` cells.
pub fn truncate_to_width(s: &str, max_width: u16) -> &str {
    let mut used = 0u16;
    for (offset, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > max_width {
            return &s[..offset];
        }
        used += w;
    }
    s
}

/// Greedy word wrap to `width` cells.
///
/// Words longer than a line are hard-broken. Always returns at least one line.
pub fn wrap_text(s: &str, width: u16) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0u16;

    for word in s.split_whitespace() {
        let mut word = word;
        loop {
            let word_width = string_width(word);
            let sep = if current.is_empty() { 0 } else { 1 };

            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                break;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
                continue;
            }

            // Word alone is wider than a line: hard break.
            let head = truncate_to_width(word, width);
            let head = if head.is_empty() {
                // A single wide char on a 1-cell line still has to go somewhere.
                let end = word.chars().next().map(char::len_utf8).unwrap_or(word.len());
                &word[..end]
            } else {
                head
            };
            lines.push(head.to_string());
            word = &word[head.len()..];
            if word.is_empty() {
                break;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(string_width("Hello"), 5);
        assert_eq!(string_width(""), 0);
    }

    #[test]
    fn test_wide_chars() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(char_width('日'), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("Hello", 3), "Hel");
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
        assert_eq!(truncate_to_width("日本語", 3), "日");
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
