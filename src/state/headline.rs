//! Headline split - prefix / highlighted name
//!
//! The hero label renders the part of the revealed text that falls before
//! the name in plain style and the rest in the accent style. The split
//! offset is found once from the static headline and name.

/// Fixed split point of a headline, in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineSplit {
    name_start: usize,
}

impl HeadlineSplit {
    /// Locate `name` inside `headline`.
    ///
    /// When the name does not occur, nothing is highlighted.
    pub fn new(headline: &str, name: &str) -> Self {
        let name_start = match headline.find(name) {
            Some(byte_offset) if !name.is_empty() => headline[..byte_offset].chars().count(),
            _ => {
                tracing::warn!(headline, name, "highlighted name not found in headline");
                headline.chars().count()
            }
        };
        Self { name_start }
    }

    /// Char offset where the highlighted name begins.
    pub fn name_start(&self) -> usize {
        self.name_start
    }

    /// Split revealed text into `(prefix, name)`.
    pub fn split<'a>(&self, visible: &'a str) -> (&'a str, &'a str) {
        match visible.char_indices().nth(self.name_start) {
            Some((byte_offset, _)) => visible.split_at(byte_offset),
            None => (visible, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADLINE: &str = "Hello, I'm Asad Ali";

    #[test]
    fn test_split_point_found_once() {
        let split = HeadlineSplit::new(HEADLINE, "Asad Ali");
        assert_eq!(split.name_start(), 11);
    }

    #[test]
    fn test_split_before_name_reached() {
        let split = HeadlineSplit::new(HEADLINE, "Asad Ali");
        assert_eq!(split.split(""), ("", ""));
        assert_eq!(split.split("Hello"), ("Hello", ""));
        assert_eq!(split.split("Hello, I'm "), ("Hello, I'm ", ""));
    }

    #[test]
    fn test_split_inside_name() {
        let split = HeadlineSplit::new(HEADLINE, "Asad Ali");
        assert_eq!(split.split("Hello, I'm As"), ("Hello, I'm ", "As"));
        assert_eq!(split.split(HEADLINE), ("Hello, I'm ", "Asad Ali"));
    }

    #[test]
    fn test_missing_name_highlights_nothing() {
        let split = HeadlineSplit::new(HEADLINE, "Nobody");
        assert_eq!(split.split(HEADLINE), (HEADLINE, ""));
    }

    #[test]
    fn test_multibyte_prefix_counts_chars() {
        let split = HeadlineSplit::new("¡Hola, soy Zoë!", "Zoë");
        assert_eq!(split.name_start(), 11);
        assert_eq!(split.split("¡Hola, soy Zo"), ("¡Hola, soy ", "Zo"));
    }
}
