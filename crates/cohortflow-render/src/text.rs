//! Greedy word wrapping bounded by display columns.

use unicode_width::UnicodeWidthStr;

/// Wraps `text` into lines no wider than `max_width` display columns.
///
/// Word boundaries are whitespace; words are never split, so a word wider
/// than `max_width` ends up alone on its own line. Empty (or whitespace-only)
/// input produces no lines at all.
pub fn wrap_lines(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        if current_width + 1 + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_no_lines() {
        assert!(wrap_lines("", 10).is_empty());
        assert!(wrap_lines("   \t ", 10).is_empty());
    }

    #[test]
    fn short_text_is_a_single_line() {
        assert_eq!(wrap_lines("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wraps_greedily_at_word_boundaries() {
        assert_eq!(
            wrap_lines("A rather long description text", 15),
            vec!["A rather long", "description", "text"]
        );
    }

    #[test]
    fn overlong_word_stays_unbroken_on_its_own_line() {
        assert_eq!(
            wrap_lines("see supercalifragilistic results", 10),
            vec!["see", "supercalifragilistic", "results"]
        );
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        assert_eq!(wrap_lines("ab cd", 5), vec!["ab cd"]);
        assert_eq!(wrap_lines("ab cde", 5), vec!["ab", "cde"]);
    }

    #[test]
    fn collapses_interior_whitespace() {
        assert_eq!(wrap_lines("a   b\tc", 10), vec!["a b c"]);
    }
}
