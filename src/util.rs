//! Text helpers.

/// Truncates a string to fit within a maximum display width, adding ellipsis if needed.
///
/// Uses Unicode width calculations so descriptions of elements holding CJK
/// text or emoji icons stay within the limit. If truncation is needed,
/// characters are removed from the end and replaced with `…`.
///
/// # Example
///
/// ```rust
/// use nocturne::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Dark Mode", 10), "Dark Mode");
/// assert_eq!(truncate_to_width("Switch to Dark Mode", 7), "Switch…");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    // Reserve 1 column for the ellipsis
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width_no_truncation() {
        assert_eq!(truncate_to_width("moon", 10), "moon");
        assert_eq!(truncate_to_width("moon", 4), "moon");
    }

    #[test]
    fn test_truncate_to_width_with_truncation() {
        assert_eq!(truncate_to_width("Light Mode", 6), "Light…");
    }

    #[test]
    fn test_truncate_to_width_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_to_width("暗い模式", 5), "暗い…");
    }

    #[test]
    fn test_truncate_to_width_empty() {
        assert_eq!(truncate_to_width("", 5), "");
    }

    #[test]
    fn test_truncate_to_width_zero_width() {
        assert_eq!(truncate_to_width("sun", 0), "…");
    }
}
