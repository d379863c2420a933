//! Greedy word wrapping for text boxes.

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words are split on whitespace and never
/// hyphenated: a word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}
