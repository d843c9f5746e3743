//! Shared utility functions

use unicode_segmentation::UnicodeSegmentation;

/// Truncate a string to a maximum length, appending "..." if truncated.
/// Handles multi-byte characters by finding a valid char boundary.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let suffix = "...";
    let target = max_len.saturating_sub(suffix.len());
    // Find a valid char boundary at or before target
    let mut end = target;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &s[..end], suffix)
}

/// Render an optional similarity score for terminal output.
pub fn format_score(score: Option<f32>) -> String {
    match score {
        Some(s) => format!("{:.4}", s),
        None => "n/a".to_string(),
    }
}

/// Lowercase, strip diacritics, and split into word tokens of at least two
/// characters.
///
/// This is the fixed preprocessing both the term-vector index and the sparse
/// encoder share; changing it changes every derived vocabulary.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(|w| {
            w.to_lowercase()
                .chars()
                .map(strip_diacritic)
                .collect::<String>()
        })
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// Map a lowercase Latin character to its unaccented base form.
fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
