//! Display formatting for PokeAPI resource names.

/// Turn a hyphenated resource name into title case.
///
/// Hyphens become spaces, then every space-separated word gets an upper-case
/// first character and a lower-cased tail. Empty words are kept, so runs of
/// separators survive as runs of spaces (`"a--b"` becomes `"A  B"`).
pub fn format_text(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    value
        .replace('-', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`format_text`] for values the API may leave out.
pub fn format_optional(value: Option<&str>) -> String {
    value.map(format_text).unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(format_text(""), "");
        assert_eq!(format_optional(None), "");
        assert_eq!(format_optional(Some("")), "");
    }

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(format_text("fire-red"), "Fire Red");
        assert_eq!(format_text("lets-go-pikachu"), "Lets Go Pikachu");
        assert_eq!(format_optional(Some("heart-gold")), "Heart Gold");
    }

    #[test]
    fn test_lowercases_tail() {
        assert_eq!(format_text("ABC"), "Abc");
        assert_eq!(format_text("x-Y-zZ"), "X Y Zz");
    }

    #[test]
    fn test_empty_words_are_kept() {
        assert_eq!(format_text("a--b"), "A  B");
        assert_eq!(format_text("-"), " ");
        assert_eq!(format_text("red "), "Red ");
    }
}
