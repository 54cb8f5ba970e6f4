use regex::Regex;

/// Lowercase, strip the fixed punctuation set (ASCII plus the Devanagari
/// danda/double danda and the ideographic full stop), collapse whitespace
/// runs, trim. Matching happens in this normalized space only.
pub fn normalize(input: &str) -> String {
    let cleaner = Regex::new(r"[\x21-\x2f\x3a-\x40\x5b-\x60\x7b-\x7e\u{0964}\u{0965}。]+")
        .expect("valid punctuation regex");
    let lowercased = input.to_lowercase();
    let stripped = cleaner.replace_all(&lowercased, " ");

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn tokens(input: &str) -> Vec<String> {
    normalize(input)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
