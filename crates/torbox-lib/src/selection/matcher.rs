use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Whether the hint contains shell-style glob metacharacters.
pub fn is_glob(hint: &str) -> bool {
    hint.contains(['*', '?', '['])
}

/// Matches `name` against a hint that is either an exact name or a shell-style glob.
///
/// A hint that fails to parse as a glob (e.g. an unclosed `[`) only matches literally.
pub fn hint_matches(hint: &str, name: &str) -> bool {
    if hint == name {
        return true;
    }
    if !is_glob(hint) {
        return false;
    }
    Pattern::new(hint)
        .map(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
        .unwrap_or(false)
}
