use std::sync::OnceLock;

use regex::Regex;

/// Reduce a definition to its canonical comparison form: every run of
/// whitespace (newlines included) collapses to one space, the ends are
/// trimmed, and the result is uppercased. This is a deliberately loose
/// equality; it conflates case and spacing differences inside string
/// literals as well.
pub fn normalize(definition: &str) -> String {
    let collapsed = whitespace_re().replace_all(definition, " ");
    collapsed.trim().to_uppercase()
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}
