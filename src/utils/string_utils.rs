use crate::utils::FORBIDDEN_FILENAME_CHARS;

/// Turns a dotted release name into readable text: ellipses are dropped,
/// single periods become spaces.
pub fn normalize_name(name: &str) -> String {
    name.replace("...", "")
        .replace("..", "")
        .replace('.', " ")
        .trim()
        .to_string()
}

/// Makes a name safe to be used as a single file or directory name.
///
/// Forbidden characters are replaced with `_`, remaining periods become `_`
/// and trailing separators are stripped. The result is a fixpoint:
/// `sanitize_file_name(&sanitize_file_name(x)) == sanitize_file_name(x)`.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let sanitized = replaced.trim().trim_end_matches(['_', '.', ':']);
    let sanitized = sanitized.replace("..", ".").replace('.', "_");
    sanitized
        .trim_end_matches(|c: char| c.is_whitespace() || c == '_')
        .to_string()
}

/// Human readable show or movie title.
#[inline]
pub fn title_name(name: &str) -> String {
    sanitize_file_name(&normalize_name(name))
}
