//! Local file names for downloaded archives.

/// Longest file name most filesystems accept (bytes).
const NAME_MAX: usize = 255;

/// Last non-empty path segment of `url`, percent-encoding left as is.
/// `None` for unparseable URLs or a bare root path.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    match segment {
        "." | ".." => None,
        s => Some(s.to_string()),
    }
}

/// Makes `name` safe to use as a single path component.
///
/// Separators, NUL, control characters and whitespace become `_` (runs
/// collapsed), leading/trailing dots and underscores are stripped, and the
/// result is cut to `NAME_MAX` bytes on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | '\0') || c.is_control() || c.is_whitespace();
        if !unsafe_char {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
