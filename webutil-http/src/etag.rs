//! Entity-tag lists as they appear in `If-Match` / `If-None-Match`.

use memchr::memchr;
use tracing::debug;

/// Parse a comma-separated list of strong (`"x"`) and weak (`W/"x"`) entity tags.
/// - The weakness marker and the quotes are dropped; only the opaque tag is kept.
/// - A backslash inside the quotes escapes the next character.
/// - Text that is not a quoted tag is skipped, as is an unterminated tag.
pub fn parse_etags(header: &str) -> Vec<String> {
    let bytes = header.as_bytes();
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(rel) = memchr(b'"', &bytes[pos..]) {
        let open = pos + rel;
        let gap = header[pos..open].trim_end();
        let gap = gap.strip_suffix("W/").unwrap_or(gap);
        if gap.split(',').any(|t| !t.trim().is_empty()) {
            debug!(target: "webutil_http", "skipping malformed etag text {:?}", gap.trim());
        }

        match read_quoted(bytes, open + 1) {
            Some((tag, close)) => {
                tags.push(tag);
                pos = close + 1;
            }
            None => {
                debug!(target: "webutil_http", "skipping unterminated etag at offset {}", open);
                return tags;
            }
        }
    }

    let rest = header[pos..].trim();
    if rest.split(',').any(|t| !t.trim().is_empty()) {
        debug!(target: "webutil_http", "skipping malformed etag text {:?}", rest);
    }
    tags
}

/// Reads quoted content starting just after the opening quote.
/// Returns the unescaped tag and the offset of the closing quote.
fn read_quoted(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut out = Vec::new();
    let mut i = start;
    loop {
        match *bytes.get(i)? {
            b'"' => break,
            b'\\' if i + 1 < bytes.len() => {
                out.push(bytes[i + 1]);
                i += 2;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    // only ASCII bytes were dropped, so `out` is still valid UTF-8
    Some((String::from_utf8_lossy(&out).into_owned(), i))
}

/// Wrap a raw tag in double quotes, backslash-escaping `\` and `"`.
pub fn quote_etag(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_and_strong_tags() {
        assert_eq!(parse_etags(r#"W/"a", "b",W/"c""#), vec!["a", "b", "c"]);
    }

    #[test]
    fn commas_inside_quotes_are_content() {
        assert_eq!(parse_etags(r#""a,b", "c""#), vec!["a,b", "c"]);
    }

    #[test]
    fn junk_between_tags_is_skipped() {
        assert_eq!(parse_etags(r#"bogus, "ok", W/, "also-ok""#), vec!["ok", "also-ok"]);
        assert!(parse_etags("no-quotes-here").is_empty());
        assert!(parse_etags("").is_empty());
    }

    #[test]
    fn unterminated_tag_is_dropped() {
        assert_eq!(parse_etags(r#""good", "bad"#), vec!["good"]);
        assert_eq!(parse_etags(r#""trailing\"#), Vec::<String>::new());
    }

    #[test]
    fn non_ascii_content_survives() {
        assert_eq!(parse_etags("\"caf\u{e9}\", \"\\\u{e9}t\u{e9}\""), vec!["caf\u{e9}", "\u{e9}t\u{e9}"]);
    }

    #[test]
    fn quote_then_parse_is_identity() {
        for raw in ["", "plain", r#"e\t"ag"#, r#"\\"#, r#""""#, "sp ace, comma"] {
            assert_eq!(parse_etags(&quote_etag(raw)), vec![raw.to_string()], "raw {:?}", raw);
        }
    }
}
