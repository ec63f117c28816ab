use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters gets escaped.
pub const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

// safe characters are copied through; the runs between them go to the encoder
fn encode(s: &str, safe: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for (idx, sep) in s.match_indices(|c: char| c.is_ascii() && safe.contains(c)) {
        out.extend(utf8_percent_encode(&s[last..idx], UNRESERVED));
        out.push_str(sep);
        last = idx + sep.len();
    }
    out.extend(utf8_percent_encode(&s[last..], UNRESERVED));
    out
}

/// Percent-encode `s`, leaving unreserved characters and those in `safe` alone.
/// `urlquote("/a b", "/")` gives `/a%20b`.
pub fn urlquote(s: &str, safe: &str) -> String {
    encode(s, safe)
}

/// Like [`urlquote`] but spaces become `+`, as in form encoding.
pub fn urlquote_plus(s: &str, safe: &str) -> String {
    s.split(' ').map(|part| encode(part, safe)).collect::<Vec<_>>().join("+")
}

/// Decode `%XX` escapes; invalid UTF-8 is replaced rather than rejected.
pub fn urlunquote(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().to_string()
}

/// Like [`urlunquote`] but `+` decodes to a space first.
pub fn urlunquote_plus(s: &str) -> String {
    urlunquote(&s.replace('+', " "))
}
