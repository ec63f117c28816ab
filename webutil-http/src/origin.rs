use url::{ParseError, Url};

/// Whether two URLs share scheme, host and port. Default ports apply
/// (`http://a` and `http://a:80` match); unparseable or host-less URLs never match.
pub fn same_origin(url_a: &str, url_b: &str) -> bool {
    match (origin_of(url_a), origin_of(url_b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn origin_of(raw: &str) -> Option<(String, String, Option<u16>)> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_string();
    Some((parsed.scheme().to_string(), host, parsed.port_or_known_default()))
}

/// Whether `url` is a safe redirect target: a relative path, or an http(s) URL
/// whose authority is exactly `allowed_host`. Backslashes count as slashes.
pub fn is_safe_url(url: &str, allowed_host: Option<&str>) -> bool {
    let url = url.trim().replace('\\', "/");
    if url.is_empty() || url.starts_with("///") {
        return false;
    }

    // scheme-relative, e.g. "//example.com/path"
    if let Some(rest) = url.strip_prefix("//") {
        let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
        return host_matches(authority, allowed_host);
    }

    match Url::parse(&url) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                return false;
            }
            if !parsed.username().is_empty() || parsed.password().is_some() {
                return false;
            }
            let Some(host) = parsed.host_str() else { return false };
            let authority = match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            host_matches(&authority, allowed_host)
        }
        Err(ParseError::RelativeUrlWithoutBase) => !url.starts_with(char::is_control),
        Err(_) => false,
    }
}

fn host_matches(authority: &str, allowed_host: Option<&str>) -> bool {
    match allowed_host {
        Some(allowed) => !authority.is_empty() && authority.eq_ignore_ascii_case(allowed.trim()),
        None => false,
    }
}
