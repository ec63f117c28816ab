//! Response fix-ups applied after a handler has produced a response.
//!
//! Each fix takes the request that produced the response and edits the
//! response in place. [`apply_response_fixes`] runs all of them in order.

use tracing::debug;
use url::Url;

use crate::message::{Request, Response};

/// MIME types old Internet Explorer versions can cache with a `Vary` header.
const VARY_SAFE_MIME_TYPES: [&str; 3] = ["text/html", "text/plain", "text/sgml"];

/// Cache-Control directives that break IE downloads of attachments over https.
const ATTACH_OFFENDING_DIRECTIVES: [&str; 2] = ["no-cache", "no-store"];

pub fn apply_response_fixes(req: &Request, resp: &mut Response) {
    fix_location_header(req, resp);
    conditional_content_removal(req, resp);
    fix_ie_for_attach(req, resp);
    fix_ie_for_vary(req, resp);
}

/// Make a relative `Location` header absolute using the request's scheme, host and path.
pub fn fix_location_header(req: &Request, resp: &mut Response) {
    let (Some(location), Some(host)) = (resp.header("location"), req.host()) else { return };
    let base = format!("{}://{}{}", req.scheme(), host, req.path);
    match Url::parse(&base).and_then(|b| b.join(location)) {
        Ok(absolute) => {
            let absolute = absolute.to_string();
            resp.set_header("location", absolute);
        }
        Err(e) => {
            debug!(target: "webutil_http", "leaving location {:?} as is: {e}", location);
        }
    }
}

/// Drop the body where HTTP forbids one: 1xx/204/304 responses and HEAD requests.
pub fn conditional_content_removal(req: &Request, resp: &mut Response) {
    if resp.code.forbids_body() {
        resp.body.clear();
        resp.set_header("content-length", "0");
    }
    if req.method.eq_ignore_ascii_case("HEAD") {
        resp.body.clear();
    }
}

/// IE cannot open attachments served with `no-cache`/`no-store`; strip those for IE clients.
pub fn fix_ie_for_attach(req: &Request, resp: &mut Response) {
    if !is_ie(req) || !resp.has_header("content-disposition") {
        return;
    }
    resp.remove_header("pragma");

    let Some(cache_control) = resp.header("cache-control") else { return };
    let kept: Vec<&str> = cache_control
        .split(',')
        .map(str::trim)
        .filter(|v| !ATTACH_OFFENDING_DIRECTIVES.iter().any(|o| v.eq_ignore_ascii_case(o)))
        .collect();
    if kept.is_empty() {
        resp.remove_header("cache-control");
    } else {
        let joined = kept.join(", ");
        resp.set_header("cache-control", joined);
    }
}

/// IE will not cache anything with a `Vary` header except a few text types;
/// remove `Vary` for IE clients when the Content-Type is anything else (or missing).
pub fn fix_ie_for_vary(req: &Request, resp: &mut Response) {
    if !is_ie(req) {
        return;
    }
    let mime_type = resp
        .header("content-type")
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if !VARY_SAFE_MIME_TYPES.contains(&mime_type.as_str()) && resp.remove_header("vary") {
        debug!(target: "webutil_http", "removed vary header for ie client (content-type {:?})", mime_type);
    }
}

fn is_ie(req: &Request) -> bool {
    let ua = req.user_agent().to_ascii_uppercase();
    ua.contains("MSIE") || ua.contains("CHROMEFRAME")
}
