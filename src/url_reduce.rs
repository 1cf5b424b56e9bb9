//! Reductions of page and referral URLs to low-cardinality values.
//!
//! Both functions accept arbitrary text and never fail. The input is split
//! along RFC 3986 lines (`scheme:` `//authority` `path` `?query` `#fragment`)
//! without normalizing anything: hosts keep their case, ports stay, paths are
//! not percent-encoded.

/// Returned by [`domain_of`] when the input has no network location.
pub const NO_DOMAIN: &str = "-";

#[derive(Debug, PartialEq, Eq)]
struct Parts<'a> {
    authority: Option<&'a str>,
    path: &'a str,
}

/// Byte index of the `:` ending a valid scheme, if any.
fn scheme_end(raw: &str) -> Option<usize> {
    let colon = raw.find(':')?;
    let scheme = &raw[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(colon)
    } else {
        None
    }
}

fn split(raw: &str) -> Parts<'_> {
    let rest = match scheme_end(raw) {
        Some(colon) => &raw[colon + 1..],
        None => raw,
    };
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            Parts { authority: Some(&after[..end]), path: &after[end..] }
        }
        None => Parts { authority: None, path: rest },
    }
}

/// Network location (`host[:port]`, userinfo removed) of `url`, or [`NO_DOMAIN`].
pub fn domain_of(url: &str) -> String {
    let host = split(url)
        .authority
        .map(|a| a.rsplit_once('@').map(|(_, host)| host).unwrap_or(a))
        .filter(|h| !h.is_empty());
    match host {
        Some(h) => h.to_string(),
        None => NO_DOMAIN.to_string(),
    }
}

/// First two non-empty path segments joined by `/`, e.g. `/a/b/c/d` -> `a/b`.
/// Paths with fewer segments come back unchanged, leading slash included.
pub fn path_prefix_of(url: &str) -> String {
    let path = split(url).path;
    let mut segments = path.trim_matches('/').split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(first), Some(second)) => format!("{first}/{second}"),
        _ => path.to_string(),
    }
}
