//! URI canonicalization.
//!
//! Deliberately narrow: it only irons out the conventions that differ between
//! annotation producers (identifiers.org scheme, trailing slashes, scheme
//! case). No percent-decoding or path normalization happens here.

const IDENTIFIERS_HOST: &str = "identifiers.org/";

/// Canonicalize an optional URI. `None` stays `None`.
pub fn canonicalize(uri: Option<&str>) -> Option<String> {
    uri.map(canonical)
}

/// Canonicalize a URI string.
///
/// Steps, in order:
/// 1. `http://identifiers.org/...` becomes `https://identifiers.org/...`
///    (the scheme is matched case-insensitively so the result is idempotent).
/// 2. All trailing `/` characters are removed.
/// 3. An `http:` or `https:` scheme token is lower-cased.
pub fn canonical(uri: &str) -> String {
    let upgraded = upgrade_identifiers_org(uri);
    let stripped = upgraded.trim_end_matches('/');
    lowercase_http_scheme(stripped)
}

fn upgrade_identifiers_org(uri: &str) -> std::borrow::Cow<'_, str> {
    match split_scheme(uri, "http://") {
        Some(rest) if rest.starts_with(IDENTIFIERS_HOST) => format!("https://{rest}").into(),
        _ => uri.into(),
    }
}

fn lowercase_http_scheme(uri: &str) -> String {
    for scheme in ["https:", "http:"] {
        if let Some(rest) = split_scheme(uri, scheme) {
            return format!("{scheme}{rest}");
        }
    }
    uri.to_string()
}

/// Strip `scheme` from the front of `uri`, ignoring ASCII case.
fn split_scheme<'a>(uri: &'a str, scheme: &str) -> Option<&'a str> {
    let head = uri.get(..scheme.len())?;
    head.eq_ignore_ascii_case(scheme)
        .then(|| &uri[scheme.len()..])
}
