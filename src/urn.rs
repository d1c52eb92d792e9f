//! Identifier and URN derivation
//!
//! Pure functions producing catalog identifiers. The templates follow the
//! catalog's `urn:li:<entityType>:<value>` grammar and must stay bit-exact.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DATABRICKS_PLATFORM: &str = "databricks";

pub const DOMAIN_URN_PREFIX: &str = "urn:li:domain:";
pub const DATA_PLATFORM_URN_PREFIX: &str = "urn:li:dataPlatform:";
pub const CORP_USER_URN_PREFIX: &str = "urn:li:corpuser:";
pub const GLOSSARY_TERM_URN_PREFIX: &str = "urn:li:glossaryTerm:";
pub const DATA_PRODUCT_URN_PREFIX: &str = "urn:li:dataProduct:";

static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

// scheme, authority, path, query, fragment (RFC 3986 appendix B)
static RE_URI_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?s)(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .unwrap()
});

/// Path component of `raw` with surrounding `/` removed.
///
/// Works on absolute URIs and relative references alike. The path text is
/// taken as written: dot segments are kept and percent escapes are not
/// decoded.
pub fn uri_path(raw: &str) -> String {
    let path = match RE_URI_PARTS.captures(raw) {
        Some(caps) => {
            if caps.get(1).is_none() {
                tracing::debug!("'{}' has no scheme, reading it as a relative reference", raw);
            }
            caps.get(3).map_or("", |m| m.as_str())
        }
        None => raw,
    };
    path.trim_matches('/').to_string()
}

/// Percent-decoded segments of the path of `raw`.
///
/// Splitting happens before decoding, so an escaped `%2F` stays inside its
/// segment. An empty path yields a single empty segment.
pub fn uri_path_segments(raw: &str) -> Vec<String> {
    uri_path(raw)
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .collect()
}

/// Collapse every run of non-word characters into a single `_`
pub fn sanitize(value: &str) -> String {
    RE_NON_WORD.replace_all(value, "_").into_owned()
}

/// Sanitized path of a data product id, e.g. `products_foo_bar` for
/// `https://example.com/products/foo bar`
pub fn data_product_id(raw: &str) -> String {
    sanitize(&uri_path_segments(raw).join("/"))
}

pub fn make_data_product_urn(raw_id: &str) -> String {
    format!("{}{}", DATA_PRODUCT_URN_PREFIX, data_product_id(raw_id))
}

pub fn make_domain_urn(domain: &str) -> String {
    if domain.starts_with(DOMAIN_URN_PREFIX) {
        domain.to_string()
    } else {
        format!("{}{}", DOMAIN_URN_PREFIX, domain)
    }
}

pub fn make_data_platform_urn(platform: &str) -> String {
    if platform.starts_with(DATA_PLATFORM_URN_PREFIX) {
        platform.to_string()
    } else {
        format!("{}{}", DATA_PLATFORM_URN_PREFIX, platform)
    }
}

pub fn make_dataset_urn(platform: &str, name: &str, env: &str) -> String {
    format!(
        "urn:li:dataset:({},{},{})",
        make_data_platform_urn(platform),
        name,
        env
    )
}

pub fn make_user_urn(user: &str) -> String {
    if user.starts_with(CORP_USER_URN_PREFIX) {
        user.to_string()
    } else {
        format!("{}{}", CORP_USER_URN_PREFIX, user)
    }
}

pub fn make_term_urn(term_id: &str) -> String {
    if term_id.starts_with(GLOSSARY_TERM_URN_PREFIX) {
        term_id.to_string()
    } else {
        format!("{}{}", GLOSSARY_TERM_URN_PREFIX, term_id)
    }
}

/// Entity type segment of a urn (`dataset` for `urn:li:dataset:(...)`)
pub fn entity_type_of(urn: &str) -> Option<&str> {
    let rest = urn.strip_prefix("urn:li:")?;
    rest.split(':').next().filter(|t| !t.is_empty())
}
