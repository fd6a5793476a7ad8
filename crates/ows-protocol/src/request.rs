//! KVP request URL construction.

use std::collections::HashSet;

use url::form_urlencoded;

/// Lower-cased names of the query parameters already present in `url`.
///
/// Only the query string is inspected: path segments that happen to contain
/// `service=` do not count, and the fragment is ignored.
pub fn query_param_names(url: &str) -> HashSet<String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashSet::new();
    };
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, _)| key.trim().to_ascii_lowercase())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Case-insensitive check for a query parameter name.
pub fn has_param(url: &str, name: &str) -> bool {
    query_param_names(url).contains(&name.to_ascii_lowercase())
}

/// Append url-encoded parameters to `base`, in the given order.
///
/// Uses `?` when the base has no query yet, `&` when it does, and no
/// separator at all when the base already ends with one of them. A fragment
/// on the base is kept at the end.
pub fn construct_url(base: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }

    let (base, fragment) = match base.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (base, None),
    };

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();

    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };

    match fragment {
        Some(f) => format!("{}{}{}#{}", base, separator, query, f),
        None => format!("{}{}{}", base, separator, query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_names_case_insensitive() {
        let names = query_param_names("http://x/wms?SERVICE=WMS&Version=1.1.1&foo");
        assert!(names.contains("service"));
        assert!(names.contains("version"));
        assert!(names.contains("foo"));
        assert!(!names.contains("request"));
    }

    #[test]
    fn test_path_is_not_a_parameter() {
        assert!(!has_param("http://x/service=wms/ows", "service"));
        assert!(!has_param("http://x/ows#service=WMS", "service"));
    }

    #[test]
    fn test_construct_url_separators() {
        let params = [("service", "WMS")];
        assert_eq!(construct_url("http://x/wms", &params), "http://x/wms?service=WMS");
        assert_eq!(construct_url("http://x/wms?", &params), "http://x/wms?service=WMS");
        assert_eq!(
            construct_url("http://x/wms?map=a", &params),
            "http://x/wms?map=a&service=WMS"
        );
        assert_eq!(
            construct_url("http://x/wms?map=a&", &params),
            "http://x/wms?map=a&service=WMS"
        );
    }

    #[test]
    fn test_construct_url_encodes_and_keeps_fragment() {
        assert_eq!(
            construct_url("http://x/wms#top", &[("layers", "a b/c")]),
            "http://x/wms?layers=a+b%2Fc#top"
        );
        assert_eq!(construct_url("http://x/wms", &[]), "http://x/wms");
    }
}
