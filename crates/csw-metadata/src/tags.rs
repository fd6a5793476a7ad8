//! GetDomain response parsing.

use ows_common::xml::parse_document;
use tracing::warn;

/// Values listed in a `GetDomain` response.
///
/// Reads the `Value` elements of the first `ListOfValues` in the first
/// `DomainValues` under the root, in document order. Never fails: a
/// malformed document or a missing element yields an empty list.
pub fn parse_tags(xml: &str) -> Vec<String> {
    let root = match parse_document(xml) {
        Ok(root) => root,
        Err(e) => {
            warn!(error = %e, "Unparseable GetDomain response");
            return Vec::new();
        }
    };

    let Some(domain) = root.child("DomainValues") else {
        warn!(root = %root.name, "GetDomain response without DomainValues");
        return Vec::new();
    };
    let Some(list) = domain.child("ListOfValues") else {
        warn!("GetDomain response without ListOfValues");
        return Vec::new();
    };

    list.children("Value")
        .map(|value| value.text().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
