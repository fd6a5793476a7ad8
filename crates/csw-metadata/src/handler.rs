//! Resolver for one catalogue search field.
//!
//! Option lists come from a CSW `GetDomain` query for the field's property.
//! Resolution is best effort: transport errors, error statuses and
//! unexpected documents all produce an empty option list. Results are cached
//! per property name, including empty ones.

use std::collections::BTreeSet;
use std::sync::Arc;

use ows_protocol::CapabilitiesFetcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::cache::{DomainCache, DomainValues};
use crate::config::CatalogueConfig;
use crate::criteria::CriteriaSink;
use crate::field::{MetadataField, SelectItem};
use crate::tags::parse_tags;

/// One entry of an option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainOption {
    /// Value to submit back as a search parameter
    pub val: String,
    /// Display name
    pub locale: String,
}

pub struct MetadataFieldHandler {
    field: MetadataField,
    search_url: String,
    fetcher: Arc<dyn CapabilitiesFetcher>,
    cache: Arc<dyn DomainCache>,
}

impl MetadataFieldHandler {
    pub fn new(
        field: MetadataField,
        search_url: impl Into<String>,
        fetcher: Arc<dyn CapabilitiesFetcher>,
        cache: Arc<dyn DomainCache>,
    ) -> Self {
        Self {
            field,
            search_url: search_url.into(),
            fetcher,
            cache,
        }
    }

    /// Handler using the catalogue endpoint of `config`.
    pub fn from_config(
        field: MetadataField,
        config: &CatalogueConfig,
        fetcher: Arc<dyn CapabilitiesFetcher>,
        cache: Arc<dyn DomainCache>,
    ) -> Self {
        Self::new(field, config.search_url(), fetcher, cache)
    }

    pub fn field(&self) -> &MetadataField {
        &self.field
    }

    pub fn property_name(&self) -> &str {
        &self.field.property
    }

    /// GetDomain URL the property name is appended to.
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Legal values of the field, ordered by value.
    ///
    /// Cached values are shared across languages; `language` only labels
    /// the request in logs.
    pub async fn get_options(&self, language: &str) -> Vec<DomainOption> {
        debug!(field = %self.field.name, language = %language, "Resolving options");
        self.get_properties()
            .await
            .iter()
            .map(|item| DomainOption {
                val: item.value.clone(),
                locale: item.display_name().to_string(),
            })
            .collect()
    }

    /// Like [`get_options`](Self::get_options), with spaces in each value
    /// replaced by `space_char`.
    pub async fn get_options_with_space_char(
        &self,
        language: &str,
        space_char: &str,
    ) -> Vec<DomainOption> {
        let mut options = self.get_options(language).await;
        for option in &mut options {
            option.val = option.val.replace(' ', space_char);
        }
        options
    }

    /// Add a raw form parameter to `criteria` under the field's property.
    ///
    /// Empty input adds nothing. Multi-valued fields split on commas;
    /// single values get spaces substituted when the field configures a
    /// space character.
    pub fn handle_param<C>(&self, param: Option<&str>, criteria: &mut C)
    where
        C: CriteriaSink + ?Sized,
    {
        let Some(param) = param.filter(|p| !p.is_empty()) else {
            return;
        };

        let values = if self.field.multi {
            param
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            match &self.field.space_char {
                Some(space_char) => vec![param.replace(' ', space_char)],
                None => vec![param.to_string()],
            }
        };

        criteria.add_param(self.property_name(), values);
    }

    /// Domain values of the bound field's property.
    pub async fn get_properties(&self) -> DomainValues {
        self.properties_for(self.property_name()).await
    }

    /// Domain values of `property_name`, filtered by this field's blacklist.
    #[instrument(skip(self), fields(field = %self.field.name))]
    pub async fn properties_for(&self, property_name: &str) -> DomainValues {
        if let Some(values) = self.cache.get(property_name).await {
            metrics::counter!("csw_domain_cache_hits_total").increment(1);
            return values;
        }
        metrics::counter!("csw_domain_cache_misses_total").increment(1);

        let url = format!("{}{}", self.search_url, property_name);
        let tags = self.fetch_tags(&url).await;

        let values: BTreeSet<SelectItem> = tags
            .into_iter()
            .filter(|tag| !self.field.is_blacklisted(tag))
            .map(SelectItem::new)
            .collect();
        debug!(count = values.len(), "Resolved domain values");

        let values = Arc::new(values);
        self.cache.put(property_name, Arc::clone(&values)).await;
        values
    }

    async fn fetch_tags(&self, url: &str) -> Vec<String> {
        let response = match self.fetcher.fetch(url, None, "xml").await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %url, error = %e, "GetDomain request failed");
                return Vec::new();
            }
        };

        if !response.is_success() {
            warn!(url = %response.url, status = response.status, "GetDomain returned error status");
            return Vec::new();
        }

        parse_tags(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryDomainCache;
    use crate::criteria::SearchCriteria;
    use async_trait::async_trait;
    use ows_common::{Credentials, OwsResult, RawCapabilitiesResponse};

    struct NoFetch;

    #[async_trait]
    impl CapabilitiesFetcher for NoFetch {
        async fn fetch(
            &self,
            url: &str,
            _credentials: Option<&Credentials>,
            _expected_content_type: &str,
        ) -> OwsResult<RawCapabilitiesResponse> {
            panic!("unexpected fetch of {}", url);
        }
    }

    fn handler(field: MetadataField) -> MetadataFieldHandler {
        MetadataFieldHandler::new(
            field,
            "https://x/csw?PropertyName=",
            Arc::new(NoFetch),
            Arc::new(InMemoryDomainCache::new()),
        )
    }

    #[test]
    fn test_multi_value_param_is_split() {
        let h = handler(MetadataField::new("keyword", "Subject").with_multi(true));
        let mut criteria = SearchCriteria::new();
        h.handle_param(Some("a, b ,c"), &mut criteria);
        assert_eq!(criteria.get("Subject").unwrap(), &["a", "b", "c"]);
    }

    #[test]
    fn test_empty_param_is_ignored() {
        let h = handler(MetadataField::new("keyword", "Subject").with_multi(true));
        let mut criteria = SearchCriteria::new();
        h.handle_param(Some(""), &mut criteria);
        h.handle_param(None, &mut criteria);
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_single_value_space_substitution() {
        let h = handler(MetadataField::new("organisation", "OrganisationName").with_space_char("_"));
        let mut criteria = SearchCriteria::new();
        h.handle_param(Some("a b"), &mut criteria);
        assert_eq!(criteria.get("OrganisationName").unwrap(), &["a_b"]);
    }

    #[test]
    fn test_single_value_verbatim() {
        let h = handler(MetadataField::new("organisation", "OrganisationName"));
        let mut criteria = SearchCriteria::new();
        h.handle_param(Some("a b, c"), &mut criteria);
        assert_eq!(criteria.get("OrganisationName").unwrap(), &["a b, c"]);
    }

    #[tokio::test]
    async fn test_cached_values_skip_fetch() {
        let cache = Arc::new(InMemoryDomainCache::new());
        let values: BTreeSet<SelectItem> =
            [SelectItem::new("lake shore"), SelectItem::new("forest")].into_iter().collect();
        cache.put("Subject", Arc::new(values)).await;

        let h = MetadataFieldHandler::new(
            MetadataField::new("keyword", "Subject"),
            "https://x/csw?PropertyName=",
            Arc::new(NoFetch),
            cache,
        );

        let options = h.get_options_with_space_char("fi", "+").await;
        assert_eq!(
            options,
            vec![
                DomainOption { val: "forest".into(), locale: "forest".into() },
                DomainOption { val: "lake+shore".into(), locale: "lake shore".into() },
            ]
        );
    }

    #[test]
    fn test_option_json_shape() {
        let option = DomainOption { val: "a_b".into(), locale: "a b".into() };
        assert_eq!(
            serde_json::to_value(&option).unwrap(),
            serde_json::json!({"val": "a_b", "locale": "a b"})
        );
    }
}
