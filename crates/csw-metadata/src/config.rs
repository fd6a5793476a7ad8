//! Catalogue connection configuration.

use std::env;
use std::path::Path;

use ows_common::{OwsError, OwsResult};
use serde::{Deserialize, Serialize};

use crate::field::MetadataField;

/// Query appended to the catalogue endpoint; the property name goes last.
pub const DEFAULT_QUERY_PARAMS: &str = "SERVICE=CSW&VERSION=2.0.2&request=GetDomain&PropertyName=";

/// Catalogue endpoint plus the search fields it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// Server base, e.g. `https://catalogue.example.org`
    pub server_url: String,

    /// Path of the CSW endpoint, e.g. `/geonetwork/srv/eng/csw`
    #[serde(default)]
    pub server_path: String,

    #[serde(default = "default_query_params")]
    pub query_params: String,

    /// Domain cache TTL; unset keeps entries until invalidated
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,

    #[serde(default)]
    pub fields: Vec<MetadataField>,
}

fn default_query_params() -> String {
    DEFAULT_QUERY_PARAMS.to_string()
}

impl CatalogueConfig {
    pub fn new(server_url: impl Into<String>, server_path: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            server_path: server_path.into(),
            query_params: default_query_params(),
            cache_ttl_secs: None,
            fields: Vec::new(),
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> OwsResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| OwsError::Config(format!("Invalid catalogue config: {}", e)))
    }

    /// Load a YAML file, then apply environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> OwsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OwsError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::from_yaml_str(&content)?.with_env_overrides())
    }

    /// Override connection settings from `CSW_SERVER_URL`, `CSW_SERVER_PATH`
    /// and `CSW_QUERY_PARAMS` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("CSW_SERVER_URL") {
            self.server_url = url;
        }
        if let Ok(path) = env::var("CSW_SERVER_PATH") {
            self.server_path = path;
        }
        if let Ok(params) = env::var("CSW_QUERY_PARAMS") {
            self.query_params = params;
        }
        self
    }

    /// GetDomain URL without the property name.
    pub fn search_url(&self) -> String {
        format!(
            "{}{}?{}",
            self.server_url,
            self.server_path,
            self.query_params.trim_start_matches('?')
        )
    }

    /// Field definition by form parameter name.
    pub fn field(&self, name: &str) -> Option<&MetadataField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
server_url: https://catalogue.example.org
server_path: /geonetwork/srv/eng/csw
cache_ttl_secs: 600
fields:
  - name: organisation
    property: OrganisationName
    blacklist: [Unknown]
  - name: keyword
    property: Subject
    multi: true
    space_char: "_"
"#;

    #[test]
    fn test_parse_yaml() {
        let config = CatalogueConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.query_params, DEFAULT_QUERY_PARAMS);
        assert_eq!(config.cache_ttl_secs, Some(600));
        assert_eq!(config.fields.len(), 2);

        let keyword = config.field("keyword").unwrap();
        assert!(keyword.multi);
        assert_eq!(keyword.space_char.as_deref(), Some("_"));
        assert!(config.field("missing").is_none());
    }

    #[test]
    fn test_search_url() {
        let config = CatalogueConfig::new("https://catalogue.example.org", "/csw");
        assert_eq!(
            config.search_url(),
            "https://catalogue.example.org/csw?SERVICE=CSW&VERSION=2.0.2&request=GetDomain&PropertyName="
        );
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = CatalogueConfig::from_yaml_str("fields: 12");
        assert!(matches!(result, Err(OwsError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.yaml");
        std::fs::write(&path, YAML).unwrap();

        let config = CatalogueConfig::from_file(&path).unwrap();
        assert_eq!(config.fields[0].blacklist, vec!["Unknown"]);

        let missing = CatalogueConfig::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(OwsError::Config(_))));
    }
}
