//! Protocol dispatch by identifier.

use std::collections::BTreeMap;
use std::sync::Arc;

use ows_common::{LayerMap, OwsError, OwsResult, ServiceConnectInfo};
use tracing::debug;

use crate::csw::CswCapabilitiesParser;
use crate::fetch::CapabilitiesFetcher;
use crate::parser::{get_layers_from_service, CapabilitiesParser};
use crate::wfs::WfsCapabilitiesParser;
use crate::wmts::WmtsCapabilitiesParser;
use crate::wms::WmsCapabilitiesParser;

/// Parsers keyed by their lower-cased `name()`.
#[derive(Clone, Default)]
pub struct ProtocolRegistry {
    parsers: BTreeMap<String, Arc<dyn CapabilitiesParser>>,
}

impl ProtocolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the WMS, WFS, WMTS and CSW parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WmsCapabilitiesParser));
        registry.register(Arc::new(WfsCapabilitiesParser));
        registry.register(Arc::new(WmtsCapabilitiesParser));
        registry.register(Arc::new(CswCapabilitiesParser));
        registry
    }

    /// Add a parser, replacing any previous one with the same name.
    pub fn register(&mut self, parser: Arc<dyn CapabilitiesParser>) {
        let key = parser.name().to_ascii_lowercase();
        debug!(protocol = %key, "Registering capabilities parser");
        self.parsers.insert(key, parser);
    }

    /// Look up a parser; identifiers compare case-insensitively.
    pub fn get(&self, protocol: &str) -> OwsResult<Arc<dyn CapabilitiesParser>> {
        self.parsers
            .get(&protocol.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| OwsError::UnknownProtocol(protocol.to_string()))
    }

    /// Registered identifiers, sorted.
    pub fn protocols(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }

    /// Resolve the parser for `protocol` and run the discovery pipeline.
    pub async fn get_layers_from_service<F>(
        &self,
        protocol: &str,
        fetcher: &F,
        src: &ServiceConnectInfo,
    ) -> OwsResult<LayerMap>
    where
        F: CapabilitiesFetcher + ?Sized,
    {
        let parser = self.get(protocol)?;
        get_layers_from_service(parser.as_ref(), fetcher, src).await
    }
}
