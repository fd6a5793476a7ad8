//! Protocol capabilities parser contract and the discovery pipeline.

use ows_common::{LayerMap, OwsResult, RawCapabilitiesResponse, ServiceConnectInfo};
use tracing::{debug, info, instrument, warn};

use crate::fetch::CapabilitiesFetcher;
use crate::request::{construct_url, query_param_names};
use crate::validator::validate_xml_response;

/// Value of the `request` parameter for discovery requests.
pub const GET_CAPABILITIES: &str = "GetCapabilities";

/// One protocol family (WMS, WFS, ...) with its version-specific knowledge.
///
/// Only `name`, `default_version` and `parse_layers` are required; the rest
/// have defaults that fit the XML-based OGC services.
pub trait CapabilitiesParser: Send + Sync {
    /// Registry identifier, e.g. "wmslayer".
    fn name(&self) -> &'static str;

    /// Value of the `service` parameter.
    fn service_type(&self) -> String {
        service_type_from_name(self.name())
    }

    /// Version requested when the caller specifies none.
    fn default_version(&self) -> &'static str;

    /// Content family the response is expected in.
    fn expected_content_type(&self, _version: Option<&str>) -> &'static str {
        "xml"
    }

    fn version_param_name(&self) -> &'static str {
        "version"
    }

    /// Return the usable body or fail with a service/parse fault.
    fn validate_response(
        &self,
        response: &RawCapabilitiesResponse,
        _version: Option<&str>,
    ) -> OwsResult<String> {
        validate_xml_response(response)
    }

    /// Parse a validated body into layers keyed by name.
    fn parse_layers(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap>;

    /// Discovery request URL for `url`.
    fn capabilities_url(&self, url: &str, version: Option<&str>) -> String {
        merge_capabilities_url(self, url, version)
    }
}

/// Strip the "layer" suffix from a parser name and upper-case the rest.
pub fn service_type_from_name(name: &str) -> String {
    name.replace("layer", "").to_uppercase()
}

/// Inject `service`, `request` and the version parameter into `url` unless
/// the caller already set them (parameter names compared case-insensitively).
///
/// A URL already pinning `version` is respected even when the protocol uses
/// a different version parameter name.
pub fn merge_capabilities_url<P>(parser: &P, url: &str, version: Option<&str>) -> String
where
    P: CapabilitiesParser + ?Sized,
{
    let present = query_param_names(url);
    let service_type = parser.service_type();
    let version_param = parser.version_param_name();

    let mut params: Vec<(&str, &str)> = Vec::with_capacity(3);
    if !present.contains("service") {
        params.push(("service", service_type.as_str()));
    }
    if !present.contains("request") {
        params.push(("request", GET_CAPABILITIES));
    }
    if !present.contains(&version_param.to_ascii_lowercase()) && !present.contains("version") {
        let version = version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| parser.default_version());
        params.push((version_param, version));
    }

    construct_url(url, &params)
}

/// Build, fetch, validate, parse and stamp.
///
/// Every returned layer carries the URL the response was actually served
/// from. The first failing stage aborts the call; nothing is retried.
#[instrument(skip(parser, fetcher, src), fields(protocol = parser.name(), url = %src.url))]
pub async fn get_layers_from_service<F>(
    parser: &dyn CapabilitiesParser,
    fetcher: &F,
    src: &ServiceConnectInfo,
) -> OwsResult<LayerMap>
where
    F: CapabilitiesFetcher + ?Sized,
{
    let service_type = parser.service_type();
    let version = src.version();

    let capabilities_url = parser.capabilities_url(&src.url, version);
    debug!(capabilities_url = %capabilities_url, "Constructed capabilities URL");

    let response = match fetcher
        .fetch(
            &capabilities_url,
            src.credentials.as_ref(),
            parser.expected_content_type(version),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Capabilities fetch failed");
            record_request(&service_type, "io_fault");
            return Err(e);
        }
    };

    let result = parser
        .validate_response(&response, version)
        .and_then(|body| parser.parse_layers(&body, version));

    let mut layers = match result {
        Ok(layers) => layers,
        Err(e) => {
            warn!(error = %e, kind = e.fault_kind(), "Capabilities rejected");
            record_request(&service_type, e.fault_kind());
            return Err(e);
        }
    };

    for layer in layers.values_mut() {
        layer.set_url(response.url.clone());
    }

    record_request(&service_type, "ok");
    info!(count = layers.len(), resolved_url = %response.url, "Parsed capabilities");
    Ok(layers)
}

fn record_request(service_type: &str, outcome: &'static str) {
    metrics::counter!(
        "ows_capabilities_requests_total",
        "service" => service_type.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
