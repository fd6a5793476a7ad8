//! OGC capabilities discovery: request construction, response validation
//! and per-protocol parsing.
//!
//! Supports:
//! - WMS 1.1.1 and 1.3.0
//! - WFS 1.0.0, 1.1.0, 2.0.0 and OGC API Features (3.0.0)
//! - WMTS 1.0.0
//! - CSW 2.0.2

pub mod csw;
pub mod fetch;
mod ows;
pub mod parser;
pub mod registry;
pub mod request;
pub mod validator;
pub mod wfs;
pub mod wms;
pub mod wmts;

pub use fetch::{CapabilitiesFetcher, FetchConfig, HttpFetcher};
pub use parser::{get_layers_from_service, CapabilitiesParser, GET_CAPABILITIES};
pub use registry::ProtocolRegistry;
pub use validator::{validate_json_response, validate_xml_response};
