//! Common types shared by the OWS capabilities and catalogue crates.

pub mod bbox;
pub mod connect;
pub mod error;
pub mod layer;
pub mod response;
pub mod xml;

pub use bbox::BoundingBox;
pub use connect::{Credentials, ServiceConnectInfo};
pub use error::{OwsError, OwsResult};
pub use layer::{LayerCapabilities, LayerMap, LayerStyle};
pub use response::RawCapabilitiesResponse;
pub use xml::XmlElement;
