//! Catalogue metadata search fields.
//!
//! Resolves the legal values of a metadata field with a CSW `GetDomain`
//! query, caches them per property name, and turns raw form parameters into
//! search criteria. Domain resolution is best effort: any failure yields an
//! empty option list instead of an error.

pub mod cache;
pub mod config;
pub mod criteria;
pub mod field;
pub mod handler;
pub mod tags;

pub use cache::{create_domain_cache, DomainCache, DomainValues, InMemoryDomainCache};
pub use config::CatalogueConfig;
pub use criteria::{CriteriaSink, SearchCriteria};
pub use field::{MetadataField, SelectItem};
pub use handler::{DomainOption, MetadataFieldHandler};
pub use tags::parse_tags;
