//! CSW 2.0.2 capabilities parsing.
//!
//! A catalogue does not advertise layers; the service itself is reported as
//! a single entry keyed by [`CATALOGUE_ENTRY`].

use ows_common::xml::parse_document;
use ows_common::{LayerCapabilities, LayerMap, OwsError, OwsResult};

use crate::ows::{
    document_version, expect_root, keywords, operation_get_url, operation_names,
    operation_parameter_values,
};
use crate::parser::CapabilitiesParser;

pub const CSW_202: &str = "2.0.2";

/// Key of the single entry returned for a catalogue service.
pub const CATALOGUE_ENTRY: &str = "catalogue";

#[derive(Debug, Default, Clone, Copy)]
pub struct CswCapabilitiesParser;

impl CapabilitiesParser for CswCapabilitiesParser {
    fn name(&self) -> &'static str {
        "csw"
    }

    fn default_version(&self) -> &'static str {
        CSW_202
    }

    // OWS Common GetCapabilities negotiates with AcceptVersions
    fn version_param_name(&self) -> &'static str {
        "acceptVersions"
    }

    fn parse_layers(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap> {
        let root = parse_document(body)?;
        expect_root(&root, &["Capabilities"])?;
        let version = document_version(&root, version, self.default_version());

        let identification = root.child("ServiceIdentification").ok_or_else(|| {
            OwsError::ParseFault("CSW capabilities without <ServiceIdentification>".into())
        })?;

        let mut entry = LayerCapabilities::new(CATALOGUE_ENTRY, self.service_type(), version);
        if let Some(title) = identification.child_text("Title") {
            entry.title = title;
        }
        entry.description = identification.child_text("Abstract");
        entry.keywords = keywords(identification);
        entry.formats = operation_parameter_values(&root, "GetRecords", "outputFormat");
        entry.queryable = true;

        let type_names = operation_parameter_values(&root, "GetRecords", "typeNames");
        if !type_names.is_empty() {
            entry
                .attributes
                .insert("typeNames".to_string(), type_names.join(","));
        }
        let operations = operation_names(&root);
        if !operations.is_empty() {
            entry
                .attributes
                .insert("operations".to_string(), operations.join(","));
        }
        if let Some(url) = operation_get_url(&root, "GetRecords") {
            entry.attributes.insert("getRecordsUrl".to_string(), url);
        }

        let mut layers = LayerMap::new();
        layers.insert(CATALOGUE_ENTRY.to_string(), entry);
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_entry() {
        let xml = r#"<csw:Capabilities version="2.0.2"
    xmlns:csw="http://www.opengis.net/cat/csw/2.0.2" xmlns:ows="http://www.opengis.net/ows">
  <ows:ServiceIdentification>
    <ows:Title>Metadata catalogue</ows:Title>
    <ows:Keywords><ows:Keyword>metadata</ows:Keyword></ows:Keywords>
    <ows:ServiceType>CSW</ows:ServiceType>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetDomain"/>
    <ows:Operation name="GetRecords">
      <ows:DCP><ows:HTTP><ows:Get xlink:href="https://x/csw" xmlns:xlink="http://www.w3.org/1999/xlink"/></ows:HTTP></ows:DCP>
      <ows:Parameter name="outputFormat"><ows:Value>application/xml</ows:Value></ows:Parameter>
      <ows:Parameter name="typeNames"><ows:Value>csw:Record</ows:Value><ows:Value>gmd:MD_Metadata</ows:Value></ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
</csw:Capabilities>"#;
        let layers = CswCapabilitiesParser.parse_layers(xml, None).unwrap();
        assert_eq!(layers.len(), 1);
        let entry = &layers[CATALOGUE_ENTRY];
        assert_eq!(entry.title, "Metadata catalogue");
        assert_eq!(entry.service_type, "CSW");
        assert_eq!(entry.formats, vec!["application/xml"]);
        assert_eq!(entry.attributes["typeNames"], "csw:Record,gmd:MD_Metadata");
        assert_eq!(entry.attributes["operations"], "GetDomain,GetRecords");
        assert_eq!(entry.attributes["getRecordsUrl"], "https://x/csw");
    }

    #[test]
    fn test_capabilities_url_uses_accept_versions() {
        assert_eq!(
            CswCapabilitiesParser.capabilities_url("https://x/csw", None),
            "https://x/csw?service=CSW&request=GetCapabilities&acceptVersions=2.0.2"
        );
    }
}
