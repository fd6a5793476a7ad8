//! WFS capabilities parsing, including the OGC API Features (3.0.0) variant.
//!
//! WFS 1.0.0, 1.1.0 and 2.0.0 are XML `GetCapabilities` documents. Version
//! 3.0.0 addresses the JSON `/collections` resource of an OGC API Features
//! endpoint instead, so URL construction, the expected content type and
//! validation all switch on the requested version.

use serde::Deserialize;

use ows_common::xml::{parse_document, XmlElement};
use ows_common::{
    BoundingBox, LayerCapabilities, LayerMap, OwsError, OwsResult, RawCapabilitiesResponse,
};

use crate::ows::{
    attribute_bbox, document_version, expect_root, keywords, operation_parameter_values,
    wgs84_bbox,
};
use crate::parser::{merge_capabilities_url, CapabilitiesParser};
use crate::request::{construct_url, has_param};
use crate::validator::{validate_json_response, validate_xml_response};

pub const WFS_110: &str = "1.1.0";
pub const WFS_200: &str = "2.0.0";
pub const OGC_API_FEATURES: &str = "3.0.0";

/// Whether the requested version targets OGC API Features.
pub fn is_ogc_api(version: Option<&str>) -> bool {
    version.map(|v| v.starts_with('3')).unwrap_or(false)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WfsCapabilitiesParser;

impl CapabilitiesParser for WfsCapabilitiesParser {
    fn name(&self) -> &'static str {
        "wfslayer"
    }

    fn default_version(&self) -> &'static str {
        WFS_110
    }

    fn expected_content_type(&self, version: Option<&str>) -> &'static str {
        if is_ogc_api(version) {
            "json"
        } else {
            "xml"
        }
    }

    fn validate_response(
        &self,
        response: &RawCapabilitiesResponse,
        version: Option<&str>,
    ) -> OwsResult<String> {
        if is_ogc_api(version) {
            validate_json_response(response)
        } else {
            validate_xml_response(response)
        }
    }

    fn parse_layers(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap> {
        if is_ogc_api(version) {
            parse_collections(body, &self.service_type())
        } else {
            self.parse_xml(body, version)
        }
    }

    fn capabilities_url(&self, url: &str, version: Option<&str>) -> String {
        if is_ogc_api(version) {
            collections_url(url)
        } else {
            merge_capabilities_url(self, url, version)
        }
    }
}

impl WfsCapabilitiesParser {
    fn parse_xml(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap> {
        let root = parse_document(body)?;
        expect_root(&root, &["WFS_Capabilities"])?;
        let version = document_version(&root, version, self.default_version());
        let service_type = self.service_type();

        let list = root.child("FeatureTypeList").ok_or_else(|| {
            OwsError::ParseFault("WFS capabilities without <FeatureTypeList>".into())
        })?;

        let global_formats = operation_parameter_values(&root, "GetFeature", "outputFormat");

        let mut layers = LayerMap::new();
        for feature_type in list.children("FeatureType") {
            let Some(name) = feature_type.child_text("Name") else {
                continue;
            };
            let layer = feature_type_layer(feature_type, &name, &service_type, &version, &global_formats);
            layers.entry(name).or_insert(layer);
        }
        Ok(layers)
    }
}

fn feature_type_layer(
    el: &XmlElement,
    name: &str,
    service_type: &str,
    version: &str,
    global_formats: &[String],
) -> LayerCapabilities {
    let mut layer = LayerCapabilities::new(name, service_type, version);
    if let Some(title) = el.child_text("Title") {
        layer.title = title;
    }
    layer.description = el.child_text("Abstract");
    layer.keywords = keywords(el);

    // DefaultSRS/OtherSRS (1.1.0), DefaultCRS/OtherCRS (2.0.0), SRS (1.0.0)
    for tag in ["DefaultSRS", "DefaultCRS", "SRS", "OtherSRS", "OtherCRS"] {
        for crs in el.children_text(tag) {
            layer.add_crs(crs);
        }
    }

    layer.bbox = wgs84_bbox(el).or_else(|| el.child("LatLongBoundingBox").and_then(attribute_bbox));

    let formats = el
        .child("OutputFormats")
        .map(|f| f.children_text("Format"))
        .unwrap_or_default();
    layer.formats = if formats.is_empty() {
        global_formats.to_vec()
    } else {
        formats
    };
    layer.queryable = true;
    layer
}

/// `/collections` resource of an OGC API endpoint, asking for JSON.
///
/// Existing query parameters are kept; `f=json` is added unless an `f`
/// parameter is already present.
pub fn collections_url(url: &str) -> String {
    let url = url.split('#').next().unwrap_or_default();
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let mut path = path.trim_end_matches('/').to_string();
    if !path.ends_with("/collections") {
        path.push_str("/collections");
    }

    let base = match query {
        Some(q) if !q.is_empty() => format!("{}?{}", path, q),
        _ => path,
    };

    if has_param(&base, "f") {
        base
    } else {
        construct_url(&base, &[("f", "json")])
    }
}

#[derive(Debug, Deserialize)]
struct CollectionsDocument {
    #[serde(default)]
    collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    keywords: Vec<serde_json::Value>,
    #[serde(default)]
    crs: Vec<String>,
    #[serde(default)]
    extent: Option<Extent>,
}

#[derive(Debug, Deserialize)]
struct Extent {
    #[serde(default)]
    spatial: Option<SpatialExtent>,
}

#[derive(Debug, Deserialize)]
struct SpatialExtent {
    #[serde(default)]
    bbox: Vec<Vec<f64>>,
}

fn parse_collections(body: &str, service_type: &str) -> OwsResult<LayerMap> {
    let document: CollectionsDocument = serde_json::from_str(body)?;

    let mut layers = LayerMap::new();
    for collection in document.collections {
        let mut layer = LayerCapabilities::new(collection.id.clone(), service_type, OGC_API_FEATURES);
        if let Some(title) = collection.title.filter(|t| !t.is_empty()) {
            layer.title = title;
        }
        layer.description = collection.description;
        layer.keywords = collection
            .keywords
            .iter()
            .filter_map(|k| match k {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(o) => {
                    o.get("keyword").and_then(|v| v.as_str()).map(str::to_string)
                }
                _ => None,
            })
            .collect();
        for crs in collection.crs {
            layer.add_crs(crs);
        }
        layer.bbox = collection
            .extent
            .and_then(|e| e.spatial)
            .and_then(|s| s.bbox.first().and_then(|b| BoundingBox::from_slice(b).ok()));
        layer.formats = vec!["application/geo+json".to_string()];
        layer.queryable = true;

        layers.entry(collection.id).or_insert(layer);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_url() {
        assert_eq!(
            collections_url("https://x/ogcapi"),
            "https://x/ogcapi/collections?f=json"
        );
        assert_eq!(
            collections_url("https://x/ogcapi/collections/?f=application/json"),
            "https://x/ogcapi/collections?f=application/json"
        );
        assert_eq!(
            collections_url("https://x/ogcapi/?key=abc"),
            "https://x/ogcapi/collections?key=abc&f=json"
        );
    }

    #[test]
    fn test_version_switches_content_type_and_url() {
        let parser = WfsCapabilitiesParser;
        assert_eq!(parser.expected_content_type(None), "xml");
        assert_eq!(parser.expected_content_type(Some("2.0.0")), "xml");
        assert_eq!(parser.expected_content_type(Some("3.0.0")), "json");
        assert_eq!(
            parser.capabilities_url("http://x/wfs", None),
            "http://x/wfs?service=WFS&request=GetCapabilities&version=1.1.0"
        );
        assert_eq!(
            parser.capabilities_url("http://x/api", Some("3.0.0")),
            "http://x/api/collections?f=json"
        );
    }

    #[test]
    fn test_wfs_200_feature_types() {
        let xml = r#"<wfs:WFS_Capabilities version="2.0.0"
            xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:ows="http://www.opengis.net/ows/1.1">
  <ows:OperationsMetadata>
    <ows:Operation name="GetFeature">
      <ows:Parameter name="outputFormat">
        <ows:AllowedValues><ows:Value>application/gml+xml; version=3.2</ows:Value></ows:AllowedValues>
      </ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
  <wfs:FeatureTypeList>
    <wfs:FeatureType>
      <wfs:Name>topp:states</wfs:Name>
      <wfs:Title>USA Population</wfs:Title>
      <ows:Keywords><ows:Keyword>census</ows:Keyword></ows:Keywords>
      <wfs:DefaultCRS>urn:ogc:def:crs:EPSG::4326</wfs:DefaultCRS>
      <wfs:OtherCRS>urn:ogc:def:crs:EPSG::3857</wfs:OtherCRS>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-124.7 24.9</ows:LowerCorner>
        <ows:UpperCorner>-66.9 49.3</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </wfs:FeatureType>
  </wfs:FeatureTypeList>
</wfs:WFS_Capabilities>"#;
        let layers = WfsCapabilitiesParser.parse_layers(xml, Some("2.0.0")).unwrap();
        let states = &layers["topp:states"];
        assert_eq!(states.title, "USA Population");
        assert_eq!(states.keywords, vec!["census"]);
        assert_eq!(
            states.crs,
            vec!["urn:ogc:def:crs:EPSG::4326", "urn:ogc:def:crs:EPSG::3857"]
        );
        assert_eq!(states.bbox, Some(BoundingBox::new(-124.7, 24.9, -66.9, 49.3)));
        assert_eq!(states.formats, vec!["application/gml+xml; version=3.2"]);
        assert_eq!(states.version, "2.0.0");
    }

    #[test]
    fn test_ogc_api_collections() {
        let json = r#"{
            "links": [],
            "collections": [
                {"id": "buildings", "title": "Buildings",
                 "extent": {"spatial": {"bbox": [[19.0, 59.0, 32.0, 71.0]]}},
                 "crs": ["http://www.opengis.net/def/crs/OGC/1.3/CRS84"]},
                {"id": "roads"}
            ]
        }"#;
        let layers = WfsCapabilitiesParser.parse_layers(json, Some("3.0.0")).unwrap();
        assert_eq!(layers.len(), 2);
        let buildings = &layers["buildings"];
        assert_eq!(buildings.title, "Buildings");
        assert_eq!(buildings.bbox, Some(BoundingBox::new(19.0, 59.0, 32.0, 71.0)));
        assert_eq!(buildings.version, "3.0.0");
        assert_eq!(layers["roads"].title, "roads");
    }

    #[test]
    fn test_ogc_api_rejects_malformed_json() {
        let result = WfsCapabilitiesParser.parse_layers("[1, 2", Some("3.0.0"));
        assert!(matches!(result, Err(OwsError::ParseFault(_))));
    }
}
