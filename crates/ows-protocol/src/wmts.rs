//! WMTS 1.0.0 capabilities parsing.

use std::collections::HashMap;

use ows_common::xml::{parse_document, XmlElement};
use ows_common::{LayerCapabilities, LayerMap, LayerStyle, OwsError, OwsResult};

use crate::ows::{document_version, expect_root, keywords, wgs84_bbox};
use crate::parser::CapabilitiesParser;

pub const WMTS_100: &str = "1.0.0";

#[derive(Debug, Default, Clone, Copy)]
pub struct WmtsCapabilitiesParser;

impl CapabilitiesParser for WmtsCapabilitiesParser {
    fn name(&self) -> &'static str {
        "wmtslayer"
    }

    fn default_version(&self) -> &'static str {
        WMTS_100
    }

    fn parse_layers(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap> {
        let root = parse_document(body)?;
        expect_root(&root, &["Capabilities"])?;
        let version = document_version(&root, version, self.default_version());
        let service_type = self.service_type();

        let contents = root
            .child("Contents")
            .ok_or_else(|| OwsError::ParseFault("WMTS capabilities without <Contents>".into()))?;

        // TileMatrixSet identifier -> SupportedCRS
        let matrix_set_crs: HashMap<String, String> = contents
            .children("TileMatrixSet")
            .filter_map(|tms| Some((tms.child_text("Identifier")?, tms.child_text("SupportedCRS")?)))
            .collect();

        let mut layers = LayerMap::new();
        for layer_el in contents.children("Layer") {
            let Some(name) = layer_el.child_text("Identifier") else {
                continue;
            };
            let layer = wmts_layer(layer_el, &name, &service_type, &version, &matrix_set_crs);
            layers.entry(name).or_insert(layer);
        }
        Ok(layers)
    }
}

fn wmts_layer(
    el: &XmlElement,
    name: &str,
    service_type: &str,
    version: &str,
    matrix_set_crs: &HashMap<String, String>,
) -> LayerCapabilities {
    let mut layer = LayerCapabilities::new(name, service_type, version);
    if let Some(title) = el.child_text("Title") {
        layer.title = title;
    }
    layer.description = el.child_text("Abstract");
    layer.keywords = keywords(el);
    layer.bbox = wgs84_bbox(el);
    layer.formats = el.children_text("Format");
    layer.queryable = !el.children_text("InfoFormat").is_empty();

    layer.styles = el
        .children("Style")
        .filter_map(|style| {
            let name = style.child_text("Identifier")?;
            Some(LayerStyle {
                title: style.child_text("Title").unwrap_or_else(|| name.clone()),
                legend_url: style
                    .child("LegendURL")
                    .and_then(|l| l.attr("href"))
                    .map(str::to_string),
                is_default: style.attr("isDefault") == Some("true"),
                name,
            })
        })
        .collect();

    for link in el.children("TileMatrixSetLink") {
        if let Some(set) = link.child_text("TileMatrixSet") {
            if let Some(crs) = matrix_set_crs.get(&set) {
                layer.add_crs(crs.clone());
            }
            layer.tile_matrix_sets.push(set);
        }
    }

    if let Some(template) = el
        .children("ResourceURL")
        .find(|r| r.attr("resourceType") == Some("tile"))
        .and_then(|r| r.attr("template"))
    {
        layer
            .attributes
            .insert("tileUrlTemplate".to_string(), template.to_string());
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPS: &str = r#"<Capabilities xmlns="http://www.opengis.net/wmts/1.0"
    xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0">
  <Contents>
    <Layer>
      <ows:Title>Background map</ows:Title>
      <ows:Identifier>taustakartta</ows:Identifier>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>19.0 59.0</ows:LowerCorner>
        <ows:UpperCorner>32.0 71.0</ows:UpperCorner>
      </ows:WGS84BoundingBox>
      <Style isDefault="true"><ows:Identifier>default</ows:Identifier></Style>
      <Format>image/png</Format>
      <TileMatrixSetLink><TileMatrixSet>ETRS-TM35FIN</TileMatrixSet></TileMatrixSetLink>
      <TileMatrixSetLink><TileMatrixSet>WGS84_Pseudo-Mercator</TileMatrixSet></TileMatrixSetLink>
      <ResourceURL format="image/png" resourceType="tile"
        template="https://tiles.example.org/{TileMatrixSet}/{TileMatrix}/{TileRow}/{TileCol}.png"/>
    </Layer>
    <TileMatrixSet>
      <ows:Identifier>ETRS-TM35FIN</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG:6.3:3067</ows:SupportedCRS>
    </TileMatrixSet>
    <TileMatrixSet>
      <ows:Identifier>WGS84_Pseudo-Mercator</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG:6.3:3857</ows:SupportedCRS>
    </TileMatrixSet>
  </Contents>
</Capabilities>"#;

    #[test]
    fn test_parse_wmts_layer() {
        let layers = WmtsCapabilitiesParser.parse_layers(CAPS, None).unwrap();
        let layer = &layers["taustakartta"];
        assert_eq!(layer.title, "Background map");
        assert_eq!(layer.service_type, "WMTS");
        assert_eq!(layer.tile_matrix_sets, vec!["ETRS-TM35FIN", "WGS84_Pseudo-Mercator"]);
        assert_eq!(
            layer.crs,
            vec!["urn:ogc:def:crs:EPSG:6.3:3067", "urn:ogc:def:crs:EPSG:6.3:3857"]
        );
        assert_eq!(layer.styles.len(), 1);
        assert!(layer.styles[0].is_default);
        assert!(!layer.queryable);
        assert!(layer.attributes["tileUrlTemplate"].starts_with("https://tiles.example.org/"));
    }

    #[test]
    fn test_missing_contents() {
        let result = WmtsCapabilitiesParser.parse_layers("<Capabilities version=\"1.0.0\"/>", None);
        assert!(matches!(result, Err(OwsError::ParseFault(_))));
    }
}
