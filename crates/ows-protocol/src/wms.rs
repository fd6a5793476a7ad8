//! WMS 1.1.1 / 1.3.0 capabilities parsing.
//!
//! Nested `Layer` elements inherit from their parents following the WMS
//! rules: CRS/SRS and styles accumulate, the geographic bounding box and the
//! queryable flag are replaced when a child declares its own. Only layers
//! with a `Name` are requestable and end up in the result.

use ows_common::xml::{parse_document, XmlElement};
use ows_common::{BoundingBox, LayerCapabilities, LayerMap, LayerStyle, OwsError, OwsResult};
use tracing::debug;

use crate::ows::{attribute_bbox, document_version, expect_root, keywords};
use crate::parser::CapabilitiesParser;

pub const WMS_130: &str = "1.3.0";
pub const WMS_111: &str = "1.1.1";

#[derive(Debug, Default, Clone, Copy)]
pub struct WmsCapabilitiesParser;

impl CapabilitiesParser for WmsCapabilitiesParser {
    fn name(&self) -> &'static str {
        "wmslayer"
    }

    fn default_version(&self) -> &'static str {
        WMS_130
    }

    fn parse_layers(&self, body: &str, version: Option<&str>) -> OwsResult<LayerMap> {
        let root = parse_document(body)?;
        expect_root(&root, &["WMS_Capabilities", "WMT_MS_Capabilities"])?;
        let version = document_version(&root, version, self.default_version());
        let service_type = self.service_type();

        let capability = root
            .child("Capability")
            .ok_or_else(|| OwsError::ParseFault("WMS capabilities without <Capability>".into()))?;

        let formats = capability
            .find(&["Request", "GetMap"])
            .map(|getmap| getmap.children_text("Format"))
            .unwrap_or_default();

        let ctx = LayerContext {
            service_type: &service_type,
            version: &version,
            formats: &formats,
        };
        let mut layers = LayerMap::new();
        for layer in capability.children("Layer") {
            collect_layer(layer, &Inherited::default(), &ctx, &mut layers);
        }
        Ok(layers)
    }
}

struct LayerContext<'a> {
    service_type: &'a str,
    version: &'a str,
    formats: &'a [String],
}

/// Properties a child layer inherits from its ancestors.
#[derive(Debug, Clone, Default)]
struct Inherited {
    crs: Vec<String>,
    styles: Vec<LayerStyle>,
    bbox: Option<BoundingBox>,
    queryable: bool,
}

fn collect_layer(el: &XmlElement, parent: &Inherited, ctx: &LayerContext<'_>, out: &mut LayerMap) {
    let mut inherited = parent.clone();

    // 1.1.1 allows several space separated codes in one SRS element
    for crs in el
        .children_text("CRS")
        .into_iter()
        .chain(el.children_text("SRS"))
    {
        for code in crs.split_whitespace() {
            if !inherited.crs.iter().any(|c| c == code) {
                inherited.crs.push(code.to_string());
            }
        }
    }

    for style_el in el.children("Style") {
        if let Some(style) = parse_style(style_el) {
            if !inherited.styles.iter().any(|s| s.name == style.name) {
                inherited.styles.push(style);
            }
        }
    }

    if let Some(bbox) = geographic_bbox(el) {
        inherited.bbox = Some(bbox);
    }

    if let Some(flag) = el.attr("queryable") {
        inherited.queryable = flag == "1" || flag.eq_ignore_ascii_case("true");
    }

    if let Some(name) = el.child_text("Name") {
        let mut layer = LayerCapabilities::new(name.clone(), ctx.service_type, ctx.version);
        if let Some(title) = el.child_text("Title") {
            layer.title = title;
        }
        layer.description = el.child_text("Abstract");
        layer.keywords = keywords(el);
        layer.crs = inherited.crs.clone();
        layer.bbox = inherited.bbox;
        layer.styles = inherited.styles.clone();
        layer.formats = ctx.formats.to_vec();
        layer.queryable = inherited.queryable;

        if out.contains_key(&name) {
            debug!(layer = %name, "Duplicate layer name, keeping the first one");
        } else {
            out.insert(name, layer);
        }
    }

    for child in el.children("Layer") {
        collect_layer(child, &inherited, ctx, out);
    }
}

fn parse_style(el: &XmlElement) -> Option<LayerStyle> {
    let name = el.child_text("Name")?;
    Some(LayerStyle {
        title: el.child_text("Title").unwrap_or_else(|| name.clone()),
        legend_url: el
            .find(&["LegendURL", "OnlineResource"])
            .and_then(|r| r.attr("href"))
            .map(str::to_string),
        is_default: false,
        name,
    })
}

/// `EX_GeographicBoundingBox` (1.3.0) or `LatLonBoundingBox` (1.1.1).
fn geographic_bbox(el: &XmlElement) -> Option<BoundingBox> {
    if let Some(ex) = el.child("EX_GeographicBoundingBox") {
        let value = |name: &str| ex.child_text(name).and_then(|v| v.parse::<f64>().ok());
        return Some(BoundingBox::new(
            value("westBoundLongitude")?,
            value("southBoundLatitude")?,
            value("eastBoundLongitude")?,
            value("northBoundLatitude")?,
        ));
    }
    el.child("LatLonBoundingBox").and_then(attribute_bbox)
}
