//! Element helpers shared by the XML capabilities parsers.

use ows_common::xml::XmlElement;
use ows_common::{BoundingBox, OwsError, OwsResult};
use tracing::debug;

/// Fail with `ParseFault` unless the root element is one of `expected`.
pub(crate) fn expect_root(root: &XmlElement, expected: &[&str]) -> OwsResult<()> {
    if expected.contains(&root.name.as_str()) {
        Ok(())
    } else {
        Err(OwsError::ParseFault(format!(
            "unexpected root element <{}>, expected {}",
            root.name,
            expected.join(" or ")
        )))
    }
}

/// Version declared by the document, falling back to the requested one.
pub(crate) fn document_version(root: &XmlElement, requested: Option<&str>, default: &str) -> String {
    root.attr("version")
        .filter(|v| !v.is_empty())
        .or(requested.filter(|v| !v.is_empty()))
        .unwrap_or(default)
        .to_string()
}

/// Keywords in any of the common encodings:
/// `KeywordList/Keyword` (WMS), `ows:Keywords/ows:Keyword` (OWS 1.1),
/// and comma separated `Keywords` text (WFS 1.0).
pub(crate) fn keywords(el: &XmlElement) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(list) = el.child("KeywordList") {
        out.extend(list.children_text("Keyword"));
    }
    for group in el.children("Keywords") {
        let nested = group.children_text("Keyword");
        if nested.is_empty() {
            out.extend(
                group
                    .text()
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
            );
        } else {
            out.extend(nested);
        }
    }
    out
}

/// `ows:WGS84BoundingBox` child, if present and well formed.
pub(crate) fn wgs84_bbox(el: &XmlElement) -> Option<BoundingBox> {
    let bbox_el = el.child("WGS84BoundingBox")?;
    let lower = bbox_el.child_text("LowerCorner")?;
    let upper = bbox_el.child_text("UpperCorner")?;
    match BoundingBox::from_corners(&lower, &upper) {
        Ok(bbox) => Some(bbox),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed WGS84BoundingBox");
            None
        }
    }
}

/// Bounding box given as `minx`/`miny`/`maxx`/`maxy` attributes.
pub(crate) fn attribute_bbox(el: &XmlElement) -> Option<BoundingBox> {
    let value = |name: &str| el.attr(name).and_then(|v| v.trim().parse::<f64>().ok());
    Some(BoundingBox::new(
        value("minx")?,
        value("miny")?,
        value("maxx")?,
        value("maxy")?,
    ))
}

fn operation<'a>(root: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    root.child("OperationsMetadata")?
        .children("Operation")
        .find(|op| op.attr("name") == Some(name))
}

/// Names of the operations listed under `ows:OperationsMetadata`.
pub(crate) fn operation_names(root: &XmlElement) -> Vec<String> {
    root.child("OperationsMetadata")
        .map(|meta| {
            meta.children("Operation")
                .filter_map(|op| op.attr("name").map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Allowed values of an operation parameter (OWS 1.0 `Value` or OWS 1.1/2.0
/// `AllowedValues/Value`). Parameter names compare case-insensitively.
pub(crate) fn operation_parameter_values(
    root: &XmlElement,
    operation_name: &str,
    parameter: &str,
) -> Vec<String> {
    let Some(op) = operation(root, operation_name) else {
        return Vec::new();
    };
    op.children("Parameter")
        .filter(|p| {
            p.attr("name")
                .map(|n| n.eq_ignore_ascii_case(parameter))
                .unwrap_or(false)
        })
        .flat_map(|p| {
            let mut values = p.children_text("Value");
            if let Some(allowed) = p.child("AllowedValues") {
                values.extend(allowed.children_text("Value"));
            }
            values
        })
        .collect()
}

/// HTTP GET endpoint advertised for an operation.
pub(crate) fn operation_get_url(root: &XmlElement, operation_name: &str) -> Option<String> {
    operation(root, operation_name)?
        .find(&["DCP", "HTTP", "Get"])?
        .attr("href")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ows_common::xml::parse_document;

    #[test]
    fn test_keyword_encodings() {
        let el = parse_document(
            "<L><KeywordList><Keyword>a</Keyword></KeywordList>\
             <Keywords><Keyword>b</Keyword></Keywords><Keywords>c, d</Keywords></L>",
        )
        .unwrap();
        assert_eq!(keywords(&el), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_operation_parameters() {
        let root = parse_document(
            r#"<Caps><OperationsMetadata>
                <Operation name="GetRecords">
                  <DCP><HTTP><Get href="http://x/csw?"/></HTTP></DCP>
                  <Parameter name="outputFormat"><Value>application/xml</Value></Parameter>
                  <Parameter name="typeNames"><AllowedValues><Value>csw:Record</Value></AllowedValues></Parameter>
                </Operation>
              </OperationsMetadata></Caps>"#,
        )
        .unwrap();
        assert_eq!(
            operation_parameter_values(&root, "GetRecords", "OUTPUTFORMAT"),
            vec!["application/xml"]
        );
        assert_eq!(
            operation_parameter_values(&root, "GetRecords", "typeNames"),
            vec!["csw:Record"]
        );
        assert_eq!(operation_get_url(&root, "GetRecords").as_deref(), Some("http://x/csw?"));
        assert_eq!(operation_names(&root), vec!["GetRecords"]);
        assert!(operation_parameter_values(&root, "GetDomain", "x").is_empty());
    }

    #[test]
    fn test_expect_root() {
        let root = parse_document("<Other/>").unwrap();
        assert!(matches!(
            expect_root(&root, &["WMS_Capabilities"]),
            Err(OwsError::ParseFault(_))
        ));
    }
}
