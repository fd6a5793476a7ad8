//! Common test fixtures for capabilities and catalogue tests.
//!
//! Documents are trimmed-down versions of what real services return, with
//! enough structure to exercise namespaces, nesting and inheritance.

/// Capabilities documents, one per supported protocol/version.
pub mod capabilities {
    /// WMS 1.3.0 with a named group layer and two named children.
    pub const WMS_130: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities xmlns="http://www.opengis.net/wms" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.3.0">
  <Service>
    <Name>WMS</Name>
    <Title>Test map service</Title>
  </Service>
  <Capability>
    <Request>
      <GetCapabilities><Format>text/xml</Format></GetCapabilities>
      <GetMap>
        <Format>image/png</Format>
        <Format>image/jpeg</Format>
      </GetMap>
    </Request>
    <Exception><Format>XML</Format></Exception>
    <Layer>
      <Name>topography</Name>
      <Title>Topography</Title>
      <Abstract>Topographic database layers</Abstract>
      <KeywordList><Keyword>topography</Keyword><Keyword>basemap</Keyword></KeywordList>
      <CRS>EPSG:3067</CRS>
      <CRS>EPSG:4326</CRS>
      <EX_GeographicBoundingBox>
        <westBoundLongitude>19.08</westBoundLongitude>
        <eastBoundLongitude>31.59</eastBoundLongitude>
        <southBoundLatitude>59.45</southBoundLatitude>
        <northBoundLatitude>70.09</northBoundLatitude>
      </EX_GeographicBoundingBox>
      <Style>
        <Name>default</Name>
        <Title>Default</Title>
        <LegendURL width="20" height="20">
          <Format>image/png</Format>
          <OnlineResource xlink:type="simple" xlink:href="https://maps.example.org/legend.png"/>
        </LegendURL>
      </Style>
      <Layer queryable="1">
        <Name>roads</Name>
        <Title>Roads</Title>
        <CRS>EPSG:3857</CRS>
      </Layer>
      <Layer queryable="0">
        <Name>buildings</Name>
        <Title>Buildings</Title>
        <Style><Name>outline</Name><Title>Outline only</Title></Style>
      </Layer>
      <Layer>
        <Title>Unnamed group</Title>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    /// WMS 1.1.1 with space separated SRS codes.
    pub const WMS_111: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WMT_MS_Capabilities SYSTEM "http://schemas.opengis.net/wms/1.1.1/WMS_MS_Capabilities.dtd">
<WMT_MS_Capabilities version="1.1.1">
  <Service><Name>OGC:WMS</Name><Title>Legacy service</Title></Service>
  <Capability>
    <Request><GetMap><Format>image/gif</Format></GetMap></Request>
    <Layer>
      <Title>Root</Title>
      <SRS>EPSG:4326 EPSG:900913</SRS>
      <LatLonBoundingBox minx="-180" miny="-90" maxx="180" maxy="90"/>
      <Layer queryable="1">
        <Name>countries</Name>
        <Title>Countries</Title>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>"#;

    /// WFS 1.1.0 with two feature types.
    pub const WFS_110: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="1.1.0"
    xmlns:wfs="http://www.opengis.net/wfs" xmlns:ows="http://www.opengis.net/ows">
  <ows:ServiceIdentification><ows:Title>Test feature service</ows:Title></ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetFeature">
      <ows:Parameter name="outputFormat">
        <ows:Value>text/xml; subtype=gml/3.1.1</ows:Value>
      </ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
  <wfs:FeatureTypeList>
    <wfs:FeatureType>
      <wfs:Name>tn:roads</wfs:Name>
      <wfs:Title>Roads</wfs:Title>
      <wfs:DefaultSRS>urn:ogc:def:crs:EPSG::3067</wfs:DefaultSRS>
      <wfs:OtherSRS>urn:ogc:def:crs:EPSG::4326</wfs:OtherSRS>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>19.0 59.0</ows:LowerCorner>
        <ows:UpperCorner>32.0 71.0</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </wfs:FeatureType>
    <wfs:FeatureType>
      <wfs:Name>tn:ferries</wfs:Name>
      <wfs:Title>Ferry routes</wfs:Title>
      <wfs:DefaultSRS>urn:ogc:def:crs:EPSG::3067</wfs:DefaultSRS>
      <wfs:OutputFormats><wfs:Format>application/json</wfs:Format></wfs:OutputFormats>
    </wfs:FeatureType>
  </wfs:FeatureTypeList>
</wfs:WFS_Capabilities>"#;

    /// OGC API Features `/collections` response.
    pub const OGC_API_COLLECTIONS: &str = r#"{
  "links": [{"href": "https://features.example.org/collections?f=json", "rel": "self"}],
  "collections": [
    {
      "id": "buildings",
      "title": "Buildings",
      "description": "Building footprints",
      "extent": {"spatial": {"bbox": [[19.0, 59.0, 32.0, 71.0]]}},
      "crs": ["http://www.opengis.net/def/crs/OGC/1.3/CRS84"]
    },
    {"id": "addresses", "title": "Addresses"}
  ]
}"#;

    /// WMTS 1.0.0 with one layer linked to one tile matrix set.
    pub const WMTS_100: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities xmlns="http://www.opengis.net/wmts/1.0" xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0">
  <ows:ServiceIdentification><ows:Title>Tile service</ows:Title></ows:ServiceIdentification>
  <Contents>
    <Layer>
      <ows:Title>Orthophotos</ows:Title>
      <ows:Identifier>ortokuva</ows:Identifier>
      <Style isDefault="true"><ows:Identifier>default</ows:Identifier></Style>
      <Format>image/jpeg</Format>
      <InfoFormat>application/json</InfoFormat>
      <TileMatrixSetLink><TileMatrixSet>ETRS-TM35FIN</TileMatrixSet></TileMatrixSetLink>
    </Layer>
    <TileMatrixSet>
      <ows:Identifier>ETRS-TM35FIN</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG:6.3:3067</ows:SupportedCRS>
    </TileMatrixSet>
  </Contents>
</Capabilities>"#;

    /// CSW 2.0.2 catalogue capabilities.
    pub const CSW_202: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:Capabilities version="2.0.2"
    xmlns:csw="http://www.opengis.net/cat/csw/2.0.2" xmlns:ows="http://www.opengis.net/ows">
  <ows:ServiceIdentification>
    <ows:Title>Metadata catalogue</ows:Title>
    <ows:Abstract>Dataset and service metadata</ows:Abstract>
    <ows:ServiceType>CSW</ows:ServiceType>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetCapabilities"/>
    <ows:Operation name="GetRecords">
      <ows:Parameter name="outputFormat"><ows:Value>application/xml</ows:Value></ows:Parameter>
    </ows:Operation>
    <ows:Operation name="GetDomain"/>
  </ows:OperationsMetadata>
</csw:Capabilities>"#;
}

/// Service exception documents.
pub mod exceptions {
    /// WMS 1.3.0 exception report.
    pub const WMS_SERVICE_EXCEPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.3.0" xmlns="http://www.opengis.net/ogc">
  <ServiceException code="InvalidParameterValue">Unsupported version: 9.9.9</ServiceException>
</ServiceExceptionReport>"#;

    /// OWS Common 1.1 exception report (WFS 1.1+/WMTS/CSW).
    pub const OWS_EXCEPTION_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1" version="2.0.0">
  <ows:Exception exceptionCode="OperationNotSupported" locator="request">
    <ows:ExceptionText>Request 'GetCapabilities' is not supported here</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;

    /// Truncated document.
    pub const MALFORMED: &str = r#"<?xml version="1.0"?><WMS_Capabilities version="1.3.0"><Capability>"#;
}

/// CSW GetDomain responses.
pub mod get_domain {
    /// Two values plus a duplicate.
    pub const ORGANISATIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetDomainResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2">
  <csw:DomainValues type="csw:Record">
    <csw:PropertyName>OrganisationName</csw:PropertyName>
    <csw:ListOfValues>
      <csw:Value count="12">National Land Survey</csw:Value>
      <csw:Value count="3">Finnish Environment Institute</csw:Value>
      <csw:Value count="1">National Land Survey</csw:Value>
    </csw:ListOfValues>
  </csw:DomainValues>
</csw:GetDomainResponse>"#;

    /// Response with the domain but no value list.
    pub const MISSING_LIST: &str = r#"<csw:GetDomainResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2">
  <csw:DomainValues type="csw:Record"><csw:PropertyName>Type</csw:PropertyName></csw:DomainValues>
</csw:GetDomainResponse>"#;

    /// Build a GetDomain response with the given values.
    pub fn response_with(values: &[&str]) -> String {
        let items: String = values
            .iter()
            .map(|v| format!("<csw:Value>{}</csw:Value>", v))
            .collect();
        format!(
            r#"<csw:GetDomainResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"><csw:DomainValues><csw:ListOfValues>{}</csw:ListOfValues></csw:DomainValues></csw:GetDomainResponse>"#,
            items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_builds_values() {
        let xml = get_domain::response_with(&["a", "b"]);
        assert!(xml.contains("<csw:Value>a</csw:Value><csw:Value>b</csw:Value>"));
    }

    #[test]
    fn test_fixtures_are_not_empty() {
        for doc in [
            capabilities::WMS_130,
            capabilities::WMS_111,
            capabilities::WFS_110,
            capabilities::WMTS_100,
            capabilities::CSW_202,
            exceptions::WMS_SERVICE_EXCEPTION,
            exceptions::OWS_EXCEPTION_REPORT,
            get_domain::ORGANISATIONS,
        ] {
            assert!(doc.trim_start().starts_with('<'));
        }
    }
}
