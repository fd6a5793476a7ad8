//! Normalized layer descriptions parsed from capabilities documents.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Layers keyed by name, built fresh for every capabilities request.
pub type LayerMap = HashMap<String, LayerCapabilities>;

/// One advertised layer (or feature type, or catalogue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCapabilities {
    /// Layer name / identifier used in requests
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Optional description/abstract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Supported coordinate reference systems, as advertised
    #[serde(default)]
    pub crs: Vec<String>,

    /// Geographic bounding box (WGS84)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,

    #[serde(default)]
    pub styles: Vec<LayerStyle>,

    /// Output formats offered for this layer
    #[serde(default)]
    pub formats: Vec<String>,

    /// Tile matrix sets the layer links to (WMTS)
    #[serde(default)]
    pub tile_matrix_sets: Vec<String>,

    /// Whether feature info queries are supported
    #[serde(default)]
    pub queryable: bool,

    /// Service type token, e.g. "WMS"
    pub service_type: String,

    /// Version of the capabilities document
    pub version: String,

    /// Protocol-specific extras that have no dedicated field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// URL the capabilities were resolved from (after redirects)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LayerCapabilities {
    pub fn new(
        name: impl Into<String>,
        service_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            description: None,
            keywords: Vec::new(),
            crs: Vec::new(),
            bbox: None,
            styles: Vec::new(),
            formats: Vec::new(),
            tile_matrix_sets: Vec::new(),
            queryable: false,
            service_type: service_type.into(),
            version: version.into(),
            attributes: BTreeMap::new(),
            url: None,
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Add a CRS unless it is already listed.
    pub fn add_crs(&mut self, crs: impl Into<String>) {
        let crs = crs.into();
        if !crs.is_empty() && !self.crs.contains(&crs) {
            self.crs.push(crs);
        }
    }
}

/// Style definition for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Style name (used in GetMap / GetTile requests)
    pub name: String,

    /// Human-readable title
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_url: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}
