//! Bounding box types as advertised by capabilities documents.

use serde::{Deserialize, Serialize};

/// A geographic bounding box, coordinates in degrees (WGS84 lon/lat order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse an OWS corner pair: LowerCorner "x y" and UpperCorner "x y".
    pub fn from_corners(lower: &str, upper: &str) -> Result<Self, BboxParseError> {
        let (min_x, min_y) = parse_corner(lower)?;
        let (max_x, max_y) = parse_corner(upper)?;
        Ok(Self::new(min_x, min_y, max_x, max_y))
    }

    /// Build from a `[minx, miny, maxx, maxy]` array (OGC API extents).
    ///
    /// Arrays with 6 values carry min/max elevation and are accepted too.
    pub fn from_slice(values: &[f64]) -> Result<Self, BboxParseError> {
        match values {
            [min_x, min_y, max_x, max_y] => Ok(Self::new(*min_x, *min_y, *max_x, *max_y)),
            [min_x, min_y, _, max_x, max_y, _] => Ok(Self::new(*min_x, *min_y, *max_x, *max_y)),
            _ => Err(BboxParseError::InvalidFormat(format!("{:?}", values))),
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

fn parse_corner(s: &str) -> Result<(f64, f64), BboxParseError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(BboxParseError::InvalidFormat(s.to_string()));
    }
    let x = parts[0]
        .parse()
        .map_err(|_| BboxParseError::InvalidNumber(parts[0].to_string()))?;
    let y = parts[1]
        .parse()
        .map_err(|_| BboxParseError::InvalidNumber(parts[1].to_string()))?;
    Ok((x, y))
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box: {0}")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}
