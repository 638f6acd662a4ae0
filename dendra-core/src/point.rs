//! Point records supplied by the dataset layer.

use std::collections::BTreeMap;

use crate::geometry::Point;

/// A single attribute value attached to a [`PointRecord`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    /// Numeric field; contributes to cluster summaries.
    Number(f64),
    /// Free-form text field.
    Text(String),
}

impl AttributeValue {
    /// Returns the numeric value, if this attribute is numeric.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// Named attributes carried by a point. The core never interprets them beyond
/// averaging numeric fields for cluster summaries.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A data point as delivered by the dataset layer.
///
/// # Examples
/// ```
/// use dendra_core::{Point, PointRecord};
///
/// let record = PointRecord::new("P1", 2.0, 3.5);
/// assert_eq!(record.position(), Point::new(2.0, 3.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PointRecord {
    /// Identifier shown in tooltips and used as the dendrogram leaf label.
    pub id: String,
    /// Horizontal domain coordinate.
    pub x: f64,
    /// Vertical domain coordinate.
    pub y: f64,
    /// Opaque payload.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl PointRecord {
    /// Creates a record without attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            attributes: Attributes::new(),
        }
    }

    /// Attaches a numeric attribute.
    #[must_use]
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::Number(value));
        self
    }

    /// Attaches a text attribute.
    #[must_use]
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::Text(value.into()));
        self
    }

    /// Domain position of the record.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
