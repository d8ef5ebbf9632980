//! Site coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D position of a vertex.
///
/// Sites only matter for instance generation and visualization; the search
/// never reads them. Equality is exact field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Site {
    /// Create a new site.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another site.
    pub fn distance_squared(&self, other: &Site) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Return this site moved by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_equality_is_exact() {
        assert_eq!(Site::new(1.0, 2.0), Site::new(1.0, 2.0));
        assert_ne!(Site::new(1.0, 2.0), Site::new(1.0, 2.000_001));
    }

    #[test]
    fn test_distance_and_offset() {
        let a = Site::new(0.0, 0.0);
        let b = Site::new(3.0, 4.0);
        assert_eq!(a.distance_squared(&b), 25.0);
        assert_eq!(a.offset(0.5, 0.5), Site::new(0.5, 0.5));
        assert_eq!(b.to_string(), "3,4");
    }
}
