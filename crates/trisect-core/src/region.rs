//! Symbolic names for triangle features.

/// A feature of a triangle: one of its vertices, one of its edges, or its
/// interior. Vertex `i` is corner `i`; edge `i` connects corners `i` and
/// `(i+1) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Corner `i`.
    Vertex(u8),
    /// Edge from corner `i` to corner `(i+1) % 3`.
    Edge(u8),
    /// The open interior.
    Face,
}

impl Feature {
    /// True for the vertex variant.
    pub fn is_vertex(self) -> bool {
        matches!(self, Feature::Vertex(_))
    }

    /// Specificity rank used when merging observations of the same point:
    /// a vertex pins the point down more than an edge, an edge more than the
    /// interior.
    fn rank(self) -> u8 {
        match self {
            Feature::Vertex(_) => 2,
            Feature::Edge(_) => 1,
            Feature::Face => 0,
        }
    }

    /// The more specific of two features describing the same point.
    pub fn more_specific(self, other: Feature) -> Feature {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

/// An element of the intersection of a face pair, described by the feature
/// it lies on in each triangle. No coordinates are evaluated to produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolicIntersection {
    /// Feature of the left triangle.
    pub left: Feature,
    /// Feature of the right triangle.
    pub right: Feature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_more_specific() {
        assert_eq!(
            Feature::Face.more_specific(Feature::Edge(1)),
            Feature::Edge(1)
        );
        assert_eq!(
            Feature::Edge(1).more_specific(Feature::Vertex(0)),
            Feature::Vertex(0)
        );
        assert_eq!(
            Feature::Vertex(2).more_specific(Feature::Face),
            Feature::Vertex(2)
        );
    }
}
