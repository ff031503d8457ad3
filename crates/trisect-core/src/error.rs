//! Fatal pipeline errors.

use std::fmt;

use thiserror::Error;

/// Which operand a fatal condition is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMesh {
    /// The first (left) input.
    First,
    /// The second (right) input.
    Second,
}

impl fmt::Display for InputMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMesh::First => write!(f, "first"),
            InputMesh::Second => write!(f, "second"),
        }
    }
}

/// Errors that abort the Boolean pipeline.
#[derive(Error, Debug)]
pub enum BooleanError {
    /// Two constraint segments properly crossed inside one refined face,
    /// which can only happen when the mesh contributing the constraints
    /// intersects itself.
    #[error("the {0} mesh has self-intersections")]
    SelfIntersection(InputMesh),

    /// An input failed the closed-manifold precondition.
    #[error("the {mesh} mesh is not a closed manifold: {details}")]
    NotClosedManifold {
        /// The offending input.
        mesh: InputMesh,
        /// Summary of the defects found.
        details: String,
    },
}
