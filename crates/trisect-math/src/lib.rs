#![warn(missing_docs)]

//! Exact and floating geometry primitives for the trisect kernel.
//!
//! Three layers, fastest first:
//!
//! 1. **f64 predicates** ([`predicates`]) — adaptive-precision predicates on
//!    plain floating-point input, exact for any finite f64 coordinates.
//! 2. **Interval filter** ([`interval`]) — outward-rounded interval
//!    arithmetic used to decide predicate signs on constructed points without
//!    touching big integers.
//! 3. **Exact rationals** ([`exact`]) — arbitrary-precision rational
//!    coordinates, the ground truth when the filter cannot decide.
//!
//! [`lazy`] ties the layers together: a [`lazy::LazyPoint3`] carries an
//! interval approximation, a construction recipe, and a cached exact value
//! computed on first demand.

pub mod exact;
pub mod interval;
pub mod lazy;
pub mod predicates;

/// 2D point with f64 coordinates.
pub type Point2 = nalgebra::Point2<f64>;
/// 3D point with f64 coordinates.
pub type Point3 = nalgebra::Point3<f64>;
/// 3D vector with f64 coordinates.
pub type Vector3 = nalgebra::Vector3<f64>;
