//! Global propagation of face tags.
//!
//! Faces connected through non-border edges never cross the other mesh's
//! surface, so a whole connected component shares one tag. Components are
//! flood-filled from the faces the local phase already tagged; a component
//! with no seed at all is labeled by casting a single exact ray from a
//! representative face against the other input.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use trisect_math::exact::{ExactPoint3, ExactVec3};
use trisect_mesh::{make_edge, EdgeSet, FaceId, FaceTag, MixedMesh, TriangleSoup};

use crate::side::PerSide;
use crate::warnings::Warnings;

/// Propagate tags across components and resolve unseeded ones with ray
/// tests. Every non-boundary face carries an `Interior`/`Exterior` tag
/// afterwards.
pub fn classify_globally<D>(
    m: &mut MixedMesh<D>,
    border_edges: &EdgeSet,
    soups: PerSide<&TriangleSoup<D>>,
) -> Warnings {
    let mut warnings = Warnings::NONE;
    let n = m.num_faces();

    let mut uf = UnionFind::new(n);
    for fi in m.faces() {
        let face = m.face(fi);
        for k in 0..3 {
            let edge = make_edge(face[k], face[(k + 1) % 3]);
            if border_edges.contains(&edge) {
                continue;
            }
            for other in m.faces_around_edge(edge) {
                uf.union(fi.index(), other.index());
            }
        }
    }

    // Components in first-face order.
    let mut component_of_root = vec![usize::MAX; n];
    let mut components: Vec<Vec<FaceId>> = Vec::new();
    for fi in m.faces() {
        let root = uf.find(fi.index());
        let slot = component_of_root[root];
        if slot == usize::MAX {
            component_of_root[root] = components.len();
            components.push(vec![fi]);
        } else {
            components[slot].push(fi);
        }
    }

    let mut assignments: Vec<(FaceId, FaceTag)> = Vec::new();
    for component in &components {
        let mut counts = [0usize; 4];
        for &fi in component {
            match m.data(fi).tag {
                FaceTag::Coplanar => counts[0] += 1,
                FaceTag::Opposite => counts[1] += 1,
                FaceTag::Interior => counts[2] += 1,
                FaceTag::Exterior => counts[3] += 1,
                _ => {}
            }
        }
        let seeded: usize = counts.iter().sum();
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        if distinct > 1 {
            warnings |= Warnings::GLOBAL_SEED_CONFLICT;
        }

        let tag = if seeded > 0 {
            // Majority vote; ties resolve in fixed tag order.
            let winner = (0..4).max_by_key(|&i| (counts[i], 3 - i)).unwrap_or(3);
            [
                FaceTag::Coplanar,
                FaceTag::Opposite,
                FaceTag::Interior,
                FaceTag::Exterior,
            ][winner]
        } else {
            warnings |= Warnings::ISOLATED_COMPONENT_FALLBACK;
            let rep = component[0];
            let from_left = m.data(rep).from_left;
            let other = if from_left { soups.right } else { soups.left };
            match ray_test(m, rep, other) {
                Some(true) => FaceTag::Interior,
                Some(false) => FaceTag::Exterior,
                None => {
                    warnings |= Warnings::GLOBAL_SEED_CONFLICT;
                    FaceTag::Exterior
                }
            }
        };

        for &fi in component {
            if m.data(fi).tag == FaceTag::Unknown {
                assignments.push((fi, tag));
            }
        }
    }

    for (fi, tag) in assignments {
        m.data_mut(fi).tag = tag;
    }
    warnings
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Smaller root wins, keeping grouping independent of edge order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Whether the centroid of a face is inside the given soup, by exact
/// crossing count. `None` when every candidate ray direction grazed an edge
/// or vertex.
fn ray_test<D>(m: &MixedMesh<D>, fi: FaceId, soup: &TriangleSoup<D>) -> Option<bool> {
    let face = m.face(fi);
    let origin = centroid(
        m.point(face[0]).exact(),
        m.point(face[1]).exact(),
        m.point(face[2]).exact(),
    );

    for dir in ray_directions() {
        if let Some(crossings) = count_crossings(&origin, &dir, soup) {
            return Some(crossings % 2 == 1);
        }
    }
    None
}

fn centroid(a: &ExactPoint3, b: &ExactPoint3, c: &ExactPoint3) -> ExactPoint3 {
    let three = BigRational::from_integer(BigInt::from(3));
    ExactPoint3::from_coords(
        (&a.x + &b.x + &c.x) / &three,
        (&a.y + &b.y + &c.y) / &three,
        (&a.z + &b.z + &c.z) / &three,
    )
}

/// A fixed family of rationally tilted directions; the tilt avoids hitting
/// edges of axis-aligned geometry, and further directions cover the rare
/// grazing cases.
fn ray_directions() -> Vec<ExactVec3> {
    let r = |num: i64, den: i64| BigRational::new(BigInt::from(num), BigInt::from(den));
    vec![
        ExactVec3 {
            x: r(1, 1),
            y: r(1, 641),
            z: r(1, 415801),
        },
        ExactVec3 {
            x: r(1, 415801),
            y: r(1, 1),
            z: r(1, 641),
        },
        ExactVec3 {
            x: r(1, 641),
            y: r(1, 415801),
            z: r(1, 1),
        },
        ExactVec3 {
            x: r(-1, 1),
            y: r(3, 641),
            z: r(-1, 415801),
        },
        ExactVec3 {
            x: r(5, 7),
            y: r(-3, 11),
            z: r(2, 13),
        },
    ]
}

/// Count proper crossings of the open ray `origin + t*dir, t > 0` with the
/// soup. `None` when the ray grazes a vertex, edge, or the origin lies on a
/// triangle, in which case the count would be ambiguous.
fn count_crossings<D>(
    origin: &ExactPoint3,
    dir: &ExactVec3,
    soup: &TriangleSoup<D>,
) -> Option<usize> {
    let mut crossings = 0usize;
    for fi in soup.faces() {
        let [a, b, c] = soup.face(fi);
        let v0 = ExactPoint3::from_point3(soup.point(a));
        let v1 = ExactPoint3::from_point3(soup.point(b));
        let v2 = ExactPoint3::from_point3(soup.point(c));

        let e1 = v1.sub(&v0);
        let e2 = v2.sub(&v0);
        let h = dir.cross(&e2);
        let det = e1.dot(&h);
        if det.is_zero() {
            // Ray parallel to the triangle plane: harmless unless the
            // origin lies in that plane, where it could run along the face.
            let n = e1.cross(&e2);
            if n.dot(&origin.sub(&v0)).is_zero() {
                return None;
            }
            continue;
        }

        let s = origin.sub(&v0);
        let u = s.dot(&h) / &det;
        if u.is_negative() || &u > &BigRational::one() {
            continue;
        }
        let q = s.cross(&e1);
        let v = dir.dot(&q) / &det;
        if v.is_negative() || &u + &v > BigRational::one() {
            continue;
        }
        let t = e2.dot(&q) / &det;
        if t.is_negative() {
            continue;
        }

        // Inside the closed triangle with t >= 0; strict means a clean hit.
        let strict = u.is_positive()
            && v.is_positive()
            && (&u + &v) < BigRational::one()
            && t.is_positive();
        if strict {
            crossings += 1;
        } else {
            return None;
        }
    }
    Some(crossings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trisect_math::exact::rat;
    use trisect_math::Point3;
    use trisect_mesh::primitives::make_cube;

    fn point(x: f64, y: f64, z: f64) -> ExactPoint3 {
        ExactPoint3::from_point3(&Point3::new(x, y, z))
    }

    #[test]
    fn test_count_crossings_inside_cube() {
        let cube = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let origin = point(0.5, 0.5, 0.5);
        let hit = ray_directions()
            .iter()
            .find_map(|d| count_crossings(&origin, d, &cube));
        assert_eq!(hit.map(|c| c % 2), Some(1));
    }

    #[test]
    fn test_count_crossings_outside_cube() {
        let cube = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let origin = point(2.0, 0.5, 0.5);
        let hit = ray_directions()
            .iter()
            .find_map(|d| count_crossings(&origin, d, &cube));
        assert_eq!(hit.map(|c| c % 2), Some(0));
    }

    #[test]
    fn test_grazing_direction_is_rejected() {
        let cube = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        // Straight +x from the center hits the cube's face diagonal edge
        // structure head on only for the exactly axis-aligned direction.
        let origin = point(0.5, 0.5, 0.5);
        let axis = ExactVec3 {
            x: rat(1.0),
            y: rat(0.0),
            z: rat(0.0),
        };
        // The axis ray exits through the shared corner structure of the +x
        // face's two triangles: the crossing is non-strict.
        assert_eq!(count_crossings(&origin, &axis, &cube), None);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(
            &point(0.0, 0.0, 0.0),
            &point(3.0, 0.0, 0.0),
            &point(0.0, 3.0, 0.0),
        );
        assert_eq!(c, point(1.0, 1.0, 0.0));
    }
}
