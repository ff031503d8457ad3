//! Per-face constrained Delaunay triangulation.
//!
//! Each refined base face gets its own small triangulation over a planar
//! projection of the face: the coordinate axis most aligned with the face
//! normal is dropped, with the remaining two axes ordered so the base
//! triangle stays counter-clockwise. All predicates run on exact rational
//! coordinates, so points landing on edges split them exactly and collinear
//! points on a base edge keep subdividing that edge.
//!
//! The triangulation never deletes triangles: point insertion splits slots
//! in place and adds new ones, and edge flips rewire existing slots. The
//! domain is the base triangle itself, so every insert lands inside or on
//! the hull and no super-triangle bookkeeping is needed.

use std::collections::HashSet;

use thiserror::Error;
use trisect_math::exact::{incircle_exact, orient2d_exact, rat_sign, ExactPoint2};
use trisect_math::lazy::LazyPoint3;
use trisect_math::predicates::Sign;
use trisect_mesh::VertexId;

use crate::region::Feature;

/// Two constraint segments properly crossed. Constraints come from the other
/// mesh's intersection curves, so a crossing means that mesh intersects
/// itself.
#[derive(Debug, Error)]
#[error("intersection of constraints")]
pub struct ConstraintCrossing;

/// Handle to a vertex of one face's triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexHandle(u32);

const NONE: u32 = u32::MAX;

struct Vert {
    pos: ExactPoint2,
    id: VertexId,
}

/// `v` counter-clockwise; `nbr[k]` is the triangle across the edge opposite
/// `v[k]`, `NONE` on the hull.
#[derive(Clone, Copy)]
struct Tri {
    v: [u32; 3],
    nbr: [u32; 3],
}

enum Location {
    OnVertex(u32),
    OnEdge(u32, usize),
    Interior(u32),
}

enum Obstruction {
    /// The target edge already exists.
    Exists,
    /// A vertex lies exactly on the open segment.
    VertexOnSegment(u32),
    /// Edges crossing the open segment, as (tri, edge) of the first and the
    /// full list of crossed vertex pairs.
    Crossings(Vec<(u32, usize)>),
}

/// Constrained Delaunay triangulation of one base face.
pub struct PlanarTriangulation {
    verts: Vec<Vert>,
    tris: Vec<Tri>,
    constraints: HashSet<(u32, u32)>,
    u_axis: usize,
    v_axis: usize,
    last: u32,
}

impl PlanarTriangulation {
    /// Seed with the three base corners carrying their pool ids.
    pub fn new(
        pa: &LazyPoint3,
        pb: &LazyPoint3,
        pc: &LazyPoint3,
        a: VertexId,
        b: VertexId,
        c: VertexId,
    ) -> Self {
        let ea = pa.exact();
        let normal = pb.exact().sub(ea).cross(&pc.exact().sub(ea));
        assert!(!normal.is_zero(), "degenerate base face");
        let drop = normal.dominant_axis();
        // Cyclic axes keep the projected orientation equal to the sign of
        // the dropped normal component; swap to force counter-clockwise.
        let (u_axis, v_axis) = if rat_sign(normal.coord(drop)) == Sign::Negative {
            ((drop + 2) % 3, (drop + 1) % 3)
        } else {
            ((drop + 1) % 3, (drop + 2) % 3)
        };

        let mut cdt = Self {
            verts: Vec::with_capacity(8),
            tris: Vec::with_capacity(8),
            constraints: HashSet::new(),
            u_axis,
            v_axis,
            last: 0,
        };
        for (p, id) in [(pa, a), (pb, b), (pc, c)] {
            let pos = cdt.project(p);
            cdt.verts.push(Vert { pos, id });
        }
        cdt.tris.push(Tri {
            v: [0, 1, 2],
            nbr: [NONE; 3],
        });
        cdt
    }

    fn project(&self, p: &LazyPoint3) -> ExactPoint2 {
        let e = p.exact();
        [e.coord(self.u_axis).clone(), e.coord(self.v_axis).clone()]
    }

    fn pos(&self, v: u32) -> &ExactPoint2 {
        &self.verts[v as usize].pos
    }

    /// Insert a point carrying its pool id. Returns the existing handle when
    /// the point coincides with an inserted vertex. The symbolic `region`
    /// short-circuits corner inserts.
    pub fn insert(&mut self, p: &LazyPoint3, id: VertexId, region: Feature) -> VertexHandle {
        if let Feature::Vertex(i) = region {
            debug_assert_eq!(self.verts[i as usize].id, id);
            return VertexHandle(u32::from(i));
        }

        let pos = self.project(p);
        match self.locate(&pos) {
            Location::OnVertex(v) => VertexHandle(v),
            Location::Interior(t) => {
                let w = self.push_vert(pos, id);
                self.split_interior(t, w);
                VertexHandle(w)
            }
            Location::OnEdge(t, k) => {
                let w = self.push_vert(pos, id);
                self.split_edge(t, k, w);
                VertexHandle(w)
            }
        }
    }

    fn push_vert(&mut self, pos: ExactPoint2, id: VertexId) -> u32 {
        self.verts.push(Vert { pos, id });
        (self.verts.len() - 1) as u32
    }

    fn locate(&self, pos: &ExactPoint2) -> Location {
        let mut cur = self.last.min((self.tris.len() - 1) as u32);
        let mut steps = 0usize;
        'walk: loop {
            steps += 1;
            if steps > 2 * self.tris.len() + 8 {
                return self.locate_linear(pos);
            }
            let t = self.tris[cur as usize];
            let mut zeros = [false; 3];
            for k in 0..3 {
                let a = t.v[(k + 1) % 3];
                let b = t.v[(k + 2) % 3];
                match orient2d_exact(self.pos(a), self.pos(b), pos) {
                    Sign::Negative => {
                        if t.nbr[k] == NONE {
                            // Outside the hull; only reachable on walk
                            // confusion, fall back to scanning.
                            return self.locate_linear(pos);
                        }
                        cur = t.nbr[k];
                        continue 'walk;
                    }
                    Sign::Zero => zeros[k] = true,
                    Sign::Positive => {}
                }
            }
            return Self::classify_hit(cur, &zeros, &t);
        }
    }

    fn locate_linear(&self, pos: &ExactPoint2) -> Location {
        for (ti, t) in self.tris.iter().enumerate() {
            let mut zeros = [false; 3];
            let mut outside = false;
            for k in 0..3 {
                let a = t.v[(k + 1) % 3];
                let b = t.v[(k + 2) % 3];
                match orient2d_exact(self.pos(a), self.pos(b), pos) {
                    Sign::Negative => {
                        outside = true;
                        break;
                    }
                    Sign::Zero => zeros[k] = true,
                    Sign::Positive => {}
                }
            }
            if !outside {
                return Self::classify_hit(ti as u32, &zeros, t);
            }
        }
        unreachable!("point outside the base triangle");
    }

    fn classify_hit(ti: u32, zeros: &[bool; 3], t: &Tri) -> Location {
        match zeros.iter().filter(|z| **z).count() {
            0 => Location::Interior(ti),
            1 => {
                let k = zeros.iter().position(|z| *z).unwrap_or(0);
                Location::OnEdge(ti, k)
            }
            _ => {
                // On two edge lines at once: the shared corner.
                let k = zeros.iter().position(|z| !*z).unwrap_or(0);
                Location::OnVertex(t.v[k])
            }
        }
    }

    /// Split triangle `t` into three around interior vertex `w`.
    fn split_interior(&mut self, t: u32, w: u32) {
        let Tri { v, nbr } = self.tris[t as usize];
        let [v0, v1, v2] = v;
        let [n0, n1, n2] = nbr;

        let t1 = self.tris.len() as u32;
        let t2 = t1 + 1;
        self.tris[t as usize] = Tri {
            v: [w, v1, v2],
            nbr: [n0, t1, t2],
        };
        self.tris.push(Tri {
            v: [w, v2, v0],
            nbr: [n1, t2, t],
        });
        self.tris.push(Tri {
            v: [w, v0, v1],
            nbr: [n2, t, t1],
        });
        self.redirect(n1, t, t1);
        self.redirect(n2, t, t2);
        self.last = t;

        self.legalize(vec![(t, 0), (t1, 0), (t2, 0)]);
    }

    /// Split the edge opposite `tris[t].v[k]` at vertex `w` on it.
    fn split_edge(&mut self, t: u32, k: usize, w: u32) {
        let tv = self.tris[t as usize];
        let c = tv.v[k];
        let a = tv.v[(k + 1) % 3];
        let b = tv.v[(k + 2) % 3];
        let n_opp_a = tv.nbr[(k + 1) % 3];
        let n_opp_b = tv.nbr[(k + 2) % 3];
        let o = tv.nbr[k];

        let was_constrained = self.unconstrain(a, b);

        let t2 = self.tris.len() as u32;
        // t keeps the (c, a, w) half, t2 takes (c, w, b).
        self.tris[t as usize] = Tri {
            v: [c, a, w],
            nbr: [NONE, t2, n_opp_b],
        };
        self.tris.push(Tri {
            v: [c, w, b],
            nbr: [NONE, n_opp_a, t],
        });
        self.redirect(n_opp_a, t, t2);

        let mut suspects = vec![(t, 2), (t2, 1)];

        if o != NONE {
            let ov = self.tris[o as usize];
            let ko = self.index_of_neighbor(o, t);
            let d = ov.v[ko];
            debug_assert_eq!(ov.v[(ko + 1) % 3], b);
            debug_assert_eq!(ov.v[(ko + 2) % 3], a);
            let on_opp_b = ov.nbr[(ko + 1) % 3];
            let on_opp_a = ov.nbr[(ko + 2) % 3];

            let o2 = self.tris.len() as u32;
            // o keeps (d, b, w), o2 takes (d, w, a).
            self.tris[o as usize] = Tri {
                v: [d, b, w],
                nbr: [t2, o2, on_opp_a],
            };
            self.tris.push(Tri {
                v: [d, w, a],
                nbr: [t, on_opp_b, o],
            });
            self.redirect(on_opp_b, o, o2);

            self.tris[t as usize].nbr[0] = o2;
            self.tris[t2 as usize].nbr[0] = o;

            suspects.push((o, 2));
            suspects.push((o2, 1));
        }

        if was_constrained {
            self.constrain(a, w);
            self.constrain(w, b);
        }
        self.last = t;

        self.legalize(suspects);
    }

    fn redirect(&mut self, tri: u32, from: u32, to: u32) {
        if tri == NONE {
            return;
        }
        for k in 0..3 {
            if self.tris[tri as usize].nbr[k] == from {
                self.tris[tri as usize].nbr[k] = to;
                return;
            }
        }
    }

    fn index_of_neighbor(&self, tri: u32, neighbor: u32) -> usize {
        for k in 0..3 {
            if self.tris[tri as usize].nbr[k] == neighbor {
                return k;
            }
        }
        unreachable!("triangles are not neighbors");
    }

    fn canon(a: u32, b: u32) -> (u32, u32) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn is_constrained(&self, a: u32, b: u32) -> bool {
        self.constraints.contains(&Self::canon(a, b))
    }

    fn constrain(&mut self, a: u32, b: u32) {
        self.constraints.insert(Self::canon(a, b));
    }

    fn unconstrain(&mut self, a: u32, b: u32) -> bool {
        self.constraints.remove(&Self::canon(a, b))
    }

    /// Lawson flips until every queued edge satisfies the Delaunay condition
    /// or is constrained.
    fn legalize(&mut self, mut stack: Vec<(u32, usize)>) {
        while let Some((t, k)) = stack.pop() {
            let tv = self.tris[t as usize];
            let o = tv.nbr[k];
            if o == NONE {
                continue;
            }
            let a = tv.v[(k + 1) % 3];
            let b = tv.v[(k + 2) % 3];
            if self.is_constrained(a, b) {
                continue;
            }
            let ko = self.index_of_neighbor(o, t);
            let d = self.tris[o as usize].v[ko];
            if incircle_exact(
                self.pos(tv.v[0]),
                self.pos(tv.v[1]),
                self.pos(tv.v[2]),
                self.pos(d),
            ) != Sign::Positive
            {
                continue;
            }
            self.flip(t, k);
            for s in 0..3 {
                stack.push((t, s));
                stack.push((o, s));
            }
        }
    }

    /// Replace the shared edge of `t` and its neighbor across edge `k` with
    /// the opposite diagonal. Requires the surrounding quad to be strictly
    /// convex.
    fn flip(&mut self, t: u32, k: usize) {
        let tv = self.tris[t as usize];
        let p = tv.v[k];
        let a = tv.v[(k + 1) % 3];
        let b = tv.v[(k + 2) % 3];
        let n_opp_a = tv.nbr[(k + 1) % 3];
        let n_opp_b = tv.nbr[(k + 2) % 3];
        let o = tv.nbr[k];
        let ko = self.index_of_neighbor(o, t);
        let ov = self.tris[o as usize];
        let d = ov.v[ko];
        debug_assert_eq!(ov.v[(ko + 1) % 3], b);
        debug_assert_eq!(ov.v[(ko + 2) % 3], a);
        let on_opp_b = ov.nbr[(ko + 1) % 3];
        let on_opp_a = ov.nbr[(ko + 2) % 3];

        self.tris[t as usize] = Tri {
            v: [p, a, d],
            nbr: [on_opp_b, o, n_opp_b],
        };
        self.tris[o as usize] = Tri {
            v: [p, d, b],
            nbr: [on_opp_a, n_opp_a, t],
        };
        self.redirect(on_opp_b, o, t);
        self.redirect(n_opp_a, t, o);
    }

    fn flip_is_valid(&self, t: u32, k: usize) -> bool {
        let tv = self.tris[t as usize];
        let p = tv.v[k];
        let a = tv.v[(k + 1) % 3];
        let b = tv.v[(k + 2) % 3];
        let o = tv.nbr[k];
        let ko = self.index_of_neighbor(o, t);
        let d = self.tris[o as usize].v[ko];
        orient2d_exact(self.pos(p), self.pos(a), self.pos(d)) == Sign::Positive
            && orient2d_exact(self.pos(p), self.pos(d), self.pos(b)) == Sign::Positive
    }

    fn edge_exists(&self, a: u32, b: u32) -> bool {
        self.tris
            .iter()
            .any(|t| t.v.contains(&a) && t.v.contains(&b))
    }

    /// Enforce the edge between two inserted vertices, flipping away any
    /// unconstrained crossings. Fails when the segment properly crosses an
    /// existing constraint.
    pub fn insert_constraint(
        &mut self,
        vi: VertexHandle,
        vj: VertexHandle,
    ) -> Result<(), ConstraintCrossing> {
        let mut start = vi.0;
        let target = vj.0;
        if start == target {
            return Ok(());
        }

        let mut flipped = Vec::new();
        while start != target {
            let reached = self.resolve_subsegment(start, target, &mut flipped)?;
            self.constrain(start, reached);
            start = reached;
        }

        // Restore the Delaunay condition around everything the constraint
        // rewired.
        let mut seeds = Vec::new();
        for t in flipped {
            if (t as usize) < self.tris.len() {
                for s in 0..3 {
                    seeds.push((t, s));
                }
            }
        }
        self.legalize(seeds);
        Ok(())
    }

    /// Clear the way from `a` toward `b`, stopping at the first vertex on
    /// the segment. Returns the vertex the cleared edge ends at.
    fn resolve_subsegment(
        &mut self,
        a: u32,
        b: u32,
        flipped: &mut Vec<u32>,
    ) -> Result<u32, ConstraintCrossing> {
        let mut end = b;
        loop {
            match self.first_obstruction(a, end)? {
                Obstruction::Exists => return Ok(end),
                Obstruction::VertexOnSegment(w) => {
                    end = w;
                }
                Obstruction::Crossings(crossings) => {
                    let mut did_flip = false;
                    for (t, k) in crossings {
                        if self.flip_is_valid(t, k) {
                            let o = self.tris[t as usize].nbr[k];
                            self.flip(t, k);
                            flipped.push(t);
                            flipped.push(o);
                            did_flip = true;
                            break;
                        }
                    }
                    assert!(did_flip, "no flippable edge crossing the constraint");
                }
            }
        }
    }

    /// Walk the open segment `a -> b` and report what blocks it.
    fn first_obstruction(&self, a: u32, b: u32) -> Result<Obstruction, ConstraintCrossing> {
        if self.edge_exists(a, b) {
            return Ok(Obstruction::Exists);
        }

        let pa = self.pos(a).clone();
        let pb = self.pos(b).clone();

        // Find the triangle at `a` whose opposite edge the segment leaves
        // through, or a vertex sitting exactly on the segment.
        let mut cur = NONE;
        let mut cross = (0u32, 0u32);
        let mut cross_edge = (NONE, 0usize);
        for (ti, t) in self.tris.iter().enumerate() {
            let Some(kv) = t.v.iter().position(|&v| v == a) else {
                continue;
            };
            let x = t.v[(kv + 1) % 3];
            let y = t.v[(kv + 2) % 3];
            let ox = orient2d_exact(&pa, &pb, self.pos(x));
            let oy = orient2d_exact(&pa, &pb, self.pos(y));
            if ox == Sign::Zero && self.strictly_between(&pa, self.pos(x), &pb) {
                return Ok(Obstruction::VertexOnSegment(x));
            }
            if oy == Sign::Zero && self.strictly_between(&pa, self.pos(y), &pb) {
                return Ok(Obstruction::VertexOnSegment(y));
            }
            if ox == Sign::Negative && oy == Sign::Positive {
                cur = ti as u32;
                cross = (x, y);
                cross_edge = (ti as u32, kv);
            }
        }
        assert!(cur != NONE, "constraint walk found no starting triangle");

        let mut crossings = vec![cross_edge];
        loop {
            let (x, y) = cross;
            if self.is_constrained(x, y) {
                return Err(ConstraintCrossing);
            }
            let (t, k) = cross_edge;
            let o = self.tris[t as usize].nbr[k];
            assert!(o != NONE, "constraint walk left the hull");
            let ko = self.index_of_neighbor(o, t);
            let w = self.tris[o as usize].v[ko];
            if w == b {
                return Ok(Obstruction::Crossings(crossings));
            }
            match orient2d_exact(&pa, &pb, self.pos(w)) {
                Sign::Zero => return Ok(Obstruction::VertexOnSegment(w)),
                Sign::Negative => {
                    // w on the right: segment now crosses (w, y), the edge
                    // of o opposite its vertex x.
                    cross = (w, y);
                    cross_edge = (o, (ko + 2) % 3);
                }
                Sign::Positive => {
                    cross = (x, w);
                    cross_edge = (o, (ko + 1) % 3);
                }
            }
            crossings.push(cross_edge);
        }
    }

    fn strictly_between(&self, a: &ExactPoint2, w: &ExactPoint2, b: &ExactPoint2) -> bool {
        let axis = usize::from(a[0] == b[0]);
        let (lo, hi) = if a[axis] <= b[axis] {
            (&a[axis], &b[axis])
        } else {
            (&b[axis], &a[axis])
        };
        lo < &w[axis] && &w[axis] < hi
    }

    /// Emit every triangle as pool-id triples, oriented like the base face.
    pub fn get_faces(&self, out: &mut Vec<[VertexId; 3]>) {
        for t in &self.tris {
            out.push([
                self.verts[t.v[0] as usize].id,
                self.verts[t.v[1] as usize].id,
                self.verts[t.v[2] as usize].id,
            ]);
        }
    }

    /// Number of triangles.
    pub fn num_faces(&self) -> usize {
        self.tris.len()
    }
}
