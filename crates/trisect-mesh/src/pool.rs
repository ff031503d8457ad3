//! The deduplicating store of exact 3D points.

use std::collections::HashMap;

use trisect_math::exact::ExactPoint3;
use trisect_math::lazy::LazyPoint3;

use crate::soup::VertexId;

/// Append-only store of lazy-exact points with optional deduplication.
///
/// While the uniqueness check is on, [`PointPool::insert`] returns the id of
/// an exactly-equal existing point instead of appending. The check is turned
/// off once both input soups are loaded; constructed intersection points pass
/// through an inserter that has already deduplicated them, so later inserts
/// bypass the index. Ids are stable dense indices either way.
#[derive(Debug, Default)]
pub struct PointPool {
    points: Vec<LazyPoint3>,
    index: Option<HashMap<ExactPoint3, VertexId>>,
}

impl PointPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the uniqueness check, indexing any points already present.
    pub fn start_uniqueness_check(&mut self) {
        let mut index = HashMap::with_capacity(self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            index.entry(p.exact().clone()).or_insert(VertexId(i as u32));
        }
        self.index = Some(index);
    }

    /// Disable the uniqueness check and drop its index.
    pub fn stop_uniqueness_check(&mut self) {
        self.index = None;
    }

    /// Insert a point, returning an existing id when the check is on and an
    /// exactly-equal point is present.
    pub fn insert(&mut self, p: LazyPoint3) -> VertexId {
        let next = VertexId(self.points.len() as u32);
        if let Some(index) = &mut self.index {
            match index.entry(p.exact().clone()) {
                std::collections::hash_map::Entry::Occupied(e) => return *e.get(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    e.insert(next);
                }
            }
        }
        self.points.push(p);
        next
    }

    /// Point by id.
    #[inline]
    pub fn at(&self, id: VertexId) -> &LazyPoint3 {
        &self.points[id.index()]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reserve capacity for additional points.
    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    /// A slice of a contiguous id range, used to force exact coordinates of
    /// newly constructed points in parallel.
    pub fn range(&self, start: usize) -> &[LazyPoint3] {
        &self.points[start..]
    }

    /// Hand the points over to the output mesh.
    pub fn take_points(self) -> Vec<LazyPoint3> {
        self.points
    }
}
