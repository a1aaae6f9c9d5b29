// src/route_index.rs
//
// Maps a continuous 2D position onto the discrete ordered route.
// The route runs to thousands of waypoints, so nearest-point queries
// go through an R-tree instead of a linear scan.

use crate::types::Point;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("route contains no waypoints")]
pub struct EmptyRouteError;

type IndexedWaypoint = GeomWithData<[f64; 2], usize>;

pub struct RouteIndex {
    tree: RTree<IndexedWaypoint>,
    len: usize,
}

impl RouteIndex {
    /// Build the index for a route. Waypoint indices are fixed by list
    /// position and stay valid until the route is replaced wholesale.
    pub fn new(route: Vec<Point>) -> Result<Self, EmptyRouteError> {
        if route.is_empty() {
            return Err(EmptyRouteError);
        }

        let entries: Vec<IndexedWaypoint> = route
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(entries),
            len: route.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Index of the waypoint nearest to `p`, and the Euclidean distance
    /// to it. Exact-distance ties resolve to the lowest index, so
    /// repeated calls with the same inputs always agree.
    pub fn closest(&self, p: Point) -> (usize, f64) {
        let mut neighbors = self.tree.nearest_neighbor_iter_with_distance_2(&[p.x, p.y]);

        // The tree is built from a non-empty route.
        let (first, best_d2) = neighbors.next().expect("route index is never empty");
        let mut best_idx = first.data;

        // Neighbors arrive in increasing distance order; drain the ones
        // at exactly the same distance and keep the lowest index.
        for (wp, d2) in neighbors {
            if d2 > best_d2 {
                break;
            }
            best_idx = best_idx.min(wp.data);
        }

        (best_idx, best_d2.sqrt())
    }
}
