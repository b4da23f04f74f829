use rand::Rng;
use tracing::debug;

use super::{Edge, MapMaker};
use crate::{error::MapError, map::disjoint_set::DisjointSet};

pub trait Kruskal {
    fn kruskal(&mut self) -> Result<Vec<Edge>, MapError>;
}

impl<R: Rng> Kruskal for MapMaker<R> {
    fn kruskal(&mut self) -> Result<Vec<Edge>, MapError> {
        let edges = self.edges();
        let mut components = DisjointSet::new(self.adjacency.keys().copied());
        let target = components.len() - 1;

        spanning_tree(edges, &mut components, target, &mut self.rng)
    }
}

/// Randomized Kruskal: draws edges uniformly from the remaining pool and keeps
/// those that join two components, until `target` edges are kept.
pub fn spanning_tree<R: Rng>(
    mut pool: Vec<Edge>,
    components: &mut DisjointSet,
    target: usize,
    rng: &mut R,
) -> Result<Vec<Edge>, MapError> {
    let mut tree = Vec::with_capacity(target);
    let mut rejected = 0usize;

    while tree.len() < target {
        if pool.is_empty() {
            return Err(MapError::DisconnectedGraph {
                accepted: tree.len(),
                target,
            });
        }

        let i = rng.random_range(0..pool.len());
        let edge = pool.swap_remove(i);

        if components.union(edge.a, edge.b)? {
            tree.push(edge);
        } else {
            rejected += 1;
        }
    }

    debug!(
        accepted = tree.len(),
        rejected,
        unconsidered = pool.len(),
        "spanning tree selected"
    );

    Ok(tree)
}
