use crate::error::Result;
use crate::graph::{Graph, VertexId};
use crate::search::clique_bnb::max_clique_size;

/// active-set size up to which the clique bound is worth computing
const CLIQUE_BOUND_LIMIT: usize = 512;

/** removes every active vertex of degree strictly below `bound`, in bulk
passes, until none remains.

with `bound` a lower bound on the number of colors the final coloring will
use, such a vertex can always be recolored afterwards: its neighbors occupy
fewer colors than are available. removals cascade (peeling a vertex lowers
its neighbors' degrees), hence the repeated passes. returns the removed
vertices in removal order; callers that need a full-graph coloring keep the
list and finalize greedily.
*/
pub fn reduce(graph: &mut Graph, bound: usize) -> Result<Vec<VertexId>> {
    let mut removed = Vec::new();
    loop {
        let batch: Vec<VertexId> = graph
            .active_vertices()
            .into_iter()
            .filter(|&v| graph.degree_of(v) < bound)
            .collect();
        if batch.is_empty() {
            break;
        }
        for v in batch {
            graph.remove_vertex(v)?;
            removed.push(v);
        }
    }
    Ok(removed)
}

/** peels the graph under an automatically chosen chromatic lower bound:
the branch-and-bound clique size on small active sets, the number of colors
of the current coloring on large ones (where the clique search would cost
more than the peeling saves). */
pub fn apply_reduction(graph: &mut Graph) -> Result<Vec<VertexId>> {
    let bound = if graph.nb_active_vertices() <= CLIQUE_BOUND_LIMIT {
        max_clique_size(graph, None)
    } else {
        graph.used_color_count()
    };
    reduce(graph, bound)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_collapses() {
        // a star has clique number 2: the leaves go, then the isolated center
        let mut g = Graph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let removed = reduce(&mut g, 2).unwrap();
        assert_eq!(removed.len(), 5);
        assert_eq!(g.nb_active_vertices(), 0);
        g.check_consistency();
    }

    #[test]
    fn test_cycle_survives_pendant_goes() {
        // C5 plus a pendant: clique bound 2 peels the pendant only
        let mut g = Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 5)]);
        let removed = apply_reduction(&mut g).unwrap();
        assert_eq!(removed, vec![5]);
        assert_eq!(g.nb_active_vertices(), 5);
        for v in 0..5 {
            assert!(g.degree(v).unwrap() >= 2);
        }
        g.check_consistency();
    }

    #[test]
    fn test_cascade_empties_the_triangle() {
        // bound 3 exceeds every degree of a lone triangle: everything peels
        let mut g = Graph::from_edges(5, &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4)]);
        let removed = reduce(&mut g, 3).unwrap();
        assert_eq!(removed.len(), 5);
        assert_eq!(g.nb_active_vertices(), 0);
        g.check_consistency();
    }

    #[test]
    fn test_soundness_invariant() {
        let mut g = crate::util::random_gnp(60, 0.15, 500);
        let bound = max_clique_size(&g, None);
        reduce(&mut g, bound).unwrap();
        for v in g.active_vertices() {
            assert!(g.degree(v).unwrap() >= bound);
        }
        g.check_consistency();
    }

    #[test]
    fn test_zero_bound_removes_nothing() {
        let mut g = crate::util::random_gnp(20, 0.2, 7);
        let before = g.nb_active_vertices();
        let removed = reduce(&mut g, 0).unwrap();
        assert!(removed.is_empty());
        assert_eq!(g.nb_active_vertices(), before);
    }
}
