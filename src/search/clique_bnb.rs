use std::time::Instant;

use bit_set::BitSet;

use crate::graph::{Graph, VertexId};

/** runs a simple optimized greedy algorithm to compute a clique on the
active subgraph. repeatedly takes the candidate with the largest
candidate-restricted degree and drops every non-neighbor. */
pub fn greedy_clique(graph: &Graph) -> Vec<VertexId> {
    let mut res = Vec::new();
    let mut candidates = graph.active_bits().clone();
    let mut nb_candidates = candidates.len();
    let mut candidate_degrees: Vec<usize> = (0..graph.nb_total_vertices())
        .map(|u| graph.degree_of(u))
        .collect();
    while nb_candidates > 0 {
        let current = candidates.iter().max_by_key(|u| candidate_degrees[*u]).unwrap();
        res.push(current);
        candidates.remove(current);
        nb_candidates -= 1;
        // update candidates and candidate degrees
        for u in candidates.iter().collect::<Vec<VertexId>>() {
            if !graph.adj_bits()[current].contains(u) { // remove u from the candidate list
                candidates.remove(u);
                nb_candidates -= 1;
                for v in graph.adj_bits()[u].iter() {
                    candidate_degrees[v] -= 1;
                }
            } else {
                candidate_degrees[u] -= 1;
            }
        }
    }
    res
}

/** branch-and-bound maximum-clique on the active subgraph.

pivot rule: take p in candidates maximizing |adj(p) ∩ candidates| (ties by
lowest id) and branch only on candidates \ adj(p); each branch vertex v
recurses on candidates ∩ adj(v). subtrees that cannot beat the incumbent
(|clique| + |candidates| ≤ best) are cut. an optional deadline truncates the
search; the returned size is the largest clique actually found, so it never
exceeds the true maximum. an empty active set yields 0.
*/
pub fn max_clique_size(graph: &Graph, deadline: Option<Instant>) -> usize {
    if graph.nb_active_vertices() == 0 { return 0; }
    let mut bnb = Bnb {
        adj: graph.adj_bits(),
        best: greedy_clique(graph).len(),
        deadline,
        expired: false,
        nodes: 0,
    };
    let candidates = graph.active_bits().clone();
    bnb.expand(0, &candidates);
    bnb.best
}

/// deadline poll period, in explored nodes
const POLL_PERIOD: u64 = 4096;

struct Bnb<'a> {
    adj: &'a [BitSet],
    best: usize,
    deadline: Option<Instant>,
    expired: bool,
    nodes: u64,
}

impl<'a> Bnb<'a> {
    fn expand(&mut self, clique_size: usize, candidates: &BitSet) {
        if self.expired { return; }
        self.nodes += 1;
        if self.nodes % POLL_PERIOD == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.expired = true;
                    return;
                }
            }
        }
        let nb_candidates = candidates.len();
        if nb_candidates == 0 {
            if clique_size > self.best { self.best = clique_size; }
            return;
        }
        if clique_size + nb_candidates <= self.best { return; }
        // pivot: candidate with the most candidate neighbors, lowest id on ties
        let mut pivot = usize::MAX;
        let mut pivot_links = 0;
        for p in candidates.iter() {
            let mut links = self.adj[p].clone();
            links.intersect_with(candidates);
            let nb_links = links.len();
            if pivot == usize::MAX || nb_links > pivot_links {
                pivot = p;
                pivot_links = nb_links;
            }
        }
        // branch on the candidates the pivot does not dominate
        let mut branches = candidates.clone();
        branches.difference_with(&self.adj[pivot]);
        let mut remaining = candidates.clone();
        for v in branches.iter().collect::<Vec<VertexId>>() {
            let mut next = remaining.clone();
            next.intersect_with(&self.adj[v]);
            self.expand(clique_size + 1, &next);
            if self.expired { return; }
            remaining.remove(v);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let g = Graph::from_edges(0, &[]);
        assert_eq!(max_clique_size(&g, None), 0);
    }

    #[test]
    fn test_edgeless() {
        let g = Graph::from_edges(4, &[]);
        assert_eq!(max_clique_size(&g, None), 1);
    }

    #[test]
    fn test_triangle_plus_tail() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4)]);
        assert_eq!(max_clique_size(&g, None), 3);
    }

    #[test]
    fn test_c5() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        assert_eq!(max_clique_size(&g, None), 2);
    }

    #[test]
    fn test_k4_inside_noise() {
        let mut edges = vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        edges.extend_from_slice(&[(3, 4), (4, 5), (5, 6)]);
        let g = Graph::from_edges(7, &edges);
        assert_eq!(max_clique_size(&g, None), 4);
    }

    #[test]
    fn test_greedy_is_a_clique() {
        let g = crate::util::random_gnp(40, 0.4, 77);
        let clique = greedy_clique(&g);
        for (i, &u) in clique.iter().enumerate() {
            for &v in clique.iter().skip(i + 1) {
                assert!(g.are_adjacent(u, v).unwrap());
            }
        }
    }

    #[test]
    fn test_bnb_at_least_greedy() {
        let g = crate::util::random_gnp(35, 0.5, 99);
        assert!(max_clique_size(&g, None) >= greedy_clique(&g).len());
    }

    #[test]
    fn test_truncated_search_keeps_a_valid_bound() {
        use std::time::Duration;
        let g = crate::util::random_gnp(50, 0.6, 13);
        let expired = Instant::now() - Duration::from_millis(1);
        let truncated = max_clique_size(&g, Some(expired));
        // the truncated bound is at least the greedy incumbent and never
        // exceeds the exhaustive search
        assert!(truncated >= greedy_clique(&g).len());
        assert!(truncated <= max_clique_size(&g, None));
    }

    #[test]
    fn test_respects_removed_vertices() {
        let mut g = Graph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        g.remove_vertex(1).unwrap();
        assert_eq!(max_clique_size(&g, None), 2);
    }
}
