use crate::graph::VertexId;
use crate::sparse_set::SparseSet;

/** conflict-tracking coloring state for a fixed number of colors `k`.

`adj_counts` is one contiguous array indexed by `v·k + c` holding the number
of neighbors of v colored c, so a move evaluation is a single lookup and a
transposition between vertices is a no-op. `conflicting` lists exactly the
vertices whose current color is also on a neighbor. built from a squashed
coloring at each k-decrement attempt and discarded when the attempt
resolves.
*/
#[derive(Debug)]
pub struct ConflictState<'a> {
    /// adjacency[v]: sorted neighbors of v (borrowed, read-only)
    adj: &'a [Vec<VertexId>],
    /// vertices taking part in the search
    active: Vec<VertexId>,
    /// candidate number of colors
    k: usize,
    /// colors[v]: color of the vertex v, in [0,k)
    colors: Vec<usize>,
    /// adj_counts[v*k+c]: number of neighbors of v that are assigned color c
    adj_counts: Vec<u32>,
    /// vertices that have some conflict
    conflicting: SparseSet,
    /// number of conflicting edges
    nb_conflicting_edges: i64,
}

impl<'a> ConflictState<'a> {

    /** builds the state by scanning each vertex's neighbors once.
    every color in `colors` must be below `k`. */
    pub fn new(adj: &'a [Vec<VertexId>], active: Vec<VertexId>, colors: Vec<usize>, k: usize) -> Self {
        let n = adj.len();
        let mut adj_counts = vec![0u32; n * k];
        for &v in &active {
            debug_assert!(colors[v] < k);
            for &u in &adj[v] {
                adj_counts[v * k + colors[u]] += 1;
            }
        }
        let mut conflicting = SparseSet::new(n);
        let mut half_sum: i64 = 0;
        for &v in &active {
            let count = adj_counts[v * k + colors[v]];
            if count > 0 {
                conflicting.insert(v);
                half_sum += i64::from(count);
            }
        }
        Self {
            adj,
            active,
            k,
            colors,
            adj_counts,
            conflicting,
            nb_conflicting_edges: half_sum / 2,
        }
    }

    /// candidate number of colors
    pub fn k(&self) -> usize { self.k }

    /// size of the vertex universe
    pub fn nb_vertices(&self) -> usize { self.adj.len() }

    /// vertices taking part in the search
    pub fn active(&self) -> &[VertexId] { &self.active }

    /// current color of v
    pub fn color_of(&self, v: VertexId) -> usize { self.colors[v] }

    /// full color array (indexed by vertex)
    pub fn colors(&self) -> &[usize] { &self.colors }

    /// number of neighbors of v currently colored c
    pub fn count(&self, v: VertexId, c: usize) -> u32 {
        self.adj_counts[v * self.k + c]
    }

    /// number of conflicting edges
    pub fn nb_conflicting_edges(&self) -> i64 { self.nb_conflicting_edges }

    /// number of conflicting vertices
    pub fn nb_conflicting_vertices(&self) -> usize { self.conflicting.len() }

    /// i-th conflicting vertex in packed order
    pub fn conflicting_nth(&self, i: usize) -> VertexId { self.conflicting.nth(i) }

    /** recolors u, updating the conflict bookkeeping in O(deg(u)). */
    pub fn update_color(&mut self, u: VertexId, new_color: usize) {
        let old_color = self.colors[u];
        debug_assert!(new_color < self.k && new_color != old_color);
        let row = u * self.k;
        self.nb_conflicting_edges +=
            i64::from(self.adj_counts[row + new_color]) - i64::from(self.adj_counts[row + old_color]);
        self.colors[u] = new_color;
        if self.adj_counts[row + new_color] > 0 {
            self.conflicting.insert(u);
        } else {
            self.conflicting.remove(u);
        }
        for &v in &self.adj[u] {
            let v_row = v * self.k;
            self.adj_counts[v_row + old_color] -= 1;
            if self.colors[v] == old_color && self.adj_counts[v_row + old_color] == 0 {
                self.conflicting.remove(v); // its last conflict left with u
            }
            self.adj_counts[v_row + new_color] += 1;
            if self.colors[v] == new_color {
                self.conflicting.insert(v);
            }
        }
    }

    /** recomputes every derived quantity brute-force and asserts it matches
    the incremental bookkeeping. test support. */
    pub fn check_consistency(&self) {
        let mut nb_conflicts: i64 = 0;
        for &v in &self.active {
            for c in 0..self.k {
                let count = self.adj[v].iter().filter(|&&u| self.colors[u] == c).count();
                assert_eq!(
                    self.adj_counts[v * self.k + c] as usize, count,
                    "adj_counts[{},{}]", v, c
                );
            }
            let own = self.adj_counts[v * self.k + self.colors[v]];
            assert_eq!(
                self.conflicting.contains(v), own > 0,
                "conflict membership of {}", v
            );
            nb_conflicts += i64::from(own);
        }
        assert_eq!(self.nb_conflicting_edges, nb_conflicts / 2, "conflicting edge count");
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::rng::Xorshift64Star;

    fn triangle_state(adj: &[Vec<VertexId>]) -> ConflictState {
        // all three vertices share color 0 out of k=2
        ConflictState::new(adj, vec![0, 1, 2], vec![0, 0, 0], 2)
    }

    #[test]
    fn test_initial_counts() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let adj = g.compact_adjacency();
        let state = triangle_state(&adj);
        assert_eq!(state.nb_conflicting_edges(), 3);
        assert_eq!(state.nb_conflicting_vertices(), 3);
        assert_eq!(state.count(0, 0), 2);
        assert_eq!(state.count(0, 1), 0);
        state.check_consistency();
    }

    #[test]
    fn test_update_color() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let adj = g.compact_adjacency();
        let mut state = triangle_state(&adj);
        state.update_color(1, 1);
        state.check_consistency();
        assert_eq!(state.nb_conflicting_edges(), 1);
        assert_eq!(state.nb_conflicting_vertices(), 2);
        // vertex 1 now conflict-free
        assert_eq!(state.color_of(1), 1);
        assert_eq!(state.count(1, 1), 0);
    }

    #[test]
    fn test_conflict_free_start() {
        let g = Graph::from_edges(2, &[(0, 1)]);
        let adj = g.compact_adjacency();
        let state = ConflictState::new(&adj, vec![0, 1], vec![0, 1], 2);
        assert_eq!(state.nb_conflicting_edges(), 0);
        assert_eq!(state.nb_conflicting_vertices(), 0);
        state.check_consistency();
    }

    #[test]
    fn test_random_walk_consistency() {
        let g = crate::util::random_gnp(30, 0.3, 4242);
        let adj = g.compact_adjacency();
        let active = g.active_vertices();
        let k = 4;
        let mut rng = Xorshift64Star::new(17);
        let colors: Vec<usize> = (0..30).map(|_| rng.usize_below(k)).collect();
        let mut state = ConflictState::new(&adj, active.clone(), colors, k);
        state.check_consistency();
        for _ in 0..200 {
            let v = active[rng.usize_below(active.len())];
            let mut c = rng.usize_below(k - 1);
            if c >= state.color_of(v) { c += 1; }
            state.update_color(v, c);
        }
        state.check_consistency();
    }

    #[test]
    fn test_inactive_vertices_ignored() {
        let mut g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        g.remove_vertex(3).unwrap();
        let adj = g.compact_adjacency();
        let state = ConflictState::new(&adj, g.active_vertices(), vec![0, 0, 0, 0], 2);
        assert_eq!(state.nb_conflicting_edges(), 2);
        state.check_consistency();
    }
}
