use std::cmp::{max, Ord, Ordering};

use bit_set::BitSet;
use priority_queue::PriorityQueue;

use crate::graph::{Graph, VertexId};

#[derive(PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize,
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** greedy DSATUR coloring, the cheap alternative to the RLF construction
on very large instances.
    1. choose an uncolored vertex that sees the most colors (break ties by
       the largest degree)
    2. give it the first color its neighborhood misses
    3. mark all its neighbors seeing this color
    4. repeat until every active vertex is colored

colors are consecutive from 0; returns their number and updates the graph's
color cache.
*/
pub fn dsatur_coloring(graph: &mut Graph) -> usize {
    let mut remaining: PriorityQueue<VertexId, DSatInfo> = PriorityQueue::new();
    for v in graph.active_vertices() {
        remaining.push(v, DSatInfo { dsat: 0, degree: graph.degree_of(v) });
    }
    // adj_colors[v]: colors v sees
    let mut adj_colors: Vec<BitSet> = vec![BitSet::default(); graph.nb_total_vertices()];
    let mut assigned: Vec<(VertexId, usize)> = Vec::with_capacity(graph.nb_active_vertices());
    let mut nb_colors = 0;
    {
        let adj = graph.adj_bits();
        while let Some((v, _)) = remaining.pop() {
            // first color not seen by v
            let mut color = 0;
            while adj_colors[v].contains(color) { color += 1; }
            assigned.push((v, color));
            nb_colors = max(nb_colors, color + 1);
            // update saturation degree information
            for u in adj[v].iter() {
                if !adj_colors[u].contains(color) {
                    adj_colors[u].insert(color);
                    remaining.change_priority_by(&u, |p| { p.dsat += 1; });
                }
            }
        }
    }
    for (v, c) in assigned {
        graph.set_color_raw(v, Some(c));
    }
    graph.set_nb_colors(nb_colors);
    nb_colors
}
