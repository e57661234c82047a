use std::cmp::Ordering;

use bit_set::BitSet;
use priority_queue::PriorityQueue;

use crate::graph::{Graph, VertexId};

/// trial ratio used by [`apply_construction`]
pub const DEFAULT_TRIAL_RATIO: f64 = 0.1;

/// ranking of a seed candidate: largest residual degree first, lowest id on ties
#[derive(PartialEq, Eq)]
struct DegPriority {
    deg: usize,
    vertex: VertexId,
}

impl Ord for DegPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deg.cmp(&other.deg)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DegPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** scratch state of one class construction.

`u`: still colorable with the current class; `w`: forbidden for it (a
neighbor already joined); `class`: the members so far. `deg_u[v]` and
`deg_w[v]` count the neighbors of v inside `u` and `w`. cloned once per
look-ahead trial.
*/
#[derive(Debug, Clone)]
struct RlfState {
    u: BitSet,
    w: BitSet,
    class: Vec<VertexId>,
    deg_u: Vec<usize>,
    deg_w: Vec<usize>,
}

impl RlfState {
    fn initial(graph: &Graph) -> Self {
        let n = graph.nb_total_vertices();
        let u = graph.active_bits().clone();
        let deg_u = (0..n).map(|v| graph.degree_of(v)).collect();
        Self { u, w: BitSet::with_capacity(n), class: Vec::new(), deg_u, deg_w: vec![0; n] }
    }

    /// v leaves `u`: every neighbor loses one u-neighbor
    fn leave_u(&mut self, adj: &[BitSet], v: VertexId) {
        self.u.remove(v);
        for x in adj[v].iter() {
            self.deg_u[x] -= 1;
        }
    }

    /// moves a u-vertex into the forbidden set
    fn move_to_w(&mut self, adj: &[BitSet], v: VertexId) {
        self.leave_u(adj, v);
        self.w.insert(v);
        for x in adj[v].iter() {
            self.deg_w[x] += 1;
        }
    }

    /// adds v to the class; its u-neighbors become forbidden
    fn move_to_class(&mut self, adj: &[BitSet], v: VertexId) {
        self.leave_u(adj, v);
        self.class.push(v);
        let neighbors: Vec<VertexId> = adj[v].iter().collect();
        for nb in neighbors {
            if self.u.contains(nb) {
                self.move_to_w(adj, nb);
            }
        }
    }

    /** grows a class from `seed` until `u` is exhausted: always the u-vertex
    with the most forbidden neighbors (it blocks the fewest later additions),
    then the fewest u-neighbors, then the lowest id. */
    fn grow_class(&mut self, adj: &[BitSet], seed: VertexId) {
        self.move_to_class(adj, seed);
        loop {
            let mut best: Option<VertexId> = None;
            for v in self.u.iter() {
                best = match best {
                    None => Some(v),
                    Some(b) => {
                        let better = self.deg_w[v] > self.deg_w[b]
                            || (self.deg_w[v] == self.deg_w[b] && self.deg_u[v] < self.deg_u[b]);
                        if better { Some(v) } else { Some(b) }
                    }
                };
            }
            match best {
                None => break,
                Some(v) => self.move_to_class(adj, v),
            }
        }
    }

    /// twice the number of edges left between uncolored vertices
    fn residual_score(&self) -> usize {
        self.w.iter().map(|v| self.deg_w[v]).sum()
    }

    /// state for the next class: the survivors are the forbidden vertices
    fn advance(self) -> Self {
        let n = self.deg_u.len();
        Self {
            u: self.w,
            w: BitSet::with_capacity(n),
            class: Vec::new(),
            deg_u: self.deg_w,
            deg_w: vec![0; n],
        }
    }
}

/// runs [`rlf_coloring`] with the default trial ratio
pub fn apply_construction(graph: &mut Graph) -> usize {
    rlf_coloring(graph, DEFAULT_TRIAL_RATIO)
}

/** RLF constructive coloring with an M-trial look-ahead.

builds color classes one at a time. for each class, the top
`M = max(1, ⌊trial_ratio·n⌋)` uncolored vertices by residual degree seed one
trial each; a trial grows a maximal class and is scored by the edges it
leaves between uncolored vertices. the best trial (lowest score, earliest on
ties) is committed with the next color id. classes never contain two
neighbors, so the coloring is proper; color ids are consecutive from 0.

returns the number of colors used and updates the graph's color cache.
*/
pub fn rlf_coloring(graph: &mut Graph, trial_ratio: f64) -> usize {
    assert!(trial_ratio > 0. && trial_ratio <= 1., "rlf: trial ratio must be in (0,1]");
    let n = graph.nb_total_vertices();
    let nb_trials = std::cmp::max(1, (trial_ratio * n as f64).floor() as usize);
    let mut coloring: Vec<(VertexId, usize)> = Vec::with_capacity(graph.nb_active_vertices());
    let mut nb_colors = 0;
    {
        let adj = graph.adj_bits();
        let mut state = RlfState::initial(graph);
        while !state.u.is_empty() {
            let mut seeds = PriorityQueue::new();
            for v in state.u.iter() {
                seeds.push(v, DegPriority { deg: state.deg_u[v], vertex: v });
            }
            let mut best_trial: Option<RlfState> = None;
            let mut best_score = usize::MAX;
            for _ in 0..nb_trials {
                match seeds.pop() {
                    None => break,
                    Some((seed, _)) => {
                        let mut trial = state.clone();
                        trial.grow_class(adj, seed);
                        let score = trial.residual_score();
                        if score < best_score || best_trial.is_none() {
                            best_score = score;
                            best_trial = Some(trial);
                        }
                    }
                }
            }
            let committed = best_trial.expect("rlf: uncolored vertices but no trial");
            for &v in &committed.class {
                coloring.push((v, nb_colors));
            }
            nb_colors += 1;
            state = committed.advance();
        }
    }
    for (v, c) in coloring {
        graph.set_color_raw(v, Some(c));
    }
    graph.set_nb_colors(nb_colors);
    nb_colors
}
