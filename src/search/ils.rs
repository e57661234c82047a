use std::time::{Duration, Instant};

use crate::graph::{Graph, VertexId};
use crate::rng::Xorshift64Star;
use crate::search::conflicts::ConflictState;
use crate::search::tabu::{tabu_search, TabuParams};

/** iterated local search over decreasing color counts.

starts from the coloring already on the graph (or an identity coloring when
none exists), then repeatedly squashes it one color tighter and asks the
tabu search to repair the conflicts. a solved attempt becomes the new best
and the next attempt targets one color less; a failed attempt (deadline or
exhausted perturbation budget) ends the search. the graph is written only
between attempts, always with a proper coloring, so interrupting the
deadline never leaves it invalid. returns the final number of colors.

the parameter set defaults to [`TabuParams::auto`] on the active subgraph's
size and density.
*/
pub fn stochastic_local_search(
    graph: &mut Graph,
    deadline_millis: u64,
    params: Option<TabuParams>,
    rng: &mut Xorshift64Star,
) -> usize {
    let deadline = Instant::now() + Duration::from_millis(deadline_millis);
    let adj = graph.compact_adjacency();
    let active = graph.active_vertices();
    let n = graph.nb_total_vertices();
    if active.is_empty() {
        graph.set_nb_colors(0);
        return 0;
    }
    // starting point: the graph's coloring, or the identity coloring
    let mut best_colors: Vec<usize> = vec![0; n];
    let mut best_k;
    if active.iter().any(|&v| graph.color_of(v).is_none()) {
        for (i, &v) in active.iter().enumerate() {
            best_colors[v] = i;
        }
        best_k = active.len();
    } else {
        best_k = 0;
        for &v in &active {
            let c = graph.color_of(v).unwrap();
            best_colors[v] = c;
            best_k = std::cmp::max(best_k, c + 1);
        }
    }
    let params = params
        .unwrap_or_else(|| TabuParams::auto(graph.nb_active_vertices(), graph.density()));
    while best_k > 1 && Instant::now() < deadline {
        let target_k = best_k - 1;
        let mut colors = best_colors.clone();
        squash(&adj, &active, &mut colors, target_k, rng);
        let mut state = ConflictState::new(&adj, active.clone(), colors, target_k);
        if tabu_search(&mut state, deadline, &params, rng) {
            for &v in &active {
                best_colors[v] = state.color_of(v);
            }
            best_k = target_k;
        } else {
            break;
        }
    }
    for &v in &active {
        graph.set_color_raw(v, Some(best_colors[v]));
    }
    graph.set_nb_colors(best_k);
    best_k
}

/** remaps every color ≥ `target_k` into `[0,target_k)` while introducing as
few conflicts as possible: the out-of-range vertices are visited in a
uniformly random order, each takes the color held by the fewest of its
neighbors, scanning from a random offset and stopping at the first
conflict-free color. */
fn squash(
    adj: &[Vec<VertexId>],
    active: &[VertexId],
    colors: &mut [usize],
    target_k: usize,
    rng: &mut Xorshift64Star,
) {
    let mut over: Vec<VertexId> =
        active.iter().copied().filter(|&v| colors[v] >= target_k).collect();
    rng.shuffle(&mut over);
    let mut census = vec![0u32; target_k];
    for &v in &over {
        for c in census.iter_mut() {
            *c = 0;
        }
        for &u in &adj[v] {
            if colors[u] < target_k {
                census[colors[u]] += 1;
            }
        }
        let offset = rng.usize_below(target_k);
        let mut best_color = offset;
        let mut best_count = census[offset];
        if best_count > 0 {
            for i in 1..target_k {
                let c = (offset + i) % target_k;
                if census[c] < best_count {
                    best_count = census[c];
                    best_color = c;
                    if best_count == 0 {
                        break;
                    }
                }
            }
        }
        colors[v] = best_color;
    }
}
