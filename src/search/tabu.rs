use std::time::Instant;

use crate::graph::VertexId;
use crate::rng::Xorshift64Star;
use crate::search::conflicts::ConflictState;

/** parameters of the fixed-k tabu search.

tenure of a reverted assignment is
`min(tenure_base + ⌊tenure_multi · |conflicting vertices|⌋, n·k/2)`: the
memory stretches while the state is bad and shrinks as it heals.
*/
#[derive(Debug, Clone)]
pub struct TabuParams {
    /// fixed part of the tabu tenure
    pub tenure_base: usize,
    /// conflict-proportional part of the tabu tenure
    pub tenure_multi: f64,
    /// stale iterations tolerated before a perturbation
    pub max_nonimproving: u64,
    /// perturbation budget of one k-attempt
    pub max_perturbs: u32,
}

impl TabuParams {
    /** picks a parameter set from the structural regime of the instance
    (`n` active vertices, edge density of the active subgraph). */
    pub fn auto(n: usize, density: f64) -> Self {
        if n < 50 {
            Self { tenure_base: 5, tenure_multi: 0.5, max_nonimproving: 100, max_perturbs: 10 }
        } else if density < 0.12 {
            Self {
                tenure_base: (10. + 2.5 * (n as f64).ln()).floor() as usize,
                tenure_multi: 0.6,
                max_nonimproving: std::cmp::min(20 * n as u64, 20_000),
                max_perturbs: 200,
            }
        } else if density < 0.75 {
            Self {
                tenure_base: 8,
                tenure_multi: 0.9,
                max_nonimproving: std::cmp::max(10_000, 50 * n as u64),
                max_perturbs: 250,
            }
        } else {
            Self {
                tenure_base: 20,
                tenure_multi: 0.6,
                max_nonimproving: std::cmp::max(5_000, 20 * n as u64),
                max_perturbs: 150,
            }
        }
    }
}

/// deadline poll period, in iterations
const POLL_PERIOD: u64 = 1024;

/** minimizes the number of conflicting edges of `state` at its fixed k.

returns true once no conflict remains; false when the deadline passes
(polled every 1024 iterations), or when the perturbation budget is spent
without reaching zero. the move is the classic one-exchange: a conflicting
vertex u takes a color c with delta `count(u,c) − count(u,current)`. a move
is tabu while `tabu_until[u·k+c] > iter` unless it would beat the best
number of conflicts seen (aspiration); among permitted moves the smallest
delta wins, ties broken uniformly by reservoir sampling, and a move that
wipes every conflict of its vertex is taken on the spot. tabu memory is
kept across perturbations.
*/
pub fn tabu_search(
    state: &mut ConflictState,
    deadline: Instant,
    params: &TabuParams,
    rng: &mut Xorshift64Star,
) -> bool {
    let n = state.nb_vertices();
    let k = state.k();
    if k < 2 {
        return state.nb_conflicting_edges() == 0;
    }
    let mut tabu_until = vec![0u64; n * k];
    let tenure_cap = (n * k / 2) as u64;
    let mut iter: u64 = 0;
    let mut iter_last_improvement: u64 = 0;
    let mut best_conflicts = state.nb_conflicting_edges();
    let mut nb_perturbs: u32 = 0;
    loop {
        if iter % POLL_PERIOD == 0 && Instant::now() >= deadline {
            return false;
        }
        if state.nb_conflicting_edges() == 0 {
            return true;
        }
        if iter - iter_last_improvement > params.max_nonimproving {
            if nb_perturbs >= params.max_perturbs {
                return false;
            }
            perturb(state, rng);
            iter_last_improvement = iter;
            nb_perturbs += 1;
            iter += 1;
            continue; // the kick may have reached zero conflicts
        }
        // move selection over the conflicting vertices and alternative colors
        let total = state.nb_conflicting_edges();
        let mut best_delta = i64::MAX;
        let mut chosen: Option<(VertexId, usize)> = None;
        let mut nb_ties = 0usize;
        'selection: for i in 0..state.nb_conflicting_vertices() {
            let u = state.conflicting_nth(i);
            let current = state.color_of(u);
            let own = i64::from(state.count(u, current));
            for c in 0..k {
                if c == current {
                    continue;
                }
                let delta = i64::from(state.count(u, c)) - own;
                if tabu_until[u * k + c] > iter && total + delta >= best_conflicts {
                    continue; // tabu, and aspiration does not hold
                }
                if delta == -own { // clears every conflict of u at once
                    chosen = Some((u, c));
                    break 'selection;
                }
                if delta < best_delta {
                    best_delta = delta;
                    nb_ties = 1;
                    chosen = Some((u, c));
                } else if delta == best_delta {
                    nb_ties += 1;
                    if rng.usize_below(nb_ties) == 0 {
                        chosen = Some((u, c));
                    }
                }
            }
        }
        match chosen {
            None => { // every move is tabu: kick instead, under the same budget
                if nb_perturbs >= params.max_perturbs {
                    return false;
                }
                perturb(state, rng);
                iter_last_improvement = iter;
                nb_perturbs += 1;
            }
            Some((u, c)) => {
                let conflict_count = state.nb_conflicting_vertices();
                let tenure = std::cmp::min(
                    params.tenure_base as u64
                        + (params.tenure_multi * conflict_count as f64).floor() as u64,
                    tenure_cap,
                );
                tabu_until[u * k + state.color_of(u)] = iter + tenure;
                state.update_color(u, c);
                if state.nb_conflicting_edges() < best_conflicts {
                    best_conflicts = state.nb_conflicting_edges();
                    iter_last_improvement = iter;
                    nb_perturbs = 0;
                }
            }
        }
        iter += 1;
    }
}

/** random kick: reassigns 1, 3 or 6 distinct conflicting vertices (by how
bad the state is) to random other colors, then one random vertex
unconditionally drawn, recolored when the draw differs. */
fn perturb(state: &mut ConflictState, rng: &mut Xorshift64Star) {
    let k = state.k();
    if k < 2 {
        return;
    }
    let nb_conflicting = state.nb_conflicting_vertices();
    let strength = if nb_conflicting < 20 { 1 } else if nb_conflicting < 50 { 3 } else { 6 };
    let mut kicked: Vec<VertexId> = Vec::with_capacity(strength);
    if nb_conflicting <= strength {
        for i in 0..nb_conflicting {
            kicked.push(state.conflicting_nth(i));
        }
    } else {
        while kicked.len() < strength {
            let v = state.conflicting_nth(rng.usize_below(nb_conflicting));
            if !kicked.contains(&v) {
                kicked.push(v);
            }
        }
    }
    for v in kicked {
        let current = state.color_of(v);
        let mut c = rng.usize_below(k - 1);
        if c >= current {
            c += 1;
        }
        state.update_color(v, c);
    }
    let nb_active = state.active().len();
    if nb_active > 0 {
        let v = state.active()[rng.usize_below(nb_active)];
        let c = rng.usize_below(k);
        if c != state.color_of(v) {
            state.update_color(v, c);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::graph::Graph;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(10)
    }

    #[test]
    fn test_solves_triangle_with_three_colors() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let adj = g.compact_adjacency();
        let mut state = ConflictState::new(&adj, g.active_vertices(), vec![0, 0, 0], 3);
        let mut rng = Xorshift64Star::new(1);
        let params = TabuParams::auto(3, 1.0);
        assert!(tabu_search(&mut state, far_deadline(), &params, &mut rng));
        assert_eq!(state.nb_conflicting_edges(), 0);
        state.check_consistency();
    }

    #[test]
    fn test_solves_even_cycle_with_two_colors() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let adj = g.compact_adjacency();
        let mut state = ConflictState::new(&adj, g.active_vertices(), vec![0, 0, 1, 1], 2);
        let mut rng = Xorshift64Star::new(3);
        let params = TabuParams::auto(4, g.density());
        assert!(tabu_search(&mut state, far_deadline(), &params, &mut rng));
        state.check_consistency();
        // a proper 2-coloring of C4 alternates
        assert_ne!(state.color_of(0), state.color_of(1));
        assert_ne!(state.color_of(1), state.color_of(2));
    }

    #[test]
    fn test_fails_below_chromatic_number() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let adj = g.compact_adjacency();
        let mut state = ConflictState::new(&adj, g.active_vertices(), vec![0, 1, 0], 2);
        let mut rng = Xorshift64Star::new(9);
        let params = TabuParams::auto(3, 1.0);
        assert!(!tabu_search(&mut state, far_deadline(), &params, &mut rng));
        state.check_consistency();
    }

    #[test]
    fn test_expired_deadline_fails_immediately() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let adj = g.compact_adjacency();
        let mut state = ConflictState::new(&adj, g.active_vertices(), vec![0, 0, 0], 3);
        let mut rng = Xorshift64Star::new(4);
        let params = TabuParams::auto(3, 1.0);
        let expired = Instant::now() - Duration::from_millis(1);
        assert!(!tabu_search(&mut state, expired, &params, &mut rng));
        // nothing moved
        assert_eq!(state.colors(), &[0, 0, 0]);
    }

    #[test]
    fn test_single_color_is_terminal() {
        let g = Graph::from_edges(2, &[(0, 1)]);
        let adj = g.compact_adjacency();
        let mut state = ConflictState::new(&adj, g.active_vertices(), vec![0, 0], 1);
        let mut rng = Xorshift64Star::new(5);
        let params = TabuParams::auto(2, 1.0);
        assert!(!tabu_search(&mut state, far_deadline(), &params, &mut rng));
    }

    #[test]
    fn test_deterministic_under_seed() {
        let g = crate::util::random_gnp(25, 0.3, 55);
        let adj = g.compact_adjacency();
        let run = |seed: u64| {
            let mut state =
                ConflictState::new(&adj, g.active_vertices(), vec![0; 25], 6);
            let mut rng = Xorshift64Star::new(seed);
            let params = TabuParams::auto(25, g.density());
            let solved = tabu_search(&mut state, far_deadline(), &params, &mut rng);
            (solved, state.colors().to_vec())
        };
        assert_eq!(run(123), run(123));
    }

    #[test]
    fn test_auto_config_regimes() {
        let tiny = TabuParams::auto(10, 0.5);
        assert_eq!((tiny.tenure_base, tiny.max_perturbs), (5, 10));
        let sparse = TabuParams::auto(1000, 0.05);
        assert_eq!(sparse.tenure_base, (10. + 2.5 * 1000f64.ln()).floor() as usize);
        assert_eq!(sparse.max_nonimproving, 20_000);
        let hard = TabuParams::auto(100, 0.5);
        assert_eq!((hard.tenure_base, hard.max_nonimproving), (8, 10_000));
        let dense = TabuParams::auto(1000, 0.9);
        assert_eq!((dense.tenure_base, dense.max_nonimproving), (20, 20_000));
    }
}
