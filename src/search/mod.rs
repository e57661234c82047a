/// greedy clique + branch-and-bound lower bound on the chromatic number
pub mod clique_bnb;

/// RLF constructive coloring with an M-trial look-ahead
pub mod rlf;

/// greedy DSATUR coloring for very large instances
pub mod dsatur;

/// low-degree vertex peeling under a chromatic lower bound
pub mod reduction;

/// conflict-tracking solution state for a fixed number of colors
pub mod conflicts;

/// fixed-k tabu search with reactive tenure and perturbations
pub mod tabu;

/// iterated local search driving the color count down
pub mod ils;
