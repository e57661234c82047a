use bit_set::BitSet;
use serde::Serialize;

use crate::dimacs;
use crate::error::{Error, Result};

/** Vertex Id */
pub type VertexId = usize;

/** models a Graph Coloring instance over the fixed universe `0..n`.

The adjacency bit-sets are authoritative; `degree`, `nb_edges` and the
`active` set are kept consistent by every mutator. A vertex outside `active`
has been logically removed: its row is empty and no remaining row points at
it. `nb_colors` is a cache maintained by the bulk coloring procedures
(construction, local search, `reset_colors`), never by `set_color`.
*/
#[derive(Debug)]
pub struct Graph {
    /// size of the vertex universe (immutable after load)
    nb_total: usize,
    /// adj[v]: bitset of the neighbors of v
    adj: Vec<BitSet>,
    /// degree[v]: cardinality of adj[v]
    degree: Vec<usize>,
    /// vertices still participating
    active: BitSet,
    /// cardinality of `active`
    nb_active: usize,
    /// colors[v]: color of the vertex v (None = uncolored)
    colors: Vec<Option<usize>>,
    /// number of edges between active vertices
    nb_edges: usize,
    /// cached number of colors used (bulk-maintained)
    nb_colors: usize,
}

/** read-only copy of the graph handed to visualization code */
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    /// adjacency[v]: sorted neighbors of v (empty for inactive vertices)
    pub adjacency: Vec<Vec<VertexId>>,
    /// colors[v]: color of v, if any
    pub colors: Vec<Option<usize>>,
    /// degrees[v]: current degree of v
    pub degrees: Vec<usize>,
}

impl Graph {

    /** constructor from an edge list over `0..n` (panics on out-of-range
    endpoints; file loading validates before reaching here). duplicate edges
    are collapsed, self-loops ignored. */
    pub fn from_edges(n: usize, edges: &[(VertexId, VertexId)]) -> Self {
        let mut adj = vec![BitSet::with_capacity(n); n];
        let mut nb_edges = 0;
        for &(u, v) in edges {
            assert!(u < n && v < n, "from_edges: endpoint out of range ({},{})", u, v);
            if u != v && adj[u].insert(v) {
                adj[v].insert(u);
                nb_edges += 1;
            }
        }
        let degree: Vec<usize> = adj.iter().map(|a| a.len()).collect();
        let mut active = BitSet::with_capacity(n);
        for v in 0..n { active.insert(v); }
        Self {
            nb_total: n,
            adj,
            degree,
            active,
            nb_active: n,
            colors: vec![None; n],
            nb_edges,
            nb_colors: 0,
        }
    }

    /** constructor using an adjacency list */
    pub fn new(adj_list: Vec<Vec<VertexId>>) -> Self {
        let n = adj_list.len();
        let mut edges = Vec::new();
        for (u, l) in adj_list.iter().enumerate() {
            for &v in l {
                if u < v { edges.push((u, v)); }
            }
        }
        Self::from_edges(n, &edges)
    }

    /// creates an instance from a DIMACS file
    pub fn from_file(filename: &str) -> Result<Self> {
        let (n, edges) = dimacs::read_from_file(filename)?;
        Ok(Self::from_edges(n, &edges))
    }

    /// creates an instance from a DIMACS-formatted string
    pub fn from_dimacs_str(content: &str) -> Result<Self> {
        let (n, edges) = dimacs::parse(content)?;
        Ok(Self::from_edges(n, &edges))
    }

    /// size of the vertex universe
    pub fn nb_total_vertices(&self) -> usize { self.nb_total }

    /// number of active vertices
    pub fn nb_active_vertices(&self) -> usize { self.nb_active }

    /// number of edges between active vertices
    pub fn nb_edges(&self) -> usize { self.nb_edges }

    /// cached number of colors currently used
    pub fn nb_colors(&self) -> usize { self.nb_colors }

    fn check_index(&self, v: VertexId) -> Result<()> {
        if v >= self.nb_total { Err(Error::InvalidVertex(v)) } else { Ok(()) }
    }

    fn check_active(&self, v: VertexId) -> Result<()> {
        self.check_index(v)?;
        if !self.active.contains(v) { Err(Error::InvalidVertex(v)) } else { Ok(()) }
    }

    /// true iff v is active (requires only a valid index)
    pub fn is_active(&self, v: VertexId) -> Result<bool> {
        self.check_index(v)?;
        Ok(self.active.contains(v))
    }

    /// sorted list of the neighbors of v
    pub fn neighbors(&self, v: VertexId) -> Result<Vec<VertexId>> {
        self.check_active(v)?;
        Ok(self.adj[v].iter().collect())
    }

    /// current degree of v
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        self.check_active(v)?;
        Ok(self.degree[v])
    }

    /// returns if u and v are adjacent, O(1)
    pub fn are_adjacent(&self, u: VertexId, v: VertexId) -> Result<bool> {
        self.check_active(u)?;
        self.check_active(v)?;
        Ok(self.adj[u].contains(v))
    }

    /// color of v, if any
    pub fn color(&self, v: VertexId) -> Result<Option<usize>> {
        self.check_active(v)?;
        Ok(self.colors[v])
    }

    /** writes the color of v. does NOT maintain `nb_colors`: bulk coloring
    procedures update the cache themselves. */
    pub fn set_color(&mut self, v: VertexId, c: usize) -> Result<()> {
        self.check_active(v)?;
        self.colors[v] = Some(c);
        Ok(())
    }

    /// number of distinct colors among the colored neighbors of v
    pub fn saturation(&self, v: VertexId) -> Result<usize> {
        self.check_active(v)?;
        let mut seen = BitSet::<u32>::default();
        for u in self.adj[v].iter() {
            if let Some(c) = self.colors[u] {
                seen.insert(c);
            }
        }
        Ok(seen.len())
    }

    /** logically removes v: clears it from every neighbor row, maintains
    degrees and the edge count, resets its color and degree, deactivates it.
    fails if v is already inactive. */
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        self.check_active(v)?;
        let neighbors: Vec<VertexId> = self.adj[v].iter().collect();
        for u in neighbors {
            self.adj[u].remove(v);
            self.degree[u] -= 1;
            self.nb_edges -= 1;
        }
        self.adj[v].clear();
        self.degree[v] = 0;
        self.colors[v] = None;
        self.active.remove(v);
        self.nb_active -= 1;
        Ok(())
    }

    /// removes the edge (u,v); fails if it is absent
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> Result<()> {
        self.check_active(u)?;
        self.check_active(v)?;
        if !self.adj[u].contains(v) {
            return Err(Error::NoEdge(u, v));
        }
        self.adj[u].remove(v);
        self.adj[v].remove(u);
        self.degree[u] -= 1;
        self.degree[v] -= 1;
        self.nb_edges -= 1;
        Ok(())
    }

    /// uncolors every vertex and resets the color cache
    pub fn reset_colors(&mut self) {
        for c in self.colors.iter_mut() { *c = None; }
        self.nb_colors = 0;
    }

    /// recomputes the number of distinct colors on active vertices, O(n)
    pub fn used_color_count(&self) -> usize {
        let mut used = BitSet::<u32>::default();
        for v in self.active.iter() {
            if let Some(c) = self.colors[v] {
                used.insert(c);
            }
        }
        used.len()
    }

    /// true iff no edge connects two equally-colored endpoints (uncolored ignored)
    pub fn valid_coloring(&self) -> bool {
        for u in self.active.iter() {
            if let Some(cu) = self.colors[u] {
                for v in self.adj[u].iter() {
                    if v > u && self.colors[v] == Some(cu) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// active vertices in ascending order
    pub fn active_vertices(&self) -> Vec<VertexId> {
        self.active.iter().collect()
    }

    /// edge density of the active subgraph
    pub fn density(&self) -> f64 {
        let n = self.nb_active;
        if n < 2 { return 0.; }
        2. * self.nb_edges as f64 / (n as f64 * (n - 1) as f64)
    }

    /** derived per-vertex sorted neighbor arrays (empty rows for inactive
    vertices). built once per local-search session; rebuild it if the active
    set changed since. */
    pub fn compact_adjacency(&self) -> Vec<Vec<VertexId>> {
        (0..self.nb_total)
            .map(|v| {
                if self.active.contains(v) { self.adj[v].iter().collect() } else { Vec::new() }
            })
            .collect()
    }

    /// active edge list with u < v
    pub fn edges(&self) -> Vec<(VertexId, VertexId)> {
        let mut res = Vec::with_capacity(self.nb_edges);
        for u in self.active.iter() {
            for v in self.adj[u].iter() {
                if u < v { res.push((u, v)); }
            }
        }
        res
    }

    /// groups the active vertices by color (empty classes filtered out)
    pub fn color_classes(&self) -> Vec<Vec<VertexId>> {
        let nb = self.colors.iter().flatten().max().map_or(0, |c| c + 1);
        let mut classes = vec![vec![]; nb];
        for v in self.active.iter() {
            if let Some(c) = self.colors[v] {
                classes[c].push(v);
            }
        }
        classes.into_iter().filter(|e| !e.is_empty()).collect()
    }

    /// read-only copy for visualization
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            adjacency: self.compact_adjacency(),
            colors: self.colors.clone(),
            degrees: self.degree.clone(),
        }
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_active_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees: Vec<usize> = self.active.iter().map(|v| self.degree[v]).collect();
        if let (Some(min), Some(max)) = (degrees.iter().min(), degrees.iter().max()) {
            println!("\t{} \t min degree", min);
            println!("\t{} \t max degree", max);
        }
    }

    /** asserts the structural invariants: adjacency symmetry and
    irreflexivity, degree cache consistency, edge count as half the degree
    sum, empty rows outside the active set. used by the tests after every
    mutation scenario. */
    pub fn check_consistency(&self) {
        let mut degree_sum = 0;
        for v in 0..self.nb_total {
            if self.active.contains(v) {
                assert!(!self.adj[v].contains(v), "self-loop on {}", v);
                assert_eq!(self.degree[v], self.adj[v].len(), "degree cache of {}", v);
                degree_sum += self.degree[v];
                for u in self.adj[v].iter() {
                    assert!(self.active.contains(u), "edge ({},{}) to inactive", v, u);
                    assert!(self.adj[u].contains(v), "asymmetric edge ({},{})", v, u);
                }
            } else {
                assert!(self.adj[v].is_empty(), "inactive {} keeps neighbors", v);
                assert_eq!(self.degree[v], 0, "inactive {} keeps a degree", v);
            }
        }
        assert_eq!(self.nb_edges * 2, degree_sum, "edge count vs degree sum");
        assert_eq!(self.nb_active, self.active.len(), "active cardinality");
    }

    // fast accessors reserved to the search procedures

    pub(crate) fn adj_bits(&self) -> &[BitSet] { &self.adj }

    pub(crate) fn active_bits(&self) -> &BitSet { &self.active }

    pub(crate) fn degree_of(&self, v: VertexId) -> usize { self.degree[v] }

    pub(crate) fn color_of(&self, v: VertexId) -> Option<usize> { self.colors[v] }

    pub(crate) fn set_color_raw(&mut self, v: VertexId, c: Option<usize>) {
        self.colors[v] = c;
    }

    pub(crate) fn set_nb_colors(&mut self, k: usize) { self.nb_colors = k; }
}
