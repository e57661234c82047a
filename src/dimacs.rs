use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space1};
use nom::combinator::map_res;

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

/// reads an instance file, returns `(n, edges)` with 0-based endpoints
pub fn read_from_file(filename: &str) -> Result<(usize, Vec<(VertexId, VertexId)>)> {
    let content = fs::read_to_string(filename)?;
    parse(&content)
}

/** parses a DIMACS coloring instance.

Comment lines start with `c`; exactly one problem line `p edge <n> <m>`
(`p col` is also accepted) must precede the `e <u> <v>` lines; endpoints are
1-based and checked against `n`. Self-loops are dropped; duplicate edges are
left to the graph constructor, which collapses them. Only `<n>` is
authoritative, `<m>` is ignored.
*/
pub fn parse(content: &str) -> Result<(usize, Vec<(VertexId, VertexId)>)> {
    let mut header: Option<usize> = None;
    let mut edges: Vec<(VertexId, VertexId)> = Vec::new();
    for (i, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r').trim();
        let lineno = i + 1;
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            if header.is_some() {
                return Err(parse_error(lineno, "duplicate problem line"));
            }
            match read_header(line) {
                Ok((rest, (n, _m))) if rest.trim().is_empty() => { header = Some(n); }
                _ => return Err(parse_error(lineno, "malformed problem line")),
            }
        } else if line.starts_with('e') {
            let n = match header {
                Some(n) => n,
                None => return Err(parse_error(lineno, "edge line before the problem line")),
            };
            match read_edge(line) {
                Ok((rest, (a, b))) if rest.trim().is_empty() => {
                    if a < 1 || a > n || b < 1 || b > n {
                        return Err(parse_error(
                            lineno,
                            format!("endpoint out of range in 'e {} {}'", a, b),
                        ));
                    }
                    if a != b { // self-loops are dropped
                        edges.push((a - 1, b - 1));
                    }
                }
                _ => return Err(parse_error(lineno, "malformed edge line")),
            }
        } else {
            return Err(parse_error(lineno, "unrecognized line"));
        }
    }
    match header {
        Some(n) => Ok((n, edges)),
        None => Err(parse_error(1, "missing problem line")),
    }
}

fn parse_error<S: Into<String>>(line: usize, msg: S) -> Error {
    Error::Parse { line, msg: msg.into() }
}

/// reads an integer
fn read_integer(s: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(s)
}

/// reads two integers separated by spaces or tabs
fn read_two_integers(s: &str) -> IResult<&str, (usize, usize)> {
    let (s, a) = read_integer(s)?;
    let (s, _) = space1(s)?;
    let (s, b) = read_integer(s)?;
    Ok((s, (a, b)))
}

/// reads a problem line containing (n,m)
pub fn read_header(s: &str) -> IResult<&str, (usize, usize)> {
    let (s, _) = tag("p")(s)?;
    let (s, _) = space1(s)?;
    let (s, _) = alt((tag("edge"), tag("col")))(s)?;
    let (s, _) = space1(s)?;
    read_two_integers(s)
}

/// reads an edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s: &str) -> IResult<&str, (usize, usize)> {
    let (s, _) = tag("e")(s)?;
    let (s, _) = space1(s)?;
    read_two_integers(s)
}

/** writes a string encoding the solution (use this to export the solution).
each line corresponds to a color class. */
pub fn solution_to_string(solution: &[Vec<VertexId>]) -> String {
    let mut res = String::default();
    for class in solution {
        for v in class {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/// writes a solution into a file. each line corresponds to a color class.
pub fn write_solution(filename: &str, solution: &[Vec<VertexId>]) -> Result<()> {
    fs::write(filename, solution_to_string(solution))?;
    Ok(())
}

/// re-emits the active edge set of a graph in DIMACS format (1-based ids)
pub fn to_dimacs_string(graph: &Graph) -> String {
    let edges = graph.edges();
    let mut res = format!("p edge {} {}\n", graph.nb_total_vertices(), edges.len());
    for (u, v) in edges {
        res += format!("e {} {}\n", u + 1, v + 1).as_str();
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let s = "c this is a test comment\np edge 3 2\ne 1 2\ne 2 3\n";
        let (n, edges) = parse(s).unwrap();
        assert_eq!(n, 3);
        assert_eq!(edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_parse_col_header() {
        let (n, edges) = parse("p col 2 1\ne 1 2\n").unwrap();
        assert_eq!(n, 2);
        assert_eq!(edges, vec![(0, 1)]);
    }

    #[test]
    fn test_parse_tabs_and_runs() {
        let (n, edges) = parse("p edge 4   3\ne 1\t2\ne  3   4\ne 2 3").unwrap();
        assert_eq!(n, 4);
        assert_eq!(edges, vec![(0, 1), (2, 3), (1, 2)]);
    }

    #[test]
    fn test_self_loop_dropped() {
        let (_, edges) = parse("p edge 3 2\ne 2 2\ne 1 3\n").unwrap();
        assert_eq!(edges, vec![(0, 2)]);
    }

    #[test]
    fn test_malformed_header() {
        let err = parse("p edge three 2\ne 1 2\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 1),
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn test_out_of_range_endpoint() {
        let err = parse("p edge 3 1\ne 1 4\n").unwrap_err();
        match err {
            Error::Parse { line, msg } => {
                assert_eq!(line, 2);
                assert!(msg.contains("out of range"));
            }
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn test_edge_before_header() {
        assert!(parse("e 1 2\np edge 2 1\n").is_err());
    }

    #[test]
    fn test_missing_header() {
        assert!(parse("c only a comment\n").is_err());
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1";
        assert_eq!(read_header(s).unwrap().1, (2, 1));
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2";
        assert_eq!(read_edge(s).unwrap().1, (1, 2));
        assert_eq!(read_edge(s).unwrap().0, "");
    }

    #[test]
    fn test_round_trip() {
        let s = "p edge 4 4\ne 1 2\ne 2 3\ne 3 4\ne 4 1\ne 1 2\n";
        let g = Graph::from_dimacs_str(s).unwrap();
        // duplicates collapsed on load
        assert_eq!(g.nb_edges(), 4);
        let emitted = to_dimacs_string(&g);
        let g2 = Graph::from_dimacs_str(&emitted).unwrap();
        assert_eq!(g2.nb_total_vertices(), g.nb_total_vertices());
        assert_eq!(g2.edges(), g.edges());
    }

    #[test]
    fn test_solution_to_string() {
        let sol = vec![vec![0, 2], vec![1]];
        assert_eq!(solution_to_string(&sol), "0 2 \n1 \n");
    }
}
