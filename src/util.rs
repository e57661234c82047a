use clap::ArgMatches;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::dimacs;
use crate::graph::Graph;
use crate::rng::Xorshift64Star;

/** reads command line input and returns the instance name, the loaded
graph, the time limit (seconds), the optional solution / stats filenames
and the run's random number generator (seeded when `--seed` is given). */
pub fn read_params(main_args: ArgMatches) -> (String, Graph, f32, Option<String>, Option<String>, Xorshift64Star) {
    let inst_filename = main_args.value_of("instance").unwrap();
    let t: f32 = main_args.value_of("time").unwrap().parse::<f32>()
        .expect("unable to parse the time given");
    // read value of the solution filename
    let sol_file: Option<String> = match main_args.value_of("solution") {
        None => None,
        Some(e) => {
            println!("printing solutions in: {}", e);
            Some(e.to_string())
        }
    };
    // read value of the performance logs filename
    let perf_file: Option<String> = match main_args.value_of("perf") {
        None => None,
        Some(e) => {
            println!("printing perfs in: {}\n", e);
            Some(e.to_string())
        }
    };
    // seeded runs reproduce; unseeded runs draw from the clock
    let rng = match main_args.value_of("seed") {
        None => Xorshift64Star::from_time(),
        Some(s) => Xorshift64Star::new(
            s.parse::<u64>().expect("unable to parse the seed given")
        ),
    };
    // read instance file
    let graph = Graph::from_file(inst_filename)
        .unwrap_or_else(|e| panic!("unable to read the instance: {}", e));
    graph.display_statistics();
    println!("=======================");
    (inst_filename.to_string(), graph, t, sol_file, perf_file, rng)
}

/// exports search results to files
pub fn export_results(
    graph: &Graph,
    stats: &Value,
    perf_file: Option<String>,
    sol_file: Option<String>,
    check_result: bool,
) {
    // export statistics
    match perf_file {
        None => {},
        Some(filename) => {
            let mut file = match std::fs::File::create(filename.as_str()) {
                Err(why) => panic!("couldn't create {}: {}", filename, why),
                Ok(file) => file
            };
            if let Err(why) = std::io::Write::write(
                &mut file, serde_json::to_string(stats).unwrap().as_bytes()
            ) { panic!("couldn't write: {}", why) };
        }
    }
    // export solution
    match sol_file {
        None => {},
        Some(filename) => {
            if check_result && !graph.valid_coloring() {
                println!("invalid solution (conflicting edge remains)");
            }
            dimacs::write_solution(filename.as_str(), &graph.color_classes())
                .unwrap_or_else(|e|
                    panic!("write_solution: unable to write the solution in {}: {}", filename, e)
                );
        }
    }
}

/** generates a random G(n,p) instance (test support; the search itself
never draws from this generator). */
pub fn random_gnp(n: usize, p: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen::<f64>() < p {
                edges.push((u, v));
            }
        }
    }
    Graph::from_edges(n, &edges)
}
