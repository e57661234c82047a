use std::time::Instant;

use clap::{App, load_yaml};
use serde_json::json;

use ils_color::search::ils::stochastic_local_search;
use ils_color::search::reduction::apply_reduction;
use ils_color::search::rlf::apply_construction;
use ils_color::util::{read_params, export_results};

/** solves a coloring instance: RLF construction, low-degree reduction,
then iterated tabu search until the time limit */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("ils.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (inst_filename, mut graph, t, sol_file, perf_file, mut rng) = read_params(main_args);

    // solve it
    let start = Instant::now();
    let rlf_colors = apply_construction(&mut graph);
    println!("RLF found {} colors", rlf_colors);
    let removed = apply_reduction(&mut graph)
        .expect("reduction failed on a freshly colored graph");
    println!("reduction removed {} vertices", removed.len());
    let final_colors = stochastic_local_search(&mut graph, (t * 1000.) as u64, None, &mut rng);
    println!("local search finished with {} colors", final_colors);

    // export results
    let stats = json!({
        "inst_name": inst_filename,
        "nb_vertices": graph.nb_active_vertices(),
        "nb_edges": graph.nb_edges(),
        "nb_removed": removed.len(),
        "rlf_colors": rlf_colors,
        "final_colors": final_colors,
        "time_searched": start.elapsed().as_secs_f64(),
        "valid": graph.valid_coloring(),
    });
    export_results(&graph, &stats, perf_file, sol_file, true);
}
