use std::time::Instant;

use clap::{App, load_yaml};
use serde_json::json;

use ils_color::search::dsatur::dsatur_coloring;
use ils_color::util::{read_params, export_results};

/** colors a coloring instance using a DSATUR greedy */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("dsatur.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (inst_filename, mut graph, _t, sol_file, perf_file, _rng) = read_params(main_args);

    // solve it
    let start = Instant::now();
    let nb_colors = dsatur_coloring(&mut graph);
    println!("DSATUR found {} colors", nb_colors);

    // export results
    let stats = json!({
        "inst_name": inst_filename,
        "nb_vertices": graph.nb_active_vertices(),
        "nb_edges": graph.nb_edges(),
        "dsatur_colors": nb_colors,
        "time_searched": start.elapsed().as_secs_f64(),
        "valid": graph.valid_coloring(),
    });
    export_results(&graph, &stats, perf_file, sol_file, true);
}
