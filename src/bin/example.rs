//! Membrane Solver Example - Inflation of a conical membrane
//!
//! Usage: `membrane-example [config.json] [solution.json]`
//!
//! Without a configuration the default problem is solved: a cone from
//! `(0.2, 0.2)` to `(1.0, 0.0)` inflated to unit pressure.

use std::env;
use std::fs;

use anyhow::Context;
use log::info;
use membrane_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => ModelConfig::from_json_file(path)
            .with_context(|| format!("failed to read model configuration {}", path))?,
        None => ModelConfig::default(),
    };

    println!("=== Membrane Solver Example ===\n");
    println!(
        "{} elements, {} analysis, pressure {}",
        config.mesh.n_elements, config.analysis.problem_type, config.pressure_load
    );

    let model = config.build()?;
    let solution = model.solve(&config.analysis)?;
    let summary = solution.summary();

    println!("\n--- Summary ---");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(u) = solution.final_nodal_displacement() {
        println!("\n--- Deformed shape ---");
        println!("{:>6} {:>12} {:>12}", "node", "r", "z");
        for (node, x) in model.deformed_coordinates(u).iter().enumerate() {
            println!("{:>6} {:>12.6} {:>12.6}", node, x[0], x[1]);
        }
    }

    if let Some(path) = args.get(1) {
        fs::write(path, serde_json::to_string(&solution)?)
            .with_context(|| format!("failed to write solution to {}", path))?;
        info!("solution written to {}", path);
    }

    Ok(())
}
