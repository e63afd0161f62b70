extern crate patchbench;

use std::path::Path;
use color_eyre::eyre::{eyre,Result};
use patchbench::benchmark::{run_benchmark,config::BenchmarkConfig};

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init_timed();

    let config_path = std::env::args().nth(1).ok_or_else(|| eyre!("usage: benchmark <config.yaml>"))?;
    let config = BenchmarkConfig::load(Path::new(&config_path))?;
    let runs = run_benchmark(&config)?;

    for (name, run) in &runs {
        let matched = run.verdicts.iter().map(|v| v.matched).sum::<usize>();
        println!("{}: {} iterations, {} matched parts overall", name, run.summaries.len(), matched);
    }
    Ok(())
}
