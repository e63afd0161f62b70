extern crate patchbench;

use std::path::Path;
use color_eyre::eyre::{eyre,Result};
use patchbench::evaluation::lighting::{LightingSweepConfig,run_lighting_sweep};

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init_timed();

    let config_path = std::env::args().nth(1).ok_or_else(|| eyre!("usage: lighting_sweep <config.yaml>"))?;
    let config = LightingSweepConfig::load(Path::new(&config_path))?;
    let counts = run_lighting_sweep(&config)?;

    let best = counts.iter()
        .flat_map(|(b, row)| row.iter().map(move |(c, n)| (*b, *c, *n)))
        .max_by_key(|&(_, _, n)| n);
    if let Some((brightness, contrast, matched)) = best {
        println!("most matches: {} at brightness {} %, contrast {} %", matched, brightness, contrast);
    }
    Ok(())
}
