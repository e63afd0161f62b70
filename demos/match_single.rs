extern crate patchbench;

use std::path::{Path,PathBuf};
use color_eyre::eyre::{eyre,Result};
use patchbench::io;
use patchbench::algorithms::{AlgorithmKind,ResultTarget};

/// match_single <part> <image> [HOG|FT|SIFT|SURF|BRIEF|ORB|FREAK], names in any case
fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init_timed();

    let args = std::env::args().collect::<Vec<String>>();
    if args.len() < 3 {
        return Err(eyre!("usage: match_single <part> <image> [algorithm]"));
    }
    let kind: AlgorithmKind = match args.get(3) {
        Some(name) => name.parse()?,
        None => AlgorithmKind::Ft
    };

    let parts = io::from_files(&[Path::new(&args[1])])?;
    let images = io::from_files(&[Path::new(&args[2])])?;
    let mut algorithm = kind.default_config().build(parts, images, 0);
    algorithm.process();

    let output_dir = PathBuf::from("output").join(kind.folder());
    algorithm.write_results(&ResultTarget::Directory(output_dir), true)?;
    println!("{}", algorithm.report());
    for result in algorithm.results() {
        match &result.location {
            Some(location) => println!("{} -> {} at {:?}", result.part_path, location.image_path, location.start),
            None => println!("{} not found", result.part_path)
        }
    }
    Ok(())
}
