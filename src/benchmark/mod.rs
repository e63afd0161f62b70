use std::collections::BTreeMap;
use std::fs;
use std::path::{Path,PathBuf};
use log::info;

use crate::Result;
use crate::io;
use crate::algorithms::{AlgorithmConfig,ResultTarget};
use crate::evaluation::{Annotations,VerdictCounts,evaluate};
use crate::report::{ReportSummary,aggregate};

pub mod config;

use self::config::BenchmarkConfig;

/// Per iteration summaries of one algorithm
#[derive(Debug,Clone)]
pub struct AlgorithmRuns {
    pub name: String,
    pub summaries: Vec<ReportSummary>,
    pub verdicts: Vec<VerdictCounts>
}

/// Output folder of one algorithm
pub fn algorithm_dir(output_dir: &Path, algorithm: &AlgorithmConfig) -> PathBuf {
    output_dir.join(algorithm.kind().folder())
}

/// Runs one algorithm on freshly loaded inputs and writes images, report and summary of the iteration
pub fn run_iteration(config: &BenchmarkConfig, algorithm_config: &AlgorithmConfig, iteration: usize, annotations: Option<&Annotations>) -> Result<(ReportSummary, Option<VerdictCounts>)> {
    let parts = io::from_directory(&config.parts_dir)?;
    let images = io::from_directory(&config.originals_dir)?;
    let dir = algorithm_dir(&config.output_dir, algorithm_config);
    fs::create_dir_all(&dir)?;

    let mut algorithm = algorithm_config.build(parts, images, iteration);
    algorithm.process();
    algorithm.write_results(&ResultTarget::Directory(dir.join(iteration.to_string())), config.include_part)?;

    let report = algorithm.report();
    report.write_to(&dir.join(format!("{}_result.txt", iteration)))?;
    report.summary.write_yaml(&dir.join(format!("{}_result.yaml", iteration)))?;
    report.print();

    let verdicts = annotations.map(|a| evaluate(algorithm.results(), a));
    if let Some(counts) = verdicts {
        info!("{} iteration {}: {} matched, {} not sure, {} missed",
            algorithm.name(), iteration + 1, counts.matched, counts.not_sure, counts.missed);
    }
    Ok((report.summary, verdicts))
}

/// Every configured algorithm for every iteration. Each algorithm gets an aggregated `summary.yaml`.
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BTreeMap<String, AlgorithmRuns>> {
    config.validate()?;
    let annotations = match &config.annotations {
        Some(path) => Some(Annotations::load(path)?),
        None => None
    };

    let mut runs = BTreeMap::<String, AlgorithmRuns>::new();
    for algorithm_config in &config.algorithms {
        let name = algorithm_config.kind().name().to_string();
        let mut summaries = Vec::with_capacity(config.iterations);
        let mut verdicts = Vec::new();
        for iteration in 0..config.iterations {
            info!("{}: iteration {}/{}", name, iteration + 1, config.iterations);
            let (summary, counts) = run_iteration(config, algorithm_config, iteration, annotations.as_ref())?;
            summaries.push(summary);
            verdicts.extend(counts);
        }

        if let Some(summary) = aggregate(&summaries) {
            summary.write_yaml(&algorithm_dir(&config.output_dir, algorithm_config).join("summary.yaml"))?;
        }
        runs.insert(name.clone(), AlgorithmRuns { name, summaries, verdicts });
    }

    Ok(runs)
}
