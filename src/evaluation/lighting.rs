extern crate image as image_rs;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use image_rs::{Rgb,RgbImage};
use log::info;
use serde::{Serialize, Deserialize};

use crate::{BenchError,Float,Result};
use crate::io::{self,InputImage};
use crate::algorithms::{AlgorithmConfig,AlgorithmKind};
use super::{Annotations,Verdict,judge};

/// Matches per brightness, then per contrast
pub type LightingCounts = BTreeMap<i32, BTreeMap<i32, usize>>;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct LightingSweepConfig {
    pub parts_dir: PathBuf,
    pub originals_dir: PathBuf,
    pub output_dir: PathBuf,
    pub annotations: PathBuf,
    #[serde(default = "default_algorithm")]
    pub algorithm: AlgorithmConfig,
    #[serde(default = "default_minimum")]
    pub minimum: i32,
    #[serde(default = "default_maximum")]
    pub maximum: i32,
    #[serde(default = "default_step")]
    pub step: i32,
    #[serde(default = "default_include_part")]
    pub include_part: bool
}

fn default_algorithm() -> AlgorithmConfig { AlgorithmKind::Ft.default_config() }
fn default_minimum() -> i32 { -80 }
fn default_maximum() -> i32 { 80 }
fn default_step() -> i32 { 5 }
fn default_include_part() -> bool { true }

impl LightingSweepConfig {
    pub fn load(path: &std::path::Path) -> Result<LightingSweepConfig> {
        let config: LightingSweepConfig = serde_yaml::from_str(&fs::read_to_string(path)?)?;
        config.levels()?;
        config.algorithm.validate()?;
        Ok(config)
    }

    /// Percentages from `minimum` to `maximum` inclusive
    pub fn levels(&self) -> Result<Vec<i32>> {
        if self.step <= 0 || self.minimum > self.maximum {
            return Err(BenchError::Config(format!("invalid lighting range {}..={} step {}", self.minimum, self.maximum, self.step)));
        }
        Ok((self.minimum..=self.maximum).step_by(self.step as usize).collect())
    }
}

/// `pixel·(1 + contrast/100) + brightness/100·255`, saturated to the u8 range
pub fn adjust_lighting(image: &RgbImage, brightness: i32, contrast: i32) -> RgbImage {
    let alpha = 1.0 + (contrast as Float)/100.0;
    let beta = (brightness as Float)/100.0*255.0;
    RgbImage::from_fn(image.width(), image.height(), |x,y| {
        let Rgb(channels) = *image.get_pixel(x, y);
        Rgb(channels.map(|c| ((c as Float)*alpha + beta).clamp(0.0, 255.0) as u8))
    })
}

pub fn result_file_name(part_index: usize, brightness: i32, contrast: i32) -> String {
    format!("part{}_b{}_c{}.jpg", part_index, brightness, contrast)
}

fn format_percentage(value: i32) -> String {
    match value {
        v if v >= 0 => format!("+{} %", v),
        v => format!("{} %", v)
    }
}

/// Runs the configured algorithm for every brightness and contrast pair and counts matching parts.
/// Result images are sorted into one folder per verdict, the counts go to `result.json`.
pub fn run_lighting_sweep(config: &LightingSweepConfig) -> Result<LightingCounts> {
    let annotations = Annotations::load(&config.annotations)?;
    let parts = io::from_directory(&config.parts_dir)?;
    let levels = config.levels()?;
    let total = levels.len()*levels.len();

    let mut counts = LightingCounts::new();
    let mut step = 0;
    for &brightness in &levels {
        let row = counts.entry(brightness).or_insert_with(BTreeMap::new);
        for &contrast in &levels {
            step += 1;
            info!("({:.0} %) Brightness: {}, Contrast: {}",
                100.0*(step as Float)/(total as Float), format_percentage(brightness), format_percentage(contrast));

            let adjusted = parts.iter()
                .map(|part| InputImage { color_image: adjust_lighting(&part.color_image, brightness, contrast), file_path: part.file_path.clone() })
                .collect::<Vec<InputImage>>();
            let images = io::from_directory(&config.originals_dir)?;
            let mut algorithm = config.algorithm.build(adjusted, images, 0);
            algorithm.process();

            let mut matched = 0;
            for (i, result) in algorithm.results().iter().enumerate() {
                let verdict = judge(result, &annotations);
                if verdict == Verdict::Match {
                    matched += 1;
                }
                let path = config.output_dir.join(verdict.folder()).join(result_file_name(i, brightness, contrast));
                algorithm.write_single_result(result, &path, config.include_part)?;
            }
            row.insert(contrast, matched);
        }
    }

    fs::create_dir_all(&config.output_dir)?;
    fs::write(config.output_dir.join("result.json"), serde_json::to_string(&counts)?)?;
    Ok(counts)
}
