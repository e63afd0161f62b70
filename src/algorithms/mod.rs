extern crate image as image_rs;

use std::path::{Path,PathBuf};
use std::time::Instant;
use image_rs::RgbImage;
use log::warn;
use serde::{Serialize, Deserialize};

use crate::{Float,Result};
use crate::io::InputImage;
use crate::image::features::KeyPoint;
use crate::matching::{PixelRect,brute_force::DMatch};
use crate::report::{Diagnostics,Report,ReportKind,ReportSummary};
use crate::visualize::{draw_location,display_matches,display_with_part,save};

pub mod dense;
pub mod keypoint;
pub mod hog;
pub mod ft;
pub mod sift;
pub mod surf;
pub mod brief;
pub mod orb;
pub mod freak;
pub mod algorithm_config;

pub use self::algorithm_config::{AlgorithmConfig,AlgorithmKind};

/// Inputs and accumulated outputs shared by every algorithm
#[derive(Debug,Clone)]
pub struct MatchingContext {
    pub parts: Vec<InputImage>,
    pub images: Vec<InputImage>,
    pub diagnostics: Diagnostics,
    pub results: Vec<MatchingResult>,
    pub iteration: usize
}

impl MatchingContext {
    pub fn new(parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> MatchingContext {
        MatchingContext { parts, images, diagnostics: Diagnostics::default(), results: Vec::new(), iteration }
    }

    /// Percentage of parts processed before `part_index`
    pub fn progress(&self, part_index: usize) -> Float {
        match self.parts.len() {
            0 => 100.0,
            n => 100.0*(part_index as Float)/(n as Float)
        }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct MatchLocation {
    pub image_index: usize,
    pub image_path: String,
    pub start: (i64,i64),
    /// Exclusive
    pub end: (i64,i64),
    pub distance: Float
}

impl MatchLocation {
    pub fn rect(&self) -> PixelRect {
        (self.start, self.end)
    }
}

/// Keypoints and matches that led to a keypoint based result
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct KeypointEvidence {
    pub part_keypoints: Vec<KeyPoint>,
    pub image_keypoints: Vec<KeyPoint>,
    pub top_matches: Vec<DMatch>
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct MatchingResult {
    pub part_index: usize,
    pub part_path: String,
    pub location: Option<MatchLocation>,
    pub keypoints: Option<KeypointEvidence>
}

/// Where result images go: `<dir>/<i>.jpg`, or a path computed from the result index
pub enum ResultTarget<'a> {
    Directory(PathBuf),
    Paths(Box<dyn Fn(usize) -> PathBuf + 'a>)
}

impl<'a> ResultTarget<'a> {
    pub fn path_for(&self, index: usize) -> PathBuf {
        match self {
            ResultTarget::Directory(dir) => dir.join(format!("{}.jpg", index)),
            ResultTarget::Paths(f) => f(index)
        }
    }
}

pub trait MatchingAlgorithm {
    fn name(&self) -> &'static str;
    fn report_kind(&self) -> ReportKind;
    fn context(&self) -> &MatchingContext;
    fn context_mut(&mut self) -> &mut MatchingContext;

    /// Computes and stores the descriptors of the image database
    fn process_images(&mut self) -> ();
    /// Locates every part in the processed images
    fn process_parts(&mut self) -> ();

    fn draws_matches(&self) -> bool {
        false
    }

    /// Runs both stages. Results and diagnostics of an earlier run are discarded.
    fn process(&mut self) -> &[MatchingResult] {
        let context = self.context_mut();
        context.results.clear();
        context.diagnostics = Diagnostics::default();
        let start = Instant::now();
        self.process_images();
        self.process_parts();
        self.context_mut().diagnostics.set_total_time(start.elapsed());
        self.results()
    }

    fn results(&self) -> &[MatchingResult] {
        &self.context().results
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.context().diagnostics
    }

    fn report(&self) -> Report {
        Report::new(self.summary())
    }

    fn summary(&self) -> ReportSummary {
        ReportSummary::from_diagnostics(self.name(), self.report_kind(), self.diagnostics())
    }

    /// The best image with the match outlined. None if the result has no location.
    fn render_result(&self, result: &MatchingResult, include_part: bool) -> Option<RgbImage> {
        let location = result.location.as_ref()?;
        let context = self.context();
        let part = context.parts.get(result.part_index)?;
        let image = context.images.get(location.image_index)?;
        let annotated = draw_location(&image.color_image, &location.rect());

        match &result.keypoints {
            Some(evidence) if self.draws_matches() => Some(display_matches(
                &part.color_image,
                &evidence.part_keypoints,
                &annotated,
                &evidence.image_keypoints,
                &evidence.top_matches)),
            _ if include_part => Some(display_with_part(&part.color_image, &annotated)),
            _ => Some(annotated)
        }
    }

    /// Returns whether an image was written
    fn write_single_result(&self, result: &MatchingResult, path: &Path, include_part: bool) -> Result<bool> {
        match self.render_result(result, include_part) {
            Some(image) => {
                save(&image, path)?;
                Ok(true)
            },
            None => {
                warn!("{}: no match location for {}, nothing written", self.name(), result.part_path);
                Ok(false)
            }
        }
    }

    /// Returns the number of images written
    fn write_results(&self, target: &ResultTarget, include_part: bool) -> Result<usize> {
        let mut written = 0;
        for (i, result) in self.results().iter().enumerate() {
            if self.write_single_result(result, &target.path_for(i), include_part)? {
                written += 1;
            }
        }
        Ok(written)
    }
}
