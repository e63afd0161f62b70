extern crate image as image_rs;

use std::time::Instant;
use image_rs::GrayImage;
use log::{debug,error,info};

use crate::Result;
use crate::io::InputImage;
use crate::matching::{window_to_pixels,descriptor_volume::DescriptorVolume,sliding_window::best_window};
use crate::report::ReportKind;
use super::{MatchingAlgorithm,MatchingContext,MatchingResult,MatchLocation};

/// A descriptor producing a grid of cells that is searched with a sliding window
pub trait DenseDescriptor {
    fn name(&self) -> &'static str;
    fn compute(&self, image: &GrayImage) -> Result<DescriptorVolume>;
    /// Pixels between neighbouring grid cells as (x, y)
    fn scale(&self) -> (usize,usize);
}

struct ImageData {
    image_index: usize,
    descriptor: DescriptorVolume
}

pub struct DenseMatcher<D: DenseDescriptor> {
    pub descriptor: D,
    context: MatchingContext,
    image_data: Vec<ImageData>
}

impl<D: DenseDescriptor> DenseMatcher<D> {
    pub fn new(descriptor: D, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> DenseMatcher<D> {
        DenseMatcher { descriptor, context: MatchingContext::new(parts, images, iteration), image_data: Vec::new() }
    }
}

impl<D: DenseDescriptor> MatchingAlgorithm for DenseMatcher<D> {
    fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    fn report_kind(&self) -> ReportKind {
        ReportKind::Dense
    }

    fn context(&self) -> &MatchingContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut MatchingContext {
        &mut self.context
    }

    fn process_images(&mut self) -> () {
        let iteration = self.context.iteration + 1;
        self.image_data.clear();
        for (image_index, image) in self.context.images.iter().enumerate() {
            info!("(Iteration {}) {}: preprocessing image {}", iteration, self.descriptor.name(), image_index + 1);
            let gray = image.gray();
            let start = Instant::now();
            let descriptor = match self.descriptor.compute(&gray) {
                Ok(d) => d,
                Err(e) => {
                    error!("computing descriptor for {} failed ({}), skipping", image.file_path, e);
                    continue;
                }
            };
            self.context.diagnostics.image_descriptor.push(start.elapsed());
            self.context.diagnostics.image_descriptor_size.push(descriptor.size());
            self.image_data.push(ImageData { image_index, descriptor });
        }
    }

    fn process_parts(&mut self) -> () {
        let iteration = self.context.iteration + 1;
        let part_count = self.context.parts.len();
        let scale = self.descriptor.scale();

        for (part_index, part) in self.context.parts.iter().enumerate() {
            info!("(Iteration {}) {}: processing part {}/{} ({:.2} %)",
                iteration, self.descriptor.name(), part_index + 1, part_count, self.context.progress(part_index));
            let part_start = Instant::now();
            let gray = part.gray();
            let part_size = part.size();

            let descriptor_start = Instant::now();
            let part_descriptor = match self.descriptor.compute(&gray) {
                Ok(d) => d,
                Err(e) => {
                    error!("computing descriptor for {} failed ({}), skipping", part.file_path, e);
                    continue;
                }
            };
            self.context.diagnostics.part_descriptor.push(descriptor_start.elapsed());
            self.context.diagnostics.part_descriptor_size.push(part_descriptor.size());

            let mut best: Option<MatchLocation> = None;
            let all_images_start = Instant::now();
            for (j, data) in self.image_data.iter().enumerate() {
                debug!("pairing part {} with image {}/{}", part_index + 1, j + 1, self.image_data.len());
                let image_start = Instant::now();
                let outcome = match best_window(&part_descriptor, &data.descriptor, (1,1)) {
                    Ok(o) => o,
                    Err(e) => {
                        error!("matching {} failed ({}), skipping image", part.file_path, e);
                        continue;
                    }
                };

                if let Some(window_match) = outcome.best {
                    let improves = best.as_ref().map_or(true, |b| window_match.distance < b.distance);
                    if improves {
                        let (start, end) = window_to_pixels(&window_match.window, scale, part_size);
                        best = Some(MatchLocation {
                            image_index: data.image_index,
                            image_path: self.context.images[data.image_index].file_path.clone(),
                            start,
                            end,
                            distance: window_match.distance
                        });
                    }
                }

                self.context.diagnostics.individual_image_matching.push(image_start.elapsed());
                self.context.diagnostics.subsets.push(outcome.subsets);
            }

            self.context.diagnostics.all_images_matching.push(all_images_start.elapsed());
            self.context.diagnostics.part_process.push(part_start.elapsed());

            if best.is_none() {
                info!("{} did not fit into any image", part.file_path);
            }
            self.context.results.push(MatchingResult { part_index, part_path: part.file_path.clone(), location: best, keypoints: None });
        }
    }
}
