extern crate image as image_rs;

use std::time::Instant;
use image_rs::GrayImage;
use log::{debug,error,info};
use serde::{Serialize, Deserialize};

use crate::{BenchError,Float,Result};
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::matching::brute_force::{BruteForceMatcher,DMatch};
use crate::report::ReportKind;
use super::{MatchingAlgorithm,MatchingContext,MatchingResult,MatchLocation,KeypointEvidence};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct KeypointMatchingParameters {
    /// Matches summed per image, also the number drawn
    pub top_matches: usize,
    pub draw_matches: bool
}

impl KeypointMatchingParameters {
    pub fn validate(&self) -> Result<()> {
        match self.top_matches {
            0 => Err(BenchError::Config("top_matches must be at least 1".to_string())),
            _ => Ok(())
        }
    }
}

impl Default for KeypointMatchingParameters {
    fn default() -> KeypointMatchingParameters {
        KeypointMatchingParameters { top_matches: 20, draw_matches: true }
    }
}

/// A detector and descriptor pair
pub trait KeypointDescriptor {
    fn name(&self) -> &'static str;
    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures>;
}

/// Why a detection cannot be used for matching
pub fn check_valid_detect_output(features: &KeypointFeatures) -> std::result::Result<(), &'static str> {
    match (features.keypoints.is_empty(), features.descriptors.is_empty()) {
        (true, _) => Err("No keypoints detected"),
        (false, true) => Err("No descriptors computed"),
        _ => Ok(())
    }
}

/// Matches sorted by distance and cut to `top_matches`, with the sum of their distances
pub fn top_matches(mut matches: Vec<DMatch>, top_matches: usize) -> (Vec<DMatch>, Float) {
    matches.sort_by(|a,b| a.distance.total_cmp(&b.distance));
    matches.truncate(top_matches);
    let total = matches.iter().map(|m| m.distance).sum();
    (matches, total)
}

struct ImageData {
    image_index: usize,
    features: KeypointFeatures
}

struct BestImage<'a> {
    data: &'a ImageData,
    distance: Float,
    top_matches: Vec<DMatch>
}

pub struct KeypointMatcher<D: KeypointDescriptor> {
    pub descriptor: D,
    pub matching_parameters: KeypointMatchingParameters,
    matcher: BruteForceMatcher,
    context: MatchingContext,
    image_data: Vec<ImageData>
}

impl<D: KeypointDescriptor> KeypointMatcher<D> {
    pub fn new(descriptor: D, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> KeypointMatcher<D> {
        KeypointMatcher {
            descriptor,
            matching_parameters,
            matcher: BruteForceMatcher::new(true),
            context: MatchingContext::new(parts, images, iteration),
            image_data: Vec::new()
        }
    }

    fn detect(&self, image: &InputImage) -> Option<(KeypointFeatures, std::time::Duration)> {
        let gray = image.gray();
        let start = Instant::now();
        let computed = self.descriptor.compute(&gray);
        let elapsed = start.elapsed();
        let features = match computed {
            Ok(f) => f,
            Err(e) => {
                error!("ERROR computing keypoints or descriptors for {} ({}), skipping...", image.file_path, e);
                return None;
            }
        };
        match check_valid_detect_output(&features) {
            Ok(()) => Some((features, elapsed)),
            Err(reason) => {
                error!("ERROR computing keypoints or descriptors for {} ({}), skipping...", image.file_path, reason);
                None
            }
        }
    }
}

impl<D: KeypointDescriptor> MatchingAlgorithm for KeypointMatcher<D> {
    fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    fn report_kind(&self) -> ReportKind {
        ReportKind::Keypoint
    }

    fn context(&self) -> &MatchingContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut MatchingContext {
        &mut self.context
    }

    fn draws_matches(&self) -> bool {
        self.matching_parameters.draw_matches
    }

    fn process_images(&mut self) -> () {
        let mut image_data = Vec::with_capacity(self.context.images.len());
        for (image_index, image) in self.context.images.iter().enumerate() {
            debug!("{}: preprocessing image {}", self.descriptor.name(), image_index + 1);
            if let Some((features, elapsed)) = self.detect(image) {
                self.context.diagnostics.image_descriptor.push(elapsed);
                self.context.diagnostics.image_descriptor_size.push(features.descriptors.size());
                image_data.push(ImageData { image_index, features });
            }
        }
        self.image_data = image_data;
    }

    fn process_parts(&mut self) -> () {
        let iteration = self.context.iteration + 1;
        let part_count = self.context.parts.len();
        let mut results = Vec::with_capacity(part_count);

        for (part_index, part) in self.context.parts.iter().enumerate() {
            info!("(Iteration {}) {}: processing part {}/{} ({:.2} %)",
                iteration, self.descriptor.name(), part_index + 1, part_count, self.context.progress(part_index));
            let part_start = Instant::now();
            let (part_width, part_height) = part.size();

            let (part_features, elapsed) = match self.detect(part) {
                Some(detected) => detected,
                None => continue
            };
            self.context.diagnostics.part_descriptor.push(elapsed);
            self.context.diagnostics.part_descriptor_size.push(part_features.descriptors.size());

            let mut best: Option<BestImage> = None;
            let all_images_start = Instant::now();
            for data in self.image_data.iter() {
                let image_start = Instant::now();
                match self.matcher.match_descriptors(&part_features.descriptors, &data.features.descriptors) {
                    Ok(matches) if !matches.is_empty() => {
                        let (top, distance) = top_matches(matches, self.matching_parameters.top_matches);
                        if best.as_ref().map_or(true, |b| distance < b.distance) {
                            best = Some(BestImage { data, distance, top_matches: top });
                        }
                    },
                    Ok(_) => debug!("no mutual matches between {} and image {}", part.file_path, data.image_index + 1),
                    Err(e) => error!("matching {} failed ({}), skipping image", part.file_path, e)
                }
                self.context.diagnostics.individual_image_matching.push(image_start.elapsed());
            }

            self.context.diagnostics.all_images_matching.push(all_images_start.elapsed());
            self.context.diagnostics.part_process.push(part_start.elapsed());

            let best = best.and_then(|b| b.top_matches.first().copied().map(|m| (m, b)));
            let (location, keypoints) = match best {
                Some((best_match, best)) => {
                    let part_keypoint = &part_features.keypoints[best_match.query_idx];
                    let image_keypoint = &best.data.features.keypoints[best_match.train_idx];
                    let start_x = (image_keypoint.x - part_keypoint.x).round() as i64;
                    let start_y = (image_keypoint.y - part_keypoint.y).round() as i64;
                    let location = MatchLocation {
                        image_index: best.data.image_index,
                        image_path: self.context.images[best.data.image_index].file_path.clone(),
                        start: (start_x, start_y),
                        end: (start_x + part_width as i64, start_y + part_height as i64),
                        distance: best.distance
                    };
                    let evidence = KeypointEvidence {
                        part_keypoints: part_features.keypoints.clone(),
                        image_keypoints: best.data.features.keypoints.clone(),
                        top_matches: best.top_matches
                    };
                    (Some(location), Some(evidence))
                },
                None => {
                    info!("{} has no keypoint match in any image", part.file_path);
                    (None, None)
                }
            };

            results.push(MatchingResult { part_index, part_path: part.file_path.clone(), location, keypoints });
        }

        self.context.results.extend(results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_matches_are_sorted_and_cut() {
        let matches = vec![
            DMatch { query_idx: 0, train_idx: 0, distance: 3.0 },
            DMatch { query_idx: 1, train_idx: 1, distance: 1.0 },
            DMatch { query_idx: 2, train_idx: 2, distance: 2.0 }
        ];
        let (top, total) = top_matches(matches, 2);
        assert_eq!(top.iter().map(|m| m.query_idx).collect::<Vec<usize>>(), vec![1,2]);
        assert_eq!(total, 3.0);
    }

    #[test]
    fn detection_validity() {
        use crate::image::features::KeyPoint;
        let none = KeypointFeatures::real(vec![], vec![]);
        assert_eq!(check_valid_detect_output(&none), Err("No keypoints detected"));
        let no_descriptors = KeypointFeatures::real(vec![KeyPoint::new(1.0, 1.0, 7.0)], vec![]);
        assert_eq!(check_valid_detect_output(&no_descriptors), Err("No descriptors computed"));
        let ok = KeypointFeatures::real(vec![KeyPoint::new(1.0, 1.0, 7.0)], vec![vec![0.0; 4]]);
        assert!(check_valid_detect_output(&ok).is_ok());
    }
}
