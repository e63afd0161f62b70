extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::image::descriptors::brief_descriptor::{BriefRuntimeParameters,compute_fast_brief};
use super::keypoint::{KeypointDescriptor,KeypointMatcher,KeypointMatchingParameters};

/// FAST corners described by BRIEF, compared under the hamming distance
pub struct FastBrief {
    pub runtime_parameters: BriefRuntimeParameters
}

impl KeypointDescriptor for FastBrief {
    fn name(&self) -> &'static str {
        "BRIEF"
    }

    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures> {
        compute_fast_brief(image, &self.runtime_parameters)
    }
}

pub type BriefMatcher = KeypointMatcher<FastBrief>;

pub fn new_brief_matcher(runtime_parameters: BriefRuntimeParameters, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> BriefMatcher {
    KeypointMatcher::new(FastBrief { runtime_parameters }, matching_parameters, parts, images, iteration)
}
