extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::image::pyramid::sift::sift_runtime_params::SiftRuntimeParams;
use crate::image::descriptors::sift_descriptor::compute_sift;
use super::keypoint::{KeypointDescriptor,KeypointMatcher,KeypointMatchingParameters};

pub struct Sift {
    pub runtime_parameters: SiftRuntimeParams
}

impl KeypointDescriptor for Sift {
    fn name(&self) -> &'static str {
        "SIFT"
    }

    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures> {
        Ok(compute_sift(image, &self.runtime_parameters))
    }
}

pub type SiftMatcher = KeypointMatcher<Sift>;

pub fn new_sift_matcher(runtime_parameters: SiftRuntimeParams, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> SiftMatcher {
    KeypointMatcher::new(Sift { runtime_parameters }, matching_parameters, parts, images, iteration)
}
