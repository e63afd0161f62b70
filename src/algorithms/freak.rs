extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::image::descriptors::freak_descriptor::{FreakRuntimeParameters,compute_fast_freak};
use super::keypoint::{KeypointDescriptor,KeypointMatcher,KeypointMatchingParameters};

/// FAST corners described by FREAK
pub struct FastFreak {
    pub runtime_parameters: FreakRuntimeParameters
}

impl KeypointDescriptor for FastFreak {
    fn name(&self) -> &'static str {
        "FREAK"
    }

    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures> {
        Ok(compute_fast_freak(image, &self.runtime_parameters))
    }
}

pub type FreakMatcher = KeypointMatcher<FastFreak>;

pub fn new_freak_matcher(runtime_parameters: FreakRuntimeParameters, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> FreakMatcher {
    KeypointMatcher::new(FastFreak { runtime_parameters }, matching_parameters, parts, images, iteration)
}
