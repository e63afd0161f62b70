extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::image::pyramid::orb::{OrbRuntimeParameters,compute_orb};
use super::keypoint::{KeypointDescriptor,KeypointMatcher,KeypointMatchingParameters};

pub struct Orb {
    pub runtime_parameters: OrbRuntimeParameters
}

impl KeypointDescriptor for Orb {
    fn name(&self) -> &'static str {
        "ORB"
    }

    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures> {
        compute_orb(image, &self.runtime_parameters)
    }
}

pub type OrbMatcher = KeypointMatcher<Orb>;

pub fn new_orb_matcher(runtime_parameters: OrbRuntimeParameters, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> OrbMatcher {
    KeypointMatcher::new(Orb { runtime_parameters }, matching_parameters, parts, images, iteration)
}
