extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::KeypointFeatures;
use crate::image::descriptors::surf_descriptor::{SurfRuntimeParameters,compute_surf};
use super::keypoint::{KeypointDescriptor,KeypointMatcher,KeypointMatchingParameters};

/// Upright SURF, compared under L2
pub struct Surf {
    pub runtime_parameters: SurfRuntimeParameters
}

impl KeypointDescriptor for Surf {
    fn name(&self) -> &'static str {
        "SURF"
    }

    fn compute(&self, image: &GrayImage) -> Result<KeypointFeatures> {
        Ok(compute_surf(image, &self.runtime_parameters))
    }
}

pub type SurfMatcher = KeypointMatcher<Surf>;

pub fn new_surf_matcher(runtime_parameters: SurfRuntimeParameters, matching_parameters: KeypointMatchingParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> SurfMatcher {
    KeypointMatcher::new(Surf { runtime_parameters }, matching_parameters, parts, images, iteration)
}
