extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::hog_descriptor::{HogRuntimeParameters,compute_hog};
use crate::matching::descriptor_volume::DescriptorVolume;
use super::dense::{DenseDescriptor,DenseMatcher};

pub struct Hog {
    pub runtime_parameters: HogRuntimeParameters
}

impl DenseDescriptor for Hog {
    fn name(&self) -> &'static str {
        "HOG"
    }

    fn compute(&self, image: &GrayImage) -> Result<DescriptorVolume> {
        compute_hog(image, &self.runtime_parameters)
    }

    fn scale(&self) -> (usize,usize) {
        let s = self.runtime_parameters.scale();
        (s, s)
    }
}

pub type HogMatcher = DenseMatcher<Hog>;

pub fn new_hog_matcher(runtime_parameters: HogRuntimeParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> HogMatcher {
    DenseMatcher::new(Hog { runtime_parameters }, parts, images, iteration)
}
