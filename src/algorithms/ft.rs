extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Result;
use crate::io::InputImage;
use crate::image::descriptors::fuzzy_transform::{FuzzyTransformRuntimeParameters,compute_fuzzy_transform};
use crate::matching::descriptor_volume::DescriptorVolume;
use super::dense::{DenseDescriptor,DenseMatcher};

pub struct FuzzyTransform {
    pub runtime_parameters: FuzzyTransformRuntimeParameters
}

impl DenseDescriptor for FuzzyTransform {
    fn name(&self) -> &'static str {
        "FT"
    }

    fn compute(&self, image: &GrayImage) -> Result<DescriptorVolume> {
        compute_fuzzy_transform(image, &self.runtime_parameters)
    }

    fn scale(&self) -> (usize,usize) {
        (self.runtime_parameters.radius, self.runtime_parameters.radius)
    }
}

pub type FuzzyTransformMatcher = DenseMatcher<FuzzyTransform>;

pub fn new_ft_matcher(runtime_parameters: FuzzyTransformRuntimeParameters, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> FuzzyTransformMatcher {
    DenseMatcher::new(FuzzyTransform { runtime_parameters }, parts, images, iteration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgb,RgbImage};
    use crate::algorithms::MatchingAlgorithm;
    use crate::report::ReportKind;

    fn scene(object: (u32,u32)) -> RgbImage {
        RgbImage::from_fn(96, 80, |x,y| {
            let inside = x >= object.0 && x < object.0 + 16 && y >= object.1 && y < object.1 + 16;
            match inside {
                true => {
                    let v = (40 + ((x - object.0)*13 + (y - object.1)*29) % 200) as u8;
                    Rgb([v,v,v])
                },
                false => Rgb([100,100,100])
            }
        })
    }

    #[test]
    fn part_is_found_on_the_node_grid() {
        let image = scene((32,24));
        let part = image_rs::imageops::crop_imm(&image, 24, 16, 32, 32).to_image();
        let mut ft = new_ft_matcher(FuzzyTransformRuntimeParameters::default(), vec![InputImage::new(part, None)], vec![InputImage::new(image, None)], 0);
        ft.process();

        let location = ft.results()[0].location.as_ref().unwrap();
        assert_eq!(location.start, (24,16));
        assert_eq!(location.end, (56,48));
        assert!(location.distance < 1e-6);
        // 13x11 image nodes, 5x5 part nodes
        assert_eq!(ft.diagnostics().subsets, vec![9*7]);
        assert_eq!(ft.diagnostics().part_descriptor_size, vec![25]);
        assert_eq!(ft.report().summary.kind, ReportKind::Dense);
    }

    #[test]
    fn oversized_part_has_no_location() {
        let image = RgbImage::from_pixel(16, 16, Rgb([1,1,1]));
        let part = RgbImage::from_pixel(40, 8, Rgb([1,1,1]));
        let mut ft = new_ft_matcher(FuzzyTransformRuntimeParameters::default(), vec![InputImage::new(part, None)], vec![InputImage::new(image, None)], 0);
        ft.process();
        assert!(ft.results()[0].location.is_none());
        assert_eq!(ft.diagnostics().subsets, vec![0]);
    }
}
