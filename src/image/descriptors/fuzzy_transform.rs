extern crate image as image_rs;

use image_rs::GrayImage;
use serde::{Serialize, Deserialize};

use crate::{BenchError,Result,Float};
use crate::image::Image;
use crate::matching::descriptor_volume::DescriptorVolume;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FuzzyTransformRuntimeParameters {
    pub radius: usize
}

impl Default for FuzzyTransformRuntimeParameters {
    fn default() -> FuzzyTransformRuntimeParameters {
        FuzzyTransformRuntimeParameters { radius: 8 }
    }
}

/// Triangular basis function, zero from `radius` on
fn linear_kernel(distance: isize, radius: isize) -> Float {
    match distance.abs() {
        d if d >= radius => 0.0,
        d => 1.0 - (d as Float)/(radius as Float)
    }
}

/// Zero degree fuzzy transform components on a grid of nodes `radius` pixels apart.
/// Pixels outside the image do not contribute to the weighted mean.
pub fn compute_components(image: &Image, radius: usize) -> Result<DescriptorVolume> {
    if radius == 0 {
        return Err(BenchError::Descriptor("fuzzy transform radius must be positive".to_string()));
    }
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Err(BenchError::Descriptor("empty image".to_string()));
    }

    let r = radius as isize;
    let components_x = width/radius + 1;
    let components_y = height/radius + 1;
    let mut volume = DescriptorVolume::zeros(components_x, components_y, 1);

    for o in 0..components_y {
        for p in 0..components_x {
            let x_center = (p*radius) as isize;
            let y_center = (o*radius) as isize;
            let mut weighted_sum = 0.0;
            let mut weight_sum = 0.0;
            for y in (y_center-r+1).max(0)..(y_center+r).min(height as isize) {
                let weight_y = linear_kernel(y - y_center, r);
                for x in (x_center-r+1).max(0)..(x_center+r).min(width as isize) {
                    let weight = weight_y*linear_kernel(x - x_center, r);
                    weighted_sum += weight*image.buffer[(y as usize, x as usize)];
                    weight_sum += weight;
                }
            }
            if weight_sum > 0.0 {
                volume.set(p, o, 0, weighted_sum/weight_sum);
            }
        }
    }

    Ok(volume)
}

pub fn compute_fuzzy_transform(image: &GrayImage, runtime_parameters: &FuzzyTransformRuntimeParameters) -> Result<DescriptorVolume> {
    compute_components(&Image::from_gray_image(image, false), runtime_parameters.radius)
}
