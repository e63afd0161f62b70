extern crate image as image_rs;

use image_rs::GrayImage;

use crate::Float;
use crate::image::Image;
use crate::image::filter::gaussian_blur;
use crate::image::pyramid::{Pyramid,sift::{sift_octave::{SiftOctave,SiftFeature},sift_runtime_params::SiftRuntimeParams}};

pub mod sift_runtime_params;
pub mod sift_octave;

pub type SiftPyramid = Pyramid<SiftOctave>;

/// Number of octaves until the smaller side of the doubled base image would drop below `min_octave_size`
pub fn octave_count(width: usize, height: usize, runtime_params: &SiftRuntimeParams) -> usize {
    let mut side = 2*width.min(height);
    let mut count = 0;
    while side >= runtime_params.min_octave_size.max(1) {
        count += 1;
        side /= 2;
    }
    count
}

/// Intensities are scaled to [0,1]. The base is doubled and blurred to `sigma_initial`.
pub fn build_sift_pyramid(base_gray_image: &GrayImage, runtime_params: &SiftRuntimeParams) -> SiftPyramid {
    let mut base_image = Image::from_gray_image(base_gray_image, false);
    base_image.buffer /= 255.0;
    let upsample = Image::upsample_double(&base_image);

    let octave_count = octave_count(base_image.width(), base_image.height(), runtime_params);
    let mut octaves: Vec<SiftOctave> = Vec::with_capacity(octave_count);
    if octave_count == 0 {
        return Pyramid{octaves};
    }

    let sigma_diff = (runtime_params.sigma_initial.powi(2) - (2.0*runtime_params.sigma_in).powi(2)).max(0.01).sqrt();
    let mut octave_image = gaussian_blur(&upsample, sigma_diff);
    let sigma_count = runtime_params.sigma_count;

    for i in 0..octave_count {
        if i > 0 {
            octave_image = Image::downsample_half(&octaves[i-1].images[sigma_count]);
        }
        octaves.push(SiftOctave::build_octave(&octave_image, sigma_count, runtime_params.sigma_initial));
    }

    Pyramid{octaves}
}

pub fn features_from_octave(octave: &SiftOctave, octave_level: usize, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    (1..octave.s()+1)
        .flat_map(|layer| octave.detect_extrema(octave_level, layer, runtime_params))
        .filter_map(|extremum| octave.refine(&extremum, runtime_params))
        .collect()
}

/// Factor from octave coordinates to input image coordinates, accounting for the initial doubling
pub fn octave_to_image_scale(octave_level: usize) -> Float {
    0.5*(octave_level as Float).exp2()
}
