extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::GrayImage;
use na::DMatrix;
use serde::{Serialize, Deserialize};

use crate::{Float,Result};
use crate::image::Image;
use crate::image::filter::gaussian_blur;
use crate::image::pyramid::Pyramid;
use crate::image::features::{Feature,Oriented,KeyPoint,orb_feature::OrbFeature};
use crate::image::descriptors::{KeypointFeatures,brief_descriptor::{BriefDescriptor,bit_vector::BitVector}};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct OrbRuntimeParameters {
    pub octave_count: usize,
    pub scale_factor: Float,
    pub max_features: usize,
    pub fast_threshold: u8,
    pub edge_threshold: usize,
    pub harris_k: Float,
    pub harris_window_radius: usize,
    pub orientation_radius: usize,
    pub blur_sigma: Float,
    pub brief_n: usize,
    pub brief_s: usize,
    pub brief_lookup_table_step: usize
}

impl Default for OrbRuntimeParameters {
    fn default() -> OrbRuntimeParameters {
        OrbRuntimeParameters {
            octave_count: 8,
            scale_factor: 1.2,
            max_features: 500,
            fast_threshold: 20,
            edge_threshold: 31,
            harris_k: 0.04,
            harris_window_radius: 3,
            orientation_radius: 15,
            blur_sigma: 2.0,
            brief_n: 256,
            brief_s: 31,
            brief_lookup_table_step: 30
        }
    }
}

impl OrbRuntimeParameters {
    pub fn level_scale(&self, level: usize) -> Float {
        self.scale_factor.powi(level as i32)
    }
}

/// Resamples the base image by 1/scale_factor per level. Stops early once a level would be empty.
pub fn build_orb_pyramid(base_image: &Image, runtime_parameters: &OrbRuntimeParameters) -> Pyramid<Image> {
    let mut pyramid = Pyramid::<Image>::empty(runtime_parameters.octave_count);
    pyramid.octaves.push(base_image.clone());

    for level in 1..runtime_parameters.octave_count {
        let scale = runtime_parameters.level_scale(level);
        let width = (base_image.width() as Float / scale).round() as usize;
        let height = (base_image.height() as Float / scale).round() as usize;
        if width == 0 || height == 0 {
            break;
        }
        let buffer = DMatrix::<Float>::from_fn(height, width, |r,c| {
            base_image.sample((c as Float + 0.5)*scale - 0.5, (r as Float + 0.5)*scale - 0.5)
        });
        pyramid.octaves.push(Image::from_matrix(&buffer, base_image.original_encoding, false));
    }

    pyramid
}

/// Oriented FAST keypoints with steered BRIEF descriptors, reported in base image coordinates
pub fn compute_orb(image: &GrayImage, runtime_parameters: &OrbRuntimeParameters) -> Result<KeypointFeatures> {
    let pyramid = build_orb_pyramid(&Image::from_gray_image(image, false), runtime_parameters);
    let features = OrbFeature::from_pyramid(&pyramid, runtime_parameters);
    let sample_lookup_tables = BriefDescriptor::generate_sample_lookup_tables(
        runtime_parameters.brief_n,
        runtime_parameters.brief_s,
        runtime_parameters.brief_lookup_table_step)?;
    let smoothed_levels = pyramid.octaves.iter().map(|level| gaussian_blur(level, runtime_parameters.blur_sigma)).collect::<Vec<Image>>();

    let (keypoints, descriptors): (Vec<KeyPoint>, Vec<BitVector>) = features.iter().filter_map(|feature| {
        let level = &smoothed_levels[feature.sigma_level];
        BriefDescriptor::new(level, feature.get_x_image_float(), feature.get_y_image_float(), feature.get_orientation(), &sample_lookup_tables)
            .map(|descriptor| (feature.to_keypoint(runtime_parameters), descriptor.bit_vector))
    }).unzip();

    Ok(KeypointFeatures::binary(keypoints, descriptors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;

    #[test]
    fn orb_descriptors_are_full_length() {
        let gray = GrayImage::from_fn(160, 160, |x,y| match (x % 40, y % 40) {
            (a,b) if (10..26).contains(&a) && (10..26).contains(&b) => image_rs::Luma([210u8]),
            _ => image_rs::Luma([25u8])
        });
        let features = compute_orb(&gray, &OrbRuntimeParameters::default()).unwrap();
        assert!(!features.keypoints.is_empty());
        assert_eq!(features.keypoints.len(), features.descriptors.len());
        assert_eq!(features.descriptors.size(), features.keypoints.len()*32);
    }

    #[test]
    fn levels_shrink_by_scale_factor() {
        let base = Image::from_matrix(&DMatrix::from_element(120, 100, 7.0), ImageEncoding::U8, false);
        let params = OrbRuntimeParameters::default();
        let pyramid = build_orb_pyramid(&base, &params);
        assert_eq!(pyramid.octaves.len(), 8);
        assert_eq!((pyramid.octaves[1].width(), pyramid.octaves[1].height()), (83, 100));
        assert!(pyramid.octaves[7].buffer.iter().all(|&v| (v - 7.0).abs() < 1e-12));
    }
}
