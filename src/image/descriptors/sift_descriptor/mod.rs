extern crate image as image_rs;

use image_rs::GrayImage;
use log::debug;

use crate::Float;
use crate::image::features::KeyPoint;
use crate::image::descriptors::KeypointFeatures;
use crate::image::pyramid::sift::{build_sift_pyramid,features_from_octave,octave_to_image_scale,sift_runtime_params::SiftRuntimeParams};
use self::{orientation_histogram::feature_orientations,local_image_descriptor::LocalImageDescriptor};

pub mod orientation_histogram;
pub mod local_image_descriptor;

/// Difference of gaussian keypoints with one 128 element descriptor per dominant orientation
pub fn compute_sift(image: &GrayImage, runtime_params: &SiftRuntimeParams) -> KeypointFeatures {
    let pyramid = build_sift_pyramid(image, runtime_params);
    let mut keypoints = Vec::<KeyPoint>::new();
    let mut descriptors = Vec::<Vec<Float>>::new();

    for (octave_level, octave) in pyramid.octaves.iter().enumerate() {
        let scale = octave_to_image_scale(octave_level);
        let features = features_from_octave(octave, octave_level, runtime_params);
        debug!("sift octave {}: {} features", octave_level, features.len());
        for feature in &features {
            for orientation in feature_orientations(octave, feature, runtime_params) {
                let descriptor = LocalImageDescriptor::new(octave, feature, orientation, runtime_params);
                keypoints.push(KeyPoint {
                    x: feature.x*scale,
                    y: feature.y*scale,
                    size: 2.0*feature.sigma*scale,
                    angle: orientation,
                    response: feature.response.abs(),
                    octave: octave_level
                });
                descriptors.push(descriptor.descriptor_vector);
            }
        }
    }

    KeypointFeatures::real(keypoints, descriptors)
}
