use serde::{Serialize, Deserialize};
use crate::Float;

pub mod geometry;
pub mod fast_feature;
pub mod harris_corner;
pub mod intensity_centroid;
pub mod orb_feature;

pub trait Feature {
    fn get_x_image_float(&self) -> Float;
    fn get_y_image_float(&self) -> Float;
    fn get_x_image(&self) -> usize {
        self.get_x_image_float().trunc().max(0.0) as usize
    }
    fn get_y_image(&self) -> usize {
        self.get_y_image_float().trunc().max(0.0) as usize
    }
    fn get_closest_sigma_level(&self) -> usize;
    fn reconstruct_original_coordiantes_for_float(&self, pyramid_scaling: Float) -> (Float, Float) {
        let factor = pyramid_scaling.powi(self.get_closest_sigma_level() as i32);
        (self.get_x_image_float()*factor, self.get_y_image_float()*factor)
    }
}

pub trait Oriented {
    fn get_orientation(&self) -> Float;
}

/// A detected keypoint in level 0 image coordinates.
/// `size` is the diameter of the meaningful neighbourhood, `angle` is in radians measured in image coordinates.
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct KeyPoint {
    pub x: Float,
    pub y: Float,
    pub size: Float,
    pub angle: Float,
    pub response: Float,
    pub octave: usize
}

impl KeyPoint {
    pub fn new(x: Float, y: Float, size: Float) -> KeyPoint {
        KeyPoint { x, y, size, angle: 0.0, response: 0.0, octave: 0 }
    }
}

impl Feature for KeyPoint {
    fn get_x_image_float(&self) -> Float { self.x }
    fn get_y_image_float(&self) -> Float { self.y }
    fn get_closest_sigma_level(&self) -> usize { self.octave }
}

impl Oriented for KeyPoint {
    fn get_orientation(&self) -> Float {
        self.angle
    }
}
