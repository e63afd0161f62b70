extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::GrayImage;
use imageproc::corners::{corners_fast9,Corner};
use na::DMatrix;
use serde::{Serialize, Deserialize};

use crate::image::features::{Feature,KeyPoint,geometry::point::Point};
use crate::Float;

/// Diameter reported for FAST keypoints, the extent of the Bresenham circle of radius 3
pub const FAST_KEYPOINT_SIZE: Float = 7.0;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FastRuntimeParameters {
    pub threshold: u8,
    pub non_max_suppression: bool
}

impl Default for FastRuntimeParameters {
    fn default() -> FastRuntimeParameters {
        FastRuntimeParameters { threshold: 10, non_max_suppression: true }
    }
}

#[derive(Debug,Clone,Copy)]
pub struct FastFeature {
    pub location: Point<usize>,
    pub score: Float
}

impl Feature for FastFeature {
    fn get_x_image_float(&self) -> Float { self.location.x as Float }
    fn get_y_image_float(&self) -> Float { self.location.y as Float }
    fn get_x_image(&self) -> usize { self.location.x }
    fn get_y_image(&self) -> usize { self.location.y }
    fn get_closest_sigma_level(&self) -> usize { 0 }
}

impl FastFeature {

    pub fn compute_features(image: &GrayImage, runtime_parameters: &FastRuntimeParameters) -> Vec<FastFeature> {
        let corners = corners_fast9(image, runtime_parameters.threshold);
        let corners = match runtime_parameters.non_max_suppression {
            true => FastFeature::suppress_non_maxima(&corners, image.width() as usize, image.height() as usize),
            false => corners
        };

        corners.iter().map(|c| FastFeature {
            location: Point::new(c.x as usize, c.y as usize),
            score: c.score as Float
        }).collect()
    }

    pub fn detect_keypoints(image: &GrayImage, runtime_parameters: &FastRuntimeParameters) -> Vec<KeyPoint> {
        FastFeature::compute_features(image, runtime_parameters).iter().map(|f| {
            let mut keypoint = KeyPoint::new(f.get_x_image_float(), f.get_y_image_float(), FAST_KEYPOINT_SIZE);
            keypoint.response = f.score;
            keypoint
        }).collect()
    }

    /// Keeps a corner if no corner in its 3x3 neighbourhood scores higher.
    /// Equal scores are resolved in favour of the corner seen first in row-major order.
    fn suppress_non_maxima(corners: &[Corner], width: usize, height: usize) -> Vec<Corner> {
        let mut scores = DMatrix::<f32>::zeros(height, width);
        let mut order = DMatrix::<usize>::zeros(height, width);
        for corner in corners {
            let (r,c) = (corner.y as usize, corner.x as usize);
            scores[(r,c)] = corner.score;
            order[(r,c)] = (r*width + c) + 1;
        }

        corners.iter().filter(|corner| {
            let (r,c) = (corner.y as isize, corner.x as isize);
            let own_order = order[(r as usize,c as usize)];
            for dy in -1..2isize {
                for dx in -1..2isize {
                    let (nr, nc) = (r+dy, c+dx);
                    if (dx == 0 && dy == 0) || nr < 0 || nc < 0 || nr >= height as isize || nc >= width as isize {
                        continue;
                    }
                    let idx = (nr as usize, nc as usize);
                    if order[idx] == 0 {
                        continue;
                    }
                    let other = scores[idx];
                    if other > corner.score || (other == corner.score && order[idx] < own_order) {
                        return false;
                    }
                }
            }
            true
        }).cloned().collect()
    }
}
