extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::GrayImage;
use na::DMatrix;
use serde::{Serialize, Deserialize};

use crate::Float;
use crate::numerics::gauss_2d;
use crate::image::Image;
use crate::image::integral_image::IntegralImage;
use crate::image::features::KeyPoint;
use crate::image::descriptors::KeypointFeatures;

/// Box filter layouts for a 9x9 filter as (x1, y1, x2, y2, weight), scaled for larger filters
const DXX_PATTERN: [(Float,Float,Float,Float,Float);3] = [(0.0,2.0,3.0,7.0,1.0),(3.0,2.0,6.0,7.0,-2.0),(6.0,2.0,9.0,7.0,1.0)];
const DYY_PATTERN: [(Float,Float,Float,Float,Float);3] = [(2.0,0.0,7.0,3.0,1.0),(2.0,3.0,7.0,6.0,-2.0),(2.0,6.0,7.0,9.0,1.0)];
const DXY_PATTERN: [(Float,Float,Float,Float,Float);4] = [(1.0,1.0,4.0,4.0,1.0),(5.0,1.0,8.0,4.0,-1.0),(1.0,5.0,4.0,8.0,-1.0),(5.0,5.0,8.0,8.0,1.0)];

const DESCRIPTOR_SUBREGIONS: usize = 4;
const SAMPLES_PER_SUBREGION: usize = 5;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SurfRuntimeParameters {
    pub hessian_threshold: Float,
    pub octave_count: usize,
    pub layer_count: usize
}

impl Default for SurfRuntimeParameters {
    fn default() -> SurfRuntimeParameters {
        SurfRuntimeParameters { hessian_threshold: 100.0, octave_count: 4, layer_count: 5 }
    }
}

struct ResponseLayer {
    filter_size: usize,
    responses: DMatrix<Float>
}

fn filter_size(octave: usize, layer: usize) -> usize {
    (9 + 6*layer)*(1 << octave)
}

fn pattern_response(integral: &IntegralImage, pattern: &[(Float,Float,Float,Float,Float)], left: isize, top: isize, size: usize) -> Float {
    let scale = size as Float/9.0;
    pattern.iter().map(|&(x1,y1,x2,y2,weight)| {
        let bx1 = (x1*scale).round() as isize;
        let by1 = (y1*scale).round() as isize;
        let bx2 = (x2*scale).round() as isize;
        let by2 = (y2*scale).round() as isize;
        weight*integral.box_sum(left + bx1, top + by1, bx2 - bx1, by2 - by1)
    }).sum()
}

/// Approximated determinant of the hessian, normalised by the filter area
fn hessian_determinant(integral: &IntegralImage, x: usize, y: usize, size: usize) -> Float {
    let left = x as isize - (size/2) as isize;
    let top = y as isize - (size/2) as isize;
    let norm = 1.0/((size*size) as Float);
    let dxx = pattern_response(integral, &DXX_PATTERN, left, top, size)*norm;
    let dyy = pattern_response(integral, &DYY_PATTERN, left, top, size)*norm;
    let dxy = pattern_response(integral, &DXY_PATTERN, left, top, size)*norm;
    dxx*dyy - (0.9*dxy).powi(2)
}

fn fits(x: usize, y: usize, size: usize, width: usize, height: usize) -> bool {
    let half = size/2;
    x >= half && y >= half && x - half + size <= width && y - half + size <= height
}

fn build_octave_layers(integral: &IntegralImage, octave: usize, runtime_parameters: &SurfRuntimeParameters) -> Vec<ResponseLayer> {
    let step = 1usize << octave;
    let width = integral.width();
    let height = integral.height();
    let grid_w = (width + step - 1)/step;
    let grid_h = (height + step - 1)/step;

    (0..runtime_parameters.layer_count).map(|layer| {
        let size = filter_size(octave, layer);
        let responses = DMatrix::<Float>::from_fn(grid_h, grid_w, |gy,gx| {
            let (x,y) = (gx*step, gy*step);
            match fits(x, y, size, width, height) {
                true => hessian_determinant(integral, x, y, size),
                false => 0.0
            }
        });
        ResponseLayer { filter_size: size, responses }
    }).collect()
}

fn is_local_maximum(layers: &[ResponseLayer], layer: usize, gx: usize, gy: usize) -> bool {
    let value = layers[layer].responses[(gy,gx)];
    for l in layer-1..layer+2 {
        for r in gy-1..gy+2 {
            for c in gx-1..gx+2 {
                if (l,r,c) != (layer,gy,gx) && layers[l].responses[(r,c)] >= value {
                    return false;
                }
            }
        }
    }
    true
}

pub fn detect_keypoints(integral: &IntegralImage, runtime_parameters: &SurfRuntimeParameters) -> Vec<KeyPoint> {
    let width = integral.width();
    let height = integral.height();
    let mut keypoints = Vec::<KeyPoint>::new();

    for octave in 0..runtime_parameters.octave_count {
        let step = 1usize << octave;
        let layers = build_octave_layers(integral, octave, runtime_parameters);
        if layers.len() < 3 {
            break;
        }
        let grid_h = layers[0].responses.nrows();
        let grid_w = layers[0].responses.ncols();
        if grid_h < 3 || grid_w < 3 {
            break;
        }

        for layer in 1..layers.len()-1 {
            let largest = layers[layer+1].filter_size;
            for gy in 1..grid_h-1 {
                for gx in 1..grid_w-1 {
                    let (x,y) = (gx*step, gy*step);
                    let value = layers[layer].responses[(gy,gx)];
                    if value <= runtime_parameters.hessian_threshold || !fits(x, y, largest, width, height) {
                        continue;
                    }
                    if is_local_maximum(&layers, layer, gx, gy) {
                        let mut keypoint = KeyPoint::new(x as Float, y as Float, layers[layer].filter_size as Float);
                        keypoint.response = value;
                        keypoint.octave = octave;
                        keypoints.push(keypoint);
                    }
                }
            }
        }
    }

    keypoints
}

fn haar_x(integral: &IntegralImage, x: isize, y: isize, size: isize) -> Float {
    let half = size/2;
    integral.box_sum(x, y-half, half, size) - integral.box_sum(x-half, y-half, half, size)
}

fn haar_y(integral: &IntegralImage, x: isize, y: isize, size: isize) -> Float {
    let half = size/2;
    integral.box_sum(x-half, y, size, half) - integral.box_sum(x-half, y-half, size, half)
}

/// Upright SURF-64 over a 20s window split into 4x4 subregions
pub fn describe(integral: &IntegralImage, keypoint: &KeyPoint) -> Vec<Float> {
    let scale = 1.2*keypoint.size/9.0;
    let haar_size = (2.0*scale).round().max(2.0) as isize;
    let half_samples = (DESCRIPTOR_SUBREGIONS*SAMPLES_PER_SUBREGION/2) as isize;
    let mut descriptor = vec![0.0; DESCRIPTOR_SUBREGIONS*DESCRIPTOR_SUBREGIONS*4];

    for i in -half_samples..half_samples {
        for j in -half_samples..half_samples {
            let sample_x = keypoint.x + (j as Float + 0.5)*scale;
            let sample_y = keypoint.y + (i as Float + 0.5)*scale;
            let weight = gauss_2d(keypoint.x, keypoint.y, sample_x, sample_y, 3.3*scale);
            let (sx, sy) = (sample_x.round() as isize, sample_y.round() as isize);
            let dx = weight*haar_x(integral, sx, sy, haar_size);
            let dy = weight*haar_y(integral, sx, sy, haar_size);

            let sub_row = ((i + half_samples) as usize)/SAMPLES_PER_SUBREGION;
            let sub_col = ((j + half_samples) as usize)/SAMPLES_PER_SUBREGION;
            let base = (sub_row*DESCRIPTOR_SUBREGIONS + sub_col)*4;
            descriptor[base] += dx;
            descriptor[base+1] += dy;
            descriptor[base+2] += dx.abs();
            descriptor[base+3] += dy.abs();
        }
    }

    let norm = descriptor.iter().map(|v| v*v).sum::<Float>().sqrt();
    if norm > 0.0 {
        for v in descriptor.iter_mut() {
            *v /= norm;
        }
    }
    descriptor
}

pub fn compute_surf(image: &GrayImage, runtime_parameters: &SurfRuntimeParameters) -> KeypointFeatures {
    let integral = IntegralImage::new(&Image::from_gray_image(image, false));
    let keypoints = detect_keypoints(&integral, runtime_parameters);
    let descriptors = keypoints.iter().map(|k| describe(&integral, k)).collect::<Vec<Vec<Float>>>();
    KeypointFeatures::real(keypoints, descriptors)
}
