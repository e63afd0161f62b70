extern crate image as image_rs;
extern crate rand_distr;
extern crate rand;
extern crate nalgebra as na;

use image_rs::GrayImage;
use rand::prelude::*;
use rand_distr::{Normal,Distribution};
use na::DMatrix;
use serde::{Serialize, Deserialize};

use crate::image::Image;
use crate::image::filter::gaussian_blur;
use crate::image::features::{KeyPoint, geometry::point::Point, fast_feature::{FastFeature,FastRuntimeParameters}};
use crate::image::descriptors::KeypointFeatures;
use crate::{BenchError,Result,Float,float};
use crate::numerics::{rotation_matrix_2d_from_orientation,wrap_angle};
use self::bit_vector::BitVector;

pub mod bit_vector;

const SAMPLING_SEED: u64 = 0x0DDB1A5ECBAD5EED;

pub type SamplePattern = Vec<(Point<Float>,Point<Float>)>;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct BriefRuntimeParameters {
    pub fast: FastRuntimeParameters,
    pub brief_n: usize,
    pub brief_s: usize,
    pub blur_sigma: Float
}

impl Default for BriefRuntimeParameters {
    fn default() -> BriefRuntimeParameters {
        BriefRuntimeParameters {
            fast: FastRuntimeParameters::default(),
            brief_n: 256,
            brief_s: 48,
            blur_sigma: 2.0
        }
    }
}

#[derive(Debug,Clone)]
pub struct BriefDescriptor {
    pub bit_vector: BitVector
}

impl BriefDescriptor {

    /// One sample pattern per rotation step, all derived from the same seeded pairs.
    /// Samples are isotropic gaussian with std S/5 and clipped to the patch.
    pub fn generate_sample_lookup_tables(brief_n: usize, brief_s: usize, step: usize) -> Result<Vec<SamplePattern>> {
        let std_dev = brief_s as Float/5.0;
        let patch_radius = (brief_s as Float - 1.0)/2.0;

        let mut sampling_thread = SmallRng::seed_from_u64(SAMPLING_SEED);
        let normal_distribution = Normal::new(0.0,std_dev).map_err(|e| BenchError::Descriptor(e.to_string()))?;

        let mut samples_delta_a = DMatrix::<Float>::zeros(2,brief_n);
        let mut samples_delta_b = DMatrix::<Float>::zeros(2,brief_n);
        for i in 0..brief_n {
            let (delta_a,delta_b) = BriefDescriptor::generate_sample_pair(&mut sampling_thread,&normal_distribution, patch_radius);
            samples_delta_a[(0,i)] = delta_a.x;
            samples_delta_a[(1,i)] = delta_a.y;
            samples_delta_b[(0,i)] = delta_b.x;
            samples_delta_b[(1,i)] = delta_b.y;
        }

        let step = step.max(1);
        let table_inc = 2.0*float::consts::PI/(step as Float);
        let lookup_tables = (0..step).map(|j| {
            let rotation_matrix = rotation_matrix_2d_from_orientation(table_inc*j as Float);
            let rotated_delta_a = rotation_matrix*&samples_delta_a;
            let rotated_delta_b = rotation_matrix*&samples_delta_b;
            (0..brief_n).map(|i| (
                Point::new(rotated_delta_a[(0,i)], rotated_delta_a[(1,i)]),
                Point::new(rotated_delta_b[(0,i)], rotated_delta_b[(1,i)])
            )).collect::<SamplePattern>()
        }).collect::<Vec<SamplePattern>>();

        Ok(lookup_tables)
    }

    /// Returns None if any sample of the selected pattern falls outside the image
    pub fn new(image: &Image, x: Float, y: Float, orientation: Float, sample_lookup_tables: &[SamplePattern]) -> Option<BriefDescriptor> {
        let table_count = sample_lookup_tables.len();
        if table_count == 0 {
            return None;
        }
        let table_inc = 2.0*float::consts::PI/(table_count as Float);
        let sample_pair_idx = (wrap_angle(orientation)/table_inc).round() as usize % table_count;
        let samples_pattern = &sample_lookup_tables[sample_pair_idx];

        let mut bit_vector = BitVector::new(samples_pattern.len());
        for (sample_a,sample_b) in samples_pattern {
            let a = BriefDescriptor::pixel_in_image(image, x + sample_a.x, y + sample_a.y)?;
            let b = BriefDescriptor::pixel_in_image(image, x + sample_b.x, y + sample_b.y)?;
            bit_vector.add_value(BriefDescriptor::bit_value(&image.buffer,&a, &b));
        }

        Some(BriefDescriptor{bit_vector})
    }

    fn generate_sample_pair(sampling_thread: &mut dyn RngCore,normal_dist: &Normal<Float>, patch_radius: Float) -> (Point<Float>,Point<Float>) {
        let a_x = normal_dist.sample(sampling_thread).clamp(-patch_radius, patch_radius);
        let a_y = normal_dist.sample(sampling_thread).clamp(-patch_radius, patch_radius);
        let b_x = normal_dist.sample(sampling_thread).clamp(-patch_radius, patch_radius);
        let b_y = normal_dist.sample(sampling_thread).clamp(-patch_radius, patch_radius);

        (Point{x: a_x, y: a_y},Point{x: b_x, y: b_y})
    }

    fn bit_value(image_buffer: &DMatrix<Float>, a: &Point<usize>, b: &Point<usize>) -> bool {
        image_buffer[(a.y,a.x)] < image_buffer[(b.y,b.x)]
    }

    fn pixel_in_image(image: &Image, x: Float, y: Float) -> Option<Point<usize>> {
        let (c, r) = (x.round(), y.round());
        match c >= 0.0 && r >= 0.0 && (c as usize) < image.width() && (r as usize) < image.height() {
            true => Some(Point::new(c as usize, r as usize)),
            false => None
        }
    }
}

/// Describes the given keypoints on an already smoothed image. Keypoints without a descriptor are dropped.
pub fn describe_keypoints(smoothed: &Image, keypoints: &[KeyPoint], sample_lookup_tables: &[SamplePattern]) -> KeypointFeatures {
    let (kept, descriptors): (Vec<KeyPoint>, Vec<BitVector>) = keypoints.iter()
        .filter_map(|k| BriefDescriptor::new(smoothed, k.x, k.y, k.angle, sample_lookup_tables).map(|d| (*k, d.bit_vector)))
        .unzip();
    KeypointFeatures::binary(kept, descriptors)
}

/// FAST keypoints described by an unsteered BRIEF pattern
pub fn compute_fast_brief(image: &GrayImage, runtime_parameters: &BriefRuntimeParameters) -> Result<KeypointFeatures> {
    let keypoints = FastFeature::detect_keypoints(image, &runtime_parameters.fast);
    let sample_lookup_tables = BriefDescriptor::generate_sample_lookup_tables(runtime_parameters.brief_n, runtime_parameters.brief_s, 1)?;
    let smoothed = gaussian_blur(&Image::from_gray_image(image, false), runtime_parameters.blur_sigma);
    Ok(describe_keypoints(&smoothed, &keypoints, &sample_lookup_tables))
}
