extern crate image as image_rs;

use image_rs::GrayImage;
use serde::{Serialize, Deserialize};

use crate::{Float,float};
use crate::numerics::wrap_angle;
use crate::image::Image;
use crate::image::integral_image::IntegralImage;
use crate::image::features::{KeyPoint,geometry::point::Point,fast_feature::{FastFeature,FastRuntimeParameters}};
use crate::image::descriptors::{KeypointFeatures,brief_descriptor::bit_vector::BitVector};

pub const FREAK_BITS: usize = 512;
const RING_COUNT: usize = 7;
const POINTS_PER_RING: usize = 6;
const ORIENTATION_RINGS: usize = 3;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FreakRuntimeParameters {
    pub fast: FastRuntimeParameters,
    pub pattern_scale: Float,
    pub orientation_normalized: bool
}

impl Default for FreakRuntimeParameters {
    fn default() -> FreakRuntimeParameters {
        FreakRuntimeParameters {
            fast: FastRuntimeParameters::default(),
            pattern_scale: 22.0,
            orientation_normalized: true
        }
    }
}

#[derive(Debug,Clone,Copy)]
struct PatternPoint {
    location: Point<Float>,
    sigma: Float
}

/// Retina sampling pattern: 7 rings of 6 points, alternately offset by half a step, around a center point
#[derive(Debug,Clone)]
pub struct FreakPattern {
    points: Vec<PatternPoint>,
    orientation_pairs: Vec<(usize,usize)>,
    descriptor_pairs: Vec<(usize,usize)>,
    extent: Float
}

impl FreakPattern {
    pub fn new(pattern_scale: Float) -> FreakPattern {
        let big_r = 2.0/3.0;
        let small_r = 2.0/24.0;
        let unit_space = (big_r - small_r)/21.0;
        let radius: [Float; RING_COUNT+1] = [
            big_r, big_r - 6.0*unit_space, big_r - 11.0*unit_space, big_r - 15.0*unit_space,
            big_r - 18.0*unit_space, big_r - 20.0*unit_space, small_r, 0.0];

        let mut points = Vec::<PatternPoint>::with_capacity(RING_COUNT*POINTS_PER_RING + 1);
        for ring in 0..RING_COUNT {
            let beta = (float::consts::PI/POINTS_PER_RING as Float)*((ring % 2) as Float);
            let sigma = radius[ring]/2.0*pattern_scale;
            for k in 0..POINTS_PER_RING {
                let alpha = (k as Float)*2.0*float::consts::PI/(POINTS_PER_RING as Float) + beta;
                points.push(PatternPoint {
                    location: Point::new(radius[ring]*alpha.cos()*pattern_scale, radius[ring]*alpha.sin()*pattern_scale),
                    sigma
                });
            }
        }
        points.push(PatternPoint { location: Point::new(0.0, 0.0), sigma: radius[RING_COUNT-1]/2.0*pattern_scale });

        let orientation_pairs = (0..ORIENTATION_RINGS).flat_map(|ring| {
            let base = ring*POINTS_PER_RING;
            (0..POINTS_PER_RING).flat_map(move |i| (i+1..POINTS_PER_RING).map(move |j| (base+i, base+j)))
        }).collect::<Vec<(usize,usize)>>();

        let mut all_pairs = (0..points.len()).flat_map(|i| (i+1..points.len()).map(move |j| (i,j))).collect::<Vec<(usize,usize)>>();
        let length = |&(i,j): &(usize,usize)| {
            let d = points[i].location - points[j].location;
            (d.x*d.x + d.y*d.y).sqrt()
        };
        // Longest first, index order breaks ties
        all_pairs.sort_by(|a,b| length(b).total_cmp(&length(a)).then(a.cmp(b)));
        all_pairs.truncate(FREAK_BITS);

        let extent = points.iter().map(|p| (p.location.x.powi(2) + p.location.y.powi(2)).sqrt() + p.sigma).fold(0.0, Float::max);

        FreakPattern { points, orientation_pairs, descriptor_pairs: all_pairs, extent }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn orientation_pair_count(&self) -> usize {
        self.orientation_pairs.len()
    }

    pub fn descriptor_pair_count(&self) -> usize {
        self.descriptor_pairs.len()
    }

    fn intensities(&self, integral: &IntegralImage, x: Float, y: Float, orientation: Float) -> Vec<Float> {
        let (sin, cos) = orientation.sin_cos();
        self.points.iter().map(|p| {
            let px = x + cos*p.location.x - sin*p.location.y;
            let py = y + sin*p.location.x + cos*p.location.y;
            let half = p.sigma.round() as isize;
            let side = 2*half + 1;
            integral.box_mean(px.round() as isize - half, py.round() as isize - half, side, side)
        }).collect()
    }

    /// Gradient direction estimated from intensity differences of the orientation pairs
    fn orientation(&self, intensities: &[Float]) -> Float {
        let mut direction_x = 0.0;
        let mut direction_y = 0.0;
        for &(i,j) in &self.orientation_pairs {
            let d = self.points[i].location - self.points[j].location;
            let norm = (d.x*d.x + d.y*d.y).sqrt();
            let delta = intensities[i] - intensities[j];
            direction_x += delta*d.x/norm;
            direction_y += delta*d.y/norm;
        }
        wrap_angle(direction_y.atan2(direction_x))
    }

    /// Returns None if the pattern around the keypoint does not fit into the image
    pub fn describe(&self, integral: &IntegralImage, keypoint: &KeyPoint, orientation_normalized: bool) -> Option<(Float, BitVector)> {
        let margin = self.extent.ceil();
        let within = keypoint.x - margin >= 0.0 && keypoint.y - margin >= 0.0 &&
            keypoint.x + margin < integral.width() as Float && keypoint.y + margin < integral.height() as Float;
        if !within {
            return None;
        }

        let orientation = match orientation_normalized {
            true => self.orientation(&self.intensities(integral, keypoint.x, keypoint.y, 0.0)),
            false => 0.0
        };
        let intensities = self.intensities(integral, keypoint.x, keypoint.y, orientation);

        let mut bit_vector = BitVector::new(self.descriptor_pairs.len());
        for &(i,j) in &self.descriptor_pairs {
            bit_vector.add_value(intensities[i] > intensities[j]);
        }
        Some((orientation, bit_vector))
    }
}

/// FAST keypoints described by FREAK
pub fn compute_fast_freak(image: &GrayImage, runtime_parameters: &FreakRuntimeParameters) -> KeypointFeatures {
    let keypoints = FastFeature::detect_keypoints(image, &runtime_parameters.fast);
    let integral = IntegralImage::new(&Image::from_gray_image(image, false));
    let pattern = FreakPattern::new(runtime_parameters.pattern_scale);

    let (kept, descriptors): (Vec<KeyPoint>, Vec<BitVector>) = keypoints.iter().filter_map(|k| {
        pattern.describe(&integral, k, runtime_parameters.orientation_normalized).map(|(orientation, bits)| {
            let mut keypoint = *k;
            keypoint.angle = orientation;
            (keypoint, bits)
        })
    }).unzip();

    KeypointFeatures::binary(kept, descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Luma;

    #[test]
    fn pattern_has_retina_layout() {
        let pattern = FreakPattern::new(22.0);
        assert_eq!(pattern.point_count(), 43);
        assert_eq!(pattern.orientation_pair_count(), 45);
        assert_eq!(pattern.descriptor_pair_count(), FREAK_BITS);
        assert!((pattern.extent - 22.0).abs() < 1e-9);
    }

    #[test]
    fn border_keypoints_are_dropped() {
        let gray = GrayImage::from_fn(80, 80, |x,y| Luma([((x*3 + y*5) % 256) as u8]));
        let integral = IntegralImage::new(&Image::from_gray_image(&gray, false));
        let pattern = FreakPattern::new(22.0);
        assert!(pattern.describe(&integral, &KeyPoint::new(10.0, 40.0, 7.0), true).is_none());
        let (_, bits) = pattern.describe(&integral, &KeyPoint::new(40.0, 40.0, 7.0), true).unwrap();
        assert_eq!(bits.bytes(), 64);
        assert!(bits.is_full());
    }

    #[test]
    fn shifted_copies_share_descriptors() {
        let gray = GrayImage::from_fn(120, 60, |x,y| Luma([(((x % 60)*4 + y*3) % 256) as u8]));
        let integral = IntegralImage::new(&Image::from_gray_image(&gray, false));
        let pattern = FreakPattern::new(22.0);
        let (angle_a, a) = pattern.describe(&integral, &KeyPoint::new(30.0, 30.0, 7.0), true).unwrap();
        let (angle_b, b) = pattern.describe(&integral, &KeyPoint::new(90.0, 30.0, 7.0), true).unwrap();
        assert_eq!(angle_a, angle_b);
        assert_eq!(a.hamming_distance(&b), 0);
    }
}
