use crate::{float,Float};
use crate::numerics::{gradient_and_orientation,wrap_angle};
use crate::image::pyramid::sift::{sift_octave::{SiftOctave,SiftFeature},sift_runtime_params::SiftRuntimeParams};

/// Histogram of gradient orientations over a d x d grid of cells aligned with the feature orientation
#[derive(Debug,Clone)]
pub struct LocalImageDescriptor {
    pub descriptor_vector: Vec<Float>
}

impl LocalImageDescriptor {
    pub fn new(octave: &SiftOctave, feature: &SiftFeature, orientation: Float, runtime_params: &SiftRuntimeParams) -> LocalImageDescriptor {
        let d = runtime_params.descriptor_width;
        let n = runtime_params.descriptor_bins;
        let image = &octave.images[feature.layer];
        let width = image.width() as isize;
        let height = image.height() as isize;

        let cell_width = 3.0*feature.sigma;
        let diagonal = ((width*width + height*height) as Float).sqrt();
        let radius = (cell_width*(2.0 as Float).sqrt()*(d as Float + 1.0)*0.5).round().min(diagonal) as isize;
        let cos_t = orientation.cos()/cell_width;
        let sin_t = orientation.sin()/cell_width;
        let bins_per_rad = n as Float/(2.0*float::consts::PI);
        let weight_scale = -1.0/(0.5*(d*d) as Float);

        let x_center = feature.x.round() as isize;
        let y_center = feature.y.round() as isize;
        let mut histogram = vec![0.0; d*d*n];

        for i in -radius..radius+1 {
            for j in -radius..radius+1 {
                // Offsets rotated into the feature frame, in cell units
                let c_rot = j as Float*cos_t + i as Float*sin_t;
                let r_rot = -(j as Float)*sin_t + i as Float*cos_t;
                let rbin = r_rot + (d as Float)/2.0 - 0.5;
                let cbin = c_rot + (d as Float)/2.0 - 0.5;
                let x = x_center + j;
                let y = y_center + i;
                if rbin <= -1.0 || rbin >= d as Float || cbin <= -1.0 || cbin >= d as Float || x < 1 || y < 1 || x >= width-1 || y >= height-1 {
                    continue;
                }

                let (magnitude, gradient_orientation) = gradient_and_orientation(image, x as usize, y as usize);
                let weight = ((c_rot*c_rot + r_rot*r_rot)*weight_scale).exp();
                let obin = wrap_angle(gradient_orientation - orientation)*bins_per_rad;
                LocalImageDescriptor::add_trilinear(&mut histogram, d, n, rbin, cbin, obin, magnitude*weight);
            }
        }

        LocalImageDescriptor { descriptor_vector: LocalImageDescriptor::normalize(histogram, runtime_params.descriptor_magnitude_cap) }
    }

    fn add_trilinear(histogram: &mut [Float], d: usize, n: usize, rbin: Float, cbin: Float, obin: Float, value: Float) -> () {
        let r0 = rbin.floor();
        let c0 = cbin.floor();
        let o0 = obin.floor();
        let dr = rbin - r0;
        let dc = cbin - c0;
        let d_o = obin - o0;

        for (r_idx, r_weight) in [(r0 as isize, 1.0 - dr), (r0 as isize + 1, dr)] {
            if r_idx < 0 || r_idx >= d as isize {
                continue;
            }
            for (c_idx, c_weight) in [(c0 as isize, 1.0 - dc), (c0 as isize + 1, dc)] {
                if c_idx < 0 || c_idx >= d as isize {
                    continue;
                }
                for (o_idx, o_weight) in [(o0 as isize, 1.0 - d_o), (o0 as isize + 1, d_o)] {
                    let o = o_idx.rem_euclid(n as isize) as usize;
                    let idx = (r_idx as usize*d + c_idx as usize)*n + o;
                    histogram[idx] += value*r_weight*c_weight*o_weight;
                }
            }
        }
    }

    /// Unit normalisation, clamping at `cap`, renormalisation and quantisation to [0,255]
    fn normalize(mut histogram: Vec<Float>, cap: Float) -> Vec<Float> {
        let norm = histogram.iter().map(|v| v*v).sum::<Float>().sqrt();
        let threshold = norm*cap;
        for v in histogram.iter_mut() {
            *v = v.min(threshold);
        }
        let clamped_norm = histogram.iter().map(|v| v*v).sum::<Float>().sqrt().max(Float::EPSILON);
        let scale = 512.0/clamped_norm;
        histogram.iter().map(|v| (v*scale).round().min(255.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalisation_saturates_and_caps() {
        let mut histogram = vec![0.0; 128];
        histogram[0] = 10.0;
        histogram[1] = 1.0;
        let normalized = LocalImageDescriptor::normalize(histogram, 0.2);
        assert_eq!(normalized.len(), 128);
        assert!(normalized.iter().all(|&v| v >= 0.0 && v <= 255.0));
        assert_eq!(normalized[0], 255.0);
        assert!(normalized[1] > 0.0);
    }

    #[test]
    fn trilinear_weights_sum_to_value() {
        let mut histogram = vec![0.0; 4*4*8];
        LocalImageDescriptor::add_trilinear(&mut histogram, 4, 8, 1.3, 2.6, 7.5, 2.0);
        assert!((histogram.iter().sum::<Float>() - 2.0).abs() < 1e-12);
        assert!(histogram[(1*4 + 2)*8 + 0] > 0.0);
    }
}
