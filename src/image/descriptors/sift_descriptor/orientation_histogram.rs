use crate::{float,Float};
use crate::numerics::{gauss_2d,gradient_and_orientation,parabolic_peak_offset,wrap_angle};
use crate::image::pyramid::sift::{sift_octave::{SiftOctave,SiftFeature},sift_runtime_params::SiftRuntimeParams};

#[derive(Debug,Clone)]
pub struct OrientationHistogram {
    pub bin_range: Float,
    pub bins: Vec<Float>
}

impl OrientationHistogram {

    pub fn new(bin_len: usize) -> OrientationHistogram {
        OrientationHistogram{
            bin_range: 2.0*float::consts::PI/(bin_len as Float),
            bins: vec![0.0;bin_len]
        }
    }

    /// Bin i is centered on the angle i*bin_range
    pub fn add_measurement(&mut self, grad_orientation: (Float,Float), weight: Float) -> () {
        let (grad, orientation) = grad_orientation;
        let index = radian_to_index(self, orientation);
        self.bins[index] += grad*weight;
    }

    pub fn get_value_circular(&self, i: isize) -> Float {
        let len = self.bins.len() as isize;
        self.bins[i.rem_euclid(len) as usize]
    }

    pub fn smooth(&mut self) -> () {
        let smoothed = (0..self.bins.len()).map(|i| {
            let idx = i as isize;
            (self.get_value_circular(idx-2) + self.get_value_circular(idx+2))/16.0 +
            (self.get_value_circular(idx-1) + self.get_value_circular(idx+1))*4.0/16.0 +
            self.get_value_circular(idx)*6.0/16.0
        }).collect::<Vec<Float>>();
        self.bins = smoothed;
    }

    /// Interpolated angles of all local peaks reaching `ratio` times the global maximum
    pub fn peaks(&self, ratio: Float) -> Vec<Float> {
        let max = self.bins.iter().cloned().fold(0.0, Float::max);
        if max <= 0.0 {
            return Vec::new();
        }

        (0..self.bins.len()).filter_map(|i| {
            let idx = i as isize;
            let l = self.get_value_circular(idx-1);
            let c = self.bins[i];
            let r = self.get_value_circular(idx+1);
            match c > l && c > r && c >= ratio*max {
                true => Some(wrap_angle((i as Float + parabolic_peak_offset(l, c, r))*self.bin_range)),
                false => None
            }
        }).collect()
    }
}

pub fn radian_to_index(histogram: &OrientationHistogram, orientation: Float) -> usize {
    let len = histogram.bins.len();
    (wrap_angle(orientation)/histogram.bin_range).round() as usize % len
}

/// Dominant gradient orientations in a gaussian weighted window around the feature
pub fn feature_orientations(octave: &SiftOctave, feature: &SiftFeature, runtime_params: &SiftRuntimeParams) -> Vec<Float> {
    let image = &octave.images[feature.layer];
    let weight_sigma = 1.5*feature.sigma;
    let radius = (3.0*weight_sigma).round() as isize;
    let x_center = feature.x.round() as isize;
    let y_center = feature.y.round() as isize;
    let width = image.width() as isize;
    let height = image.height() as isize;

    let mut histogram = OrientationHistogram::new(runtime_params.orientation_histogram_bins);
    for y in y_center-radius..y_center+radius+1 {
        for x in x_center-radius..x_center+radius+1 {
            if x < 1 || y < 1 || x >= width-1 || y >= height-1 {
                continue;
            }
            let weight = gauss_2d(x_center as Float, y_center as Float, x as Float, y as Float, weight_sigma);
            histogram.add_measurement(gradient_and_orientation(image, x as usize, y as usize), weight);
        }
    }

    histogram.smooth();
    histogram.peaks(runtime_params.orientation_peak_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_peak_is_found_at_its_bin() {
        let mut histogram = OrientationHistogram::new(36);
        histogram.add_measurement((1.0, 10.0_f64.to_radians()), 1.0);
        histogram.smooth();
        let peaks = histogram.peaks(0.8);
        assert_eq!(peaks.len(), 1);
        assert!((peaks[0] - 10.0_f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn secondary_peaks_above_ratio_are_kept() {
        let mut histogram = OrientationHistogram::new(36);
        histogram.add_measurement((1.0, 0.0), 1.0);
        histogram.add_measurement((0.9, float::consts::PI), 1.0);
        histogram.add_measurement((0.5, 0.5*float::consts::PI), 1.0);
        histogram.smooth();
        assert_eq!(histogram.peaks(0.8).len(), 2);
    }

    #[test]
    fn wrap_around_bins_are_neighbours() {
        let histogram = OrientationHistogram::new(36);
        assert_eq!(radian_to_index(&histogram, 2.0*float::consts::PI - 0.01), 0);
        assert_eq!(histogram.get_value_circular(-1), histogram.bins[35]);
    }
}
