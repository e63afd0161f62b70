use serde::{Serialize, Deserialize};
use crate::Float;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SiftRuntimeParams {
    /// Blur assumed to be present in the input image
    pub sigma_in: Float,
    pub sigma_initial: Float,
    /// Intervals per octave
    pub sigma_count: usize,
    pub min_octave_size: usize,
    pub contrast_r: Float,
    pub edge_r: Float,
    pub max_refinement_steps: usize,
    pub image_border: usize,
    pub orientation_histogram_bins: usize,
    pub orientation_peak_ratio: Float,
    pub descriptor_width: usize,
    pub descriptor_bins: usize,
    pub descriptor_magnitude_cap: Float
}

impl Default for SiftRuntimeParams {
    fn default() -> SiftRuntimeParams {
        SiftRuntimeParams {
            sigma_in: 0.5,
            sigma_initial: 1.6,
            sigma_count: 3,
            min_octave_size: 16,
            contrast_r: 0.04,
            edge_r: 10.0,
            max_refinement_steps: 5,
            image_border: 5,
            orientation_histogram_bins: 36,
            orientation_peak_ratio: 0.8,
            descriptor_width: 4,
            descriptor_bins: 8,
            descriptor_magnitude_cap: 0.2
        }
    }
}
