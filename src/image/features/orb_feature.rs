use serde::{Serialize, Deserialize};
use log::debug;

use crate::image::features::{
    Feature,Oriented,KeyPoint,
    fast_feature::{FastFeature,FastRuntimeParameters},
    geometry::{point::Point,disk_offsets},
    harris_corner::{harris_matrix,harris_response},
    intensity_centroid
};
use crate::image::pyramid::{Pyramid,orb::OrbRuntimeParameters};
use crate::image::Image;
use crate::Float;

#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct OrbFeature {
    pub location: Point<usize>,
    pub orientation: Float,
    pub response: Float,
    pub sigma_level: usize
}

impl Feature for OrbFeature {
    fn get_x_image_float(&self) -> Float { self.location.x as Float }
    fn get_y_image_float(&self) -> Float { self.location.y as Float }
    fn get_x_image(&self) -> usize { self.location.x }
    fn get_y_image(&self) -> usize { self.location.y }
    fn get_closest_sigma_level(&self) -> usize { self.sigma_level }
}

impl Oriented for OrbFeature {
    fn get_orientation(&self) -> Float {
        self.orientation
    }
}

impl OrbFeature {

    /// Features of a single pyramid level, best harris response first, at most `max_features` of them
    pub fn new(image: &Image, octave_idx: usize, max_features: usize, runtime_parameters: &OrbRuntimeParameters) -> Vec<OrbFeature> {
        let fast_parameters = FastRuntimeParameters { threshold: runtime_parameters.fast_threshold, non_max_suppression: true };
        let border = runtime_parameters.edge_threshold;
        let width = image.width();
        let height = image.height();
        if width <= 2*border || height <= 2*border {
            return Vec::new();
        }

        let fast_features = FastFeature::compute_features(&image.to_image(), &fast_parameters);
        let mut indexed_harris_corner_responses = fast_features.iter()
            .filter(|f| f.location.x >= border && f.location.y >= border && f.location.x < width-border && f.location.y < height-border)
            .filter_map(|f| harris_matrix(image, f.location.x, f.location.y, runtime_parameters.harris_window_radius)
                .map(|m| (f.location, harris_response(&m, runtime_parameters.harris_k))))
            .collect::<Vec<(Point<usize>,Float)>>();
        indexed_harris_corner_responses.sort_by(|a,b| b.1.total_cmp(&a.1));
        indexed_harris_corner_responses.truncate(max_features);

        let offsets = disk_offsets(runtime_parameters.orientation_radius);
        indexed_harris_corner_responses.into_iter().map(|(location,response)| OrbFeature {
            location,
            orientation: intensity_centroid::orientation(image, location.x, location.y, &offsets),
            response,
            sigma_level: octave_idx
        }).collect()
    }

    /// Detects features on every level. The feature budget is split across levels in proportion to level area.
    pub fn from_pyramid(pyramid: &Pyramid<Image>, runtime_parameters: &OrbRuntimeParameters) -> Vec<OrbFeature> {
        let area_factor = 1.0/runtime_parameters.scale_factor.powi(2);
        let level_count = pyramid.octaves.len();
        let weights = (0..level_count).map(|i| area_factor.powi(i as i32)).collect::<Vec<Float>>();
        let weight_sum: Float = weights.iter().sum();

        let mut features = Vec::<OrbFeature>::new();
        for (level, image) in pyramid.octaves.iter().enumerate() {
            let budget = (runtime_parameters.max_features as Float * weights[level]/weight_sum).round() as usize;
            let level_features = OrbFeature::new(image, level, budget, runtime_parameters);
            debug!("orb level {}: {} features", level, level_features.len());
            features.extend(level_features);
        }
        features
    }

    pub fn to_keypoint(&self, runtime_parameters: &OrbRuntimeParameters) -> KeyPoint {
        let (x,y) = self.reconstruct_original_coordiantes_for_float(runtime_parameters.scale_factor);
        KeyPoint {
            x,
            y,
            size: runtime_parameters.brief_s as Float * runtime_parameters.level_scale(self.sigma_level),
            angle: self.orientation,
            response: self.response,
            octave: self.sigma_level
        }
    }
}
