extern crate nalgebra as na;

use na::{Matrix2,Matrix3,Vector3};
use crate::image::{Image,image_encoding::ImageEncoding};
use crate::image::filter::gaussian_blur;
use crate::image::features::harris_corner::reject_edge;
use crate::Float;
use super::sift_runtime_params::SiftRuntimeParams;

/// An extremum of the difference of gaussians in octave coordinates
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SiftFeature {
    pub x: Float,
    pub y: Float,
    pub octave: usize,
    pub layer: usize,
    pub layer_offset: Float,
    /// Scale relative to the octave's sampling
    pub sigma: Float,
    pub response: Float
}

#[derive(Debug,Clone)]
pub struct SiftOctave {
    pub images: Vec<Image>,
    pub difference_of_gaussians: Vec<Image>,
    pub sigmas: Vec<Float>
}

impl SiftOctave {

    /// Builds s+3 gaussian images from a base already blurred to `sigmas[0]`, and their s+2 differences
    pub fn build_octave(base_image: &Image, s: usize, sigma_initial: Float) -> SiftOctave {
        let image_count = s + 3;
        let sigmas: Vec<Float> = (0..image_count).map(|x| sigma_initial*SiftOctave::generate_k(x as Float, s as Float)).collect();

        let mut images: Vec<Image> = Vec::with_capacity(image_count);
        images.push(base_image.clone());
        for i in 1..image_count {
            let sigma_diff = (sigmas[i].powi(2) - sigmas[i-1].powi(2)).sqrt();
            let next = gaussian_blur(&images[i-1], sigma_diff);
            images.push(next);
        }

        let mut difference_of_gaussians: Vec<Image> = Vec::with_capacity(image_count-1);
        for i in 0..images.len()-1 {
            let difference_buffer = &images[i+1].buffer - &images[i].buffer;
            difference_of_gaussians.push(Image::from_matrix(&difference_buffer, ImageEncoding::F64, false));
        }

        SiftOctave {images,difference_of_gaussians,sigmas}
    }

    fn generate_k(n: Float, s: Float) -> Float {
        (n/s).exp2()
    }

    pub fn s(&self) -> usize {
        self.sigmas.len() - 3
    }

    pub fn width(&self) -> usize {
        self.images[0].width()
    }

    pub fn height(&self) -> usize {
        self.images[0].height()
    }

    fn is_extremum(&self, x: usize, y: usize, layer: usize) -> bool {
        let value = self.difference_of_gaussians[layer].buffer[(y,x)];
        let is_max = value > 0.0;
        for l in layer-1..layer+2 {
            let buffer = &self.difference_of_gaussians[l].buffer;
            for r in y-1..y+2 {
                for c in x-1..x+2 {
                    let other = buffer[(r,c)];
                    if (is_max && other > value) || (!is_max && other < value) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Extrema of one dog layer, which must have a layer above and below
    pub fn detect_extrema(&self, octave_idx: usize, layer: usize, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
        let border = runtime_params.image_border.max(1);
        let width = self.width();
        let height = self.height();
        if layer == 0 || layer + 1 >= self.difference_of_gaussians.len() || width <= 2*border || height <= 2*border {
            return Vec::new();
        }

        let threshold = 0.5*runtime_params.contrast_r/(self.s() as Float);
        let buffer = &self.difference_of_gaussians[layer].buffer;
        let mut extrema = Vec::<SiftFeature>::new();
        for y in border..height-border {
            for x in border..width-border {
                let value = buffer[(y,x)];
                if value.abs() > threshold && self.is_extremum(x, y, layer) {
                    extrema.push(SiftFeature {
                        x: x as Float,
                        y: y as Float,
                        octave: octave_idx,
                        layer,
                        layer_offset: 0.0,
                        sigma: self.sigmas[layer],
                        response: value
                    });
                }
            }
        }
        extrema
    }

    fn gradient_and_hessian(&self, x: usize, y: usize, layer: usize) -> (Vector3<Float>, Matrix3<Float>) {
        let prev = &self.difference_of_gaussians[layer-1].buffer;
        let cur = &self.difference_of_gaussians[layer].buffer;
        let next = &self.difference_of_gaussians[layer+1].buffer;
        let v = cur[(y,x)];

        let dx = 0.5*(cur[(y,x+1)] - cur[(y,x-1)]);
        let dy = 0.5*(cur[(y+1,x)] - cur[(y-1,x)]);
        let ds = 0.5*(next[(y,x)] - prev[(y,x)]);

        let dxx = cur[(y,x+1)] + cur[(y,x-1)] - 2.0*v;
        let dyy = cur[(y+1,x)] + cur[(y-1,x)] - 2.0*v;
        let dss = next[(y,x)] + prev[(y,x)] - 2.0*v;
        let dxy = 0.25*(cur[(y+1,x+1)] - cur[(y+1,x-1)] - cur[(y-1,x+1)] + cur[(y-1,x-1)]);
        let dxs = 0.25*(next[(y,x+1)] - next[(y,x-1)] - prev[(y,x+1)] + prev[(y,x-1)]);
        let dys = 0.25*(next[(y+1,x)] - next[(y-1,x)] - prev[(y+1,x)] + prev[(y-1,x)]);

        (Vector3::new(dx,dy,ds),
         Matrix3::new(dxx,dxy,dxs,
                      dxy,dyy,dys,
                      dxs,dys,dss))
    }

    /// Quadratic subpixel refinement followed by the contrast and edge tests
    pub fn refine(&self, extremum: &SiftFeature, runtime_params: &SiftRuntimeParams) -> Option<SiftFeature> {
        let border = runtime_params.image_border.max(1);
        let s = self.s();
        let mut x = extremum.x as usize;
        let mut y = extremum.y as usize;
        let mut layer = extremum.layer;

        for _ in 0..runtime_params.max_refinement_steps {
            let (gradient, hessian) = self.gradient_and_hessian(x, y, layer);
            let offset = -(hessian.try_inverse()?*gradient);

            if offset.iter().all(|o| o.abs() < 0.5) {
                let value = self.difference_of_gaussians[layer].buffer[(y,x)];
                let contrast = value + 0.5*gradient.dot(&offset);
                if contrast.abs()*(s as Float) < runtime_params.contrast_r {
                    return None;
                }

                let edge_hessian = Matrix2::new(hessian[(0,0)],hessian[(0,1)],
                                                hessian[(1,0)],hessian[(1,1)]);
                if !reject_edge(&edge_hessian, runtime_params.edge_r) {
                    return None;
                }

                let layer_position = layer as Float + offset[2];
                return Some(SiftFeature {
                    x: x as Float + offset[0],
                    y: y as Float + offset[1],
                    octave: extremum.octave,
                    layer,
                    layer_offset: offset[2],
                    sigma: self.sigmas[0]*SiftOctave::generate_k(layer_position, s as Float),
                    response: contrast
                });
            }

            let next_x = x as isize + offset[0].round() as isize;
            let next_y = y as isize + offset[1].round() as isize;
            let next_layer = layer as isize + offset[2].round() as isize;
            let within = next_layer >= 1 && next_layer <= s as isize &&
                next_x >= border as isize && next_x < (self.width() - border) as isize &&
                next_y >= border as isize && next_y < (self.height() - border) as isize;
            if !within {
                return None;
            }
            x = next_x as usize;
            y = next_y as usize;
            layer = next_layer as usize;
        }

        None
    }
}
