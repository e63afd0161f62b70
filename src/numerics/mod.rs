extern crate nalgebra as na;

use na::Matrix2;
use crate::image::Image;
use crate::{Float,float};

pub fn round(number: Float, dp: i32) -> Float {
    let n = (10.0 as Float).powi(dp);
    (number * n).round()/n
}

pub fn mean(data: &[Float]) -> Float {
    match data.len() {
        0 => float::NAN,
        n => data.iter().sum::<Float>()/(n as Float)
    }
}

pub fn rotation_matrix_2d_from_orientation(orientation: Float) -> Matrix2<Float> {
    Matrix2::new(orientation.cos(), -orientation.sin(),
                orientation.sin(), orientation.cos())
}

/// Wraps an angle into [0, 2pi)
pub fn wrap_angle(angle: Float) -> Float {
    let two_pi = 2.0*float::consts::PI;
    let wrapped = angle % two_pi;
    match wrapped {
        a if a < 0.0 => a + two_pi,
        a if a >= two_pi => 0.0,
        a => a
    }
}

/// Central difference gradient magnitude and orientation at an interior pixel.
/// Orientation is measured against a y-axis pointing down the rows, i.e. in image coordinates.
pub fn gradient_and_orientation(image: &Image, x: usize, y: usize) -> (Float,Float) {
    let buffer = &image.buffer;
    let x_diff = buffer[(y,x+1)] - buffer[(y,x-1)];
    let y_diff = buffer[(y+1,x)] - buffer[(y-1,x)];

    let gradient = (x_diff.powi(2) + y_diff.powi(2)).sqrt();
    (gradient, wrap_angle(y_diff.atan2(x_diff)))
}

pub fn gauss_2d(x_center: Float, y_center: Float, x: Float, y: Float, sigma: Float) -> Float {
    let sigma_sqr = sigma.powi(2);
    let exponent = -((x-x_center).powi(2) + (y-y_center).powi(2))/(2.0*sigma_sqr);
    exponent.exp()/(2.0*float::consts::PI*sigma_sqr)
}

/// Vertex offset of the parabola through (-1,f_l), (0,f_c), (1,f_r). Lies in [-0.5,0.5] for a local peak at the center.
pub fn parabolic_peak_offset(f_l: Float, f_c: Float, f_r: Float) -> Float {
    let denominator = f_l - 2.0*f_c + f_r;
    match denominator {
        d if d.abs() < Float::EPSILON => 0.0,
        d => 0.5*(f_l - f_r)/d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_decimal_places() {
        assert_eq!(round(1.23456, 3), 1.235);
        assert_eq!(round(2.0049, 2), 2.0);
    }

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert_eq!(mean(&[1.0,2.0,3.0]), 2.0);
    }

    #[test]
    fn wrap_angle_into_full_circle() {
        let pi = float::consts::PI;
        assert!((wrap_angle(-0.5*pi) - 1.5*pi).abs() < 1e-12);
        assert!((wrap_angle(2.5*pi) - 0.5*pi).abs() < 1e-12);
    }

    #[test]
    fn parabola_peak_is_symmetric() {
        assert_eq!(parabolic_peak_offset(1.0, 2.0, 1.0), 0.0);
        assert!(parabolic_peak_offset(1.0, 2.0, 1.5) > 0.0);
    }
}
