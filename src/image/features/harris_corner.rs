extern crate nalgebra as na;

use na::Matrix2;
use crate::image::Image;
use crate::Float;

/// Structure tensor summed over a square window of the given radius, using central difference gradients.
/// Returns None if the window plus the gradient stencil does not fit into the image.
pub fn harris_matrix(image: &Image, x: usize, y: usize, window_radius: usize) -> Option<Matrix2<Float>> {
    let reach = window_radius + 1;
    if x < reach || y < reach || x + reach >= image.width() || y + reach >= image.height() {
        return None;
    }

    let buffer = &image.buffer;
    let mut ixx = 0.0;
    let mut iyy = 0.0;
    let mut ixy = 0.0;
    for r in y-window_radius..y+window_radius+1 {
        for c in x-window_radius..x+window_radius+1 {
            let dx = 0.5*(buffer[(r,c+1)] - buffer[(r,c-1)]);
            let dy = 0.5*(buffer[(r+1,c)] - buffer[(r-1,c)]);
            ixx += dx*dx;
            iyy += dy*dy;
            ixy += dx*dy;
        }
    }

    Some(Matrix2::new(ixx,ixy,
                      ixy,iyy))
}

pub fn harris_response(harris_matrix: &Matrix2<Float>, k: Float) -> Float {
    let determinant = harris_matrix.determinant();
    let trace = harris_matrix.trace();
    determinant - k*trace.powi(2)
}

pub fn harris_ratio(harris_matrix: &Matrix2<Float>, r: Float) -> (Float,Float) {
    let trace = harris_matrix.trace();
    let determinant = harris_matrix.determinant();
    ( trace.powi(2)/determinant,(r+1.0).powi(2)/r)
}

/// True if the principal curvature ratio of a hessian stays below r, i.e. the point is not on an edge
pub fn reject_edge(hessian: &Matrix2<Float>, r: Float) -> bool {
    let determinant = hessian.determinant();
    if determinant <= 0.0 {
        return false;
    }
    let (ratio, r_ratio) = harris_ratio(hessian, r);
    ratio < r_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;
    use nalgebra::DMatrix;

    fn image_from_fn<F: Fn(usize,usize) -> Float>(f: F) -> Image {
        Image::from_matrix(&DMatrix::from_fn(30, 30, |r,c| f(r,c)), ImageEncoding::U8, false)
    }

    #[test]
    fn corner_scores_higher_than_edge_and_flat() {
        let image = image_from_fn(|r,c| if r >= 15 && c >= 15 {200.0} else {10.0});
        let k = 0.04;
        let corner = harris_response(&harris_matrix(&image, 15, 15, 3).unwrap(), k);
        let edge = harris_response(&harris_matrix(&image, 15, 25, 3).unwrap(), k);
        let flat = harris_response(&harris_matrix(&image, 5, 5, 3).unwrap(), k);
        assert!(corner > 0.0);
        assert!(edge < corner);
        assert_eq!(flat, 0.0);
    }

    #[test]
    fn window_must_fit() {
        let image = image_from_fn(|_,_| 0.0);
        assert!(harris_matrix(&image, 2, 10, 3).is_none());
        assert!(harris_matrix(&image, 26, 10, 3).is_none());
        assert!(harris_matrix(&image, 4, 4, 3).is_some());
    }

    #[test]
    fn edge_hessian_is_rejected() {
        let blob = Matrix2::new(-2.0, 0.0, 0.0, -2.0);
        let edge = Matrix2::new(-20.0, 0.0, 0.0, -0.1);
        assert!(reject_edge(&blob, 10.0));
        assert!(!reject_edge(&edge, 10.0));
    }
}
