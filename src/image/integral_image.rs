extern crate nalgebra as na;

use na::DMatrix;
use crate::Float;
use crate::image::Image;

/// Summed area table with one leading row and column of zeros
#[derive(Debug,Clone)]
pub struct IntegralImage {
    sums: DMatrix<Float>
}

impl IntegralImage {
    pub fn new(image: &Image) -> IntegralImage {
        let width = image.width();
        let height = image.height();
        let mut sums = DMatrix::<Float>::zeros(height+1, width+1);
        for y in 0..height {
            let mut row_sum = 0.0;
            for x in 0..width {
                row_sum += image.buffer[(y,x)];
                sums[(y+1,x+1)] = sums[(y,x+1)] + row_sum;
            }
        }
        IntegralImage { sums }
    }

    pub fn width(&self) -> usize {
        self.sums.ncols() - 1
    }

    pub fn height(&self) -> usize {
        self.sums.nrows() - 1
    }

    /// Sum over the pixels [x, x+w) x [y, y+h). The rectangle is clipped to the image.
    pub fn box_sum(&self, x: isize, y: isize, w: isize, h: isize) -> Float {
        let clamp_x = |v: isize| v.clamp(0, self.width() as isize) as usize;
        let clamp_y = |v: isize| v.clamp(0, self.height() as isize) as usize;
        let (x0, x1) = (clamp_x(x), clamp_x(x+w));
        let (y0, y1) = (clamp_y(y), clamp_y(y+h));
        if x1 <= x0 || y1 <= y0 {
            return 0.0;
        }
        self.sums[(y1,x1)] - self.sums[(y0,x1)] - self.sums[(y1,x0)] + self.sums[(y0,x0)]
    }

    /// Mean over the clipped rectangle, 0 if nothing of it lies inside the image
    pub fn box_mean(&self, x: isize, y: isize, w: isize, h: isize) -> Float {
        let clipped_w = (x+w).min(self.width() as isize) - x.max(0);
        let clipped_h = (y+h).min(self.height() as isize) - y.max(0);
        if clipped_w <= 0 || clipped_h <= 0 {
            return 0.0;
        }
        self.box_sum(x, y, w, h)/((clipped_w*clipped_h) as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;

    fn ramp() -> Image {
        Image::from_matrix(&DMatrix::from_fn(4, 5, |r,c| (r*5 + c) as Float), ImageEncoding::U8, false)
    }

    #[test]
    fn box_sum_matches_direct_sum() {
        let image = ramp();
        let integral = IntegralImage::new(&image);
        let direct: Float = image.buffer.view((1,2),(2,3)).sum();
        assert_eq!(integral.box_sum(2, 1, 3, 2), direct);
        assert_eq!(integral.box_sum(0, 0, 5, 4), image.buffer.sum());
    }

    #[test]
    fn rectangles_are_clipped() {
        let integral = IntegralImage::new(&ramp());
        assert_eq!(integral.box_sum(-1, -1, 3, 3), 0.0+1.0+5.0+6.0);
        assert_eq!(integral.box_mean(-1, -1, 3, 3), 3.0);
        assert_eq!(integral.box_sum(10, 0, 3, 3), 0.0);
        assert_eq!(integral.box_mean(3, 2, 10, 10), (13.0+14.0+18.0+19.0)/4.0);
    }
}
