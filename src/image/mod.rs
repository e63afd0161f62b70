extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::{GrayImage, DynamicImage, Pixel, Luma};
use image_rs::flat::NormalForm;
use na::DMatrix;

use crate::Float;
use self::image_encoding::ImageEncoding;

pub mod image_encoding;
pub mod filter;
pub mod integral_image;
pub mod features;
pub mod pyramid;
pub mod descriptors;

#[derive(Debug,Clone)]
pub struct Image {
    pub buffer: DMatrix<Float>,
    pub original_encoding: ImageEncoding
}

impl Image {

    pub fn zeros(width: usize, height: usize, image_encoding: ImageEncoding) -> Image {
        Image{ buffer: DMatrix::<Float>::zeros(height,width), original_encoding: image_encoding}
    }

    pub fn from_matrix(matrix: &DMatrix<Float>, original_encoding: ImageEncoding, normalize: bool) -> Image {
        let mut buffer = matrix.clone();

        if normalize {
            let max = buffer.amax();
            if max > 0.0 {
                buffer /= max;
            }
        }

        Image{ buffer, original_encoding}
    }

    pub fn from_gray_image(image: &GrayImage, normalize: bool) -> Image {
        let buffer = Image::image8_to_matrix(image);
        Image::from_matrix(&buffer, ImageEncoding::U8, normalize)
    }

    pub fn to_image(&self) -> GrayImage {
        Image::matrix_to_image(&self.buffer, self.original_encoding)
    }

    pub fn width(&self) -> usize {
        self.buffer.ncols()
    }

    pub fn height(&self) -> usize {
        self.buffer.nrows()
    }

    /// Pixel value with coordinates clamped to the image border
    pub fn clamped(&self, x: isize, y: isize) -> Float {
        let c = x.clamp(0, self.width() as isize - 1) as usize;
        let r = y.clamp(0, self.height() as isize - 1) as usize;
        self.buffer[(r,c)]
    }

    /// Bilinear sample at subpixel coordinates, clamped at the border
    pub fn sample(&self, x: Float, y: Float) -> Float {
        let x0 = x.floor();
        let y0 = y.floor();
        let dx = x - x0;
        let dy = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        (1.0-dx)*(1.0-dy)*self.clamped(x0, y0) +
        dx*(1.0-dy)*self.clamped(x0+1, y0) +
        (1.0-dx)*dy*self.clamped(x0, y0+1) +
        dx*dy*self.clamped(x0+1, y0+1)
    }

    pub fn downsample_half(image: &Image) -> Image {
        let width = image.width();
        let height = image.height();

        let new_width = width/2;
        let new_height = height/2;

        let new_buffer = DMatrix::<Float>::from_fn(new_height, new_width, |r,c| image.buffer[(2*r,2*c)]);

        Image{
            buffer: new_buffer,
            original_encoding: image.original_encoding
        }
    }

    pub fn upsample_double(image: &Image) -> Image {
        let new_width = image.width()*2;
        let new_height = image.height()*2;

        let new_buffer = DMatrix::<Float>::from_fn(new_height, new_width, |r,c| image.sample(c as Float / 2.0, r as Float / 2.0));

        Image{
            buffer: new_buffer,
            original_encoding: image.original_encoding
        }
    }

    fn image8_to_matrix(gray_image: &GrayImage) -> DMatrix<Float> {
        debug_assert!(gray_image.sample_layout().is_normal(NormalForm::RowMajorPacked));

        let (width, height) = gray_image.dimensions();
        let size = (width * height) as usize;
        let mut vec_column_major: Vec<Float> = Vec::with_capacity(size);
        for x in 0..width {
            for y in 0..height {
                let pixel_value = gray_image.get_pixel(x, y).channels()[0];
                vec_column_major.push(pixel_value as Float);
            }
        }
        DMatrix::<Float>::from_vec(height as usize, width as usize, vec_column_major)
    }

    fn matrix_to_image(matrix: &DMatrix<Float>, encoding: ImageEncoding) -> GrayImage {
        let (rows, cols) = matrix.shape();

        let mut gray_image = DynamicImage::new_luma8(cols as u32, rows as u32).to_luma8();
        let max = matrix.max();
        let min = matrix.min();
        for c in 0..cols {
            for r in 0..rows {
                let val = *matrix.index((r, c));
                let pixel_value = encoding.normalize_to_gray(max,min,val);
                gray_image.put_pixel(c as u32, r as u32, Luma([pixel_value]));
            }
        }
        gray_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x,y| Luma([(x*10 + y) as u8]))
    }

    #[test]
    fn gray_image_round_trip_keeps_layout() {
        let gray = gradient_image(7, 5);
        let image = Image::from_gray_image(&gray, false);
        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 5);
        assert_eq!(image.buffer[(2,3)], 32.0);
        assert_eq!(image.to_image(), gray);
    }

    #[test]
    fn downsample_takes_every_second_pixel() {
        let image = Image::from_gray_image(&gradient_image(8, 6), false);
        let half = Image::downsample_half(&image);
        assert_eq!((half.width(), half.height()), (4,3));
        assert_eq!(half.buffer[(1,2)], image.buffer[(2,4)]);
    }

    #[test]
    fn upsample_interpolates_between_pixels() {
        let image = Image::from_gray_image(&gradient_image(4, 4), false);
        let double = Image::upsample_double(&image);
        assert_eq!((double.width(), double.height()), (8,8));
        assert_eq!(double.buffer[(0,0)], image.buffer[(0,0)]);
        assert_eq!(double.buffer[(0,1)], 5.0);
        assert_eq!(double.buffer[(7,7)], image.buffer[(3,3)]);
    }
}
