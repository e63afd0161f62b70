use crate::image::Image;
use crate::{Float, GradientDirection};
use self::{kernel::Kernel,gauss_kernel::GaussKernel1D};

pub mod gauss_kernel;
pub mod kernel;

/// Convolves along one axis. Samples outside the image are clamped to the border.
pub fn filter_1d_convolution(source: &Image, filter_direction: GradientDirection, filter_kernel: &dyn Kernel) -> Image {
    let kernel = filter_kernel.kernel();
    let step = filter_kernel.step();
    let kernel_radius_signed = filter_kernel.half_width() as isize;
    let normalizing_constant = filter_kernel.normalizing_constant();

    let buffer = &source.buffer;
    let width = buffer.ncols();
    let height = buffer.nrows();
    let mut target = Image::zeros(width, height, source.original_encoding);

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for kernel_idx in (-kernel_radius_signed..kernel_radius_signed+1).step_by(step) {
                let sample_value = match filter_direction {
                    GradientDirection::HORIZONTAL => {
                        let sample_idx = ((x as isize)+kernel_idx).clamp(0, width as isize - 1) as usize;
                        buffer[(y,sample_idx)]
                    },
                    GradientDirection::VERTICAL => {
                        let sample_idx = ((y as isize)+kernel_idx).clamp(0, height as isize - 1) as usize;
                        buffer[(sample_idx,x)]
                    }
                };

                let kernel_value = kernel[(kernel_idx + kernel_radius_signed) as usize];
                acc += sample_value*kernel_value;
            }

            target.buffer[(y,x)] = acc/normalizing_constant;
        }
    }

    target
}

pub fn gaussian_2_d_convolution(image: &Image, filter_kernel: &GaussKernel1D) -> Image {
    let blur_hor = filter_1d_convolution(image, GradientDirection::HORIZONTAL, filter_kernel);
    filter_1d_convolution(&blur_hor, GradientDirection::VERTICAL, filter_kernel)
}

pub fn gaussian_blur(image: &Image, sigma: Float) -> Image {
    if sigma <= 0.0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    gaussian_2_d_convolution(image, &GaussKernel1D::new(0.0, sigma, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_encoding::ImageEncoding;
    use nalgebra::DMatrix;

    #[test]
    fn blur_preserves_constant_image() {
        let image = Image::from_matrix(&DMatrix::from_element(9, 11, 42.0), ImageEncoding::U8, false);
        let blurred = gaussian_blur(&image, 2.0);
        for value in blurred.buffer.iter() {
            assert!((value - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn blur_spreads_an_impulse_symmetrically() {
        let mut buffer = DMatrix::<Float>::zeros(15, 15);
        buffer[(7,7)] = 100.0;
        let image = Image::from_matrix(&buffer, ImageEncoding::F64, false);
        let blurred = gaussian_blur(&image, 1.0);
        assert!(blurred.buffer[(7,7)] < 100.0);
        assert!((blurred.buffer[(7,6)] - blurred.buffer[(7,8)]).abs() < 1e-9);
        assert!((blurred.buffer[(6,7)] - blurred.buffer[(8,7)]).abs() < 1e-9);
        assert!((blurred.buffer.sum() - 100.0).abs() < 1e-6);
    }
}
