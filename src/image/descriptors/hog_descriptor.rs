extern crate image as image_rs;

use image_rs::GrayImage;
use image_rs::imageops::{self, FilterType};
use imageproc::hog::{hog, HogOptions};
use serde::{Serialize, Deserialize};

use crate::{BenchError,Result,Float};
use crate::matching::descriptor_volume::DescriptorVolume;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct HogRuntimeParameters {
    pub orientations: usize,
    pub signed: bool,
    pub cell_side: usize,
    /// Block side in cells
    pub block_side: usize,
    /// Block stride in cells
    pub block_stride: usize
}

impl Default for HogRuntimeParameters {
    fn default() -> HogRuntimeParameters {
        HogRuntimeParameters { orientations: 9, signed: true, cell_side: 4, block_side: 2, block_stride: 1 }
    }
}

impl HogRuntimeParameters {
    /// Pixels between neighbouring block origins
    pub fn scale(&self) -> usize {
        self.cell_side*self.block_stride
    }

    pub fn block_len(&self) -> usize {
        self.orientations*self.block_side*self.block_side
    }

    fn options(&self) -> HogOptions {
        HogOptions {
            orientations: self.orientations,
            signed: self.signed,
            cell_side: self.cell_side,
            block_side: self.block_side,
            block_stride: self.block_stride
        }
    }
}

/// Largest multiple of `base` not exceeding `size`
pub fn cropped_size(size: usize, base: usize) -> usize {
    match base {
        0 => size,
        b => size - size % b
    }
}

/// HOG blocks arranged as a `blocks_wide x blocks_high x block_len` volume.
/// The image is resized to a whole number of cells first. Blocks without any gradient are all zero.
pub fn compute_hog(image: &GrayImage, runtime_parameters: &HogRuntimeParameters) -> Result<DescriptorVolume> {
    let cell_side = runtime_parameters.cell_side;
    let width = cropped_size(image.width() as usize, cell_side);
    let height = cropped_size(image.height() as usize, cell_side);

    let cells_wide = width/cell_side.max(1);
    let cells_high = height/cell_side.max(1);
    if cells_wide < runtime_parameters.block_side || cells_high < runtime_parameters.block_side || runtime_parameters.block_stride == 0 {
        return Err(BenchError::Descriptor(format!(
            "image of {}x{} is too small for a single HOG block", image.width(), image.height())));
    }

    let resized = match (width as u32, height as u32) == image.dimensions() {
        true => image.clone(),
        false => imageops::resize(image, width as u32, height as u32, FilterType::Triangle)
    };

    let descriptor = hog(&resized, runtime_parameters.options()).map_err(BenchError::Descriptor)?;

    let blocks_wide = (cells_wide - runtime_parameters.block_side)/runtime_parameters.block_stride + 1;
    let blocks_high = (cells_high - runtime_parameters.block_side)/runtime_parameters.block_stride + 1;
    DescriptorVolume::new(blocks_wide, blocks_high, runtime_parameters.block_len(), descriptor.into_iter().map(|v| if v.is_nan() {0.0} else {v as Float}).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Luma;

    #[test]
    fn cropped_size_rounds_down() {
        assert_eq!(cropped_size(30, 4), 28);
        assert_eq!(cropped_size(32, 4), 32);
        assert_eq!(cropped_size(3, 4), 0);
    }

    #[test]
    fn volume_has_block_grid_shape() {
        let image = GrayImage::from_fn(34, 21, |x,y| Luma([((x*9 + y*13) % 256) as u8]));
        let volume = compute_hog(&image, &HogRuntimeParameters::default()).unwrap();
        // 32x20 pixels, 8x5 cells
        assert_eq!((volume.width(), volume.height(), volume.depth()), (7, 4, 36));
        assert_eq!(volume.size(), 7*4*36);
    }

    #[test]
    fn tiny_images_are_rejected() {
        let image = GrayImage::from_pixel(6, 20, Luma([1u8]));
        assert!(compute_hog(&image, &HogRuntimeParameters::default()).is_err());
    }
}
