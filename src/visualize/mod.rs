extern crate image as image_rs;

use std::fs;
use std::path::Path;
use image_rs::{Rgb,RgbImage,imageops};
use imageproc::drawing::{draw_hollow_circle_mut,draw_hollow_rect_mut,draw_line_segment_mut};
use imageproc::rect::Rect;
use rand::{Rng,SeedableRng,rngs::SmallRng};

use crate::Result;
use crate::image::features::KeyPoint;
use crate::matching::{PixelRect,brute_force::DMatch};

const MATCH_COLOR_SEED: u64 = 0x5EED_C010_0125;
const KEYPOINT_RADIUS: i32 = 4;

pub const LOCATION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Copy of `image` with a hollow rectangle around a match. The outline runs through both corners,
/// so the end corner of the location is painted as well.
pub fn draw_location(image: &RgbImage, location: &PixelRect) -> RgbImage {
    let mut target_image = image.clone();
    let ((start_x, start_y),(end_x, end_y)) = *location;
    let width = end_x - start_x;
    let height = end_y - start_y;
    if width > 0 && height > 0 {
        let rect = Rect::at(start_x as i32, start_y as i32).of_size(width as u32 + 1, height as u32 + 1);
        draw_hollow_rect_mut(&mut target_image, rect, LOCATION_COLOR);
    }
    target_image
}

/// Puts the part at the top left and the image to its right. The canvas has the image's height.
pub fn display_with_part(part: &RgbImage, image: &RgbImage) -> RgbImage {
    let mut target_image = RgbImage::new(part.width() + image.width(), image.height());
    imageops::replace(&mut target_image, part, 0, 0);
    imageops::replace(&mut target_image, image, part.width() as i64, 0);
    target_image
}

/// Part and image side by side with a line and a circle pair for every match
pub fn display_matches(part: &RgbImage, part_keypoints: &[KeyPoint], image: &RgbImage, image_keypoints: &[KeyPoint], matches: &[DMatch]) -> RgbImage {
    let width = part.width() + image.width();
    let height = part.height().max(image.height());
    let mut target_image = RgbImage::new(width, height);
    imageops::replace(&mut target_image, part, 0, 0);
    imageops::replace(&mut target_image, image, part.width() as i64, 0);

    let offset = part.width() as f32;
    let mut rng = SmallRng::seed_from_u64(MATCH_COLOR_SEED);
    for m in matches {
        let (part_keypoint, image_keypoint) = match (part_keypoints.get(m.query_idx), image_keypoints.get(m.train_idx)) {
            (Some(p), Some(i)) => (p, i),
            _ => continue
        };
        let color = Rgb([rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>()]);
        let a = (part_keypoint.x as f32, part_keypoint.y as f32);
        let b = (image_keypoint.x as f32 + offset, image_keypoint.y as f32);
        draw_hollow_circle_mut(&mut target_image, (a.0.round() as i32, a.1.round() as i32), KEYPOINT_RADIUS, color);
        draw_hollow_circle_mut(&mut target_image, (b.0.round() as i32, b.1.round() as i32), KEYPOINT_RADIUS, color);
        draw_line_segment_mut(&mut target_image, a, b, color);
    }

    target_image
}

/// Saves in the format implied by the extension, creating parent directories
pub fn save(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    image.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_outlined() {
        let image = RgbImage::new(20, 10);
        let out = draw_location(&image, &((2,3),(7,8)));
        assert_eq!(*out.get_pixel(2, 3), LOCATION_COLOR);
        assert_eq!(*out.get_pixel(7, 8), LOCATION_COLOR);
        assert_eq!(*out.get_pixel(7, 3), LOCATION_COLOR);
        assert_eq!(*out.get_pixel(2, 8), LOCATION_COLOR);
        assert_eq!(*out.get_pixel(6, 7), Rgb([0,0,0]));
        assert_eq!(*out.get_pixel(8, 9), Rgb([0,0,0]));
    }

    #[test]
    fn part_is_clipped_to_the_image_height() {
        let part = RgbImage::from_pixel(4, 12, Rgb([9,9,9]));
        let image = RgbImage::from_pixel(10, 8, Rgb([200,200,200]));
        let out = display_with_part(&part, &image);
        assert_eq!(out.dimensions(), (14, 8));
        assert_eq!(*out.get_pixel(0, 7), Rgb([9,9,9]));
        assert_eq!(*out.get_pixel(4, 0), Rgb([200,200,200]));
    }

    #[test]
    fn short_part_leaves_black_below() {
        let part = RgbImage::from_pixel(4, 3, Rgb([9,9,9]));
        let image = RgbImage::from_pixel(10, 8, Rgb([200,200,200]));
        let out = display_with_part(&part, &image);
        assert_eq!(*out.get_pixel(1, 5), Rgb([0,0,0]));
    }

    #[test]
    fn matches_canvas_uses_the_taller_height() {
        let part = RgbImage::from_pixel(6, 12, Rgb([50,50,50]));
        let image = RgbImage::from_pixel(10, 8, Rgb([50,50,50]));
        let keypoints = vec![KeyPoint::new(3.0, 3.0, 7.0)];
        let matches = vec![DMatch { query_idx: 0, train_idx: 0, distance: 0.0 }, DMatch { query_idx: 5, train_idx: 0, distance: 1.0 }];
        let out = display_matches(&part, &keypoints, &image, &keypoints, &matches);
        assert_eq!(out.dimensions(), (16, 12));
        assert_ne!(*out.get_pixel(6, 3), Rgb([50,50,50]));
    }
}
