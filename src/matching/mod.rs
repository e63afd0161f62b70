pub mod descriptor_volume;
pub mod sliding_window;
pub mod brute_force;

use self::sliding_window::Window;

/// Pixel start and end of a match, end exclusive, as (x, y)
pub type PixelRect = ((i64,i64),(i64,i64));

/// Maps a descriptor grid window to pixels. The start is scaled, the end spans the part's original size.
pub fn window_to_pixels(window: &Window, scale: (usize,usize), part_size: (usize,usize)) -> PixelRect {
    let start_x = (window.start_x*scale.0) as i64;
    let start_y = (window.start_y*scale.1) as i64;
    ((start_x, start_y), (start_x + part_size.0 as i64, start_y + part_size.1 as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_start_is_scaled_and_end_uses_part_size() {
        let window = Window { start_x: 3, start_y: 5, end_x: 10, end_y: 9 };
        assert_eq!(window_to_pixels(&window, (4,4), (30,17)), ((12,20),(42,37)));
        assert_eq!(window_to_pixels(&window, (8,8), (30,17)), ((24,40),(54,57)));
    }
}
