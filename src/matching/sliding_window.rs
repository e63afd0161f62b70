use crate::{BenchError,Result,Float};
use super::descriptor_volume::DescriptorVolume;

/// A window on a descriptor grid, end exclusive
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Window {
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct WindowMatch {
    pub window: Window,
    pub distance: Float
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ScanOutcome {
    pub best: Option<WindowMatch>,
    pub subsets: usize
}

/// Every window of `window_size` that fits into `image_size`, x fastest.
/// A window that ends exactly on the image border is included.
pub fn subsets(window_size: (usize,usize), image_size: (usize,usize), step: (usize,usize)) -> impl Iterator<Item = Window> {
    let (window_w, window_h) = window_size;
    let (image_w, image_h) = image_size;
    let step_x = step.0.max(1);
    let step_y = step.1.max(1);

    let fits = window_w <= image_w && window_h <= image_h;
    let last_x = image_w.saturating_sub(window_w);
    let last_y = image_h.saturating_sub(window_h);
    let rows = if fits { last_y/step_y + 1 } else { 0 };
    let cols = if fits { last_x/step_x + 1 } else { 0 };

    (0..rows).flat_map(move |j| (0..cols).map(move |i| {
        let start_x = i*step_x;
        let start_y = j*step_y;
        Window { start_x, start_y, end_x: start_x + window_w, end_y: start_y + window_h }
    }))
}

/// Euclidean distance between the part volume and the equally sized window of the image volume at (x, y).
/// Fails if the depths differ or the window leaves the image grid.
pub fn window_distance(part: &DescriptorVolume, image: &DescriptorVolume, x: usize, y: usize) -> Result<Float> {
    check_depth(part, image)?;
    if !image.contains_window(x, y, part.width(), part.height()) {
        return Err(BenchError::DescriptorMismatch(format!(
            "window of {}x{} at ({}, {}) exceeds image grid of {}x{}", part.width(), part.height(), x, y, image.width(), image.height())));
    }

    let mut sum = 0.0;
    for py in 0..part.height() {
        for px in 0..part.width() {
            let part_cell = part.cell(px, py);
            let image_cell = image.cell(x + px, y + py);
            for (a,b) in part_cell.iter().zip(image_cell.iter()) {
                let d = b - a;
                sum += d*d;
            }
        }
    }
    Ok(sum.sqrt())
}

fn check_depth(part: &DescriptorVolume, image: &DescriptorVolume) -> Result<()> {
    match part.depth() == image.depth() {
        true => Ok(()),
        false => Err(BenchError::DescriptorMismatch(format!(
            "part descriptor depth {} differs from image descriptor depth {}", part.depth(), image.depth())))
    }
}

/// Exhaustive scan for the window with the lowest distance. Ties keep the earliest window.
pub fn best_window(part: &DescriptorVolume, image: &DescriptorVolume, step: (usize,usize)) -> Result<ScanOutcome> {
    check_depth(part, image)?;

    let mut best: Option<WindowMatch> = None;
    let mut count = 0;
    for window in subsets((part.width(), part.height()), (image.width(), image.height()), step) {
        count += 1;
        let distance = window_distance(part, image, window.start_x, window.start_y)?;
        let improves = match best {
            None => true,
            Some(current) => distance < current.distance
        };
        if improves {
            best = Some(WindowMatch { window, distance });
        }
    }

    Ok(ScanOutcome { best, subsets: count })
}
