use crate::{BenchError,Result,Float};

/// Dense descriptor laid out on a grid: `depth` values per grid cell, stored row by row
#[derive(Debug,Clone,PartialEq)]
pub struct DescriptorVolume {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<Float>
}

impl DescriptorVolume {
    pub fn new(width: usize, height: usize, depth: usize, data: Vec<Float>) -> Result<DescriptorVolume> {
        if data.len() != width*height*depth {
            return Err(BenchError::Descriptor(format!(
                "volume of {}x{}x{} needs {} values, got {}", width, height, depth, width*height*depth, data.len())));
        }
        Ok(DescriptorVolume { width, height, depth, data })
    }

    pub fn zeros(width: usize, height: usize, depth: usize) -> DescriptorVolume {
        DescriptorVolume { width, height, depth, data: vec![0.0; width*height*depth] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a `width x height` block of cells starting at (x, y) lies inside the grid
    pub fn contains_window(&self, x: usize, y: usize, width: usize, height: usize) -> bool {
        x + width <= self.width && y + height <= self.height
    }

    fn index(&self, x: usize, y: usize, k: usize) -> usize {
        (y*self.width + x)*self.depth + k
    }

    pub fn get(&self, x: usize, y: usize, k: usize) -> Float {
        self.data[self.index(x, y, k)]
    }

    pub fn set(&mut self, x: usize, y: usize, k: usize, value: Float) -> () {
        let idx = self.index(x, y, k);
        self.data[idx] = value;
    }

    /// All `depth` values of one grid cell
    pub fn cell(&self, x: usize, y: usize) -> &[Float] {
        let start = self.index(x, y, 0);
        &self.data[start..start+self.depth]
    }

    /// Number of stored values
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[Float] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_checks_length() {
        assert!(DescriptorVolume::new(2, 3, 4, vec![0.0; 24]).is_ok());
        assert!(DescriptorVolume::new(2, 3, 4, vec![0.0; 23]).is_err());
    }

    #[test]
    fn cells_are_contiguous() {
        let volume = DescriptorVolume::new(3, 2, 2, (0..12).map(|v| v as Float).collect()).unwrap();
        assert_eq!(volume.get(1, 0, 1), 3.0);
        assert_eq!(volume.get(0, 1, 0), 6.0);
        assert_eq!(volume.cell(2, 1), &[10.0, 11.0]);
        assert_eq!(volume.size(), 12);
        assert_eq!((volume.width(), volume.height(), volume.depth()), (3, 2, 2));
    }

    #[test]
    fn windows_must_fit_the_grid() {
        let volume = DescriptorVolume::zeros(4, 3, 1);
        assert!(volume.contains_window(0, 0, 4, 3));
        assert!(volume.contains_window(2, 1, 2, 2));
        assert!(!volume.contains_window(3, 0, 2, 1));
        assert!(!volume.contains_window(0, 2, 1, 2));
    }
}
